pub mod agent;
pub mod emotions;
pub mod needs;

pub use agent::{Agent, AgentBuilder};
pub use emotions::{DerivedEmotionRule, Emotion, EmotionSet};
pub use needs::{Need, NeedSet};

use serde::{Deserialize, Serialize};

/// The need or emotion a condition or multiplier acts on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Affected {
    Need(String),
    Emotion(String),
}

impl Affected {
    pub fn name(&self) -> &str {
        match self {
            Affected::Need(name) | Affected::Emotion(name) => name,
        }
    }

    /// Name of the affected need, if this targets a need
    pub fn need_name(&self) -> Option<&str> {
        match self {
            Affected::Need(name) => Some(name),
            Affected::Emotion(_) => None,
        }
    }

    pub fn read(&self, needs: &NeedSet, emotions: &EmotionSet) -> Option<f32> {
        match self {
            Affected::Need(name) => needs.get(name),
            Affected::Emotion(name) => emotions.get(name),
        }
    }

    /// Add a clamped delta; returns false if the agent lacks the target
    pub fn adjust(&self, needs: &mut NeedSet, emotions: &mut EmotionSet, delta: f32) -> bool {
        match self {
            Affected::Need(name) => needs.adjust(name, delta),
            Affected::Emotion(name) => emotions.adjust(name, delta),
        }
    }

    /// True if the agent owns the target
    pub fn exists_in(&self, needs: &NeedSet, emotions: &EmotionSet) -> bool {
        match self {
            Affected::Need(name) => needs.contains(name),
            Affected::Emotion(name) => emotions.contains(name),
        }
    }
}
