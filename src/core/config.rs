//! Engine configuration with documented constants
//!
//! All tuning numbers are collected here with explanations of their purpose
//! and how they interact with each other. Every field has a default, so a
//! TOML file only needs to name the values it overrides.

use crate::core::error::Result;
use crate::core::types::Rgba;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for agents, the evaluator and the dialogue manager
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === DECISIONS ===
    /// Seconds between utility evaluations
    ///
    /// An agent with no active action evaluates immediately regardless.
    /// A condition that fills its need to 1.0 also forces the timer to zero.
    pub decision_interval: f32,

    /// If any need is at or below this value, the evaluator rescans for
    /// useable objects before scoring
    ///
    /// Above it, the candidate map from the previous scan is reused. Higher
    /// values mean more frequent proximity queries.
    pub crisis_threshold: f32,

    /// Radius searched for useable objects (world units)
    pub max_range: f32,

    /// Whether new agents run utility AI at all
    ///
    /// Agents with utility AI off stand idle but still take part in dialogue.
    pub use_utility_ai: bool,

    // === DERIVED EMOTION ===
    /// Name of the emotion computed from all other emotions
    pub derived_emotion: String,

    /// An emotion at or above this value counts as "high"
    pub emotion_high_threshold: f32,

    /// An emotion at or below this value counts as "low"
    pub emotion_low_threshold: f32,

    /// Rate applied per high emotion per second (negative: saturated
    /// emotions wear the derived emotion down)
    pub emotion_high_rate: f32,

    /// Rate applied per low emotion per second
    pub emotion_low_rate: f32,

    // === WANDERING ===
    /// Distance at which a wander target counts as reached
    pub arrival_distance: f32,

    /// Maximum point samples per wander target before falling back to the
    /// last valid point
    pub wander_max_samples: u32,

    // === OBJECT USE ===
    /// Interpolation rate toward clip positions while the clip queue plays
    pub sequence_blend_rate: f32,

    /// Interpolation rate toward the final position while sustaining the
    /// main clip
    pub sustain_blend_rate: f32,

    // === ANIMATION CLIPS ===
    pub idle_clip: String,
    pub walk_clip: String,
    pub talk_clip: String,

    /// Crossfade duration used when queueing object-use clips (seconds)
    pub crossfade_seconds: f32,

    // === DIALOGUE ===
    /// Font used when neither the dialogue unit nor the character names one
    pub default_font: Option<String>,

    /// Dialogue box tint while a sentence is on screen
    pub dialogue_box_color: Rgba,

    /// Dialogue box tint while the box is open but empty
    pub empty_dialogue_box_color: Rgba,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            decision_interval: 10.0,
            crisis_threshold: 0.85,
            max_range: 200.0,
            use_utility_ai: true,

            derived_emotion: "Happiness".to_string(),
            emotion_high_threshold: 0.8,
            emotion_low_threshold: 0.2,
            emotion_high_rate: -0.01,
            emotion_low_rate: 0.01,

            arrival_distance: 0.5,
            wander_max_samples: 16,

            sequence_blend_rate: 5.0,
            sustain_blend_rate: 10.0,

            idle_clip: "Idle".to_string(),
            walk_clip: "Walk".to_string(),
            talk_clip: "Talk".to_string(),
            crossfade_seconds: 0.3,

            default_font: None,
            dialogue_box_color: Rgba::WHITE,
            empty_dialogue_box_color: Rgba([1.0, 1.0, 1.0, 0.0]),
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text; missing fields keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
