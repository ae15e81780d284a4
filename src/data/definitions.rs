//! Definition records for TOML deserialization
//!
//! A definitions file declares the needs and emotions every agent carries,
//! the action templates, the useables in the world, the agents themselves,
//! and the characters and conversations they speak.

use crate::actions::{Action, ActionCore, Multiplier, Placement, UseObjectAction, WanderAction};
use crate::conditions::{NeedCondition, TimeOfDayCondition};
use crate::core::error::{NpcError, Result};
use crate::core::types::{Bounds, Pose};
use crate::dialogue::{Character, Conversation};
use crate::entity::Affected;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Links a need to an emotion: while the need is past `value`, the emotion
/// moves at `multiplier` per second
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeedEmotionLink {
    pub emotion: String,
    pub multiplier: f32,
    /// Compare with `>=` when true, `<=` when false
    #[serde(default)]
    pub if_above: bool,
    pub value: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeedDef {
    pub name: String,
    #[serde(default)]
    pub emotion_multipliers: Vec<NeedEmotionLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionDef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WanderDef {
    pub name: String,
    pub radius: f32,
    pub idle_time: f32,
    /// Corners of the box wander targets must stay in
    #[serde(default)]
    pub boundary: Option<[Vec3; 2]>,
    #[serde(default)]
    pub need_multipliers: Vec<Multiplier>,
    #[serde(default)]
    pub emotion_multipliers: Vec<Multiplier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseObjectDef {
    pub name: String,
    pub main_clip: String,
    /// Clips played on arrival; defaults to just the main clip
    #[serde(default)]
    pub clips: Vec<String>,
    #[serde(default)]
    pub placements: Vec<Placement>,
    #[serde(default)]
    pub exit_pose: Option<Pose>,
    #[serde(default)]
    pub max_speed: Option<f32>,
    #[serde(default)]
    pub need_multipliers: Vec<Multiplier>,
    #[serde(default)]
    pub emotion_multipliers: Vec<Multiplier>,
}

/// Action template, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionDef {
    Wander(WanderDef),
    UseObject(UseObjectDef),
}

impl ActionDef {
    pub fn name(&self) -> &str {
        match self {
            ActionDef::Wander(def) => &def.name,
            ActionDef::UseObject(def) => &def.name,
        }
    }

    fn core(name: &str, needs: &[Multiplier], emotions: &[Multiplier]) -> ActionCore {
        let mut core = ActionCore::new(name);
        core.need_multipliers = needs.to_vec();
        core.emotion_multipliers = emotions.to_vec();
        core
    }

    /// Build a fresh action instance from this template
    pub fn instantiate(&self) -> Result<Box<dyn Action>> {
        match self {
            ActionDef::Wander(def) => {
                let core = Self::core(&def.name, &def.need_multipliers, &def.emotion_multipliers);
                let mut action = WanderAction::new(&def.name, def.radius, def.idle_time).with_core(core);
                if let Some([a, b]) = def.boundary {
                    action = action.with_boundary(Bounds::new(a, b));
                }
                Ok(Box::new(action))
            }
            ActionDef::UseObject(def) => {
                let core = Self::core(&def.name, &def.need_multipliers, &def.emotion_multipliers);
                let mut action = UseObjectAction::new(&def.name, &def.main_clip).with_core(core);
                if !def.clips.is_empty() || !def.placements.is_empty() {
                    let clips = if def.clips.is_empty() {
                        vec![def.main_clip.clone()]
                    } else {
                        def.clips.clone()
                    };
                    action = action.with_sequence(clips, def.placements.clone())?;
                }
                if let Some(pose) = def.exit_pose {
                    action = action.with_exit_pose(pose);
                }
                if let Some(speed) = def.max_speed {
                    action = action.with_max_speed(speed);
                }
                Ok(Box::new(action))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseableDef {
    pub name: String,
    /// Name of the use-object action this useable offers
    pub action: String,
    pub range: f32,
    #[serde(default)]
    pub holdable: bool,
    pub position: Vec3,
    /// Yaw in degrees
    #[serde(default)]
    pub yaw: f32,
}

impl UseableDef {
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, Quat::from_rotation_y(self.yaw.to_radians()))
    }
}

/// Moves a need or emotion by time of day; name exactly one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeOfDayDef {
    #[serde(default)]
    pub night: bool,
    #[serde(default)]
    pub day: bool,
    #[serde(default)]
    pub need: Option<String>,
    #[serde(default)]
    pub emotion: Option<String>,
    pub multiplier: f32,
}

impl TimeOfDayDef {
    pub fn to_condition(&self) -> Result<TimeOfDayCondition> {
        let affected = match (&self.need, &self.emotion) {
            (Some(need), None) => Affected::Need(need.clone()),
            (None, Some(emotion)) => Affected::Emotion(emotion.clone()),
            _ => {
                return Err(NpcError::InvalidDefinition(
                    "time of day condition must name exactly one of need or emotion".to_string(),
                ))
            }
        };
        Ok(TimeOfDayCondition::new(self.night, self.day, affected, self.multiplier))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDef {
    pub name: String,
    #[serde(default)]
    pub position: Vec3,
    /// Names of wander actions this agent carries
    #[serde(default)]
    pub intrinsic: Vec<String>,
    /// Conversation ids the agent can open
    #[serde(default)]
    pub conversations: Vec<String>,
    #[serde(default)]
    pub use_utility_ai: Option<bool>,
    #[serde(default = "default_true")]
    pub has_hand: bool,
    #[serde(default)]
    pub speed: Option<f32>,
    #[serde(default)]
    pub time_of_day: Vec<TimeOfDayDef>,
}

/// Everything a definitions file declares
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Definitions {
    pub needs: Vec<NeedDef>,
    pub emotions: Vec<EmotionDef>,
    pub actions: Vec<ActionDef>,
    pub useables: Vec<UseableDef>,
    pub agents: Vec<AgentDef>,
    pub characters: Vec<Character>,
    pub conversations: Vec<Conversation>,
}

impl Definitions {
    pub fn action(&self, name: &str) -> Option<&ActionDef> {
        self.actions.iter().find(|a| a.name() == name)
    }

    /// One need condition per need/emotion link, in declaration order
    pub fn need_conditions(&self) -> Vec<NeedCondition> {
        self.needs
            .iter()
            .flat_map(|need| {
                need.emotion_multipliers.iter().map(move |link| {
                    NeedCondition::new(&need.name, link.if_above, link.value, &link.emotion, link.multiplier)
                })
            })
            .collect()
    }
}
