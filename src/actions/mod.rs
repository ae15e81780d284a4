//! Actions - scored behaviors with an enter/update/exit lifecycle
//!
//! Every behavior an agent can run implements [`Action`]. The evaluator
//! scores candidates through [`Action::evaluate`], and the agent drives the
//! winner through [`enter_action`], [`update_action`] and [`exit_action`],
//! which enforce the phase order Inactive -> Entering -> Active -> Exiting.

pub mod scoring;
pub mod table;
pub mod use_object;
pub mod wander;

pub use table::{ActionKey, ActionTable};
pub use use_object::{Placement, UseObjectAction};
pub use wander::WanderAction;

use crate::conditions::Condition;
use crate::core::config::EngineConfig;
use crate::core::types::{AgentId, Pose, UseableId};
use crate::entity::NeedSet;
use crate::world::{Animator, Navigation, Props};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which built-in behavior an action is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Wander,
    UseObject,
}

/// Where an action instance is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActionPhase {
    #[default]
    Inactive,
    Entering,
    Active,
    Exiting,
}

/// A need or emotion this action changes per second while it runs in range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Multiplier {
    pub name: String,
    pub multiplier: f32,
}

impl Multiplier {
    pub fn new(name: impl Into<String>, multiplier: f32) -> Self {
        Self {
            name: name.into(),
            multiplier,
        }
    }
}

/// State shared by every action implementation
#[derive(Debug, Clone, Default)]
pub struct ActionCore {
    pub name: String,
    pub need_multipliers: Vec<Multiplier>,
    pub emotion_multipliers: Vec<Multiplier>,
    /// Set once the action-specific gate is satisfied; multipliers only
    /// apply while this holds
    pub within_range_of_target: bool,
    /// Mirrored from the action's conditions; adds the commitment bonus
    /// to the score
    pub commitment_to_action: bool,
    phase: ActionPhase,
}

impl ActionCore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn phase(&self) -> ActionPhase {
        self.phase
    }
}

/// The useable an object action is bound to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UseableTarget {
    pub id: UseableId,
    pub range: f32,
    pub holdable: bool,
}

/// Read-only inputs for scoring
pub struct ScoringContext<'a> {
    pub needs: &'a NeedSet,
    pub conditions: &'a [Box<dyn Condition>],
}

/// Collaborators an action may drive while it runs
pub struct ActionContext<'a> {
    pub agent: AgentId,
    pub dt: f32,
    pub nav: &'a mut dyn Navigation,
    pub anim: &'a mut dyn Animator,
    pub props: &'a mut dyn Props,
    pub rng: &'a mut ChaCha8Rng,
    pub config: &'a EngineConfig,
    /// True while the agent carries its target in hand
    pub holding_object: &'a mut bool,
    /// Pose the held object had before it was picked up
    pub held_origin: &'a mut Option<Pose>,
}

/// A scored behavior
pub trait Action: fmt::Debug {
    fn core(&self) -> &ActionCore;

    fn core_mut(&mut self) -> &mut ActionCore;

    fn kind(&self) -> ActionKind;

    /// Utility score for this agent state; higher wins
    fn evaluate(&self, ctx: &ScoringContext<'_>) -> f32;

    fn enter(&mut self, ctx: &mut ActionContext<'_>);

    fn update(&mut self, ctx: &mut ActionContext<'_>);

    fn exit(&mut self, ctx: &mut ActionContext<'_>);

    fn clone_box(&self) -> Box<dyn Action>;

    fn name(&self) -> &str {
        &self.core().name
    }

    /// Bind the action to the useable that owns it
    fn bind_target(&mut self, _target: UseableTarget) {}

    fn target(&self) -> Option<UseableTarget> {
        None
    }

    /// Whether the player may start a dialogue while this action runs
    fn interruptible_for_dialogue(&self) -> bool {
        false
    }

    fn within_range_of_target(&self) -> bool {
        self.core().within_range_of_target
    }

    fn commitment_to_action(&self) -> bool {
        self.core().commitment_to_action
    }

    fn phase(&self) -> ActionPhase {
        self.core().phase
    }
}

impl Clone for Box<dyn Action> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Start an action; an instance that was never exited is exited first
pub fn enter_action(action: &mut dyn Action, ctx: &mut ActionContext<'_>) {
    if action.phase() != ActionPhase::Inactive {
        tracing::warn!(action = action.name(), "entering an action that never exited");
        exit_action(action, ctx);
    }
    let core = action.core_mut();
    core.phase = ActionPhase::Entering;
    core.within_range_of_target = false;
    action.enter(ctx);
    action.core_mut().phase = ActionPhase::Active;
}

/// Run one frame of an active action; other phases are ignored
pub fn update_action(action: &mut dyn Action, ctx: &mut ActionContext<'_>) {
    if action.phase() == ActionPhase::Active {
        action.update(ctx);
    }
}

/// Stop an action and reset its per-run flags
pub fn exit_action(action: &mut dyn Action, ctx: &mut ActionContext<'_>) {
    if action.phase() == ActionPhase::Inactive {
        return;
    }
    action.core_mut().phase = ActionPhase::Exiting;
    action.exit(ctx);
    let core = action.core_mut();
    core.within_range_of_target = false;
    core.commitment_to_action = false;
    core.phase = ActionPhase::Inactive;
}
