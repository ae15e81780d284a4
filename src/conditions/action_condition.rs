//! Condition that holds while the agent runs a named action

use super::{gated_adjust, ActionEffect, Condition, ConditionContext};
use crate::entity::Affected;

/// Moves a need or emotion while the agent runs `action` within range
///
/// One is registered on every agent for each multiplier an action declares.
#[derive(Debug, Clone)]
pub struct ActionCondition {
    pub action: String,
    pub affected: Affected,
    pub multiplier: f32,
}

impl ActionCondition {
    pub fn new(action: impl Into<String>, affected: Affected, multiplier: f32) -> Self {
        Self {
            action: action.into(),
            affected,
            multiplier,
        }
    }
}

impl Condition for ActionCondition {
    fn check(&self, ctx: &ConditionContext<'_>) -> bool {
        ctx.active_action.is_some_and(|active| active.name == self.action)
    }

    fn apply(&mut self, ctx: &mut ConditionContext<'_>) {
        let Some(active) = ctx.active_action else {
            return;
        };
        if !active.within_range {
            return;
        }
        gated_adjust(&self.affected, ctx, self.multiplier);

        // A filled target ends the action at the next decision
        if self.affected.read(ctx.needs, ctx.emotions).is_some_and(|v| v >= 1.0) {
            ctx.force_decision = true;
        }
    }

    fn action_effect(&self) -> Option<ActionEffect<'_>> {
        Some(ActionEffect {
            action: &self.action,
            affected: &self.affected,
            multiplier: self.multiplier,
        })
    }

    fn touches(&self) -> Vec<Affected> {
        vec![self.affected.clone()]
    }

    fn name(&self) -> String {
        format!("{} {}", self.action, self.affected.name())
    }

    fn clone_box(&self) -> Box<dyn Condition> {
        Box::new(self.clone())
    }
}
