//! Conditions - predicates that move needs and emotions while they hold
//!
//! Every frame the agent walks its condition list in registration order:
//! a condition that does not hold gets [`Condition::on_false`], and one that
//! holds gets [`Condition::apply`]. `check` never mutates, so calling it
//! twice in that loop is harmless.

pub mod action_condition;
pub mod need_condition;
pub mod time_of_day;

pub use action_condition::ActionCondition;
pub use need_condition::NeedCondition;
pub use time_of_day::TimeOfDayCondition;

use crate::core::astronomy::DayNightSignal;
use crate::entity::{Affected, EmotionSet, NeedSet};
use std::fmt;

/// The agent's running action, as conditions see it
#[derive(Debug, Clone, Copy)]
pub struct ActiveActionView<'a> {
    pub name: &'a str,
    pub within_range: bool,
}

/// Agent state a condition may read and mutate
pub struct ConditionContext<'a> {
    pub needs: &'a mut NeedSet,
    pub emotions: &'a mut EmotionSet,
    pub active_action: Option<ActiveActionView<'a>>,
    pub day_night: Option<&'a dyn DayNightSignal>,
    pub dt: f32,
    /// Set by a condition to make the agent decide again next frame
    pub force_decision: bool,
}

/// An action's effect on a need or emotion, as exposed for scoring
#[derive(Debug, Clone, Copy)]
pub struct ActionEffect<'a> {
    pub action: &'a str,
    pub affected: &'a Affected,
    pub multiplier: f32,
}

pub trait Condition: fmt::Debug {
    /// Whether the condition holds this frame
    fn check(&self, ctx: &ConditionContext<'_>) -> bool;

    /// Apply the condition's effect for one frame
    fn apply(&mut self, ctx: &mut ConditionContext<'_>);

    /// Called on frames where the condition does not hold
    fn on_false(&mut self, _ctx: &mut ConditionContext<'_>) {}

    /// The action effect this condition carries, if it scores an action
    fn action_effect(&self) -> Option<ActionEffect<'_>> {
        None
    }

    /// Every need and emotion the condition reads or writes
    fn touches(&self) -> Vec<Affected> {
        Vec::new()
    }

    fn name(&self) -> String;

    fn clone_box(&self) -> Box<dyn Condition>;
}

impl Clone for Box<dyn Condition> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Run every condition once, in order
pub fn run_conditions(conditions: &mut [Box<dyn Condition>], ctx: &mut ConditionContext<'_>) {
    for condition in conditions.iter_mut() {
        if !condition.check(ctx) {
            condition.on_false(ctx);
        }
        if condition.check(ctx) {
            condition.apply(ctx);
        }
    }
}

/// Add `multiplier * dt` only if it moves the value away from the bound it
/// points at: positive rates stop at 1, negative rates stop at 0
pub(crate) fn gated_adjust(affected: &Affected, ctx: &mut ConditionContext<'_>, multiplier: f32) {
    let Some(value) = affected.read(ctx.needs, ctx.emotions) else {
        return;
    };
    let open = (multiplier > 0.0 && value < 1.0) || (multiplier < 0.0 && value > 0.0);
    if open {
        affected.adjust(ctx.needs, ctx.emotions, multiplier * ctx.dt);
    }
}
