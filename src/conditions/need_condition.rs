//! Condition that holds while a need sits past a threshold

use super::{gated_adjust, Condition, ConditionContext};
use crate::entity::Affected;

/// Moves an emotion while a need is at or below (or at or above) a value
#[derive(Debug, Clone)]
pub struct NeedCondition {
    pub need: String,
    /// Holds at `value >= threshold` when true, `value <= threshold` when false
    pub if_above: bool,
    pub threshold: f32,
    pub emotion: Affected,
    pub multiplier: f32,
}

impl NeedCondition {
    pub fn new(
        need: impl Into<String>,
        if_above: bool,
        threshold: f32,
        emotion: impl Into<String>,
        multiplier: f32,
    ) -> Self {
        Self {
            need: need.into(),
            if_above,
            threshold,
            emotion: Affected::Emotion(emotion.into()),
            multiplier,
        }
    }
}

impl Condition for NeedCondition {
    fn check(&self, ctx: &ConditionContext<'_>) -> bool {
        match ctx.needs.get(&self.need) {
            Some(value) if self.if_above => value >= self.threshold,
            Some(value) => value <= self.threshold,
            None => false,
        }
    }

    fn apply(&mut self, ctx: &mut ConditionContext<'_>) {
        gated_adjust(&self.emotion, ctx, self.multiplier);
    }

    fn touches(&self) -> Vec<Affected> {
        vec![Affected::Need(self.need.clone()), self.emotion.clone()]
    }

    fn name(&self) -> String {
        let cmp = if self.if_above { ">=" } else { "<=" };
        format!("{} {} {} -> {}", self.need, cmp, self.threshold, self.emotion.name())
    }

    fn clone_box(&self) -> Box<dyn Condition> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::test_support::State;

    #[test]
    fn test_below_threshold_is_inclusive() {
        let condition = NeedCondition::new("Hunger", false, 0.3, "Anger", 0.01);
        let mut state = State::new(&[("Hunger", 0.3)], &[("Anger", 0.0)]);
        assert!(condition.check(&state.ctx(None, None, 1.0)));
        state.needs.set("Hunger", 0.31);
        assert!(!condition.check(&state.ctx(None, None, 1.0)));
    }

    #[test]
    fn test_above_threshold_is_inclusive() {
        let condition = NeedCondition::new("Energy", true, 0.9, "Joy", 0.01);
        let mut state = State::new(&[("Energy", 0.9)], &[("Joy", 0.0)]);
        assert!(condition.check(&state.ctx(None, None, 1.0)));
        state.needs.set("Energy", 0.5);
        assert!(!condition.check(&state.ctx(None, None, 1.0)));
    }

    #[test]
    fn test_apply_raises_emotion_and_saturates() {
        let mut condition = NeedCondition::new("Hunger", false, 0.3, "Anger", 0.4);
        let mut state = State::new(&[("Hunger", 0.1)], &[("Anger", 0.8)]);
        condition.apply(&mut state.ctx(None, None, 1.0));
        assert_eq!(state.emotions.get("Anger"), Some(1.0));
    }

    #[test]
    fn test_missing_need_never_holds() {
        let condition = NeedCondition::new("Thirst", false, 0.3, "Anger", 0.01);
        let mut state = State::new(&[("Hunger", 0.0)], &[("Anger", 0.0)]);
        assert!(!condition.check(&state.ctx(None, None, 1.0)));
    }

    #[test]
    fn test_touches_need_then_emotion() {
        let condition = NeedCondition::new("Hunger", false, 0.3, "Anger", 0.01);
        assert_eq!(
            condition.touches(),
            vec![Affected::Need("Hunger".into()), Affected::Emotion("Anger".into())]
        );
    }
}
