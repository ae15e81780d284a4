//! Condition keyed on the sun elevation

use super::{Condition, ConditionContext};
use crate::core::astronomy::TimeOfDay;
use crate::entity::Affected;

/// Moves a need or emotion by day, by night, or both
///
/// Holds when `night` matches whether it is night, or `day` matches whether
/// it is day. `night = true, day = false` holds only at night; equal flags
/// hold around the clock.
#[derive(Debug, Clone)]
pub struct TimeOfDayCondition {
    pub night: bool,
    pub day: bool,
    pub affected: Affected,
    pub multiplier: f32,
}

impl TimeOfDayCondition {
    pub fn new(night: bool, day: bool, affected: Affected, multiplier: f32) -> Self {
        Self {
            night,
            day,
            affected,
            multiplier,
        }
    }
}

impl Condition for TimeOfDayCondition {
    fn check(&self, ctx: &ConditionContext<'_>) -> bool {
        let Some(signal) = ctx.day_night else {
            return false;
        };
        let time = TimeOfDay::from_elevation(signal.sun_elevation_degrees());
        self.night == time.is_night() || self.day == time.is_day()
    }

    fn apply(&mut self, ctx: &mut ConditionContext<'_>) {
        self.affected.adjust(ctx.needs, ctx.emotions, self.multiplier * ctx.dt);
    }

    fn touches(&self) -> Vec<Affected> {
        vec![self.affected.clone()]
    }

    fn name(&self) -> String {
        format!("time of day -> {}", self.affected.name())
    }

    fn clone_box(&self) -> Box<dyn Condition> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::test_support::State;
    use crate::core::astronomy::FixedSun;

    fn night_only() -> TimeOfDayCondition {
        TimeOfDayCondition::new(true, false, Affected::Need("Energy".into()), -0.01)
    }

    #[test]
    fn test_night_condition_by_elevation() {
        let condition = night_only();
        let mut state = State::new(&[("Energy", 0.5)], &[]);
        let dusk = FixedSun(200.0);
        let noon = FixedSun(90.0);
        assert!(condition.check(&state.ctx(None, Some(&dusk), 1.0)));
        assert!(!condition.check(&state.ctx(None, Some(&noon), 1.0)));
    }

    #[test]
    fn test_boundaries_count_as_night() {
        let condition = night_only();
        let mut state = State::new(&[("Energy", 0.5)], &[]);
        for elevation in [0.0, 180.0] {
            let sun = FixedSun(elevation);
            assert!(condition.check(&state.ctx(None, Some(&sun), 1.0)));
        }
    }

    #[test]
    fn test_no_signal_never_holds() {
        let condition = TimeOfDayCondition::new(true, true, Affected::Need("Energy".into()), -0.01);
        let mut state = State::new(&[("Energy", 0.5)], &[]);
        assert!(!condition.check(&state.ctx(None, None, 1.0)));
    }

    #[test]
    fn test_apply_is_ungated_but_clamped() {
        let mut condition = TimeOfDayCondition::new(true, false, Affected::Need("Energy".into()), 0.5);
        let mut state = State::new(&[("Energy", 0.9)], &[]);
        condition.apply(&mut state.ctx(None, None, 1.0));
        assert_eq!(state.needs.get("Energy"), Some(1.0));
    }
}
