//! Utility scoring
//!
//! [`legacy_score`] keeps the exact arithmetic agents were tuned against,
//! including its quirk: the recovery/decrement pair found for a need stays
//! in effect for every condition iterated after it, so a matching effect is
//! counted once per remaining condition. Swap this function out to change
//! how actions are scored.

use crate::conditions::Condition;
use crate::entity::NeedSet;

/// Urgency of a need that has run out completely
pub const EMPTY_NEED_URGENCY: f32 = 100_000.0;

/// Seconds of recovery a multiplier is projected over
pub const RECOVERY_HORIZON_SECONDS: f32 = 10.0;

/// Urgency bonus for a wander action that is already running
pub const WANDER_COMMITMENT_BONUS: f32 = 1.0;

/// Urgency bonus for an object action that is already running
pub const USE_OBJECT_COMMITMENT_BONUS: f32 = 1_000_000.0;

/// Urgency of one need
///
/// Empty needs are maximally urgent and full needs not urgent at all;
/// neither case keeps the commitment bonus.
pub fn urgency(value: f32, need_count: usize, committed: bool, commitment_bonus: f32) -> f32 {
    let mut urgency = if committed { commitment_bonus } else { 0.0 };
    if value <= 0.0 {
        urgency = EMPTY_NEED_URGENCY;
    } else if value >= 1.0 {
        urgency = 0.0;
    } else {
        urgency += (1.0 - value) * need_count as f32;
    }
    urgency
}

/// Score an action by name against the agent's needs and conditions
///
/// ```text
/// score = sum over needs of sum over conditions of urgency * (recovery + decrement)
/// ```
///
/// Only conditions whose [`Condition::action_effect`] names this action and
/// a need feed recovery/decrement. Emotion effects do not score.
pub fn legacy_score(
    action_name: &str,
    committed: bool,
    commitment_bonus: f32,
    needs: &NeedSet,
    conditions: &[Box<dyn Condition>],
) -> f32 {
    let need_count = needs.len();
    let mut score = 0.0;

    for need in needs.iter() {
        let urgency = urgency(need.value(), need_count, committed, commitment_bonus);
        let mut recovery = 0.0;
        let mut decrement = 0.0;
        let mut need_score = 0.0;

        for condition in conditions {
            if let Some(effect) = condition.action_effect() {
                if effect.action == action_name && effect.affected.need_name() == Some(need.name.as_str()) {
                    let projected = effect.multiplier * RECOVERY_HORIZON_SECONDS;
                    if effect.multiplier > 0.0 {
                        recovery = projected;
                        decrement = 0.0;
                    } else if effect.multiplier < 0.0 {
                        recovery = 0.0;
                        decrement = projected;
                    } else {
                        recovery = 0.0;
                        decrement = 0.0;
                    }
                }
            }
            need_score += urgency * (recovery + decrement);
        }
        score += need_score;
    }

    score
}
