//! Utility evaluator - picks the action an agent should run next
//!
//! Decision procedure:
//! 1. If any need is at or below the crisis threshold, rescan for useables
//!    in range and rebuild the candidate map; otherwise reuse the last one
//! 2. Score intrinsic actions, then object actions, against one shared
//!    running best
//! 3. Compare the two groups with [`select_best`]

use crate::actions::{ActionKey, ScoringContext};
use crate::core::types::UseableId;
use crate::entity::Agent;
use crate::world::Proximity;

/// Starting value of the running best score
pub const SCORE_FLOOR: f32 = -99_999_999.0;

/// Outcome of one decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub best: Option<ActionKey>,
    /// Useable of the best-scoring object action, even if an intrinsic
    /// action won
    pub target: Option<UseableId>,
    /// Number of useables found, when a rescan happened
    pub rescanned: Option<usize>,
}

/// Winner of a scoring pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub best: Option<ActionKey>,
    pub best_object: Option<ActionKey>,
}

/// Choose between scored intrinsic and object actions
///
/// Both groups share one running best. Intrinsic actions replace it on a
/// strictly greater score. The first object action is always taken as the
/// best object, later ones on a strictly greater score. The intrinsic winner
/// is returned only if the *last* intrinsic score beats the *last* object
/// score; otherwise the best object (or none).
pub fn select_best(intrinsic: &[(ActionKey, f32)], objects: &[(ActionKey, f32)]) -> Selection {
    let mut best_value = SCORE_FLOOR;
    let mut intrinsic_value = SCORE_FLOOR;
    let mut object_value = SCORE_FLOOR;
    let mut best_intrinsic = None;
    let mut best_object = None;

    for &(key, score) in intrinsic {
        intrinsic_value = score;
        if score > best_value {
            best_intrinsic = Some(key);
            best_value = score;
        }
    }

    for &(key, score) in objects {
        object_value = score;
        if best_object.is_none() || score > best_value {
            best_object = Some(key);
            best_value = score;
        }
    }

    let best = if intrinsic_value > object_value {
        best_intrinsic
    } else {
        best_object
    };
    Selection { best, best_object }
}

/// Run one decision for an agent
pub fn decide(agent: &mut Agent, proximity: &dyn Proximity) -> Decision {
    let mut rescanned = None;
    if agent.needs.any_at_or_below(agent.config.crisis_threshold) {
        let found = proximity.query_reachable_useables(agent.position(), agent.config.max_range);
        agent.actions.rebuild_candidates(&found, proximity, agent.current);
        rescanned = Some(found.len());
    }

    let scoring = ScoringContext {
        needs: &agent.needs,
        conditions: &agent.conditions,
    };
    let intrinsic: Vec<(ActionKey, f32)> = agent
        .actions
        .intrinsic()
        .iter()
        .enumerate()
        .map(|(idx, action)| (ActionKey::Intrinsic(idx), action.evaluate(&scoring)))
        .collect();
    let objects: Vec<(ActionKey, f32)> = agent
        .actions
        .candidates()
        .iter()
        .filter_map(|&id| {
            let key = ActionKey::Object(id);
            agent.actions.get(key).map(|action| (key, action.evaluate(&scoring)))
        })
        .collect();

    let selection = select_best(&intrinsic, &objects);
    let target = match selection.best_object {
        Some(ActionKey::Object(id)) => Some(id),
        _ => None,
    };

    tracing::debug!(
        agent = %agent.name,
        intrinsic = ?intrinsic,
        objects = ?objects,
        best = ?selection.best,
        "decision"
    );

    Decision {
        best: selection.best,
        target,
        rescanned,
    }
}
