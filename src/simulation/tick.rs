//! Tick system - one frame of an agent's decision loop
//!
//! Per agent, in order:
//! decide (when the timer runs out or nothing is active) -> switch actions ->
//! update the active action -> pick up held objects -> run conditions ->
//! update the derived emotion

use super::evaluator;
use crate::actions::{enter_action, exit_action, update_action, ActionKind};
use crate::conditions::{run_conditions, ActiveActionView, ConditionContext};
use crate::core::astronomy::DayNightSignal;
use crate::core::types::UseableId;
use crate::entity::{Agent, DerivedEmotionRule};
use crate::world::{Props, Proximity};
use glam::Vec3;
use serde::Serialize;

/// Height above the feet where held objects ride
pub const HAND_HEIGHT: f32 = 1.0;

/// Events generated during a tick
///
/// Returned from [`crate::simulation::World::tick`] for logging and UIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimulationEvent {
    /// The agent's active action changed
    ActionSwitched {
        agent: String,
        from: Option<String>,
        to: Option<String>,
    },
    /// A need hit the crisis threshold and useables were rescanned
    CandidatesRescanned { agent: String, found: usize },
    /// A condition filled its target and forced a new decision
    DecisionForced { agent: String },
    ObjectPickedUp { agent: String, useable: UseableId },
    ObjectReleased { agent: String, useable: UseableId },
    DialogueOpened { agent: String, conversation: String },
    DialogueClosed,
}

/// Where the agent's hand is, for held objects
pub fn hand_position(agent: &Agent) -> Vec3 {
    agent.position() + Vec3::Y * HAND_HEIGHT
}

/// Run one frame of utility AI for an agent
pub fn update_agent<W: Proximity + Props>(
    agent: &mut Agent,
    world: &mut W,
    day_night: Option<&dyn DayNightSignal>,
    dt: f32,
    events: &mut Vec<SimulationEvent>,
) {
    agent.nav.set_stopped(false);

    if agent.action_timer <= 0.0 || agent.current.is_none() {
        let decision = evaluator::decide(agent, &*world);
        if let Some(found) = decision.rescanned {
            events.push(SimulationEvent::CandidatesRescanned {
                agent: agent.name.clone(),
                found,
            });
        }
        agent.best = decision.best;
        agent.target = decision.target;
        agent.action_timer = agent.config.decision_interval;
    }
    agent.action_timer -= dt;

    if agent.best != agent.current {
        switch_action(agent, world, dt, events);
    }

    match agent.current {
        Some(key) => {
            agent.drive(key, world, dt, update_action);
            hold_target_object(agent, world, events);
        }
        None => {
            agent.target = None;
            agent.anim.play(&agent.config.idle_clip);
        }
    }

    if !agent.needs.is_empty() && !agent.conditions.is_empty() {
        update_conditions(agent, day_night, dt, events);
    }

    if !agent.emotions.is_empty() {
        let rule = DerivedEmotionRule {
            high_threshold: agent.config.emotion_high_threshold,
            low_threshold: agent.config.emotion_low_threshold,
            high_rate: agent.config.emotion_high_rate,
            low_rate: agent.config.emotion_low_rate,
        };
        agent.emotions.update_derived(&agent.config.derived_emotion, &rule, dt);
    }
}

/// Exit the current action and enter the chosen one
fn switch_action<W: Props>(agent: &mut Agent, world: &mut W, dt: f32, events: &mut Vec<SimulationEvent>) {
    let from = agent.active_action_name().map(str::to_string);
    let held = held_useable(agent);

    if let Some(old) = agent.current {
        agent.drive(old, world, dt, exit_action);
    }
    if let Some(useable) = held.filter(|_| !agent.holding_object) {
        events.push(SimulationEvent::ObjectReleased {
            agent: agent.name.clone(),
            useable,
        });
    }

    agent.current = agent.best;
    if let Some(new) = agent.current {
        agent.drive(new, world, dt, enter_action);
    }

    let to = agent.active_action_name().map(str::to_string);
    tracing::info!(agent = %agent.name, from = ?from, to = ?to, "action switched");
    events.push(SimulationEvent::ActionSwitched {
        agent: agent.name.clone(),
        from,
        to,
    });
}

fn held_useable(agent: &Agent) -> Option<UseableId> {
    if !agent.holding_object {
        return None;
    }
    agent.active_action().and_then(|a| a.target()).map(|t| t.id)
}

/// Pick up the target of an object action once it is in range
fn hold_target_object<W: Props>(agent: &mut Agent, world: &mut W, events: &mut Vec<SimulationEvent>) {
    if !agent.has_hand || agent.holding_object {
        return;
    }
    let Some(action) = agent.active_action() else {
        return;
    };
    if action.kind() != ActionKind::UseObject || !action.within_range_of_target() {
        return;
    }
    let Some(target) = action.target().filter(|t| t.holdable) else {
        return;
    };
    if world.holder(target.id).is_some() {
        return;
    }

    let Some(mut pose) = world.pose(target.id) else {
        return;
    };
    agent.held_origin = Some(pose);
    world.attach(target.id, agent.id);
    pose.position = hand_position(agent);
    world.set_pose(target.id, pose);
    agent.holding_object = true;

    tracing::debug!(agent = %agent.name, useable = target.id.0, "picked up");
    events.push(SimulationEvent::ObjectPickedUp {
        agent: agent.name.clone(),
        useable: target.id,
    });
}

/// Run every condition, mirror action commitment, and honor forced decisions
fn update_conditions(
    agent: &mut Agent,
    day_night: Option<&dyn DayNightSignal>,
    dt: f32,
    events: &mut Vec<SimulationEvent>,
) {
    let active = agent.current.and_then(|key| agent.actions.get(key)).map(|a| ActiveActionView {
        name: a.name(),
        within_range: a.within_range_of_target(),
    });
    let mut ctx = ConditionContext {
        needs: &mut agent.needs,
        emotions: &mut agent.emotions,
        active_action: active,
        day_night,
        dt,
        force_decision: false,
    };
    run_conditions(&mut agent.conditions, &mut ctx);
    let forced = ctx.force_decision;

    let mut scored: Vec<String> = Vec::new();
    for condition in &agent.conditions {
        if let Some(effect) = condition.action_effect() {
            if !scored.iter().any(|name| name == effect.action) {
                scored.push(effect.action.to_string());
            }
        }
    }
    let current = agent.current;
    for name in &scored {
        for (key, action) in agent.actions.instances_named_mut(name) {
            action.core_mut().commitment_to_action = Some(key) == current;
        }
    }

    if forced {
        if agent.action_timer > 0.0 {
            tracing::debug!(agent = %agent.name, "condition forced a decision");
            events.push(SimulationEvent::DecisionForced {
                agent: agent.name.clone(),
            });
        }
        agent.action_timer = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ActionKey, UseObjectAction, WanderAction};
    use crate::conditions::ActionCondition;
    use crate::core::config::EngineConfig;
    use crate::core::types::Pose;
    use crate::entity::Affected;
    use crate::world::{Useable, UseableRegistry};
    use std::sync::Arc;

    fn make_agent() -> Agent {
        Agent::builder("Ada")
            .need("Hunger")
            .emotion("Happiness")
            .emotion("Anger")
            .intrinsic(Box::new(WanderAction::new("Wander", 5.0, 1.0)))
            .condition(Box::new(ActionCondition::new("Eat", Affected::Need("Hunger".into()), 0.05)))
            .condition(Box::new(ActionCondition::new("Wander", Affected::Need("Hunger".into()), -0.01)))
            .seed(9)
            .build(Arc::new(EngineConfig::default()))
    }

    fn make_world() -> (UseableRegistry, UseableId) {
        let mut world = UseableRegistry::new();
        let id = world.add(Useable::new(
            "table",
            Box::new(UseObjectAction::new("Eat", "Eat")),
            1.0,
            false,
            Pose::at(Vec3::new(2.0, 0.0, 0.0)),
        ));
        (world, id)
    }

    #[test]
    fn test_first_tick_decides_and_enters() {
        let mut agent = make_agent();
        let (mut world, _) = make_world();
        let mut events = Vec::new();
        update_agent(&mut agent, &mut world, None, 0.1, &mut events);
        assert_eq!(agent.current, Some(ActionKey::Intrinsic(0)));
        assert!((agent.action_timer - 9.9).abs() < 1e-4);
        assert!(events.iter().any(|e| matches!(e, SimulationEvent::ActionSwitched { .. })));
    }

    #[test]
    fn test_crisis_rescan_only_at_or_below_threshold() {
        let mut agent = make_agent();
        let (mut world, table) = make_world();
        let mut events = Vec::new();

        agent.needs.set("Hunger", 0.95);
        update_agent(&mut agent, &mut world, None, 0.1, &mut events);
        assert!(!events.iter().any(|e| matches!(e, SimulationEvent::CandidatesRescanned { .. })));
        assert!(agent.actions.candidates().is_empty());

        agent.needs.set("Hunger", 0.80);
        agent.action_timer = 0.0;
        events.clear();
        update_agent(&mut agent, &mut world, None, 0.1, &mut events);
        assert!(events.contains(&SimulationEvent::CandidatesRescanned {
            agent: "Ada".into(),
            found: 1
        }));
        assert_eq!(agent.actions.candidates(), &[table]);
        assert_eq!(agent.current, Some(ActionKey::Object(table)));
    }

    #[test]
    fn test_commitment_mirrors_active_action() {
        let mut agent = make_agent();
        let (mut world, _) = make_world();
        let mut events = Vec::new();
        update_agent(&mut agent, &mut world, None, 0.1, &mut events);
        let wander = agent.actions.get(ActionKey::Intrinsic(0)).unwrap();
        assert!(wander.commitment_to_action());
    }

    #[test]
    fn test_disabled_conditions_leave_derived_emotion_running() {
        let mut agent = Agent::builder("Bo")
            .emotion("Happiness")
            .emotion("Anger")
            .build(Arc::new(EngineConfig::default()));
        agent.emotions.set("Happiness", 0.5);
        let (mut world, _) = make_world();
        let mut events = Vec::new();
        update_agent(&mut agent, &mut world, None, 1.0, &mut events);
        // Anger at 0 counts as low
        assert!((agent.emotions.get("Happiness").unwrap() - 0.51).abs() < 1e-6);
        assert!(agent.current.is_none());
    }
}
