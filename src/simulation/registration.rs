//! Registration - expand declared multipliers into per-agent conditions
//!
//! Actions and needs declare their effects as multipliers. Before the first
//! tick, every declaration becomes a condition on every agent: one
//! [`ActionCondition`] per action multiplier and one [`NeedCondition`] per
//! need/emotion link. Call once, after all agents and useables exist.

use crate::actions::Action;
use crate::conditions::{ActionCondition, Condition, NeedCondition};
use crate::core::error::{NpcError, Result};
use crate::entity::{Affected, Agent};
use crate::world::UseableRegistry;

/// Conditions derived from one action's multipliers
pub fn action_conditions(action: &dyn Action) -> Vec<ActionCondition> {
    let core = action.core();
    let needs = core
        .need_multipliers
        .iter()
        .map(|m| ActionCondition::new(core.name.clone(), Affected::Need(m.name.clone()), m.multiplier));
    let emotions = core
        .emotion_multipliers
        .iter()
        .map(|m| ActionCondition::new(core.name.clone(), Affected::Emotion(m.name.clone()), m.multiplier));
    needs.chain(emotions).collect()
}

/// Check that an agent owns every need and emotion a condition touches
fn validate(agent: &Agent, condition: &dyn Condition) -> Result<()> {
    for target in condition.touches() {
        if !target.exists_in(&agent.needs, &agent.emotions) {
            let detail = format!("{} (condition '{}' on agent '{}')", target.name(), condition.name(), agent.name);
            return Err(match target {
                Affected::Need(_) => NpcError::UnknownNeed(detail),
                Affected::Emotion(_) => NpcError::UnknownEmotion(detail),
            });
        }
    }
    Ok(())
}

/// Register every action and need declaration on every agent
///
/// Action templates are gathered from the agents' intrinsic actions and
/// from the useables, once per action name. Fails on the first condition,
/// given to the agent up front or derived here, that references a need or
/// emotion the agent does not have.
pub fn register_all(agents: &mut [Agent], useables: &UseableRegistry, need_links: &[NeedCondition]) -> Result<()> {
    let mut seen: Vec<String> = Vec::new();
    let mut derived: Vec<ActionCondition> = Vec::new();

    let intrinsic = agents.iter().flat_map(|a| a.actions.intrinsic().iter().map(|b| b.as_ref()));
    let on_useables = useables.iter().map(|u| u.action.as_ref());
    for action in intrinsic.chain(on_useables) {
        if seen.iter().any(|name| name == action.name()) {
            continue;
        }
        seen.push(action.name().to_string());
        derived.extend(action_conditions(action));
    }

    for agent in agents.iter_mut() {
        for condition in &agent.conditions {
            validate(agent, condition.as_ref())?;
        }
        for condition in &derived {
            validate(agent, condition)?;
        }
        for link in need_links {
            validate(agent, link)?;
        }

        agent.conditions.extend(derived.iter().map(|c| c.clone_box()));
        agent.conditions.extend(need_links.iter().map(|c| c.clone_box()));
        tracing::debug!(
            agent = %agent.name,
            conditions = agent.conditions.len(),
            "conditions registered"
        );
    }

    tracing::info!(
        agents = agents.len(),
        actions = seen.len(),
        action_conditions = derived.len(),
        need_conditions = need_links.len(),
        "registration complete"
    );
    Ok(())
}
