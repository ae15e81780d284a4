//! Load and validate definitions from TOML files

use super::definitions::{ActionDef, Definitions};
use crate::core::error::{NpcError, Result};
use crate::dialogue::ConversationLibrary;
use std::fs;
use std::path::Path;

/// Parse and validate a definitions file
pub fn load_definitions(path: &Path) -> Result<Definitions> {
    let content = fs::read_to_string(path)?;
    let defs = parse_definitions(&content)?;
    tracing::info!(
        path = %path.display(),
        agents = defs.agents.len(),
        useables = defs.useables.len(),
        conversations = defs.conversations.len(),
        "definitions loaded"
    );
    Ok(defs)
}

/// Parse and validate definitions from a TOML string
pub fn parse_definitions(content: &str) -> Result<Definitions> {
    let defs: Definitions = toml::from_str(content)?;
    validate(&defs)?;
    Ok(defs)
}

/// Collect the characters and conversations into a library
pub fn build_library(defs: &Definitions) -> ConversationLibrary {
    let mut library = ConversationLibrary::new();
    for character in &defs.characters {
        library.add_character(character.clone());
    }
    for conversation in &defs.conversations {
        library.add_conversation(conversation.clone());
    }
    library
}

/// Check every cross reference in a definitions set
pub fn validate(defs: &Definitions) -> Result<()> {
    let need_known = |name: &str| defs.needs.iter().any(|n| n.name == name);
    let emotion_known = |name: &str| defs.emotions.iter().any(|e| e.name == name);

    for need in &defs.needs {
        if let Some(link) = need.emotion_multipliers.iter().find(|l| !emotion_known(l.emotion.as_str())) {
            return Err(NpcError::UnknownEmotion(format!("{} (need '{}')", link.emotion, need.name)));
        }
    }

    for (idx, action) in defs.actions.iter().enumerate() {
        if defs.actions[..idx].iter().any(|a| a.name() == action.name()) {
            return Err(NpcError::InvalidDefinition(format!("duplicate action '{}'", action.name())));
        }
        let (needs, emotions) = match action {
            ActionDef::Wander(def) => (&def.need_multipliers, &def.emotion_multipliers),
            ActionDef::UseObject(def) => (&def.need_multipliers, &def.emotion_multipliers),
        };
        if let Some(m) = needs.iter().find(|m| !need_known(m.name.as_str())) {
            return Err(NpcError::UnknownNeed(format!("{} (action '{}')", m.name, action.name())));
        }
        if let Some(m) = emotions.iter().find(|m| !emotion_known(m.name.as_str())) {
            return Err(NpcError::UnknownEmotion(format!("{} (action '{}')", m.name, action.name())));
        }
        // placement count is checked by the action builder
        action.instantiate()?;
    }

    for useable in &defs.useables {
        match defs.action(&useable.action) {
            Some(ActionDef::UseObject(_)) => {}
            Some(_) => {
                return Err(NpcError::InvalidDefinition(format!(
                    "useable '{}' offers '{}', which is not a use_object action",
                    useable.name, useable.action
                )))
            }
            None => {
                return Err(NpcError::UnknownAction(format!(
                    "{} (useable '{}')",
                    useable.action, useable.name
                )))
            }
        }
    }

    for agent in &defs.agents {
        for name in &agent.intrinsic {
            match defs.action(name) {
                Some(ActionDef::Wander(_)) => {}
                Some(_) => {
                    return Err(NpcError::InvalidDefinition(format!(
                        "agent '{}' lists '{}' as intrinsic, but it needs a useable",
                        agent.name, name
                    )))
                }
                None => return Err(NpcError::UnknownAction(format!("{} (agent '{}')", name, agent.name))),
            }
        }
        if let Some(id) = agent.conversations.iter().find(|id| !defs.conversations.iter().any(|c| &c.id == *id)) {
            return Err(NpcError::UnknownConversation(format!("{} (agent '{}')", id, agent.name)));
        }
        for def in &agent.time_of_day {
            def.to_condition()?;
            if let Some(need) = def.need.as_deref().filter(|n| !need_known(*n)) {
                return Err(NpcError::UnknownNeed(format!("{} (agent '{}')", need, agent.name)));
            }
            if let Some(emotion) = def.emotion.as_deref().filter(|e| !emotion_known(*e)) {
                return Err(NpcError::UnknownEmotion(format!("{} (agent '{}')", emotion, agent.name)));
            }
        }
    }

    build_library(defs).validate()
}
