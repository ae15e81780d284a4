//! Conversation records - characters, dialogue units and the library
//!
//! A conversation is an ordered list of dialogue units. Each unit is spoken
//! by one character and holds one or more sentences shown one at a time.
//! A unit with choices branches into follow-up conversations by id.

use crate::core::error::{NpcError, Result};
use crate::core::types::Rgba;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Seconds per revealed character when a unit does not set its own speed
pub const DEFAULT_TELETYPE_SPEED: f32 = 0.025;

/// Most follow-up conversations a unit may offer
pub const MAX_CHOICES: usize = 3;

fn default_speed() -> f32 {
    DEFAULT_TELETYPE_SPEED
}

/// Someone who speaks in dialogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    /// Portrait shown when a unit has no expression of its own
    #[serde(default)]
    pub default_portrait: Option<String>,
    #[serde(default)]
    pub dialogue_box: Option<String>,
    #[serde(default)]
    pub name_font: Option<String>,
    #[serde(default)]
    pub default_font: Option<String>,
    #[serde(default)]
    pub name_color: Rgba,
    #[serde(default)]
    pub default_color: Rgba,
    #[serde(default)]
    pub is_player: bool,
    /// Agent this character speaks for; defaults to the character name
    #[serde(default)]
    pub agent: Option<String>,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_portrait: None,
            dialogue_box: None,
            name_font: None,
            default_font: None,
            name_color: Rgba::WHITE,
            default_color: Rgba::WHITE,
            is_player: false,
            agent: None,
        }
    }

    pub fn player(name: impl Into<String>) -> Self {
        Self {
            is_player: true,
            ..Self::new(name)
        }
    }

    /// Name of the agent that halts and emotes while this character talks
    pub fn agent_name(&self) -> &str {
        self.agent.as_deref().unwrap_or(&self.name)
    }
}

/// One speaker's turn: sentences plus presentation and emotion effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dialogue {
    /// Name of the speaking [`Character`]
    pub character: String,
    pub sentences: Vec<String>,
    /// Seconds per revealed character
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Overrides the character's text font
    #[serde(default)]
    pub font: Option<String>,
    /// Overrides the character's text color
    #[serde(default)]
    pub text_color: Option<Rgba>,
    /// Portrait override
    #[serde(default)]
    pub expression: Option<String>,
    /// Clip the speaking NPC plays instead of the talk clip
    #[serde(default)]
    pub emote: Option<String>,
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default)]
    pub affects_emotion: bool,
    /// Emotions of the speaking NPC moved by `emotion_effect` on entry
    #[serde(default)]
    pub emotions_affected: Vec<String>,
    #[serde(default)]
    pub emotion_effect: f32,
    /// Follow-up conversation ids; non-empty makes this a choice unit
    #[serde(default)]
    pub choices: Vec<String>,
}

impl Dialogue {
    pub fn new(character: impl Into<String>, sentences: Vec<String>) -> Self {
        Self {
            character: character.into(),
            sentences,
            speed: DEFAULT_TELETYPE_SPEED,
            font: None,
            text_color: None,
            expression: None,
            emote: None,
            sound: None,
            affects_emotion: false,
            emotions_affected: Vec::new(),
            emotion_effect: 0.0,
            choices: Vec::new(),
        }
    }

    pub fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = choices;
        self
    }

    pub fn with_emotion_effect(mut self, emotions: Vec<String>, effect: f32) -> Self {
        self.affects_emotion = true;
        self.emotions_affected = emotions;
        self.emotion_effect = effect;
        self
    }

    pub fn is_choice(&self) -> bool {
        !self.choices.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    /// Label on the choice button when this conversation is a follow-up
    #[serde(default)]
    pub choice_title: Option<String>,
    /// Favored when it matches the NPC's dominant emotion
    #[serde(default)]
    pub trigger_emotion: Option<String>,
    pub dialogues: Vec<Dialogue>,
}

impl Conversation {
    pub fn new(id: impl Into<String>, dialogues: Vec<Dialogue>) -> Self {
        Self {
            id: id.into(),
            choice_title: None,
            trigger_emotion: None,
            dialogues,
        }
    }

    /// Button label, falling back to the id
    pub fn title(&self) -> &str {
        self.choice_title.as_deref().unwrap_or(&self.id)
    }
}

/// All characters and conversations, looked up by name and id
#[derive(Debug, Clone, Default)]
pub struct ConversationLibrary {
    characters: AHashMap<String, Character>,
    conversations: AHashMap<String, Conversation>,
}

impl ConversationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_character(&mut self, character: Character) {
        self.characters.insert(character.name.clone(), character);
    }

    pub fn add_conversation(&mut self, conversation: Conversation) {
        self.conversations.insert(conversation.id.clone(), conversation);
    }

    pub fn character(&self, name: &str) -> Option<&Character> {
        self.characters.get(name)
    }

    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.conversations.get(id)
    }

    pub fn conversation_count(&self) -> usize {
        self.conversations.len()
    }

    /// Check every speaker and choice reference resolves and every reveal
    /// speed is a finite, non-negative number
    pub fn validate(&self) -> Result<()> {
        for conversation in self.conversations.values() {
            for (idx, dialogue) in conversation.dialogues.iter().enumerate() {
                if !self.characters.contains_key(&dialogue.character) {
                    return Err(NpcError::UnknownCharacter(format!(
                        "{} (conversation '{}')",
                        dialogue.character, conversation.id
                    )));
                }
                if !dialogue.speed.is_finite() || dialogue.speed < 0.0 {
                    return Err(NpcError::InvalidDefinition(format!(
                        "{}[{}]: teletype speed {} must be finite and not negative",
                        conversation.id, idx, dialogue.speed
                    )));
                }
                if dialogue.choices.len() > MAX_CHOICES {
                    return Err(NpcError::InvalidChoices {
                        dialogue: format!("{}[{}]", conversation.id, idx),
                        count: dialogue.choices.len(),
                    });
                }
                if let Some(missing) = dialogue.choices.iter().find(|c| !self.conversations.contains_key(*c)) {
                    return Err(NpcError::UnknownConversation(format!(
                        "{} (choice in '{}')",
                        missing, conversation.id
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> ConversationLibrary {
        let mut library = ConversationLibrary::new();
        library.add_character(Character::new("Ada"));
        library.add_character(Character::player("You"));
        library
    }

    #[test]
    fn test_valid_library() {
        let mut library = library();
        library.add_conversation(Conversation::new(
            "hello",
            vec![Dialogue::new("Ada", vec!["Hi.".into()]).with_choices(vec!["bye".into()])],
        ));
        library.add_conversation(Conversation::new("bye", vec![Dialogue::new("You", vec!["Bye.".into()])]));
        assert!(library.validate().is_ok());
    }

    #[test]
    fn test_unknown_speaker_rejected() {
        let mut library = library();
        library.add_conversation(Conversation::new("hello", vec![Dialogue::new("Zed", vec!["?".into()])]));
        assert!(matches!(library.validate(), Err(NpcError::UnknownCharacter(_))));
    }

    #[test]
    fn test_too_many_choices_rejected() {
        let mut library = library();
        let choices = vec!["a".to_string(), "a".into(), "a".into(), "a".into()];
        library.add_conversation(Conversation::new("a", vec![Dialogue::new("Ada", vec![]).with_choices(choices)]));
        assert!(matches!(
            library.validate(),
            Err(NpcError::InvalidChoices { count: 4, .. })
        ));
    }

    #[test]
    fn test_bad_teletype_speed_rejected() {
        for speed in [f32::NAN, f32::INFINITY, -0.1] {
            let mut library = library();
            let mut dialogue = Dialogue::new("Ada", vec!["Hi.".into()]);
            dialogue.speed = speed;
            library.add_conversation(Conversation::new("hello", vec![dialogue]));
            assert!(
                matches!(library.validate(), Err(NpcError::InvalidDefinition(_))),
                "speed {speed}"
            );
        }
    }

    #[test]
    fn test_nan_speed_from_toml_rejected() {
        let dialogue: Dialogue = toml::from_str("character = \"Ada\"\nsentences = [\"Hi.\"]\nspeed = nan").unwrap();
        assert!(dialogue.speed.is_nan());
        let mut library = library();
        library.add_conversation(Conversation::new("hello", vec![dialogue]));
        assert!(library.validate().is_err());
    }

    #[test]
    fn test_unit_defaults_from_toml() {
        let dialogue: Dialogue = toml::from_str("character = \"Ada\"\nsentences = [\"Hi.\"]").unwrap();
        assert_eq!(dialogue.speed, DEFAULT_TELETYPE_SPEED);
        assert!(!dialogue.is_choice());
        assert_eq!(Character::new("Ada").agent_name(), "Ada");
    }
}
