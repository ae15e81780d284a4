//! Dialogue manager - queue-driven conversation progression
//!
//! State machine:
//! Closed -> Typing -> AwaitingInput -> Typing -> ... -> Closed
//!
//! Continue advances to the next sentence of the current unit, then to the
//! next unit, then closes. While a choice unit is on screen, continue is
//! ignored and only [`DialogueManager::choose`] moves on.

use super::conversation::{Character, ConversationLibrary, Dialogue};
use super::teletype::Teletype;
use crate::core::config::EngineConfig;
use crate::core::error::{NpcError, Result};
use crate::entity::Agent;
use crate::world::DialogueDisplay;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueState {
    Closed,
    /// A sentence is being revealed
    Typing,
    /// Sentence fully shown, waiting for continue
    AwaitingInput,
    /// A choice unit is on screen
    AwaitingChoice,
}

/// Player input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DialogueInput {
    /// Continue was released this frame
    pub submit: bool,
    /// Continue is held
    pub fast_forward: bool,
    /// A choice button was pressed
    pub choice: Option<usize>,
}

impl DialogueInput {
    pub fn submit() -> Self {
        Self {
            submit: true,
            ..Self::default()
        }
    }

    pub fn choice(index: usize) -> Self {
        Self {
            choice: Some(index),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct DialogueManager {
    library: ConversationLibrary,
    config: Arc<EngineConfig>,
    units: VecDeque<Dialogue>,
    sentences: VecDeque<String>,
    current: Option<Dialogue>,
    conversation: Option<String>,
    sentence: String,
    teletype: Option<Teletype>,
    open: bool,
    /// Agent name of the last non-player speaker
    npc: Option<String>,
    playing_sound: Option<String>,
    pending_sound: Option<String>,
}

impl DialogueManager {
    pub fn new(library: ConversationLibrary, config: Arc<EngineConfig>) -> Self {
        if config.default_font.is_none() {
            tracing::warn!("no default dialogue font configured");
        }
        Self {
            library,
            config,
            units: VecDeque::new(),
            sentences: VecDeque::new(),
            current: None,
            conversation: None,
            sentence: String::new(),
            teletype: None,
            open: false,
            npc: None,
            playing_sound: None,
            pending_sound: None,
        }
    }

    pub fn library(&self) -> &ConversationLibrary {
        &self.library
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn state(&self) -> DialogueState {
        if !self.open {
            return DialogueState::Closed;
        }
        if self.teletype.as_ref().is_some_and(|t| !t.is_done()) {
            return DialogueState::Typing;
        }
        if self.current.as_ref().is_some_and(Dialogue::is_choice) {
            DialogueState::AwaitingChoice
        } else {
            DialogueState::AwaitingInput
        }
    }

    pub fn current_dialogue(&self) -> Option<&Dialogue> {
        self.current.as_ref().filter(|_| self.open)
    }

    pub fn current_conversation(&self) -> Option<&str> {
        self.conversation.as_deref().filter(|_| self.open)
    }

    /// Agent currently held in conversation
    pub fn speaking_npc(&self) -> Option<&str> {
        self.npc.as_deref().filter(|_| self.open)
    }

    fn current_character(&self) -> Option<&Character> {
        self.current.as_ref().and_then(|d| self.library.character(&d.character))
    }

    /// Clip the conversing NPC should play: the unit's emote or the talk
    /// clip while an NPC speaks, idle while the player speaks
    pub fn npc_clip(&self) -> &str {
        match (self.current.as_ref(), self.current_character()) {
            (Some(unit), Some(character)) if !character.is_player => {
                unit.emote.as_deref().unwrap_or(self.config.talk_clip.as_str())
            }
            _ => self.config.idle_clip.as_str(),
        }
    }

    /// Replace whatever is queued with a conversation and show its first sentence
    pub fn start_conversation(&mut self, id: &str, agents: &mut [Agent]) -> Result<()> {
        let conversation = self
            .library
            .conversation(id)
            .ok_or_else(|| NpcError::UnknownConversation(id.to_string()))?;
        self.units = conversation.dialogues.iter().cloned().collect();
        self.sentences.clear();
        self.conversation = Some(id.to_string());
        self.open = true;

        if self.units.is_empty() {
            tracing::warn!(conversation = id, "conversation has no dialogue, closing");
            self.close();
            return Ok(());
        }
        tracing::info!(conversation = id, "conversation started");
        self.display_next(agents);
        Ok(())
    }

    /// Per-frame progression: reveal text, then handle choice or continue
    pub fn update(&mut self, dt: f32, input: &DialogueInput, agents: &mut [Agent]) {
        if !self.open {
            return;
        }
        if let Some(teletype) = self.teletype.as_mut() {
            teletype.advance(dt, input.fast_forward);
        }

        if let Some(index) = input.choice {
            if let Err(err) = self.choose(index, agents) {
                tracing::warn!(error = %err, "choice ignored");
            }
            return;
        }
        if input.submit && self.state() == DialogueState::AwaitingInput {
            self.display_next(agents);
        }
    }

    /// Start the follow-up conversation behind a choice of the current unit
    pub fn choose(&mut self, index: usize, agents: &mut [Agent]) -> Result<()> {
        let choices = self
            .current
            .as_ref()
            .filter(|_| self.open)
            .map_or(&[][..], |d| d.choices.as_slice());
        let id = choices.get(index).cloned().ok_or(NpcError::ChoiceOutOfRange {
            index,
            available: choices.len(),
        })?;
        tracing::debug!(choice = index, conversation = %id, "choice made");
        self.start_conversation(&id, agents)
    }

    /// Show the next sentence, entering later units as needed; close when
    /// everything has been said
    pub fn display_next(&mut self, agents: &mut [Agent]) {
        loop {
            if let Some(sentence) = self.sentences.pop_front() {
                self.show(sentence);
                return;
            }
            let Some(unit) = self.units.pop_front() else {
                self.close();
                return;
            };
            self.enter_unit(unit, agents);
            if self.sentences.is_empty() && self.current.as_ref().is_some_and(Dialogue::is_choice) {
                self.show(String::new());
                return;
            }
        }
    }

    pub fn close(&mut self) {
        if self.open {
            tracing::info!(conversation = ?self.conversation, "dialogue closed");
        }
        self.open = false;
        self.npc = None;
        self.current = None;
        self.conversation = None;
        self.units.clear();
        self.sentences.clear();
        self.teletype = None;
        self.sentence.clear();
    }

    fn enter_unit(&mut self, unit: Dialogue, agents: &mut [Agent]) {
        self.sentences = unit.sentences.iter().cloned().collect();

        match self.library.character(&unit.character) {
            Some(character) if !character.is_player => {
                self.npc = Some(character.agent_name().to_string());
            }
            Some(_) => {}
            None => tracing::warn!(character = %unit.character, "unknown speaker"),
        }

        if unit.affects_emotion {
            let npc = self.npc.as_deref();
            match agents.iter_mut().find(|a| Some(a.name.as_str()) == npc) {
                Some(agent) => {
                    for emotion in &unit.emotions_affected {
                        agent.emotions.adjust(emotion, unit.emotion_effect);
                    }
                    tracing::debug!(
                        agent = %agent.name,
                        emotions = ?unit.emotions_affected,
                        effect = unit.emotion_effect,
                        "dialogue moved emotions"
                    );
                }
                None => tracing::warn!(npc = ?npc, "emotion effect has no agent to apply to"),
            }
        }

        self.current = Some(unit);
    }

    fn show(&mut self, sentence: String) {
        let Some(unit) = self.current.as_ref() else {
            return;
        };
        self.teletype = Some(Teletype::new(&sentence, unit.speed));
        self.sentence = sentence;
        if unit.sound.is_some() && unit.sound != self.playing_sound {
            self.playing_sound = unit.sound.clone();
            self.pending_sound = unit.sound.clone();
        }
    }

    /// What the dialogue box should show this frame
    ///
    /// A sound cue is reported once, on the first display after it starts.
    pub fn display(&mut self) -> Option<DialogueDisplay> {
        if !self.open {
            return None;
        }
        let unit = self.current.as_ref()?;
        let character = self.library.character(&unit.character)?;
        let revealed = self.teletype.as_ref().map_or(0, Teletype::revealed);
        let typing = self.teletype.as_ref().is_some_and(|t| !t.is_done());

        let choices = if typing {
            Vec::new()
        } else {
            unit.choices
                .iter()
                .map(|id| self.library.conversation(id).map_or(id.as_str(), |c| c.title()).to_string())
                .collect()
        };

        let default_font = self.config.default_font.clone();
        Some(DialogueDisplay {
            speaker_is_player: character.is_player,
            speaker_name: character.name.clone(),
            name_font: character.name_font.clone().or_else(|| default_font.clone()),
            name_color: character.name_color,
            portrait: unit.expression.clone().or_else(|| character.default_portrait.clone()),
            dialogue_box: character.dialogue_box.clone(),
            box_color: if character.dialogue_box.is_some() {
                self.config.dialogue_box_color
            } else {
                self.config.empty_dialogue_box_color
            },
            font: unit.font.clone().or_else(|| character.default_font.clone()).or(default_font),
            color: unit.text_color.unwrap_or(character.default_color),
            text: self.sentence.clone(),
            revealed_chars: revealed,
            sound: self.pending_sound.take(),
            choices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::conversation::{Character, Conversation};

    fn make_library() -> ConversationLibrary {
        let mut library = ConversationLibrary::new();
        let mut ada = Character::new("Ada");
        ada.dialogue_box = Some("box_ada".into());
        library.add_character(ada);
        library.add_character(Character::player("You"));

        let mut greet = Dialogue::new("Ada", vec!["Hello there.".into(), "Hungry?".into()])
            .with_emotion_effect(vec!["Happiness".into()], -0.3);
        greet.sound = Some("chime".into());
        let ask = Dialogue::new("You", vec!["Well...".into()]).with_choices(vec!["yes".into(), "no".into()]);
        library.add_conversation(Conversation::new("greet", vec![greet, ask]));

        let mut yes = Conversation::new("yes", vec![Dialogue::new("Ada", vec!["Eat then.".into()])]);
        yes.choice_title = Some("Yes please".into());
        library.add_conversation(yes);
        library.add_conversation(Conversation::new("no", vec![Dialogue::new("You", vec!["No.".into()])]));
        library.add_conversation(Conversation::new("empty", vec![]));
        library
    }

    fn make_agents() -> Vec<Agent> {
        vec![Agent::builder("Ada")
            .emotion("Happiness")
            .build(Arc::new(EngineConfig::default()))]
    }

    fn reveal_all(manager: &mut DialogueManager, agents: &mut [Agent]) {
        manager.update(10.0, &DialogueInput::default(), agents);
    }

    #[test]
    fn test_two_sentences_then_choice_unit() {
        let mut agents = make_agents();
        let mut manager = DialogueManager::new(make_library(), Arc::new(EngineConfig::default()));
        manager.start_conversation("greet", &mut agents).unwrap();
        assert_eq!(manager.state(), DialogueState::Typing);
        assert_eq!(manager.speaking_npc(), Some("Ada"));

        reveal_all(&mut manager, &mut agents);
        assert_eq!(manager.state(), DialogueState::AwaitingInput);
        manager.update(0.0, &DialogueInput::submit(), &mut agents);
        assert_eq!(manager.display().unwrap().text, "Hungry?");

        reveal_all(&mut manager, &mut agents);
        manager.update(0.0, &DialogueInput::submit(), &mut agents);
        reveal_all(&mut manager, &mut agents);
        assert_eq!(manager.state(), DialogueState::AwaitingChoice);
        let display = manager.display().unwrap();
        assert!(display.speaker_is_player);
        assert_eq!(display.choices, vec!["Yes please".to_string(), "no".to_string()]);

        // continue is ignored on a choice unit
        manager.update(0.0, &DialogueInput::submit(), &mut agents);
        assert_eq!(manager.state(), DialogueState::AwaitingChoice);
    }

    #[test]
    fn test_choice_starts_follow_up_then_closes() {
        let mut agents = make_agents();
        let mut manager = DialogueManager::new(make_library(), Arc::new(EngineConfig::default()));
        manager.start_conversation("greet", &mut agents).unwrap();
        for _ in 0..2 {
            reveal_all(&mut manager, &mut agents);
            manager.update(0.0, &DialogueInput::submit(), &mut agents);
        }
        assert!(matches!(
            manager.choose(5, &mut agents),
            Err(NpcError::ChoiceOutOfRange { index: 5, available: 2 })
        ));

        manager.update(0.0, &DialogueInput::choice(0), &mut agents);
        assert_eq!(manager.current_conversation(), Some("yes"));
        assert_eq!(manager.display().unwrap().text, "Eat then.");

        reveal_all(&mut manager, &mut agents);
        manager.update(0.0, &DialogueInput::submit(), &mut agents);
        assert_eq!(manager.state(), DialogueState::Closed);
        assert_eq!(manager.speaking_npc(), None);
        assert!(manager.display().is_none());
    }

    #[test]
    fn test_entering_unit_moves_npc_emotion_clamped() {
        let mut agents = make_agents();
        agents[0].emotions.set("Happiness", 0.2);
        let mut manager = DialogueManager::new(make_library(), Arc::new(EngineConfig::default()));
        manager.start_conversation("greet", &mut agents).unwrap();
        assert_eq!(agents[0].emotions.get("Happiness"), Some(0.0));
    }

    #[test]
    fn test_display_resolves_presentation_defaults() {
        let mut agents = make_agents();
        let config = EngineConfig {
            default_font: Some("serif".into()),
            ..EngineConfig::default()
        };
        let mut manager = DialogueManager::new(make_library(), Arc::new(config));
        manager.start_conversation("greet", &mut agents).unwrap();

        let display = manager.display().unwrap();
        assert_eq!(display.font.as_deref(), Some("serif"));
        assert_eq!(display.name_font.as_deref(), Some("serif"));
        assert_eq!(display.dialogue_box.as_deref(), Some("box_ada"));
        assert_eq!(display.sound.as_deref(), Some("chime"));
        assert_eq!(display.revealed_chars, 0);
        assert!(display.choices.is_empty());
        // the cue is reported once
        assert_eq!(manager.display().unwrap().sound, None);
        assert_eq!(manager.npc_clip(), "Talk");
    }

    #[test]
    fn test_empty_conversation_closes() {
        let mut agents = make_agents();
        let mut manager = DialogueManager::new(make_library(), Arc::new(EngineConfig::default()));
        manager.start_conversation("empty", &mut agents).unwrap();
        assert_eq!(manager.state(), DialogueState::Closed);
        assert!(matches!(
            manager.start_conversation("missing", &mut agents),
            Err(NpcError::UnknownConversation(_))
        ));
    }
}
