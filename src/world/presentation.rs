//! Presentation contract - what the engine hands to UI layers each tick
//!
//! The engine never draws. After every agent update it emits an
//! [`AgentFrame`], and while the dialogue box is open it emits a
//! [`DialogueDisplay`] describing what should be on screen.

use crate::core::types::{AgentId, Rgba};
use serde::{Deserialize, Serialize};

/// Per-agent state for need/emotion bars and the action label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentFrame {
    pub agent: AgentId,
    pub name: String,
    pub needs: Vec<(String, f32)>,
    pub emotions: Vec<(String, f32)>,
    pub active_action: Option<String>,
    pub dominant_emotion: Option<String>,
}

/// Everything the dialogue box needs to render one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueDisplay {
    pub speaker_is_player: bool,
    pub speaker_name: String,
    pub name_font: Option<String>,
    pub name_color: Rgba,
    pub portrait: Option<String>,
    pub dialogue_box: Option<String>,
    pub box_color: Rgba,
    pub font: Option<String>,
    pub color: Rgba,
    pub text: String,
    /// Number of characters of `text` currently visible
    pub revealed_chars: usize,
    pub sound: Option<String>,
    /// Follow-up choice labels, shown once the text is fully revealed
    pub choices: Vec<String>,
}

impl DialogueDisplay {
    /// The visible prefix of the sentence
    pub fn visible_text(&self) -> &str {
        match self.text.char_indices().nth(self.revealed_chars) {
            Some((byte, _)) => &self.text[..byte],
            None => &self.text,
        }
    }
}

/// Sink for per-tick presentation output
pub trait Presentation {
    fn agent_frame(&mut self, frame: &AgentFrame);

    fn dialogue_display(&mut self, display: &DialogueDisplay);

    /// The dialogue box closed
    fn dialogue_closed(&mut self) {}
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresentation;

impl Presentation for NullPresentation {
    fn agent_frame(&mut self, _frame: &AgentFrame) {}

    fn dialogue_display(&mut self, _display: &DialogueDisplay) {}
}

/// Writes frames to the `tracing` log at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPresentation;

impl Presentation for LogPresentation {
    fn agent_frame(&mut self, frame: &AgentFrame) {
        tracing::debug!(
            agent = %frame.name,
            action = frame.active_action.as_deref().unwrap_or("none"),
            mood = frame.dominant_emotion.as_deref().unwrap_or("none"),
            "agent frame"
        );
    }

    fn dialogue_display(&mut self, dialogue: &DialogueDisplay) {
        tracing::debug!(speaker = %dialogue.speaker_name, "{}", dialogue.visible_text());
    }

    fn dialogue_closed(&mut self) {
        tracing::debug!("dialogue closed");
    }
}

/// Keeps the most recent output; used by the demo binary and tests
#[derive(Debug, Default, Clone)]
pub struct RecordedPresentation {
    pub frames: Vec<AgentFrame>,
    pub dialogue: Option<DialogueDisplay>,
    pub closed_count: usize,
}

impl RecordedPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the frames collected so far
    pub fn take_frames(&mut self) -> Vec<AgentFrame> {
        std::mem::take(&mut self.frames)
    }
}

impl Presentation for RecordedPresentation {
    fn agent_frame(&mut self, frame: &AgentFrame) {
        self.frames.push(frame.clone());
    }

    fn dialogue_display(&mut self, display: &DialogueDisplay) {
        self.dialogue = Some(display.clone());
    }

    fn dialogue_closed(&mut self) {
        self.dialogue = None;
        self.closed_count += 1;
    }
}
