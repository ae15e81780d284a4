//! Branching dialogue: conversation records, timed text reveal and the
//! conversation state machine

pub mod conversation;
pub mod manager;
pub mod selection;
pub mod teletype;

pub use conversation::{Character, Conversation, ConversationLibrary, Dialogue};
pub use manager::{DialogueInput, DialogueManager, DialogueState};
pub use selection::select_conversation;
pub use teletype::Teletype;
