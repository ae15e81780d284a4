use thiserror::Error;

#[derive(Error, Debug)]
pub enum NpcError {
    #[error("Unknown need: {0}")]
    UnknownNeed(String),

    #[error("Unknown emotion: {0}")]
    UnknownEmotion(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Unknown character: {0}")]
    UnknownCharacter(String),

    #[error("Unknown conversation: {0}")]
    UnknownConversation(String),

    #[error("Dialogue '{dialogue}' offers {count} choices (expected 1 to 3)")]
    InvalidChoices { dialogue: String, count: usize },

    #[error("Choice {index} is out of range ({available} available)")]
    ChoiceOutOfRange { index: usize, available: usize },

    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, NpcError>;
