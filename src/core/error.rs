use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("Unknown archetype: {0}")]
    UnknownArchetype(String),

    #[error("Unknown personality: {0}")]
    UnknownPersonality(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Remote call timed out after {0}ms")]
    Timeout(u64),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl ArenaError {
    /// Remote failures the battle recovers from by falling back to local logic
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ArenaError::Service(_) | ArenaError::MalformedResponse(_) | ArenaError::Timeout(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ArenaError>;
