use crate::model::NoteId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, JotzError>;

#[derive(Debug, Error)]
pub enum JotzError {
    #[error("Note not found: {0}")]
    NoteNotFound(NoteId),

    #[error("Store error: {0}")]
    Store(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("IO error: {0}")]
    Io(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(serde_json::Error),
}
