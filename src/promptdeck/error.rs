use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    /// A mutation targeted an id that no longer exists. The first field is
    /// the entity kind ("prompt", "checkpoint", "category", ...).
    #[error("{0} not found: {1}")]
    NotFound(&'static str, String),

    #[error("{0} is required")]
    EmptyField(&'static str),

    #[error("create a category first")]
    NoCategories,

    #[error("invalid library: {0}")]
    Validation(String),

    #[error("no editable composer target found")]
    ComposerUnavailable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, DeckError>;
