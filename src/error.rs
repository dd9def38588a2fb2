use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Unknown locator, missing required field, negative or malformed number.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no product with id {0}")]
    NotFound(i64),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("loader stopped")]
    LoaderStopped,

    /// A failure from a background load, shared by every reader of that result.
    #[error(transparent)]
    Background(Arc<Error>),
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// The underlying error, looking through background wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Background(inner) => inner.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
