use thiserror::Error;

use crate::db::StoreError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Warning store error: {0}")]
    Store(#[from] StoreError),

    #[error("Discord API error: {0}")]
    Serenity(#[from] serenity::Error),

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("{0}")]
    Custom(String),
}

impl Error {
    pub fn custom<S: Into<String>>(msg: S) -> Self {
        Error::Custom(msg.into())
    }
}
