use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbpassError {
    #[error("dbpass is not initialized here. Run `dbpass init` first.")]
    NotInitialized,

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("{0}")]
    Network(String),

    /// Server-reported failure. Displays as the bare server message.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Strength check failed: {0}")]
    Strength(String),

    #[error("{0}")]
    Generator(String),
}

impl From<reqwest::Error> for DbpassError {
    fn from(err: reqwest::Error) -> Self {
        DbpassError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DbpassError>;
