

use thiserror::Error;

use crate::db::DbClientError;


#[derive(Error, Debug)]
pub enum TruncateError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] DbClientError),

    #[error("Config source error: {0}")]
    Config(#[from] config::ConfigError),
}

impl TruncateError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}


pub type Result<T> = std::result::Result<T, TruncateError>;
