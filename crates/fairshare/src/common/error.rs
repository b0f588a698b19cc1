use thiserror::Error;

use crate::common::error::FairShareError::GenericError;

#[derive(Debug, Error)]
pub enum FairShareError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Fairness error: {0}")]
    DrfError(#[from] drf::Error),
    #[error("Error: {0}")]
    GenericError(String),
}

impl From<serde_json::error::Error> for FairShareError {
    fn from(e: serde_json::error::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

impl From<toml::de::Error> for FairShareError {
    fn from(error: toml::de::Error) -> Self {
        Self::DeserializationError(error.to_string())
    }
}

pub fn error<T>(message: String) -> crate::Result<T> {
    Err(GenericError(message))
}

impl From<String> for FairShareError {
    fn from(e: String) -> Self {
        GenericError(e)
    }
}
