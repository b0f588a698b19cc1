use crate::UserId;
use thiserror::Error;

#[allow(clippy::enum_variant_names)]
#[derive(Debug, Error, PartialEq)]
pub enum DrfError {
    #[error("Resource '{dimension}' has zero capacity but usage {usage}")]
    InvalidCapacity { dimension: String, usage: i64 },
    #[error("Unknown user '{0}'")]
    UnknownUser(UserId),
    #[error("Error: {0}")]
    GenericError(String),
}

impl From<String> for DrfError {
    fn from(e: String) -> Self {
        Self::GenericError(e)
    }
}

impl From<&str> for DrfError {
    fn from(e: &str) -> Self {
        Self::GenericError(e.to_string())
    }
}
