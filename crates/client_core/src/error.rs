use shared::error::{ErrorKind, StoreError};
use thiserror::Error;

use crate::config::ConfigError;

/// Everything that can go wrong between the form and the remote service.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Database Error: {0}")]
    Store(StoreError),
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Config(_) => ErrorKind::Configuration,
            GatewayError::Store(_) => ErrorKind::Persistence,
            GatewayError::Transport(_) | GatewayError::Decode(_) => ErrorKind::Unexpected,
        }
    }
}
