use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error taxonomy attached to submission results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Configuration,
    Persistence,
    Notification,
    Unexpected,
}

/// Error body returned by the persistence store when an insert is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreError {
    pub message: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl StoreError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: None,
            hint: None,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Code: {})", self.message, self.code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field: {0}")]
pub struct UnknownField(pub String);
