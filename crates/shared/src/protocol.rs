use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// Normalized outcome of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl SubmissionResult {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            kind: None,
        }
    }

    /// Success that still carries a degraded step, e.g. a confirmation email that was not sent.
    pub fn qualified(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            kind: Some(kind),
        }
    }

    pub fn failed(kind: ErrorKind, message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(error.into()),
            kind: Some(kind),
        }
    }

    /// Message shown to the user, with diagnostic detail appended for failures.
    pub fn display_message(&self) -> String {
        match (&self.error, self.success) {
            (Some(error), false) => format!("{} ({error})", self.message),
            _ => self.message.clone(),
        }
    }
}
