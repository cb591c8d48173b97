use std::fmt;

use serde::{Deserialize, Serialize};

use crate::app_error::AppError;

/// Body of a successful `POST /api/v1/update`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReceipt {
    pub record_count: u64,
}

/// FastAPI-style error body: `{"detail": "..."}`.
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorDetail {
    pub detail: Option<serde_json::Value>,
}

impl ErrorDetail {
    /// The detail as display text; structured details are rendered as JSON.
    pub fn into_text(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

// Never print the password
impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// User-visible outcome of an administrative refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateMessage {
    Success { record_count: u64 },
    Error(String),
}

impl UpdateMessage {
    pub fn is_success(&self) -> bool {
        matches!(self, UpdateMessage::Success { .. })
    }

    /// The server's `detail` when it sent one, `Unknown error` for any
    /// rejection without one, otherwise the error itself.
    pub fn from_error(err: &AppError) -> Self {
        let text = match err {
            AppError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            AppError::Status { detail: None, .. } | AppError::Unauthorized => {
                "Unknown error".to_string()
            }
            other => other.to_string(),
        };
        UpdateMessage::Error(text)
    }
}

impl fmt::Display for UpdateMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateMessage::Success { record_count } => {
                write!(f, "Success: {} records updated", record_count)
            }
            UpdateMessage::Error(msg) => write!(f, "Error: {}", msg),
        }
    }
}
