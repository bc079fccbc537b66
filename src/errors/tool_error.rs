use crate::errors::WipApiError;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    InvalidParams,
    Denied,
    NotFound,
    Conflict,
    Timeout,
    Retryable,
    Internal,
}

/// Failure returned by a tool handler. `message` is what the host shows to its caller.
#[derive(Debug, Clone, Serialize)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub retryable: bool,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            hint: None,
            details: None,
            retryable: matches!(kind, ToolErrorKind::Timeout | ToolErrorKind::Retryable),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidParams, "INVALID_PARAMS", message)
    }

    pub fn denied(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Denied, "DENIED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, "NOT_FOUND", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Conflict, "CONFLICT", message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Timeout, "TIMEOUT", message)
    }

    pub fn retryable(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Retryable, "RETRYABLE", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Internal, "INTERNAL", message)
    }

    /// HTTP status of the remote failure this error was built from, if any.
    pub fn status(&self) -> Option<u16> {
        self.details
            .as_ref()
            .and_then(|d| d.get("status"))
            .and_then(|v| v.as_u64())
            .map(|v| v as u16)
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ToolError {}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::internal(err.to_string())
    }
}

impl From<WipApiError> for ToolError {
    fn from(err: WipApiError) -> Self {
        let message = err.to_string();
        match err {
            WipApiError::Api { status, .. } => {
                let base = match status {
                    404 => ToolError::not_found(message),
                    401 | 403 => ToolError::denied(message),
                    409 | 422 => ToolError::conflict(message),
                    _ => ToolError::new(ToolErrorKind::Internal, "UPSTREAM", message),
                };
                base.with_details(serde_json::json!({ "status": status }))
            }
            WipApiError::Transport(source) => {
                if source.is_timeout() {
                    ToolError::timeout(message)
                } else {
                    ToolError::retryable(message)
                }
            }
            WipApiError::InvalidRequest(_) => ToolError::invalid_params(message),
        }
    }
}
