use crate::errors::{ToolError, ToolErrorKind};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// JSON-RPC error codes used on the stdio channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum ErrorCode {
    RequestTimeout = -32001,
    ParseError = -32700,
    InvalidRequest = -32600,
    MethodNotFound = -32601,
    InvalidParams = -32602,
    InternalError = -32603,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct McpError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl McpError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl From<&ToolError> for McpError {
    fn from(error: &ToolError) -> Self {
        let code = match error.kind {
            ToolErrorKind::InvalidParams => ErrorCode::InvalidParams,
            ToolErrorKind::Timeout => ErrorCode::RequestTimeout,
            ToolErrorKind::Denied | ToolErrorKind::Conflict | ToolErrorKind::NotFound => {
                ErrorCode::InvalidRequest
            }
            ToolErrorKind::Retryable | ToolErrorKind::Internal => ErrorCode::InternalError,
        };
        let mut data = serde_json::json!({
            "kind": error.kind,
            "code": error.code,
            "retryable": error.retryable,
        });
        if let Some(status) = error.status() {
            data["status"] = Value::from(status);
        }
        if let Some(hint) = &error.hint {
            data["hint"] = Value::String(hint.clone());
        }
        McpError::new(code, error.message.clone()).with_data(data)
    }
}

impl fmt::Display for McpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for McpError {}
