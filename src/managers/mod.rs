//! Operation handlers, one manager per WIP resource.
//!
//! Each manager maps a tool name and its validated arguments to exactly one
//! [`RequestDescriptor`] (`request_for`, pure) and then runs it through the
//! shared [`WipClient`](crate::services::wip_client::WipClient).

pub mod comments;
pub mod projects;
pub mod reactions;
pub mod todos;
pub mod users;

use crate::errors::ToolError;
use crate::services::wip_client::RequestDescriptor;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Cursor pagination shared by every list endpoint. `limit` is forwarded as
/// given; the remote decides what a zero or fractional page size means.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    pub limit: Option<f64>,
    pub starting_after: Option<String>,
}

impl Page {
    pub fn apply(self, request: RequestDescriptor) -> RequestDescriptor {
        request
            .query("limit", self.limit)
            .query("starting_after", self.starting_after)
    }
}

/// Date filters for todo listings, forwarded unvalidated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateRange {
    pub since: Option<String>,
    pub until: Option<String>,
}

impl DateRange {
    pub fn apply(self, request: RequestDescriptor) -> RequestDescriptor {
        request
            .query("since", self.since)
            .query("until", self.until)
    }
}

/// Deserializes tool arguments into the operation's typed record.
pub(crate) fn parse_params<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args)
        .map_err(|err| ToolError::invalid_params(format!("Invalid arguments for {}: {}", tool, err)))
}

/// Identifier destined for a path segment. Empty values and dot segments
/// would silently change which resource is addressed, so they are rejected.
pub(crate) fn path_id(label: &str, value: &str) -> Result<String, ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::invalid_params(format!(
            "{} must be a non-empty string",
            label
        )));
    }
    if value == "." || value == ".." {
        return Err(ToolError::invalid_params(format!(
            "{} must not be a relative path segment",
            label
        )));
    }
    Ok(value.to_string())
}

pub(crate) fn unknown_tool(manager: &str, tool: &str) -> ToolError {
    ToolError::internal(format!("{} manager cannot handle tool {}", manager, tool))
}
