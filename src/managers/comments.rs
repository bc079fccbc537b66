use super::{parse_params, path_id, unknown_tool};
use crate::errors::ToolError;
use crate::mcp::envelope::ToolOutput;
use crate::services::logger::Logger;
use crate::services::tool_executor::ToolHandler;
use crate::services::wip_client::{ApiPath, RequestDescriptor, WipClient};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const COMMENT_TOOLS: &[&str] = &[
    "wip_create_comment",
    "wip_update_comment",
    "wip_delete_comment",
];

/// Comments can only be attached to todos.
const COMMENTABLE_TYPE: &str = "Todo";

#[derive(Debug, Deserialize)]
struct CommentOnTodo {
    todo_id: String,
    body: String,
}

#[derive(Debug, Serialize)]
struct NewComment<'a> {
    commentable_type: &'static str,
    commentable_id: &'a str,
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct CommentEdit {
    comment_id: String,
    body: String,
}

#[derive(Debug, Deserialize)]
struct CommentRef {
    comment_id: String,
}

#[derive(Clone)]
pub struct CommentsManager {
    logger: Logger,
    client: Arc<WipClient>,
}

impl CommentsManager {
    pub fn new(logger: Logger, client: Arc<WipClient>) -> Self {
        Self {
            logger: logger.child("comments"),
            client,
        }
    }

    pub fn request_for(tool: &str, args: Value) -> Result<RequestDescriptor, ToolError> {
        match tool {
            "wip_create_comment" => {
                let params: CommentOnTodo = parse_params(tool, args)?;
                let body = serde_json::to_value(NewComment {
                    commentable_type: COMMENTABLE_TYPE,
                    commentable_id: &params.todo_id,
                    body: &params.body,
                })
                .map_err(|err| ToolError::internal(err.to_string()))?;
                Ok(RequestDescriptor::new(Method::POST, ApiPath::route("comments")).body(body))
            }
            "wip_update_comment" => {
                let params: CommentEdit = parse_params(tool, args)?;
                let comment_id = path_id("comment_id", &params.comment_id)?;
                Ok(RequestDescriptor::new(
                    Method::PATCH,
                    ApiPath::new().lit("comments").id(comment_id),
                )
                .body(serde_json::json!({ "body": params.body })))
            }
            "wip_delete_comment" => {
                let params: CommentRef = parse_params(tool, args)?;
                let comment_id = path_id("comment_id", &params.comment_id)?;
                Ok(RequestDescriptor::new(
                    Method::DELETE,
                    ApiPath::new().lit("comments").id(comment_id),
                ))
            }
            _ => Err(unknown_tool("comments", tool)),
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for CommentsManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<ToolOutput, ToolError> {
        let request = Self::request_for(tool, args)?;
        self.logger.debug(
            "dispatch",
            Some(&serde_json::json!({ "tool": tool, "path": request.path.display() })),
        );
        let payload = self.client.execute(request).await?;
        Ok(ToolOutput::from_payload(payload))
    }
}
