use super::{parse_params, path_id, unknown_tool, Page};
use crate::errors::ToolError;
use crate::mcp::envelope::ToolOutput;
use crate::services::logger::Logger;
use crate::services::tool_executor::ToolHandler;
use crate::services::wip_client::{ApiPath, RequestDescriptor, WipClient};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const TODO_TOOLS: &[&str] = &["wip_create_todo", "wip_get_todo", "wip_get_todo_comments"];

/// Body of `POST /todos`. An empty attachment list is omitted, not sent as `[]`.
#[derive(Debug, Deserialize, Serialize)]
pub struct NewTodo {
    pub body: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TodoRef {
    todo_id: String,
}

#[derive(Debug, Deserialize)]
struct TodoComments {
    todo_id: String,
    #[serde(flatten)]
    page: Page,
}

#[derive(Clone)]
pub struct TodosManager {
    logger: Logger,
    client: Arc<WipClient>,
}

impl TodosManager {
    pub fn new(logger: Logger, client: Arc<WipClient>) -> Self {
        Self {
            logger: logger.child("todos"),
            client,
        }
    }

    pub fn request_for(tool: &str, args: Value) -> Result<RequestDescriptor, ToolError> {
        match tool {
            "wip_create_todo" => {
                let todo: NewTodo = parse_params(tool, args)?;
                let body = serde_json::to_value(&todo)
                    .map_err(|err| ToolError::internal(err.to_string()))?;
                Ok(RequestDescriptor::new(Method::POST, ApiPath::route("todos")).body(body))
            }
            "wip_get_todo" => {
                let params: TodoRef = parse_params(tool, args)?;
                let todo_id = path_id("todo_id", &params.todo_id)?;
                Ok(RequestDescriptor::get(ApiPath::new().lit("todos").id(todo_id)))
            }
            "wip_get_todo_comments" => {
                let params: TodoComments = parse_params(tool, args)?;
                let todo_id = path_id("todo_id", &params.todo_id)?;
                let request = RequestDescriptor::get(
                    ApiPath::new().lit("todos").id(todo_id).lit("comments"),
                );
                Ok(params.page.apply(request))
            }
            _ => Err(unknown_tool("todos", tool)),
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for TodosManager {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_todo_omits_empty_attachments() {
        let args = serde_json::json!({ "body": "shipped v1", "attachments": [] });
        let req = TodosManager::request_for("wip_create_todo", args).unwrap();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path.display(), "/todos");
        assert_eq!(req.body, Some(serde_json::json!({ "body": "shipped v1" })));
    }

    #[test]
    fn create_todo_keeps_attachments() {
        let args = serde_json::json!({ "body": "logo", "attachments": ["sig-1", "sig-2"] });
        let req = TodosManager::request_for("wip_create_todo", args).unwrap();
        assert_eq!(
            req.body,
            Some(serde_json::json!({ "body": "logo", "attachments": ["sig-1", "sig-2"] }))
        );
    }

    #[test]
    fn todo_comments_paginates() {
        let args = serde_json::json!({ "todo_id": "42", "limit": 3 });
        let req = TodosManager::request_for("wip_get_todo_comments", args).unwrap();
        assert_eq!(req.path.display(), "/todos/42/comments");
        assert_eq!(req.query.len(), 2);
    }

    #[test]
    fn get_todo_rejects_dot_dot() {
        let err = TodosManager::request_for("wip_get_todo", serde_json::json!({ "todo_id": ".." }))
            .unwrap_err();
        assert!(err.message.contains("todo_id"));
    }
}
