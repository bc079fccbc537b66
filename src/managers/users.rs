use super::{parse_params, path_id, unknown_tool, DateRange, Page};
use crate::errors::ToolError;
use crate::mcp::envelope::ToolOutput;
use crate::services::logger::Logger;
use crate::services::tool_executor::ToolHandler;
use crate::services::wip_client::{ApiPath, RequestDescriptor, WipClient};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub const USER_TOOLS: &[&str] = &[
    "wip_get_me",
    "wip_get_my_todos",
    "wip_get_my_projects",
    "wip_get_user",
    "wip_get_user_todos",
    "wip_get_user_projects",
];

#[derive(Debug, Deserialize)]
struct TodoListing {
    #[serde(flatten)]
    page: Page,
    #[serde(flatten)]
    range: DateRange,
}

#[derive(Debug, Deserialize)]
struct UserRef {
    username: String,
}

#[derive(Debug, Deserialize)]
struct UserTodoListing {
    username: String,
    #[serde(flatten)]
    page: Page,
    #[serde(flatten)]
    range: DateRange,
}

#[derive(Debug, Deserialize)]
struct UserProjectListing {
    username: String,
    #[serde(flatten)]
    page: Page,
}

/// Profiles, todos and projects of the authenticated viewer or any user.
#[derive(Clone)]
pub struct UsersManager {
    logger: Logger,
    client: Arc<WipClient>,
}

impl UsersManager {
    pub fn new(logger: Logger, client: Arc<WipClient>) -> Self {
        Self {
            logger: logger.child("users"),
            client,
        }
    }

    pub fn request_for(tool: &str, args: Value) -> Result<RequestDescriptor, ToolError> {
        match tool {
            "wip_get_me" => Ok(RequestDescriptor::get(ApiPath::route("users/me"))),
            "wip_get_my_todos" => {
                let params: TodoListing = parse_params(tool, args)?;
                let request = RequestDescriptor::get(ApiPath::route("users/me/todos"));
                Ok(params.range.apply(params.page.apply(request)))
            }
            "wip_get_my_projects" => {
                let page: Page = parse_params(tool, args)?;
                Ok(page.apply(RequestDescriptor::get(ApiPath::route("users/me/projects"))))
            }
            "wip_get_user" => {
                let params: UserRef = parse_params(tool, args)?;
                let username = path_id("username", &params.username)?;
                Ok(RequestDescriptor::get(ApiPath::new().lit("users").id(username)))
            }
            "wip_get_user_todos" => {
                let params: UserTodoListing = parse_params(tool, args)?;
                let username = path_id("username", &params.username)?;
                let request =
                    RequestDescriptor::get(ApiPath::new().lit("users").id(username).lit("todos"));
                Ok(params.range.apply(params.page.apply(request)))
            }
            "wip_get_user_projects" => {
                let params: UserProjectListing = parse_params(tool, args)?;
                let username = path_id("username", &params.username)?;
                let request = RequestDescriptor::get(
                    ApiPath::new().lit("users").id(username).lit("projects"),
                );
                Ok(params.page.apply(request))
            }
            _ => Err(unknown_tool("users", tool)),
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for UsersManager {
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
