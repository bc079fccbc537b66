use super::{parse_params, path_id, unknown_tool, DateRange, Page};
use crate::errors::ToolError;
use crate::mcp::envelope::ToolOutput;
use crate::services::logger::Logger;
use crate::services::tool_executor::ToolHandler;
use crate::services::wip_client::{ApiPath, RequestDescriptor, WipClient};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub const PROJECT_TOOLS: &[&str] = &["wip_get_project", "wip_get_project_todos"];

#[derive(Debug, Deserialize)]
struct ProjectRef {
    project_id: String,
}

#[derive(Debug, Deserialize)]
struct ProjectTodos {
    project_id: String,
    #[serde(flatten)]
    page: Page,
    #[serde(flatten)]
    range: DateRange,
}

#[derive(Clone)]
pub struct ProjectsManager {
    logger: Logger,
    client: Arc<WipClient>,
}

impl ProjectsManager {
    pub fn new(logger: Logger, client: Arc<WipClient>) -> Self {
        Self {
            logger: logger.child("projects"),
            client,
        }
    }

    pub fn request_for(tool: &str, args: Value) -> Result<RequestDescriptor, ToolError> {
        match tool {
            "wip_get_project" => {
                let params: ProjectRef = parse_params(tool, args)?;
                let project_id = path_id("project_id", &params.project_id)?;
                Ok(RequestDescriptor::get(ApiPath::new().lit("projects").id(project_id)))
            }
            "wip_get_project_todos" => {
                let params: ProjectTodos = parse_params(tool, args)?;
                let project_id = path_id("project_id", &params.project_id)?;
                let request = RequestDescriptor::get(
                    ApiPath::new().lit("projects").id(project_id).lit("todos"),
                );
                Ok(params.range.apply(params.page.apply(request)))
            }
            _ => Err(unknown_tool("projects", tool)),
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for ProjectsManager {
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
