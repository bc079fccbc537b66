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

pub const REACTION_TOOLS: &[&str] = &["wip_create_reaction", "wip_delete_reaction"];

/// Body of `POST /reactions`. `reactable_type` is `Todo` or `Comment`; the
/// remote decides what else it accepts.
#[derive(Debug, Deserialize, Serialize)]
pub struct NewReaction {
    pub reactable_type: String,
    pub reactable_id: String,
}

#[derive(Debug, Deserialize)]
struct ReactionRef {
    reaction_id: String,
}

#[derive(Clone)]
pub struct ReactionsManager {
    logger: Logger,
    client: Arc<WipClient>,
}

impl ReactionsManager {
    pub fn new(logger: Logger, client: Arc<WipClient>) -> Self {
        Self {
            logger: logger.child("reactions"),
            client,
        }
    }

    pub fn request_for(tool: &str, args: Value) -> Result<RequestDescriptor, ToolError> {
        match tool {
            "wip_create_reaction" => {
                let reaction: NewReaction = parse_params(tool, args)?;
                let body = serde_json::to_value(&reaction)
                    .map_err(|err| ToolError::internal(err.to_string()))?;
                Ok(RequestDescriptor::new(Method::POST, ApiPath::route("reactions")).body(body))
            }
            "wip_delete_reaction" => {
                let params: ReactionRef = parse_params(tool, args)?;
                let reaction_id = path_id("reaction_id", &params.reaction_id)?;
                Ok(RequestDescriptor::new(
                    Method::DELETE,
                    ApiPath::new().lit("reactions").id(reaction_id),
                ))
            }
            _ => Err(unknown_tool("reactions", tool)),
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for ReactionsManager {
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
