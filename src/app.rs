use crate::config::WipConfig;
use crate::constants::service;
use crate::errors::ToolError;
use crate::managers::comments::{CommentsManager, COMMENT_TOOLS};
use crate::managers::projects::{ProjectsManager, PROJECT_TOOLS};
use crate::managers::reactions::{ReactionsManager, REACTION_TOOLS};
use crate::managers::todos::{TodosManager, TODO_TOOLS};
use crate::managers::users::{UsersManager, USER_TOOLS};
use crate::mcp::catalog::tool_catalog;
use crate::services::logger::Logger;
use crate::services::tool_executor::{ToolExecutor, ToolHandler};
use crate::services::wip_client::WipClient;
use std::collections::HashMap;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    fn validate_tool_wiring(
        handlers: &HashMap<String, Arc<dyn ToolHandler>>,
    ) -> Result<(), ToolError> {
        let mut missing: Vec<String> = tool_catalog()
            .iter()
            .filter(|tool| !handlers.contains_key(&tool.name))
            .map(|tool| tool.name.clone())
            .collect();
        let mut orphaned: Vec<String> = handlers
            .keys()
            .filter(|name| !tool_catalog().iter().any(|tool| &tool.name == *name))
            .cloned()
            .collect();
        if missing.is_empty() && orphaned.is_empty() {
            return Ok(());
        }
        missing.sort();
        orphaned.sort();
        Err(ToolError::internal("Tool wiring is incomplete")
            .with_hint("Every tool in tool_catalog.json must have exactly one handler.")
            .with_details(serde_json::json!({
                "missing_tools": missing,
                "unlisted_handlers": orphaned,
            })))
    }

    fn register(
        handlers: &mut HashMap<String, Arc<dyn ToolHandler>>,
        names: &[&str],
        handler: Arc<dyn ToolHandler>,
    ) {
        for name in names {
            handlers.insert((*name).to_string(), handler.clone());
        }
    }

    fn build_handlers(
        logger: &Logger,
        client: Arc<WipClient>,
    ) -> HashMap<String, Arc<dyn ToolHandler>> {
        let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        Self::register(
            &mut handlers,
            USER_TOOLS,
            Arc::new(UsersManager::new(logger.clone(), client.clone())),
        );
        Self::register(
            &mut handlers,
            TODO_TOOLS,
            Arc::new(TodosManager::new(logger.clone(), client.clone())),
        );
        Self::register(
            &mut handlers,
            PROJECT_TOOLS,
            Arc::new(ProjectsManager::new(logger.clone(), client.clone())),
        );
        Self::register(
            &mut handlers,
            REACTION_TOOLS,
            Arc::new(ReactionsManager::new(logger.clone(), client.clone())),
        );
        Self::register(
            &mut handlers,
            COMMENT_TOOLS,
            Arc::new(CommentsManager::new(logger.clone(), client)),
        );
        handlers
    }

    /// Builds the registry. Without an API key nothing is registered and the
    /// app stays inert; that is a warning, not an error.
    pub fn initialize(config: &WipConfig) -> Result<Self, ToolError> {
        Self::initialize_with_logger(Logger::new(service::NAME), config)
    }

    pub fn initialize_with_logger(logger: Logger, config: &WipConfig) -> Result<Self, ToolError> {
        if config.api_key().is_none() {
            logger.warn("Plugin not configured: missing apiKey", None);
            return Ok(Self {
                tool_executor: Arc::new(ToolExecutor::new(logger.clone(), HashMap::new())),
                logger,
            });
        }

        let client = Arc::new(WipClient::new(logger.clone(), config)?);
        let handlers = Self::build_handlers(&logger, client.clone());
        Self::validate_tool_wiring(&handlers)?;

        let count = handlers.len();
        let tool_executor = Arc::new(ToolExecutor::new(logger.clone(), handlers));
        logger.info(
            &format!("Registered {} tools for {}", count, service::HOST),
            Some(&serde_json::json!({ "base_url": client.base_url().as_str() })),
        );

        Ok(Self {
            logger,
            tool_executor,
        })
    }
}
