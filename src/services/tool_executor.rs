use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::errors::ToolError;
use crate::mcp::aliases::canonical_tool_name;
use crate::mcp::catalog::{tool_catalog, validate_tool_args, ToolDef};
use crate::mcp::envelope::ToolOutput;
use crate::services::logger::Logger;
use crate::utils::suggest::suggest;

use serde_json::Value;

#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// `tool` is the canonical name; one handler may serve several tools.
    async fn handle(&self, tool: &str, args: Value) -> Result<ToolOutput, ToolError>;
}

/// The process-wide operation registry: canonical tool name to handler.
/// Immutable once built.
#[derive(Clone)]
pub struct ToolExecutor {
    logger: Logger,
    handlers: Arc<HashMap<String, Arc<dyn ToolHandler>>>,
}

impl ToolExecutor {
    pub fn new(logger: Logger, handlers: HashMap<String, Arc<dyn ToolHandler>>) -> Self {
        Self {
            logger: logger.child("executor"),
            handlers: Arc::new(handlers),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.handlers.contains_key(canonical_tool_name(name))
    }

    /// Registered tools in catalog order.
    pub fn registered_tools(&self) -> Vec<ToolDef> {
        tool_catalog()
            .iter()
            .filter(|tool| self.handlers.contains_key(&tool.name))
            .cloned()
            .collect()
    }

    fn unknown_tool(&self, name: &str) -> ToolError {
        let mut known: Vec<String> = self.handlers.keys().cloned().collect();
        known.sort();
        let mut err = ToolError::not_found(format!("Unknown tool: {}", name));
        if known.is_empty() {
            return err.with_hint("No WIP tools are registered; configure an API key.");
        }
        let suggestions = suggest(name, &known, 3);
        if !suggestions.is_empty() {
            err = err.with_hint(format!("Did you mean: {}?", suggestions.join(", ")));
        }
        err.with_details(serde_json::json!({ "did_you_mean": suggestions }))
    }

    pub async fn execute(&self, name: &str, args: Value) -> Result<ToolOutput, ToolError> {
        let tool = canonical_tool_name(name);
        let Some(handler) = self.handlers.get(tool).cloned() else {
            return Err(self.unknown_tool(name));
        };
        validate_tool_args(tool, &args)?;

        let trace_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        self.logger.debug(
            "tool call",
            Some(&serde_json::json!({ "tool": tool, "invoked_as": name, "trace_id": trace_id })),
        );

        let result = handler.handle(tool, args).await;
        let meta = serde_json::json!({
            "tool": tool,
            "trace_id": trace_id,
            "duration_ms": started.elapsed().as_millis() as u64,
        });
        match &result {
            Ok(_) => self.logger.debug("tool call completed", Some(&meta)),
            Err(err) => self
                .logger
                .warn(&format!("tool call failed: {}", err.message), Some(&meta)),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ToolErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Echo {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ToolHandler for Echo {
        async fn handle(&self, tool: &str, args: Value) -> Result<ToolOutput, ToolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ToolOutput::json(&serde_json::json!({ "tool": tool, "args": args })))
        }
    }

    fn executor(calls: Arc<AtomicUsize>) -> ToolExecutor {
        let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        handlers.insert("wip_get_me".to_string(), Arc::new(Echo { calls }));
        ToolExecutor::new(Logger::new("test"), handlers)
    }

    #[tokio::test]
    async fn alias_dispatches_to_canonical_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let exec = executor(calls.clone());
        let out = exec.execute("get_me", Value::Null).await.unwrap();
        let parsed: Value = serde_json::from_str(out.text().unwrap()).unwrap();
        assert_eq!(parsed["tool"], "wip_get_me");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_args_never_reach_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let exec = executor(calls.clone());
        let err = exec
            .execute("wip_get_me", serde_json::json!({"extra": true}))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ToolErrorKind::InvalidParams);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_tool_suggests_close_names() {
        let exec = executor(Arc::new(AtomicUsize::new(0)));
        let err = exec.execute("wip_get_mee", Value::Null).await.unwrap_err();
        assert_eq!(err.kind, ToolErrorKind::NotFound);
        assert!(err.hint.unwrap_or_default().contains("wip_get_me"));
    }

    #[test]
    fn registered_tools_follow_handlers() {
        let exec = executor(Arc::new(AtomicUsize::new(0)));
        let names: Vec<String> = exec.registered_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["wip_get_me".to_string()]);
        assert!(exec.has_tool("get_me"));
    }
}
