use crate::app::App;
use crate::config::WipConfig;
use crate::constants::service;
use crate::errors::{ErrorCode, McpError, ToolError};
use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse, ToolCallParams};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

const PROTOCOL_VERSION: &str = "2025-06-18";
const SERVER_NAME: &str = service::NAME;
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Newline-delimited JSON-RPC 2.0 front end for the tool registry.
pub struct McpServer {
    app: Arc<App>,
}

impl McpServer {
    pub fn new(app: App) -> Self {
        Self { app: Arc::new(app) }
    }

    pub fn from_config(config: &WipConfig) -> Result<Self, ToolError> {
        Ok(Self::new(App::initialize(config)?))
    }

    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {"listChanged": false}},
            "serverInfo": {"name": SERVER_NAME, "version": SERVER_VERSION},
        })
    }

    fn handle_tools_list(&self) -> Value {
        serde_json::json!({ "tools": self.app.tool_executor.registered_tools() })
    }

    async fn handle_tools_call(&self, params: Value) -> Result<Value, McpError> {
        let params: ToolCallParams = serde_json::from_value(params)
            .map_err(|_| McpError::new(ErrorCode::InvalidParams, "Invalid tools/call params"))?;
        let name = params.name.trim();
        if name.is_empty() {
            return Err(McpError::new(ErrorCode::InvalidParams, "Missing tool name"));
        }
        let output = self
            .app
            .tool_executor
            .execute(name, params.arguments)
            .await
            .map_err(|err| McpError::from(&err))?;
        Ok(output.to_value())
    }

    /// Handles one input line. `None` means nothing is written back
    /// (notifications and blank lines).
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let parsed: Value = match serde_json::from_str(trimmed) {
            Ok(value) => value,
            Err(_) => {
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    McpError::new(ErrorCode::ParseError, "Parse error"),
                ))
            }
        };
        let request: JsonRpcRequest = match serde_json::from_value(parsed) {
            Ok(req) => req,
            Err(_) => {
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    McpError::new(ErrorCode::InvalidRequest, "Invalid request"),
                ))
            }
        };

        if !request.has_valid_version() {
            return Some(JsonRpcResponse::failure(
                request.id.unwrap_or(Value::Null),
                McpError::new(
                    ErrorCode::InvalidRequest,
                    "Invalid request: jsonrpc must be \"2.0\"",
                ),
            ));
        }

        if request.is_notification() {
            if !request.method.starts_with("notifications/") {
                self.app.logger.debug(
                    "Ignoring request without id",
                    Some(&serde_json::json!({ "method": request.method })),
                );
            }
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, self.handle_initialize()),
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::success(id, self.handle_tools_list()),
            "tools/call" => match self.handle_tools_call(request.params).await {
                Ok(result) => JsonRpcResponse::success(id, result),
                Err(err) => JsonRpcResponse::failure(id, err),
            },
            _ => JsonRpcResponse::failure(
                id,
                McpError::new(ErrorCode::MethodNotFound, "Method not found"),
            ),
        };
        Some(response)
    }

    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<(), ToolError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut writer = writer;
        while let Some(line) = lines.next_line().await? {
            let Some(response) = self.handle_line(&line).await else {
                continue;
            };
            let payload = serde_json::to_string(&response)
                .map_err(|err| ToolError::internal(err.to_string()))?;
            writer.write_all(payload.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        Ok(())
    }

    pub async fn run_stdio(&self) -> Result<(), ToolError> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = BufWriter::new(tokio::io::stdout());
        self.serve(reader, writer).await
    }
}

pub async fn run_stdio(config: &WipConfig) -> Result<(), ToolError> {
    let server = McpServer::from_config(config)?;
    server.run_stdio().await
}
