use clap::Parser;
use std::path::PathBuf;
use wip_mcp::config::WipConfig;
use wip_mcp::constants::env;
use wip_mcp::errors::ToolError;

/// MCP stdio server exposing the WIP (wip.co) API as tools.
#[derive(Debug, Parser)]
#[command(name = "wip-mcp", version, about)]
struct Cli {
    /// WIP API key; without one no tools are registered.
    #[arg(long, env = env::API_KEY, hide_env_values = true)]
    api_key: Option<String>,

    /// Override for the API base, e.g. a local stub.
    #[arg(long, env = env::BASE_URL)]
    base_url: Option<String>,

    /// JSON file with `apiKey` / `baseUrl`. Flags take precedence.
    #[arg(long, env = env::CONFIG_PATH)]
    config: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<WipConfig, ToolError> {
        let base = match &self.config {
            Some(path) => WipConfig::from_json_file(path)?,
            None => WipConfig::default(),
        };
        Ok(base.overlay(WipConfig {
            api_key: self.api_key,
            base_url: self.base_url,
        }))
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let result = match cli.into_config() {
        Ok(config) => wip_mcp::mcp::server::run_stdio(&config).await,
        Err(err) => Err(err),
    };
    if let Err(err) = result {
        eprintln!("wip-mcp: {}", err);
        std::process::exit(1);
    }
}
