pub mod service {
    pub const NAME: &str = "wip";
    pub const HOST: &str = "wip.co";
    pub const TOOL_PREFIX: &str = "wip_";
}

pub mod network {
    pub const DEFAULT_BASE_URL: &str = "https://api.wip.co/v1";
    pub const API_KEY_PARAM: &str = "api_key";
    pub const JSON_CONTENT_TYPE: &str = "application/json";
    pub const USER_AGENT: &str = concat!("wip-mcp/", env!("CARGO_PKG_VERSION"));
}

pub mod env {
    pub const API_KEY: &str = "WIP_API_KEY";
    pub const BASE_URL: &str = "WIP_BASE_URL";
    pub const CONFIG_PATH: &str = "WIP_CONFIG";
    pub const LOG_LEVEL: &str = "WIP_LOG_LEVEL";
    pub const LOG_LEVEL_FALLBACK: &str = "LOG_LEVEL";
}

pub mod protocols {
    pub const ALLOWED_HTTP: &[&str] = &["http:", "https:"];
}
