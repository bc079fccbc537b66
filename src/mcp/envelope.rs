use crate::services::wip_client::ApiPayload;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

/// Uniform success shape handed back to the host: one text block holding the
/// pretty-printed JSON of the remote response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub content: Vec<ContentBlock>,
}

impl ToolOutput {
    pub fn json(value: &Value) -> Self {
        let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        Self {
            content: vec![ContentBlock::Text { text }],
        }
    }

    pub fn from_payload(payload: ApiPayload) -> Self {
        Self::json(&payload.into_value())
    }

    /// Text of the first block, if any.
    pub fn text(&self) -> Option<&str> {
        self.content.first().map(|block| match block {
            ContentBlock::Text { text } => text.as_str(),
        })
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({ "content": [] }))
    }
}
