use crate::errors::ToolError;
use crate::utils::suggest::suggest;
use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Name, description and parameter schema of one operation, as listed to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

static TOOL_CATALOG: Lazy<Vec<ToolDef>> = Lazy::new(|| {
    let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tool_catalog.json"));
    serde_json::from_str(raw).expect("tool_catalog.json must be valid JSON")
});

static TOOL_MAP: Lazy<HashMap<String, ToolDef>> = Lazy::new(|| {
    TOOL_CATALOG
        .iter()
        .cloned()
        .map(|tool| (tool.name.clone(), tool))
        .collect()
});

static TOOL_VALIDATORS: Lazy<HashMap<String, JSONSchema>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for tool in TOOL_CATALOG.iter() {
        if let Ok(schema) = JSONSchema::compile(&tool.input_schema) {
            map.insert(tool.name.clone(), schema);
        }
    }
    map
});

pub fn tool_catalog() -> &'static Vec<ToolDef> {
    &TOOL_CATALOG
}

pub fn tool_by_name(name: &str) -> Option<&'static ToolDef> {
    TOOL_MAP.get(name)
}

pub fn tool_names() -> Vec<String> {
    TOOL_CATALOG.iter().map(|tool| tool.name.clone()).collect()
}

/// Checks `args` against the declared schema. A `null` argument object is
/// treated as `{}` since hosts omit `arguments` for parameterless tools.
pub fn validate_tool_args(tool_name: &str, args: &Value) -> Result<(), ToolError> {
    let Some(tool) = tool_by_name(tool_name) else {
        return Ok(());
    };
    let Some(schema) = TOOL_VALIDATORS.get(tool_name) else {
        return Ok(());
    };
    let empty = Value::Object(Default::default());
    let args = if args.is_null() { &empty } else { args };
    if let Err(errors) = schema.validate(args) {
        let lines: Vec<String> = errors.take(10).map(|err| describe_error(&err, &tool.input_schema)).collect();
        let mut message = vec![format!("Invalid arguments for {}", tool_name)];
        message.extend(lines.iter().map(|line| format!("- {}", line)));
        return Err(ToolError::invalid_params(message.join("\n"))
            .with_details(serde_json::json!({ "tool": tool_name, "errors": lines })));
    }
    Ok(())
}

fn describe_error(err: &jsonschema::ValidationError<'_>, schema: &Value) -> String {
    let path = err.instance_path.to_string();
    let at = if path.is_empty() { "(root)".to_string() } else { path };
    match &err.kind {
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            let known: Vec<String> = schema
                .get("properties")
                .and_then(|v| v.as_object())
                .map(|props| props.keys().cloned().collect())
                .unwrap_or_default();
            unexpected
                .iter()
                .map(|field| {
                    let hints = suggest(field, &known, 2);
                    if hints.is_empty() {
                        format!("{}: unknown field '{}'", at, field)
                    } else {
                        format!(
                            "{}: unknown field '{}' (did you mean {}?)",
                            at,
                            field,
                            hints.join(", ")
                        )
                    }
                })
                .collect::<Vec<_>>()
                .join("; ")
        }
        ValidationErrorKind::Required { property } => {
            let prop = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            format!("{}: missing required field '{}'", at, prop)
        }
        ValidationErrorKind::Type { kind } => format!("{}: expected {}", at, type_name(kind)),
        _ => format!("{}: {}", at, err),
    }
}

fn type_name(kind: &TypeKind) -> String {
    match kind {
        TypeKind::Single(primitive) => primitive.to_string(),
        TypeKind::Multiple(types) => {
            let list: Vec<String> = (*types).into_iter().map(|t| t.to_string()).collect();
            if list.is_empty() {
                "unknown".to_string()
            } else {
                list.join(" | ")
            }
        }
    }
}
