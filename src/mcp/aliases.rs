use crate::constants::service::TOOL_PREFIX;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Short names accepted in `tools/call`. Listed tools always use the prefixed form.
pub const BUILTIN_TOOL_ALIASES: &[(&str, &str)] = &[
    ("get_me", "wip_get_me"),
    ("get_my_todos", "wip_get_my_todos"),
    ("get_my_projects", "wip_get_my_projects"),
    ("create_todo", "wip_create_todo"),
    ("get_todo", "wip_get_todo"),
    ("get_todo_comments", "wip_get_todo_comments"),
    ("get_user", "wip_get_user"),
    ("get_user_todos", "wip_get_user_todos"),
    ("get_user_projects", "wip_get_user_projects"),
    ("get_project", "wip_get_project"),
    ("get_project_todos", "wip_get_project_todos"),
    ("create_reaction", "wip_create_reaction"),
    ("delete_reaction", "wip_delete_reaction"),
    ("create_comment", "wip_create_comment"),
    ("update_comment", "wip_update_comment"),
    ("delete_comment", "wip_delete_comment"),
];

static BUILTIN_TOOL_ALIAS_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| BUILTIN_TOOL_ALIASES.iter().copied().collect());

pub fn canonical_tool_name(tool: &str) -> &str {
    let trimmed = tool.trim();
    BUILTIN_TOOL_ALIAS_MAP
        .get(trimmed)
        .copied()
        .unwrap_or(trimmed)
}

pub fn is_prefixed(tool: &str) -> bool {
    tool.starts_with(TOOL_PREFIX)
}
