// Display formatting for approval prompts
//
// Hiding and truncation here affect what the operator sees, never what
// actually executes.

use serde_json::Value;

use crate::tools::types::{JsonMap, ToolConfig};

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";

/// Colorize unified-diff lines: additions green, removals red, hunk headers
/// yellow.
pub fn colorize_diff_lines(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.starts_with('+') && !line.starts_with("+++") && !line.is_empty() {
                format!("{}{}{}", GREEN, line, RESET)
            } else if line.starts_with('-') && !line.starts_with("---") && !line.is_empty() {
                format!("{}{}{}", RED, line, RESET)
            } else if line.starts_with("@@") {
                format!("{}{}{}", YELLOW, line, RESET)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Truncate a long string for display.
pub fn truncate_for_display(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let cut: String = value.chars().take(limit).collect();
    format!("{}... [truncated]", cut)
}

/// Render one argument value for the prompt.
fn display_value(value: &Value, limit: usize) -> String {
    match value {
        Value::String(s) => truncate_for_display(s, limit),
        other => truncate_for_display(&other.to_string(), limit),
    }
}

/// Build the human-readable approval prompt for a tool call, respecting
/// `hidden_parameters` and `hide_arguments`.
pub fn format_tool_prompt(
    tool_name: &str,
    args: &JsonMap,
    config: &ToolConfig,
    truncation_limit: usize,
) -> String {
    let mut lines = vec![format!("└─ AI wants to call: {}", tool_name)];

    if !config.hide_arguments {
        for (key, value) in args {
            let rendered = if config.hidden_parameters.iter().any(|p| p == key) {
                "[HIDDEN]".to_string()
            } else {
                display_value(value, truncation_limit)
            };
            lines.push(format!("   - {}: {}", key, rendered));
        }
    }

    lines.join("\n")
}
