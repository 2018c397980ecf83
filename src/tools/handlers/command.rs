// Command backend: shell command templates from the external config
//
// The template's `{param}` placeholders are substituted with the normalized
// arguments; an unresolved placeholder is an execution error. Output is
// returned as a structured report so the model can react to failures.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::config::COMMAND_TIMEOUT_SECS;
use crate::tools::error::ToolError;
use crate::tools::implementations::ExecContext;
use crate::tools::shell;
use crate::tools::types::{BackendConfig, JsonMap, ToolConfig};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[A-Za-z_][A-Za-z0-9_]*\}").expect("placeholder regex"));

/// Substitute `{param}` placeholders with argument values.
pub fn render_template(template: &str, args: &JsonMap) -> Result<String, ToolError> {
    let mut rendered = template.to_string();
    for (key, value) in args {
        let placeholder = format!("{{{}}}", key);
        if rendered.contains(&placeholder) {
            rendered = rendered.replace(&placeholder, &value_to_string(value));
        }
    }
    if let Some(unresolved) = PLACEHOLDER.find(&rendered) {
        return Err(ToolError::execution(format!(
            "missing argument for placeholder {}",
            unresolved.as_str()
        )));
    }
    Ok(rendered)
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub async fn execute(
    tool_name: &str,
    config: &ToolConfig,
    args: &JsonMap,
    ctx: &mut ExecContext<'_>,
) -> Result<String, ToolError> {
    let BackendConfig::Command { command, .. } = &config.backend else {
        return Err(ToolError::execution(format!(
            "'{}' is not a command tool",
            tool_name
        )));
    };

    let rendered = render_template(command, args)?;
    debug!("Executing command: {}", rendered);

    let timeout = Duration::from_secs(config.timeout.unwrap_or(COMMAND_TIMEOUT_SECS));
    let output = shell::run_shell(&rendered, timeout).await?;

    // A non-zero exit is returned as content, not raised, so the model can
    // see what happened. It still counts as a tool error.
    if output.exit_code != 0 {
        ctx.stats.tool_errors += 1;
    }

    let mut lines = Vec::new();
    if !output.stdout.trim().is_empty() {
        lines.push("--- STDOUT ---".to_string());
        lines.push(output.stdout.trim_end().to_string());
    }
    if !output.stderr.trim().is_empty() {
        lines.push("--- STDERR ---".to_string());
        lines.push(output.stderr.trim_end().to_string());
    }
    lines.push(format!("--- EXIT CODE: {} ---", output.exit_code));
    Ok(lines.join("\n"))
}
