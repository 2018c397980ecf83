// Internal backend: statically registered handlers

use serde_json::Value;
use tracing::debug;

use crate::hooks::FileTracker;
use crate::tools::error::ToolError;
use crate::tools::implementations::{self, ExecContext, InternalTool};
use crate::tools::types::{JsonMap, ToolConfig};
use crate::tools::validator;

pub async fn execute(
    tool_name: &str,
    config: &ToolConfig,
    args: &JsonMap,
    ctx: &mut ExecContext<'_>,
) -> Result<String, ToolError> {
    let Some(tool) = implementations::internal_tool(tool_name) else {
        ctx.stats.tool_errors += 1;
        return Ok(format!(
            "Error: Internal tool '{}' has no implementation.",
            tool_name
        ));
    };

    if let Err(message) = validator::validate_parameters(&config.parameters, args) {
        ctx.stats.tool_errors += 1;
        return Ok(validator::format_validation_error(
            tool_name,
            &message,
            &config.parameters,
        ));
    }

    let result = tool.execute(args, ctx).await?;

    // File-activity tracking for read/write/edit operations.
    if let Some(path) = args.get("path").and_then(Value::as_str) {
        match tool_name {
            "read_file" => {
                debug!("tracking read of {}", path);
                ctx.tracker.record_read(path);
            }
            "write_file" | "edit_file" => {
                debug!("tracking edit of {}", path);
                ctx.tracker.record_edit(path);
            }
            _ => {}
        }
    }

    Ok(result)
}
