// run_shell_command - executes a shell command with a hard timeout
//
// Timeout and process-group cleanup live in the shared shell runner; this
// tool owns the argument handling and the report format.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::tools::error::ToolError;
use crate::tools::implementations::{ExecContext, InternalTool};
use crate::tools::shell;
use crate::tools::types::{JsonMap, ParameterSchema, ToolConfig};

pub struct RunShellCommandTool;

#[async_trait]
impl InternalTool for RunShellCommandTool {
    fn name(&self) -> &'static str {
        "run_shell_command"
    }

    fn config(&self) -> ToolConfig {
        ToolConfig {
            description: "Executes a shell command and returns its output.".to_string(),
            parameters: ParameterSchema::object(
                json!({
                    "command": {
                        "type": "string",
                        "description": "The shell command to execute."
                    },
                    "reason": {
                        "type": "string",
                        "description": "Optional reason for running the command."
                    },
                    "timeout": {
                        "type": "integer",
                        "description": "Timeout in seconds (default: 30). Set a higher value for long-running commands.",
                        "minimum": 1
                    }
                }),
                &["command"],
            ),
            hide_arguments: true,
            ..ToolConfig::default()
        }
    }

    async fn execute(&self, args: &JsonMap, ctx: &mut ExecContext<'_>) -> Result<String, ToolError> {
        let command = args
            .get("command")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::execution("Missing command parameter"))?;
        let reason = args.get("reason").and_then(Value::as_str);
        let timeout_secs = args
            .get("timeout")
            .and_then(Value::as_u64)
            .unwrap_or(ctx.settings.shell_timeout_secs);

        debug!(
            tool_index = ctx.tool_index,
            total_tools = ctx.total_tools,
            timeout_secs,
            "running shell command"
        );

        match shell::run_shell(command, Duration::from_secs(timeout_secs)).await {
            Ok(output) => {
                let mut report = format!("Command: {}\n", command);
                if let Some(reason) = reason {
                    report.push_str(&format!("Reason: {}\n", reason));
                }
                report.push_str(&format!("Return code: {}\n", output.exit_code));
                if !output.stdout.is_empty() {
                    report.push_str(&format!("Stdout:\n{}\n", output.stdout));
                }
                if !output.stderr.is_empty() {
                    report.push_str(&format!("Stderr:\n{}\n", output.stderr));
                }
                Ok(report)
            }
            Err(ToolError::Timeout { seconds, .. }) => {
                ctx.stats.tool_errors += 1;
                Ok(format!(
                    "Error: Command '{}' timed out after {} seconds.\nTo retry with a longer timeout, use: run_shell_command(command=\"{}\", timeout={})",
                    command,
                    seconds,
                    command,
                    seconds.saturating_mul(2)
                ))
            }
            Err(e) => {
                ctx.stats.tool_errors += 1;
                Ok(format!("Error executing command '{}': {}", command, e))
            }
        }
    }
}
