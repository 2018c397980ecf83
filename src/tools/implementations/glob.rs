// glob - file name matching with ** support, capped

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tools::error::ToolError;
use crate::tools::implementations::{ExecContext, InternalTool};
use crate::tools::types::{JsonMap, ParameterSchema, ToolConfig};

const FILE_LIMIT: usize = 2000;

pub struct GlobTool;

#[async_trait]
impl InternalTool for GlobTool {
    fn name(&self) -> &'static str {
        "glob"
    }

    fn config(&self) -> ToolConfig {
        ToolConfig {
            description: format!(
                "Find files matching a pattern. Supports ** for recursive matching. Returns max {} files.",
                FILE_LIMIT
            ),
            parameters: ParameterSchema::object(
                json!({
                    "pattern": {
                        "type": "string",
                        "description": "Pattern to search for (e.g. '*.rs', 'src/**/*.rs')."
                    }
                }),
                &["pattern"],
            )
            .strict(),
            auto_approved: true,
            ..ToolConfig::default()
        }
    }

    async fn execute(&self, args: &JsonMap, ctx: &mut ExecContext<'_>) -> Result<String, ToolError> {
        let pattern = args
            .get("pattern")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::execution("Missing pattern parameter"))?;

        let paths = match glob::glob(pattern) {
            Ok(paths) => paths,
            Err(e) => {
                ctx.stats.tool_errors += 1;
                return Ok(format!("Error: Invalid glob pattern '{}': {}", pattern, e));
            }
        };

        let mut files: Vec<String> = paths
            .filter_map(|entry| entry.ok())
            .take(FILE_LIMIT + 1)
            .map(|path| path.display().to_string())
            .collect();
        let truncated = files.len() > FILE_LIMIT;
        files.truncate(FILE_LIMIT);
        files.sort();

        if files.is_empty() {
            return Ok(format!("No files matching '{}'.", pattern));
        }
        let mut output = files.join("\n");
        if truncated {
            output.push_str(&format!("\n[Results truncated at {} files]", FILE_LIMIT));
        }
        Ok(output)
    }
}
