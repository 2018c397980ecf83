// list_directory - recursive directory listing, capped

use async_trait::async_trait;
use serde_json::{json, Value};
use walkdir::WalkDir;

use crate::tools::error::ToolError;
use crate::tools::implementations::{ExecContext, InternalTool};
use crate::tools::types::{JsonMap, ParameterSchema, ToolConfig};

const FILE_LIMIT: usize = 2000;

pub struct ListDirectoryTool;

#[async_trait]
impl InternalTool for ListDirectoryTool {
    fn name(&self) -> &'static str {
        "list_directory"
    }

    fn config(&self) -> ToolConfig {
        ToolConfig {
            description: format!(
                "Lists the contents of a specified directory recursively (limited to {} entries).",
                FILE_LIMIT
            ),
            parameters: ParameterSchema::object(
                json!({
                    "path": {
                        "type": "string",
                        "description": "The path to the directory."
                    }
                }),
                &["path"],
            )
            .strict(),
            auto_approved: true,
            ..ToolConfig::default()
        }
    }

    async fn execute(&self, args: &JsonMap, ctx: &mut ExecContext<'_>) -> Result<String, ToolError> {
        let path = args
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::execution("Missing path parameter"))?;

        if !std::path::Path::new(path).is_dir() {
            ctx.stats.tool_errors += 1;
            return Ok(format!("Error: '{}' is not a directory.", path));
        }

        let mut entries = Vec::new();
        let mut truncated = false;
        for entry in WalkDir::new(path).min_depth(1).into_iter().filter_map(|e| e.ok()) {
            if entries.len() >= FILE_LIMIT {
                truncated = true;
                break;
            }
            let mut line = entry.path().display().to_string();
            if entry.file_type().is_dir() {
                line.push('/');
            }
            entries.push(line);
        }
        entries.sort();

        let mut output = entries.join("\n");
        if truncated {
            output.push_str(&format!("\n[Listing truncated at {} entries]", FILE_LIMIT));
        }
        if output.is_empty() {
            output = format!("Directory '{}' is empty.", path);
        }
        Ok(output)
    }
}
