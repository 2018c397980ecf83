// edit_file - replaces text in a file by exact match
//
// The old string must identify exactly one location. An empty old string
// creates a new file.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tools::error::ToolError;
use crate::tools::implementations::{ExecContext, InternalTool};
use crate::tools::types::{JsonMap, ParameterSchema, ToolConfig};

pub struct EditFileTool;

#[async_trait]
impl InternalTool for EditFileTool {
    fn name(&self) -> &'static str {
        "edit_file"
    }

    fn config(&self) -> ToolConfig {
        ToolConfig {
            description: "Edits a file by replacing old_string with new_string. The old_string \
                          must match the current file content exactly once, including whitespace; \
                          include enough surrounding context to make it unique. An empty \
                          old_string creates a new file."
                .to_string(),
            parameters: ParameterSchema::object(
                json!({
                    "path": {
                        "type": "string",
                        "description": "The file system path to edit."
                    },
                    "old_string": {
                        "type": "string",
                        "description": "Exact text to replace (empty to create a new file)."
                    },
                    "new_string": {
                        "type": "string",
                        "description": "Replacement text."
                    }
                }),
                &["path", "old_string", "new_string"],
            ),
            hidden_parameters: vec!["old_string".to_string(), "new_string".to_string()],
            ..ToolConfig::default()
        }
    }

    async fn execute(&self, args: &JsonMap, ctx: &mut ExecContext<'_>) -> Result<String, ToolError> {
        let path = args
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::execution("Missing path parameter"))?;
        let old_string = args
            .get("old_string")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::execution("Missing old_string parameter"))?;
        let new_string = args
            .get("new_string")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::execution("Missing new_string parameter"))?;

        if old_string.is_empty() {
            if std::path::Path::new(path).exists() {
                ctx.stats.tool_errors += 1;
                return Ok(format!(
                    "Error: File '{}' already exists. Use a non-empty old_string to edit it, or write_file to replace it.",
                    path
                ));
            }
            return match std::fs::write(path, new_string) {
                Ok(()) => Ok(format!("Successfully created '{}'.", path)),
                Err(e) => {
                    ctx.stats.tool_errors += 1;
                    Ok(format!("Error creating file '{}': {}", path, e))
                }
            };
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                ctx.stats.tool_errors += 1;
                return Ok(format!("Error reading file '{}': {}", path, e));
            }
        };

        let matches = contents.matches(old_string).count();
        if matches == 0 {
            ctx.stats.tool_errors += 1;
            return Ok(format!(
                "Error: old_string not found in '{}'. Read the file first and copy the text exactly, including whitespace.",
                path
            ));
        }
        if matches > 1 {
            ctx.stats.tool_errors += 1;
            return Ok(format!(
                "Error: old_string matches {} locations in '{}'. Include more surrounding context to identify a single one.",
                matches, path
            ));
        }

        let updated = contents.replacen(old_string, new_string, 1);
        match std::fs::write(path, updated) {
            Ok(()) => Ok(format!("Successfully edited '{}'.", path)),
            Err(e) => {
                ctx.stats.tool_errors += 1;
                Ok(format!("Error writing file '{}': {}", path, e))
            }
        }
    }
}
