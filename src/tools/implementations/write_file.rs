// write_file - writes content to a path, creating directories as needed

use std::path::Path;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tools::error::ToolError;
use crate::tools::implementations::{ExecContext, InternalTool};
use crate::tools::types::{JsonMap, ParameterSchema, ToolConfig};

pub struct WriteFileTool;

#[async_trait]
impl InternalTool for WriteFileTool {
    fn name(&self) -> &'static str {
        "write_file"
    }

    fn config(&self) -> ToolConfig {
        ToolConfig {
            description: "Writes content to a specified file path, creating directories if needed. \
                          Prefer this over edit_file for large changes or complete rewrites."
                .to_string(),
            parameters: ParameterSchema::object(
                json!({
                    "path": {
                        "type": "string",
                        "description": "The file system path where the content should be written."
                    },
                    "content": {
                        "type": "string",
                        "description": "The content to write into the file."
                    }
                }),
                &["path", "content"],
            ),
            hidden_parameters: vec!["content".to_string()],
            ..ToolConfig::default()
        }
    }

    async fn execute(&self, args: &JsonMap, ctx: &mut ExecContext<'_>) -> Result<String, ToolError> {
        let path = args
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::execution("Missing path parameter"))?;
        let content = args
            .get("content")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::execution("Missing content parameter"))?;

        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    ctx.stats.tool_errors += 1;
                    return Ok(format!(
                        "Error creating directory '{}': {}",
                        parent.display(),
                        e
                    ));
                }
            }
        }

        match std::fs::write(path, content) {
            Ok(()) => Ok(format!(
                "Successfully wrote {} bytes to '{}'.",
                content.len(),
                path
            )),
            Err(e) => {
                ctx.stats.tool_errors += 1;
                Ok(format!("Error writing file '{}': {}", path, e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::implementations::test_support::{args, ContextFixture};

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c.txt");

        let mut fixture = ContextFixture::new();
        let result = WriteFileTool
            .execute(
                &args(json!({"path": path.to_str().unwrap(), "content": "data"})),
                &mut fixture.ctx(),
            )
            .await
            .unwrap();
        assert!(result.contains("Successfully wrote 4 bytes"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "data");
    }

    #[tokio::test]
    async fn test_write_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.txt");
        std::fs::write(&path, "old").unwrap();

        let mut fixture = ContextFixture::new();
        WriteFileTool
            .execute(
                &args(json!({"path": path.to_str().unwrap(), "content": "new"})),
                &mut fixture.ctx(),
            )
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_content_is_hidden_in_prompts() {
        let config = WriteFileTool.config();
        assert!(config.hidden_parameters.contains(&"content".to_string()));
        assert!(!config.auto_approved);
    }
}
