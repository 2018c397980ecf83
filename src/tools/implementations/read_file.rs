// read_file - reads file contents from the filesystem

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tools::error::ToolError;
use crate::tools::implementations::{ExecContext, InternalTool};
use crate::tools::types::{JsonMap, ParameterSchema, ToolConfig};

pub struct ReadFileTool;

#[async_trait]
impl InternalTool for ReadFileTool {
    fn name(&self) -> &'static str {
        "read_file"
    }

    fn config(&self) -> ToolConfig {
        ToolConfig {
            description: "Reads the content from a specified file path.".to_string(),
            parameters: ParameterSchema::object(
                json!({
                    "path": {
                        "type": "string",
                        "description": "The file system path to read from."
                    }
                }),
                &["path"],
            )
            .strict(),
            auto_approved: true,
            hide_results: true,
            ..ToolConfig::default()
        }
    }

    async fn execute(&self, args: &JsonMap, ctx: &mut ExecContext<'_>) -> Result<String, ToolError> {
        let path = args
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::execution("Missing path parameter"))?;

        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                ctx.stats.tool_errors += 1;
                Ok(format!("Error: File not found at '{}'.", path))
            }
            Err(e) => {
                ctx.stats.tool_errors += 1;
                Ok(format!("Error reading file '{}': {}", path, e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::implementations::test_support::{args, ContextFixture};

    #[tokio::test]
    async fn test_read_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        std::fs::write(&path, "hello from disk").unwrap();

        let mut fixture = ContextFixture::new();
        let result = ReadFileTool
            .execute(&args(json!({"path": path.to_str().unwrap()})), &mut fixture.ctx())
            .await
            .unwrap();
        assert_eq!(result, "hello from disk");
        assert_eq!(fixture.stats.tool_errors, 0);
    }

    #[tokio::test]
    async fn test_read_missing_file_reports_and_counts_error() {
        let mut fixture = ContextFixture::new();
        let result = ReadFileTool
            .execute(&args(json!({"path": "/nonexistent/file.txt"})), &mut fixture.ctx())
            .await
            .unwrap();
        assert!(result.contains("File not found"));
        assert_eq!(fixture.stats.tool_errors, 1);
    }
}
