// grep - substring search across files, capped

use async_trait::async_trait;
use serde_json::{json, Value};
use walkdir::WalkDir;

use crate::tools::error::ToolError;
use crate::tools::implementations::{ExecContext, InternalTool};
use crate::tools::types::{JsonMap, ParameterSchema, ToolConfig};

const LINE_LIMIT: usize = 2000;

pub struct GrepTool;

#[async_trait]
impl InternalTool for GrepTool {
    fn name(&self) -> &'static str {
        "grep"
    }

    fn config(&self) -> ToolConfig {
        ToolConfig {
            description: format!(
                "Search text in files. Path defaults to the current directory. Returns max {} lines.",
                LINE_LIMIT
            ),
            parameters: ParameterSchema::object(
                json!({
                    "text": {
                        "type": "string",
                        "description": "Text to search for."
                    },
                    "path": {
                        "type": "string",
                        "description": "Directory path to search in (optional, defaults to current directory)."
                    }
                }),
                &["text"],
            )
            .strict(),
            auto_approved: true,
            ..ToolConfig::default()
        }
    }

    async fn execute(&self, args: &JsonMap, _ctx: &mut ExecContext<'_>) -> Result<String, ToolError> {
        let text = args
            .get("text")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::execution("Missing text parameter"))?;
        let path = args.get("path").and_then(Value::as_str).unwrap_or(".");

        let mut lines = Vec::new();
        let mut truncated = false;
        'files: for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            // Binary files fail UTF-8 decoding and are skipped.
            let Ok(contents) = std::fs::read_to_string(entry.path()) else {
                continue;
            };
            for (number, line) in contents.lines().enumerate() {
                if line.contains(text) {
                    if lines.len() >= LINE_LIMIT {
                        truncated = true;
                        break 'files;
                    }
                    lines.push(format!("{}:{}:{}", entry.path().display(), number + 1, line));
                }
            }
        }

        if lines.is_empty() {
            return Ok(format!("No matches found for '{}' in '{}'.", text, path));
        }
        let mut output = lines.join("\n");
        if truncated {
            output.push_str(&format!("\n[Results truncated at {} lines]", LINE_LIMIT));
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::implementations::test_support::{args, ContextFixture};

    #[tokio::test]
    async fn test_finds_matching_lines_with_locations() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "alpha\nneedle here\nomega\n").unwrap();
        std::fs::write(dir.path().join("b.txt"), "nothing\n").unwrap();

        let mut fixture = ContextFixture::new();
        let result = GrepTool
            .execute(
                &args(json!({"text": "needle", "path": dir.path().to_str().unwrap()})),
                &mut fixture.ctx(),
            )
            .await
            .unwrap();
        assert!(result.contains("a.txt:2:needle here"));
        assert!(!result.contains("b.txt"));
    }

    #[tokio::test]
    async fn test_no_matches_message() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "alpha\n").unwrap();

        let mut fixture = ContextFixture::new();
        let result = GrepTool
            .execute(
                &args(json!({"text": "absent", "path": dir.path().to_str().unwrap()})),
                &mut fixture.ctx(),
            )
            .await
            .unwrap();
        assert!(result.contains("No matches found"));
    }
}
