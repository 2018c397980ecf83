// pwd - current working directory

use async_trait::async_trait;

use crate::tools::error::ToolError;
use crate::tools::implementations::{ExecContext, InternalTool};
use crate::tools::types::{JsonMap, ParameterSchema, ToolConfig};

pub struct PwdTool;

#[async_trait]
impl InternalTool for PwdTool {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn config(&self) -> ToolConfig {
        ToolConfig {
            description: "Returns the current working directory.".to_string(),
            parameters: ParameterSchema::default(),
            auto_approved: true,
            ..ToolConfig::default()
        }
    }

    async fn execute(&self, _args: &JsonMap, ctx: &mut ExecContext<'_>) -> Result<String, ToolError> {
        match std::env::current_dir() {
            Ok(dir) => Ok(dir.display().to_string()),
            Err(e) => {
                ctx.stats.tool_errors += 1;
                Ok(format!("Error getting current directory: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::implementations::test_support::{args, ContextFixture};
    use serde_json::json;

    #[tokio::test]
    async fn test_returns_a_directory() {
        let mut fixture = ContextFixture::new();
        let result = PwdTool.execute(&args(json!({})), &mut fixture.ctx()).await.unwrap();
        assert!(!result.is_empty());
        assert!(std::path::Path::new(&result).is_absolute());
    }
}
