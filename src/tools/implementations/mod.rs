// Built-in tool implementations
//
// Statically registered handlers; the registry derives its internal catalog
// from this table at startup.

pub mod edit_file;
pub mod glob;
pub mod grep;
pub mod list_directory;
pub mod pwd;
pub mod read_file;
pub mod run_shell_command;
pub mod write_file;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::config::Settings;
use crate::hooks::FileTracker;
use crate::stats::Stats;
use crate::tools::error::ToolError;
use crate::tools::types::{JsonMap, ToolConfig};

/// Context threaded into every internal tool invocation.
pub struct ExecContext<'a> {
    pub stats: &'a mut Stats,
    pub tracker: &'a mut dyn FileTracker,
    pub settings: &'a Settings,
    /// 1-based position of this call within its batch. Injected for
    /// `run_shell_command`; not part of any public schema.
    pub tool_index: usize,
    pub total_tools: usize,
}

#[async_trait]
pub trait InternalTool: Send + Sync {
    fn name(&self) -> &'static str;
    /// Registry entry for this tool: schema, approval flags, description.
    fn config(&self) -> ToolConfig;
    async fn execute(&self, args: &JsonMap, ctx: &mut ExecContext<'_>) -> Result<String, ToolError>;
}

static INTERNAL_TOOLS: Lazy<HashMap<&'static str, Arc<dyn InternalTool>>> = Lazy::new(|| {
    let tools: Vec<Arc<dyn InternalTool>> = vec![
        Arc::new(read_file::ReadFileTool),
        Arc::new(write_file::WriteFileTool),
        Arc::new(edit_file::EditFileTool),
        Arc::new(list_directory::ListDirectoryTool),
        Arc::new(run_shell_command::RunShellCommandTool),
        Arc::new(grep::GrepTool),
        Arc::new(glob::GlobTool),
        Arc::new(pwd::PwdTool),
    ];
    tools.into_iter().map(|tool| (tool.name(), tool)).collect()
});

pub fn internal_tool(name: &str) -> Option<Arc<dyn InternalTool>> {
    INTERNAL_TOOLS.get(name).cloned()
}

pub fn internal_tools() -> impl Iterator<Item = &'static Arc<dyn InternalTool>> {
    INTERNAL_TOOLS.values()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::hooks::NoopTracker;

    /// Owns everything an ExecContext borrows, for unit tests.
    pub struct ContextFixture {
        pub stats: Stats,
        pub tracker: NoopTracker,
        pub settings: Settings,
    }

    impl ContextFixture {
        pub fn new() -> Self {
            Self {
                stats: Stats::new(),
                tracker: NoopTracker,
                settings: Settings::default(),
            }
        }

        pub fn ctx(&mut self) -> ExecContext<'_> {
            ExecContext {
                stats: &mut self.stats,
                tracker: &mut self.tracker,
                settings: &self.settings,
                tool_index: 1,
                total_tools: 1,
            }
        }
    }

    pub fn args(value: serde_json::Value) -> JsonMap {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_contains_all_builtins() {
        for name in [
            "read_file",
            "write_file",
            "edit_file",
            "list_directory",
            "run_shell_command",
            "grep",
            "glob",
            "pwd",
        ] {
            assert!(internal_tool(name).is_some(), "missing handler for {}", name);
        }
        assert!(internal_tool("nonexistent").is_none());
    }

    #[test]
    fn test_names_match_table_keys() {
        for tool in internal_tools() {
            assert!(!tool.name().is_empty());
            assert!(internal_tool(tool.name()).is_some());
        }
    }
}
