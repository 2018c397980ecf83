// MCP stdio backend: route a call to the named server's session

use crate::tools::error::ToolError;
use crate::tools::registry::ToolRegistry;
use crate::tools::types::JsonMap;

/// Config entries that ARE the server carry no `server` field; synthetic
/// configs for discovered tools do. Either way the registry resolves or
/// lazily creates the session.
pub async fn execute(
    tool_name: &str,
    server: Option<&str>,
    args: &JsonMap,
    registry: &mut ToolRegistry,
) -> Result<String, ToolError> {
    let server_name = server.unwrap_or(tool_name);
    registry.call_server_tool(server_name, tool_name, args).await
}
