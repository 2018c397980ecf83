// Backend dispatch
//
// One module per tool type; the executor matches on the config's backend
// variant and routes here. Only `ToolError` crosses back out.

pub mod command;
pub mod internal;
pub mod jsonrpc;
pub mod mcp_stdio;

use crate::tools::error::ToolError;
use crate::tools::implementations::ExecContext;
use crate::tools::registry::ToolRegistry;
use crate::tools::types::{BackendConfig, JsonMap, ToolConfig};

pub async fn dispatch(
    tool_name: &str,
    config: &ToolConfig,
    args: &JsonMap,
    ctx: &mut ExecContext<'_>,
    registry: &mut ToolRegistry,
    http: &reqwest::Client,
) -> Result<String, ToolError> {
    match &config.backend {
        BackendConfig::Internal => internal::execute(tool_name, config, args, ctx).await,
        BackendConfig::Command { .. } => command::execute(tool_name, config, args, ctx).await,
        BackendConfig::Jsonrpc { url, method } => {
            jsonrpc::execute(http, url, method, args, ctx).await
        }
        BackendConfig::McpStdio { server, .. } => {
            mcp_stdio::execute(tool_name, server.as_deref(), args, registry).await
        }
    }
}
