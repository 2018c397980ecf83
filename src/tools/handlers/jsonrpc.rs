// JSON-RPC backend: single-shot JSON-RPC 2.0 call over HTTP POST

use serde_json::{json, Value};
use tracing::debug;

use crate::tools::error::ToolError;
use crate::tools::implementations::ExecContext;
use crate::tools::types::JsonMap;

pub async fn execute(
    http: &reqwest::Client,
    url: &str,
    method: &str,
    args: &JsonMap,
    ctx: &mut ExecContext<'_>,
) -> Result<String, ToolError> {
    let payload = json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": args,
        "id": 1,
    });
    debug!("Executing JSON-RPC call to {} with method {}", url, method);

    let response = http
        .post(url)
        .json(&payload)
        .send()
        .await
        .map_err(|e| ToolError::execution(format!("JSON-RPC request failed: {}", e)))?;
    let body: Value = response
        .json()
        .await
        .map_err(|e| ToolError::execution(format!("invalid JSON-RPC response: {}", e)))?;

    // An error member short-circuits as the result content.
    if let Some(error) = body.get("error") {
        ctx.stats.tool_errors += 1;
        return Ok(error.to_string());
    }

    serde_json::to_string(body.get("result").unwrap_or(&Value::Null))
        .map_err(|e| ToolError::execution(format!("unserializable JSON-RPC result: {}", e)))
}
