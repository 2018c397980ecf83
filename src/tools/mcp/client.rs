// MCP stdio client
//
// Owns one subprocess per server name and speaks newline-delimited JSON-RPC
// 2.0 over its stdin/stdout: `initialize`, `notifications/initialized`
// (no response), `tools/list`, `tools/call`.

use std::collections::HashMap;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, warn};

use crate::config::APP_NAME;
use crate::tools::error::ToolError;
use crate::tools::types::JsonMap;

const PROTOCOL_VERSION: &str = "2025-06-18";

/// Bound on waiting for a single response line.
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// One tool advertised by a server's `tools/list`.
#[derive(Debug, Clone)]
pub struct McpToolInfo {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

#[derive(Debug)]
struct Transport {
    child: Child,
    stdin: ChildStdin,
    lines: Lines<BufReader<ChildStdout>>,
}

impl Transport {
    async fn send(&mut self, message: &Value) -> Result<()> {
        let mut line = serde_json::to_string(message)?;
        line.push('\n');
        self.stdin
            .write_all(line.as_bytes())
            .await
            .context("failed to write to MCP server stdin")?;
        self.stdin.flush().await.context("failed to flush MCP server stdin")?;
        Ok(())
    }

    /// Fire-and-forget notification (no `id`, no response expected).
    async fn notify(&mut self, message: &Value) -> Result<()> {
        self.send(message).await
    }

    /// Send a request and wait for the matching response line.
    /// Server-initiated notifications in between are skipped.
    async fn request(&mut self, message: &Value) -> Result<Value> {
        self.send(message).await?;
        loop {
            let line = tokio::time::timeout(READ_TIMEOUT, self.lines.next_line())
                .await
                .context("timed out waiting for MCP server response")?
                .context("failed to read from MCP server stdout")?
                .context("MCP server closed its stdout")?;
            if line.trim().is_empty() {
                continue;
            }
            let parsed: Value =
                serde_json::from_str(&line).context("invalid JSON from MCP server")?;
            if parsed.get("id").is_some() {
                return Ok(parsed);
            }
            debug!("Skipping MCP notification: {}", line);
        }
    }

    /// Graceful terminate: close stdin, signal, wait out the grace period,
    /// then force-kill.
    async fn shutdown(mut self, grace: Duration) {
        drop(self.stdin);
        #[cfg(unix)]
        if let Some(pid) = self.child.id() {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;
            let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
        }
        if tokio::time::timeout(grace, self.child.wait()).await.is_err() {
            warn!("MCP server did not exit within grace period, killing");
            let _ = self.child.kill().await;
        }
    }
}

/// A live MCP server session: process handle plus discovered tool catalog.
///
/// Created lazily on first reference and shared by every subsequent call to
/// the same server name; torn down only at registry shutdown. In MCP test
/// mode the session has no transport and an empty catalog.
#[derive(Debug)]
pub struct McpSession {
    name: String,
    transport: Option<Transport>,
    tools: HashMap<String, McpToolInfo>,
}

impl McpSession {
    /// Spawn the server and run the handshake. On any handshake failure the
    /// child is terminated (1s grace, then kill) before the error surfaces -
    /// the process is never left running.
    pub async fn connect(name: &str, command_line: &str) -> Result<Self> {
        let argv = shell_words::split(command_line)
            .with_context(|| format!("invalid MCP server command for '{}'", name))?;
        let (program, args) = argv
            .split_first()
            .with_context(|| format!("empty MCP server command for '{}'", name))?;

        debug!("Launching MCP server '{}': {}", name, command_line);
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn MCP server '{}'", name))?;

        let stdin = child.stdin.take().expect("stdin was piped");
        let stdout = child.stdout.take().expect("stdout was piped");
        let mut transport = Transport {
            child,
            stdin,
            lines: BufReader::new(stdout).lines(),
        };

        match Self::handshake(&mut transport).await {
            Ok(tools) => {
                info!("Connected to MCP server '{}' with {} tools", name, tools.len());
                Ok(Self {
                    name: name.to_string(),
                    transport: Some(transport),
                    tools,
                })
            }
            Err(e) => {
                transport.shutdown(Duration::from_secs(1)).await;
                Err(e.context(format!("MCP handshake with '{}' failed", name)))
            }
        }
    }

    /// Session with no process behind it: empty catalog, calls fail.
    pub fn detached(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transport: None,
            tools: HashMap::new(),
        }
    }

    async fn handshake(transport: &mut Transport) -> Result<HashMap<String, McpToolInfo>> {
        let initialize = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {"elicitation": {}},
                "clientInfo": {
                    "name": format!("{}-client", APP_NAME),
                    "version": env!("CARGO_PKG_VERSION"),
                },
            },
        });
        let response = transport.request(&initialize).await?;
        if response.get("result").is_none() {
            bail!("initialize returned no result: {}", response);
        }

        transport
            .notify(&json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .await?;

        let response = transport
            .request(&json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}))
            .await?;
        let tools = response
            .get("result")
            .and_then(|r| r.get("tools"))
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("tools/list returned no result: {}", response))?;

        let mut catalog = HashMap::new();
        for tool in tools {
            let Some(tool_name) = tool.get("name").and_then(Value::as_str) else {
                warn!("Skipping MCP tool without a name: {}", tool);
                continue;
            };
            let description = tool
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let input_schema = tool
                .get("inputSchema")
                .or_else(|| tool.get("parameters"))
                .cloned()
                .unwrap_or_else(|| json!({"type": "object", "properties": {}}));
            catalog.insert(
                tool_name.to_string(),
                McpToolInfo {
                    name: tool_name.to_string(),
                    description,
                    input_schema,
                },
            );
        }
        Ok(catalog)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tools(&self) -> &HashMap<String, McpToolInfo> {
        &self.tools
    }

    pub fn has_tool(&self, tool_name: &str) -> bool {
        self.tools.contains_key(tool_name)
    }

    /// Invoke one tool on this server. An I/O failure fails this call only;
    /// the session stays for later calls to retry or fail explicitly.
    pub async fn call_tool(&mut self, tool_name: &str, arguments: &JsonMap) -> Result<String, ToolError> {
        let transport = self.transport.as_mut().ok_or_else(|| {
            ToolError::execution(format!("MCP server '{}' has no live process", self.name))
        })?;

        let request = json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {"name": tool_name, "arguments": arguments},
        });
        let response = transport
            .request(&request)
            .await
            .map_err(|e| ToolError::execution(format!("{:#}", e)))?;

        match response.get("result") {
            Some(result) => serde_json::to_string(result)
                .map_err(|e| ToolError::execution(format!("unserializable MCP result: {}", e))),
            None => Err(ToolError::execution(format!("Tool call failed: {}", response))),
        }
    }

    /// Terminate the server process, if any.
    pub async fn shutdown(&mut self, grace: Duration) {
        if let Some(transport) = self.transport.take() {
            debug!("Shutting down MCP server '{}'", self.name);
            transport.shutdown(grace).await;
        }
    }
}
