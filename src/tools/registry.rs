// Tool registry
//
// Produces the authoritative name -> ToolConfig map from three sources:
// the built-in catalog, the external `mcp_tools.json` file (later entries
// override earlier ones by name), and lazy MCP server discovery.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};

use crate::config::{Settings, HOOK_TIMEOUT_SECS};
use crate::hooks::SystemPromptSink;
use crate::messages::ToolDefinition;
use crate::tools::implementations::{self, InternalTool};
use crate::tools::mcp::{McpSession, McpToolInfo};
use crate::tools::shell;
use crate::tools::types::{BackendConfig, ToolConfig};

/// Grace given to MCP servers at registry shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

pub struct ToolRegistry {
    settings: Settings,
    tools: HashMap<String, ToolConfig>,
    sessions: HashMap<String, McpSession>,
}

impl ToolRegistry {
    /// Build a registry holding the internal catalog.
    pub fn new(settings: Settings) -> Self {
        let mut registry = Self {
            settings,
            tools: HashMap::new(),
            sessions: HashMap::new(),
        };
        registry.load_internal();
        registry
    }

    /// Populate the built-in tools. A broken entry is skipped, not fatal.
    fn load_internal(&mut self) {
        for tool in implementations::internal_tools() {
            let name = tool.name();
            if name.is_empty() || self.tools.contains_key(name) {
                warn!("Skipping internal tool with invalid or duplicate name: '{}'", name);
                continue;
            }
            self.tools.insert(name.to_string(), tool.config());
            debug!("Loaded internal tool: {}", name);
        }
    }

    fn external_tools_path(&self) -> PathBuf {
        if let Some(path) = &self.settings.tools_file_override {
            return path.clone();
        }
        let global = self.settings.config_dir.join("mcp_tools.json");
        if global.exists() {
            return global;
        }
        PathBuf::from("mcp_tools.json")
    }

    /// Merge the external tool config file into the registry. A missing file
    /// is expected; a broken one leaves the internal tools in place.
    pub async fn load_external(&mut self, sink: &mut dyn SystemPromptSink) {
        let path = self.external_tools_path();
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "Loaded {} internal tools. No '{}' found.",
                    self.tools.len(),
                    path.display()
                );
                return;
            }
            Err(e) => {
                warn!("Could not read tool file {}: {}. Using internal tools only.", path.display(), e);
                return;
            }
        };

        let entries: HashMap<String, ToolConfig> = match serde_json::from_str(&contents) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Error decoding tool file {}: {}. Using internal tools only.",
                    path.display(),
                    e
                );
                return;
            }
        };

        let mut external_count = 0usize;
        let mut server_count = 0usize;
        for (name, mut config) in entries {
            if config.disabled {
                debug!("Skipping disabled tool/server: {}", name);
                continue;
            }
            self.run_description_hook(&name, &mut config).await;
            self.run_prompt_hook(&name, &config, sink).await;
            if config.is_mcp_server() {
                server_count += 1;
            } else {
                external_count += 1;
            }
            self.tools.insert(name, config);
        }

        info!(
            "Loaded {} tools ({} external) and {} external MCP servers.",
            self.tools.len(),
            external_count,
            server_count
        );
    }

    /// Replace the description with the stdout of `tool_description_command`
    /// when it exits 0 with non-empty output. Failures are warnings.
    async fn run_description_hook(&self, name: &str, config: &mut ToolConfig) {
        let Some(command) = config.tool_description_command.clone() else {
            return;
        };
        match shell::run_shell(&command, Duration::from_secs(HOOK_TIMEOUT_SECS)).await {
            Ok(output) if output.exit_code == 0 => {
                let text = output.stdout.trim();
                if !text.is_empty() {
                    config.description = text.to_string();
                    debug!("Updated description for {} from command output", name);
                }
            }
            Ok(output) => {
                warn!(
                    "tool_description_command failed for {} with exit code {}",
                    name, output.exit_code
                );
            }
            Err(e) => {
                warn!("tool_description_command for {}: {}", name, e);
            }
        }
    }

    /// Append `append_to_system_prompt_command` output to the transcript's
    /// system message via the caller-supplied sink.
    async fn run_prompt_hook(&self, name: &str, config: &ToolConfig, sink: &mut dyn SystemPromptSink) {
        let Some(command) = config.append_to_system_prompt_command.clone() else {
            return;
        };
        match shell::run_shell(&command, Duration::from_secs(HOOK_TIMEOUT_SECS)).await {
            Ok(output) if output.exit_code == 0 => {
                let text = output.stdout.trim();
                if !text.is_empty() {
                    sink.append_to_system_prompt(text);
                    debug!("Appended system prompt content for {}", name);
                }
            }
            Ok(output) => {
                warn!(
                    "append_to_system_prompt_command failed for {} with exit code {}",
                    name, output.exit_code
                );
            }
            Err(e) => {
                warn!("append_to_system_prompt_command for {}: {}", name, e);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ToolConfig> {
        self.tools.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, config: ToolConfig) {
        self.tools.insert(name.into(), config);
    }

    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Function-schema array for the model: every non-MCP entry directly,
    /// plus the live discovered tools of each MCP server entry.
    pub async fn get_tool_definitions(&mut self) -> Vec<ToolDefinition> {
        let mut definitions = Vec::new();
        for name in self.tool_names() {
            let config = self.tools[&name].clone();
            if config.is_mcp_server() {
                if let Err(e) = self.ensure_server_session(&name).await {
                    warn!("Error discovering tools from server {}: {:#}", name, e);
                    continue;
                }
                let Some(session) = self.sessions.get(&name) else {
                    continue;
                };
                let mut tool_names: Vec<&String> = session.tools().keys().collect();
                tool_names.sort();
                for tool_name in tool_names {
                    let info = &session.tools()[tool_name];
                    definitions.push(ToolDefinition::function(
                        info.name.clone(),
                        info.description.clone(),
                        info.input_schema.clone(),
                    ));
                }
            } else {
                definitions.push(ToolDefinition::function(
                    name.clone(),
                    config.description.clone(),
                    config.parameters.to_value(),
                ));
            }
        }
        definitions
    }

    /// Spawn and handshake the named server unless a session already exists.
    /// In MCP test mode a detached session with an empty catalog is created
    /// instead of spawning anything.
    pub async fn ensure_server_session(&mut self, server_name: &str) -> Result<()> {
        if self.sessions.contains_key(server_name) {
            return Ok(());
        }
        let session = if self.settings.mcp_test_mode {
            debug!("MCP test mode: empty catalog for '{}'", server_name);
            McpSession::detached(server_name)
        } else {
            let config = self
                .tools
                .get(server_name)
                .with_context(|| format!("MCP server '{}' is not configured", server_name))?;
            let BackendConfig::McpStdio {
                command: Some(command),
                ..
            } = &config.backend
            else {
                bail!("'{}' is not an mcp-stdio server with a command", server_name);
            };
            McpSession::connect(server_name, command).await?
        };
        info!(
            "Discovered {} tools from {}",
            session.tools().len(),
            server_name
        );
        self.sessions.insert(server_name.to_string(), session);
        Ok(())
    }

    /// Catalog of an already-discovered server.
    pub fn server_catalog(&self, server_name: &str) -> Option<&HashMap<String, McpToolInfo>> {
        self.sessions.get(server_name).map(McpSession::tools)
    }

    /// Which live server (if any) serves this tool name.
    pub fn server_for_tool(&self, tool_name: &str) -> Option<&str> {
        self.sessions
            .iter()
            .find(|(_, session)| session.has_tool(tool_name))
            .map(|(name, _)| name.as_str())
    }

    /// Invoke a tool on the named server, discovering it first if needed.
    pub async fn call_server_tool(
        &mut self,
        server_name: &str,
        tool_name: &str,
        arguments: &crate::tools::types::JsonMap,
    ) -> Result<String, crate::tools::error::ToolError> {
        use crate::tools::error::ToolError;
        self.ensure_server_session(server_name)
            .await
            .map_err(|e| ToolError::execution(format!("MCP server {} not available: {:#}", server_name, e)))?;
        let session = self
            .sessions
            .get_mut(server_name)
            .ok_or_else(|| ToolError::execution(format!("MCP server {} not available", server_name)))?;
        session.call_tool(tool_name, arguments).await
    }

    /// Terminate every live MCP session and clear the session map.
    pub async fn cleanup(&mut self) {
        for session in self.sessions.values_mut() {
            session.shutdown(SHUTDOWN_GRACE).await;
        }
        self.sessions.clear();
    }
}
