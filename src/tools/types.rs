// Tool configuration model
//
// Mirrors the external `mcp_tools.json` format: a JSON object mapping tool
// names to configs, tagged by `type` with exactly four backend variants.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type JsonMap = serde_json::Map<String, Value>;

/// JSON-Schema subset used for tool parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSchema {
    #[serde(rename = "type", default = "object_type")]
    pub schema_type: String,
    #[serde(default)]
    pub properties: JsonMap,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(rename = "additionalProperties", skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,
}

fn object_type() -> String {
    "object".to_string()
}

impl Default for ParameterSchema {
    fn default() -> Self {
        Self {
            schema_type: object_type(),
            properties: JsonMap::new(),
            required: Vec::new(),
            additional_properties: None,
        }
    }
}

impl ParameterSchema {
    /// Build an object schema from a `json!` properties map.
    pub fn object(properties: Value, required: &[&str]) -> Self {
        let properties = match properties {
            Value::Object(map) => map,
            _ => JsonMap::new(),
        };
        Self {
            schema_type: object_type(),
            properties,
            required: required.iter().map(|s| s.to_string()).collect(),
            additional_properties: None,
        }
    }

    /// Reject arguments outside the declared properties.
    pub fn strict(mut self) -> Self {
        self.additional_properties = Some(false);
        self
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"type": "object"}))
    }
}

/// Backend selection, tagged by the `type` field of the config entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BackendConfig {
    /// Built-in handler resolved from the static table.
    Internal,
    /// Shell command template executed with the formatted arguments.
    Command {
        command: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        preview_command: Option<String>,
        #[serde(default)]
        colorize_diff_lines: bool,
    },
    /// JSON-RPC 2.0 over HTTP POST.
    Jsonrpc { url: String, method: String },
    /// Tool served by a spawned MCP server speaking line-delimited JSON-RPC.
    McpStdio {
        /// Spawn command line for registry entries that define a server.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        command: Option<String>,
        /// Server name for synthetic configs pointing at a live session.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        server: Option<String>,
    },
}

/// One entry of the tool registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(flatten)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: ParameterSchema,
    #[serde(default)]
    pub auto_approved: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hidden_parameters: Vec<String>,
    #[serde(default)]
    pub hide_arguments: bool,
    #[serde(default)]
    pub hide_results: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_description_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub append_to_system_prompt_command: Option<String>,
    /// Execution timeout in seconds for command-type tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::Internal,
            description: String::new(),
            parameters: ParameterSchema::default(),
            auto_approved: false,
            hidden_parameters: Vec::new(),
            hide_arguments: false,
            hide_results: false,
            disabled: false,
            tool_description_command: None,
            append_to_system_prompt_command: None,
            timeout: None,
        }
    }
}

impl ToolConfig {
    /// Synthetic config for a tool discovered on a live MCP server.
    pub fn mcp_server_ref(server: &str) -> Self {
        Self {
            backend: BackendConfig::McpStdio {
                command: None,
                server: Some(server.to_string()),
            },
            ..Self::default()
        }
    }

    pub fn is_mcp_server(&self) -> bool {
        matches!(self.backend, BackendConfig::McpStdio { .. })
    }

    /// Human-readable backend name used in error messages.
    pub fn backend_label(&self) -> &'static str {
        match self.backend {
            BackendConfig::Internal => "internal",
            BackendConfig::Command { .. } => "command",
            BackendConfig::Jsonrpc { .. } => "JSON-RPC",
            BackendConfig::McpStdio { .. } => "MCP stdio",
        }
    }
}
