// Runtime settings for the tool engine
//
// All knobs are environment-driven and resolved once at startup,
// then threaded explicitly through the executor (no global state).

use std::path::PathBuf;

pub const APP_NAME: &str = "toolsmith";

/// Fixed content returned when the operator denies a tool call.
pub const DENIED_MESSAGE: &str = "EXECUTION DENIED BY THE USER";

/// Content recorded for calls skipped after a cancel-all.
pub const CANCELLED_MESSAGE: &str = "CANCELLED_BY_USER";

/// Content substituted for the call that triggered a cancel-all.
pub const CANCEL_ALL_MESSAGE: &str = "CANCEL_ALL_TOOL_CALLS";

/// Timeout for `tool_description_command` / `append_to_system_prompt_command`.
pub const HOOK_TIMEOUT_SECS: u64 = 5;

/// Timeout for command-type tools and their preview commands.
pub const COMMAND_TIMEOUT_SECS: u64 = 60;

/// Default timeout for `run_shell_command` when the caller does not pass one.
pub const DEFAULT_SHELL_TIMEOUT_SECS: u64 = 30;

/// Default display truncation for long argument values.
pub const DEFAULT_TRUNCATION_LIMIT: usize = 300;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Extra diagnostics, including malformed-tool-call log files.
    pub debug: bool,
    /// Skip interactive approval prompts. Hard-deny rules still apply.
    pub yolo_mode: bool,
    /// Display truncation for long string arguments (never affects execution).
    pub truncation_limit: usize,
    /// Default `run_shell_command` timeout in seconds.
    pub shell_timeout_secs: u64,
    /// Directory holding approval rule files and `mcp_tools.json`.
    pub config_dir: PathBuf,
    /// Explicit path to the external tool config file, if overridden.
    pub tools_file_override: Option<PathBuf>,
    /// When set, MCP discovery returns an empty catalog without spawning.
    pub mcp_test_mode: bool,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            debug: env_flag("DEBUG"),
            yolo_mode: env_flag("YOLO_MODE"),
            truncation_limit: env_parse("DEFAULT_TRUNCATION_LIMIT", DEFAULT_TRUNCATION_LIMIT),
            shell_timeout_secs: env_parse("SHELL_COMMAND_TIMEOUT", DEFAULT_SHELL_TIMEOUT_SECS),
            config_dir: default_config_dir(),
            tools_file_override: std::env::var("MCP_TOOLS_CONF_PATH").ok().map(PathBuf::from),
            mcp_test_mode: env_flag("MCP_TEST_MODE"),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            yolo_mode: false,
            truncation_limit: DEFAULT_TRUNCATION_LIMIT,
            shell_timeout_secs: DEFAULT_SHELL_TIMEOUT_SECS,
            config_dir: default_config_dir(),
            tools_file_override: None,
            mcp_test_mode: false,
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(APP_NAME)
}

fn env_flag(name: &str) -> bool {
    match std::env::var(name) {
        Ok(value) => {
            let value = value.trim().to_lowercase();
            !value.is_empty() && value != "0" && value != "false"
        }
        Err(_) => false,
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.yolo_mode);
        assert_eq!(settings.truncation_limit, DEFAULT_TRUNCATION_LIMIT);
        assert_eq!(settings.shell_timeout_secs, DEFAULT_SHELL_TIMEOUT_SECS);
        assert!(settings.config_dir.ends_with(APP_NAME));
    }
}
