// Error taxonomy for tool execution
//
// Every variant is converted into well-formed result content by the
// executor; nothing here unwinds a batch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    /// Control sentinel: the operator cancelled the remaining calls in the
    /// batch. Matched by variant, never by string comparison.
    #[error("CANCEL_ALL_TOOL_CALLS")]
    CancelAll,

    /// A subprocess overran its timeout. The whole process group is already
    /// torn down by the time this surfaces.
    #[error("Command '{command}' timed out after {seconds} seconds")]
    Timeout { command: String, seconds: u64 },

    /// Any other execution failure; the message carries the original error.
    #[error("{0}")]
    Execution(String),
}

impl ToolError {
    pub fn execution(message: impl Into<String>) -> Self {
        ToolError::Execution(message.into())
    }

    pub fn is_cancel_all(&self) -> bool {
        matches!(self, ToolError::CancelAll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_all_display_matches_sentinel() {
        assert_eq!(ToolError::CancelAll.to_string(), "CANCEL_ALL_TOOL_CALLS");
        assert!(ToolError::CancelAll.is_cancel_all());
    }

    #[test]
    fn test_timeout_message_names_duration() {
        let err = ToolError::Timeout {
            command: "sleep 99".to_string(),
            seconds: 5,
        };
        assert!(err.to_string().contains("timed out after 5 seconds"));
        assert!(!err.is_cancel_all());
    }
}
