// Extension points consumed by the executor
//
// Collaborators owned by the surrounding application (planning mode,
// file-activity tracking, terminal animation, transcript mutation) are
// injected through these traits rather than reached through globals.

use std::collections::HashSet;

/// Read-only planning mode gate. A `true` answer blocks the tool without
/// executing it.
pub trait PlanningGate: Send {
    fn should_disable_tool(&self, tool_name: &str) -> bool;
}

/// Records file activity so the outer app can warn about stale reads.
pub trait FileTracker: Send {
    fn record_read(&mut self, path: &str);
    fn record_edit(&mut self, path: &str);
}

/// Terminal spinner owned by the UI layer. The executor pauses it around
/// interactive prompts.
pub trait Animator: Send {
    fn start_animation(&mut self) {}
    fn stop_animation(&mut self) {}
    /// Consulted between batches by the caller, never mid-call.
    fn check_user_cancel(&mut self) -> bool {
        false
    }
}

/// Receives `append_to_system_prompt_command` output. The transcript itself
/// is owned by the caller.
pub trait SystemPromptSink: Send {
    fn append_to_system_prompt(&mut self, text: &str);
}

/// Gate that never disables anything (building mode).
#[derive(Debug, Default)]
pub struct OpenGate;

impl PlanningGate for OpenGate {
    fn should_disable_tool(&self, _tool_name: &str) -> bool {
        false
    }
}

/// Gate for planning mode: disables every tool in its write set.
#[derive(Debug)]
pub struct ReadOnlyGate {
    writing_tools: HashSet<String>,
}

impl Default for ReadOnlyGate {
    fn default() -> Self {
        Self {
            writing_tools: ["write_file", "edit_file", "run_shell_command"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ReadOnlyGate {
    pub fn with_writing_tools(tools: impl IntoIterator<Item = String>) -> Self {
        Self {
            writing_tools: tools.into_iter().collect(),
        }
    }
}

impl PlanningGate for ReadOnlyGate {
    fn should_disable_tool(&self, tool_name: &str) -> bool {
        self.writing_tools.contains(tool_name)
    }
}

#[derive(Debug, Default)]
pub struct NoopTracker;

impl FileTracker for NoopTracker {
    fn record_read(&mut self, _path: &str) {}
    fn record_edit(&mut self, _path: &str) {}
}

#[derive(Debug, Default)]
pub struct NoopAnimator;

impl Animator for NoopAnimator {}

#[derive(Debug, Default)]
pub struct NoopSink;

impl SystemPromptSink for NoopSink {
    fn append_to_system_prompt(&mut self, _text: &str) {}
}
