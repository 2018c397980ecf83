// Tool executor
//
// The single orchestration point: consumes one assistant message's batch of
// tool calls in strict array order and returns the ordered result messages
// plus the cancel-all flag. One bad call never aborts its siblings.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::{Settings, CANCELLED_MESSAGE, CANCEL_ALL_MESSAGE, COMMAND_TIMEOUT_SECS};
use crate::hooks::{Animator, FileTracker, NoopAnimator, NoopTracker, OpenGate, PlanningGate};
use crate::messages::{AssistantMessage, Message};
use crate::stats::Stats;
use crate::tools::approval::{ApprovalEngine, Gate};
use crate::tools::arguments;
use crate::tools::display;
use crate::tools::error::ToolError;
use crate::tools::handlers;
use crate::tools::implementations::ExecContext;
use crate::tools::registry::ToolRegistry;
use crate::tools::shell;
use crate::tools::types::{BackendConfig, JsonMap, ToolConfig};

/// Guidance captured for one call, flushed after the whole batch.
struct PendingGuidance {
    tool_call_id: String,
    tool_name: String,
    content: String,
}

pub struct ToolExecutor {
    registry: ToolRegistry,
    approvals: ApprovalEngine,
    stats: Stats,
    settings: Settings,
    http: reqwest::Client,
    gate: Box<dyn PlanningGate>,
    tracker: Box<dyn FileTracker>,
    animator: Box<dyn Animator>,
    yolo_mode: bool,
}

impl ToolExecutor {
    pub fn new(settings: Settings, registry: ToolRegistry, approvals: ApprovalEngine) -> Self {
        let yolo_mode = settings.yolo_mode;
        Self {
            registry,
            approvals,
            stats: Stats::new(),
            http: reqwest::Client::new(),
            gate: Box::new(OpenGate),
            tracker: Box::new(NoopTracker),
            animator: Box::new(NoopAnimator),
            yolo_mode,
            settings,
        }
    }

    pub fn with_planning_gate(mut self, gate: Box<dyn PlanningGate>) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_file_tracker(mut self, tracker: Box<dyn FileTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn with_animator(mut self, animator: Box<dyn Animator>) -> Self {
        self.animator = animator;
        self
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn yolo_mode(&self) -> bool {
        self.yolo_mode
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ToolRegistry {
        &mut self.registry
    }

    pub fn revoke_session_approvals(&mut self) {
        self.approvals.revoke_session_approvals();
    }

    /// Shut down every live MCP session.
    pub async fn cleanup(&mut self) {
        self.registry.cleanup().await;
    }

    /// Execute every tool call of the message in order. Returns the result
    /// messages (one per non-rejected call, guidance appended last) and
    /// whether a cancel-all fired.
    pub async fn execute_tool_calls(
        &mut self,
        message: &AssistantMessage,
    ) -> (Vec<Message>, bool) {
        let total_tools = message.tool_calls.len();
        let mut results: Vec<Message> = Vec::new();
        let mut pending_guidance: Vec<PendingGuidance> = Vec::new();
        let mut cancel_all = false;

        for (index, call) in message.tool_calls.iter().enumerate() {
            self.stats.tool_calls += 1;
            let tool_name = call.function.name.clone();
            info!("AI wants to call tool: {}", tool_name);

            // 1. Strict parse. Malformed JSON yields a corrective message
            //    and no tool result for this call.
            let parsed = match arguments::parse_arguments(&call.function.arguments) {
                Ok(value) => value,
                Err(e) => {
                    warn!(
                        "Malformed JSON in tool call arguments for '{}': {}",
                        tool_name, e
                    );
                    if self.settings.debug {
                        self.log_malformed_call(&tool_name, &call.function.arguments, &e.to_string());
                    }
                    results.push(Message::user(corrective_message(&tool_name, &e.to_string())));
                    continue;
                }
            };

            // 2. Normalize into an argument map.
            let args = arguments::normalize_arguments(parsed);

            // 3. Resolve config; bare MCP tool names get a synthetic entry.
            let Some(config) = self.resolve_config(&tool_name) else {
                results.push(Message::tool(
                    &call.id,
                    &tool_name,
                    format!("Error: Tool '{}' not found.", tool_name),
                ));
                continue;
            };

            // 4. Everything after a cancel-all is recorded, not executed.
            if cancel_all {
                debug!("Skipping tool call (cancel all active)");
                results.push(Message::tool(&call.id, &tool_name, CANCELLED_MESSAGE));
                continue;
            }

            // 5. Planning mode gate.
            if self.gate.should_disable_tool(&tool_name) {
                results.push(Message::tool(
                    &call.id,
                    &tool_name,
                    format!(
                        "Error: Tool '{}' is disabled while planning mode is active (read-only). Switch to build mode to make changes.",
                        tool_name
                    ),
                ));
                continue;
            }

            // 6-8. Approval gate, dispatch, timing.
            let started = Instant::now();
            let outcome = self
                .execute_gated(&tool_name, &config, &args, index + 1, total_tools)
                .await;
            self.stats.tool_time_spent += started.elapsed();

            let (content, guidance_requested) = match outcome {
                Ok(pair) => pair,
                Err(ToolError::CancelAll) => {
                    warn!("Cancel all activated for remaining tool calls");
                    cancel_all = true;
                    (CANCEL_ALL_MESSAGE.to_string(), false)
                }
                Err(other) => {
                    // execute_gated folds every other error into content.
                    self.stats.tool_errors += 1;
                    (format!("Error in tool execution system: {}", other), false)
                }
            };
            results.push(Message::tool(&call.id, &tool_name, content));

            // 9. Guidance prompting happens after the result is recorded.
            if guidance_requested {
                self.animator.stop_animation();
                let guidance = self.approvals.prompt_guidance();
                self.animator.start_animation();
                if let Some(content) = guidance {
                    pending_guidance.push(PendingGuidance {
                        tool_call_id: call.id.clone(),
                        tool_name,
                        content,
                    });
                }
            }
        }

        // 10. Guidance always lands after every tool result, keeping each
        //     tool call immediately followed by its result.
        for guidance in pending_guidance {
            results.push(Message::user(format!(
                "User guidance for tool call ID {} ({}): {}",
                guidance.tool_call_id, guidance.tool_name, guidance.content
            )));
        }

        (results, cancel_all)
    }

    fn resolve_config(&self, tool_name: &str) -> Option<ToolConfig> {
        if let Some(config) = self.registry.get(tool_name) {
            return Some(config.clone());
        }
        self.registry
            .server_for_tool(tool_name)
            .map(ToolConfig::mcp_server_ref)
    }

    /// Approval gate plus backend dispatch for one call. Only the cancel-all
    /// sentinel escapes as an error; every other failure becomes content.
    async fn execute_gated(
        &mut self,
        tool_name: &str,
        config: &ToolConfig,
        args: &JsonMap,
        tool_index: usize,
        total_tools: usize,
    ) -> Result<(String, bool), ToolError> {
        self.run_preview(config, args).await;

        self.animator.stop_animation();
        let gate = self
            .approvals
            .decide(tool_name, args, config, &mut self.yolo_mode);
        self.animator.start_animation();

        match gate? {
            Gate::Denied { guidance, message } => Ok((message, guidance)),
            Gate::Approved { guidance } => {
                let dispatched = {
                    let mut ctx = ExecContext {
                        stats: &mut self.stats,
                        tracker: &mut *self.tracker,
                        settings: &self.settings,
                        tool_index,
                        total_tools,
                    };
                    handlers::dispatch(
                        tool_name,
                        config,
                        args,
                        &mut ctx,
                        &mut self.registry,
                        &self.http,
                    )
                    .await
                };
                match dispatched {
                    Ok(content) => Ok((content, guidance)),
                    Err(ToolError::CancelAll) => Err(ToolError::CancelAll),
                    Err(err @ ToolError::Timeout { .. }) => {
                        self.stats.tool_errors += 1;
                        Ok((format!("Error: {}.", err), guidance))
                    }
                    Err(ToolError::Execution(message)) => {
                        self.stats.tool_errors += 1;
                        Ok((
                            format!(
                                "Error executing {} tool '{}': {}",
                                config.backend_label(),
                                tool_name,
                                message
                            ),
                            guidance,
                        ))
                    }
                }
            }
        }
    }

    /// Surface the preview command's output before the approval prompt.
    async fn run_preview(&mut self, config: &ToolConfig, args: &JsonMap) {
        let BackendConfig::Command {
            preview_command: Some(template),
            colorize_diff_lines,
            ..
        } = &config.backend
        else {
            return;
        };
        if config.auto_approved || self.yolo_mode {
            return;
        }

        let preview = match handlers::command::render_template(template, args) {
            Ok(preview) => preview,
            Err(e) => {
                self.approvals
                    .show(&format!("Error running preview command: {}", e));
                return;
            }
        };
        self.approvals
            .show(&format!("   - Preview command: {}", preview));

        match shell::run_shell(&preview, Duration::from_secs(COMMAND_TIMEOUT_SECS)).await {
            Ok(output) => {
                let colorize = *colorize_diff_lines;
                if !output.stdout.trim().is_empty() {
                    self.approvals.show("--- PREVIEW OUTPUT ---");
                    self.approvals.show(&maybe_colorize(output.stdout.trim_end(), colorize));
                }
                if !output.stderr.trim().is_empty() {
                    self.approvals.show("--- PREVIEW STDERR ---");
                    self.approvals.show(&maybe_colorize(output.stderr.trim_end(), colorize));
                }
            }
            Err(e) => {
                self.approvals
                    .show(&format!("Error running preview command: {}", e));
            }
        }
    }

    /// Debug-mode record of a malformed tool call.
    fn log_malformed_call(&self, tool_name: &str, raw_arguments: &str, error: &str) {
        let now = chrono::Local::now();
        let path = format!("malformed_tool_call_{}.log", now.format("%Y%m%d_%H%M%S"));
        let entry = serde_json::json!({
            "timestamp": now.to_rfc3339(),
            "tool_name": tool_name,
            "raw_arguments": raw_arguments,
            "error": error,
            "error_type": "Malformed JSON",
        });
        let body = serde_json::to_string_pretty(&entry).unwrap_or_else(|_| entry.to_string());
        match std::fs::write(&path, body) {
            Ok(()) => info!("Malformed tool call logged to {}", path),
            Err(e) => warn!("Failed to log malformed tool call: {}", e),
        }
    }
}

fn corrective_message(tool_name: &str, error: &str) -> String {
    format!(
        "SYSTEM ERROR: Your tool call for '{}' was rejected due to invalid JSON format.\n\n\
         Parse error: {}\n\n\
         Please ensure your JSON arguments are properly formatted:\n \
         - Use double quotes (\") for all strings and keys\n \
         - Properly escape special characters\n \
         - Check for missing commas and brackets\n\n\
         Please correct your tool call and try again.",
        tool_name, error
    )
}

fn maybe_colorize(text: &str, colorize: bool) -> String {
    if colorize {
        display::colorize_diff_lines(text)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::ToolCall;
    use crate::tools::approval::{ApprovalChoice, ApprovalPrompter, PromptAnswer};
    use std::collections::VecDeque;

    struct SilentPrompter;

    impl ApprovalPrompter for SilentPrompter {
        fn show(&mut self, _text: &str) {}
        fn request_approval(&mut self, _prompt: &str) -> PromptAnswer {
            panic!("no prompt expected in this test");
        }
        fn request_guidance(&mut self) -> Option<String> {
            None
        }
    }

    struct QueuedPrompter(VecDeque<PromptAnswer>);

    impl ApprovalPrompter for QueuedPrompter {
        fn show(&mut self, _text: &str) {}
        fn request_approval(&mut self, _prompt: &str) -> PromptAnswer {
            self.0.pop_front().expect("unexpected approval prompt")
        }
        fn request_guidance(&mut self) -> Option<String> {
            None
        }
    }

    fn executor_with(dir: &std::path::Path, prompter: Box<dyn ApprovalPrompter>) -> ToolExecutor {
        let settings = Settings {
            config_dir: dir.to_path_buf(),
            mcp_test_mode: true,
            ..Settings::default()
        };
        let registry = ToolRegistry::new(settings.clone());
        let approvals = ApprovalEngine::new(dir.to_path_buf(), settings.truncation_limit, prompter);
        ToolExecutor::new(settings, registry, approvals)
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_without_error_stat() {
        let dir = tempfile::tempdir().unwrap();
        let mut executor = executor_with(dir.path(), Box::new(SilentPrompter));
        let message = AssistantMessage::with_calls(vec![ToolCall::new("c1", "no_such_tool", "{}")]);

        let (results, cancel_all) = executor.execute_tool_calls(&message).await;
        assert!(!cancel_all);
        assert_eq!(results.len(), 1);
        assert!(results[0].content().contains("Error: Tool 'no_such_tool' not found."));
        assert_eq!(executor.stats().tool_calls, 1);
        assert_eq!(executor.stats().tool_errors, 0);
    }

    #[tokio::test]
    async fn test_planning_gate_blocks_without_executing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("never_written.txt");
        let mut executor = executor_with(dir.path(), Box::new(SilentPrompter))
            .with_planning_gate(Box::new(crate::hooks::ReadOnlyGate::default()));

        let arguments = serde_json::json!({
            "path": target.to_str().unwrap(),
            "content": "nope"
        })
        .to_string();
        let message =
            AssistantMessage::with_calls(vec![ToolCall::new("c1", "write_file", arguments)]);

        let (results, _) = executor.execute_tool_calls(&message).await;
        assert!(results[0].content().contains("planning mode"));
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_denial_returns_sentinel_without_error_stat() {
        let dir = tempfile::tempdir().unwrap();
        let mut executor = executor_with(
            dir.path(),
            Box::new(QueuedPrompter(
                vec![PromptAnswer::new(ApprovalChoice::Deny)].into(),
            )),
        );
        let arguments = serde_json::json!({
            "path": dir.path().join("x.txt").to_str().unwrap(),
            "content": "data"
        })
        .to_string();
        let message =
            AssistantMessage::with_calls(vec![ToolCall::new("c1", "write_file", arguments)]);

        let (results, _) = executor.execute_tool_calls(&message).await;
        assert_eq!(results[0].content(), crate::config::DENIED_MESSAGE);
        assert_eq!(executor.stats().tool_errors, 0);
    }

    #[tokio::test]
    async fn test_yolo_choice_persists_for_later_calls() {
        let dir = tempfile::tempdir().unwrap();
        let mut executor = executor_with(
            dir.path(),
            Box::new(QueuedPrompter(
                vec![PromptAnswer::new(ApprovalChoice::Yolo)].into(),
            )),
        );
        let path = dir.path().join("a.txt");
        let mk = |p: &std::path::Path| {
            serde_json::json!({"path": p.to_str().unwrap(), "content": "x"}).to_string()
        };
        let message = AssistantMessage::with_calls(vec![
            ToolCall::new("c1", "write_file", mk(&path)),
            ToolCall::new("c2", "write_file", mk(&dir.path().join("b.txt"))),
        ]);

        let (results, _) = executor.execute_tool_calls(&message).await;
        assert!(results[0].content().contains("Successfully wrote"));
        // Second call rides the YOLO flag; the queue is empty, so any
        // prompt would panic.
        assert!(results[1].content().contains("Successfully wrote"));
        assert!(executor.yolo_mode());
    }
}
