// Approval policy engine
//
// Decides whether a tool call runs without interactive confirmation:
// operator rule files (auto_deny / ask_approval / auto_approve), the
// session approval cache, and the shell sandbox classification. The
// interactive prompt itself is a collaborator so the engine stays testable.
//
// Priority order: auto_deny (hard block, fires even in YOLO mode), then
// ask_approval (forces a prompt), then auto_approve (skips the prompt).

use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::DENIED_MESSAGE;
use crate::tools::display::{format_tool_prompt, BOLD, GREEN, RED, RESET, YELLOW};
use crate::tools::error::ToolError;
use crate::tools::sandbox;
use crate::tools::types::{JsonMap, ToolConfig};

const SHELL_TOOL: &str = "run_shell_command";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalChoice {
    Allow,
    AllowSession,
    Deny,
    CancelAll,
    Yolo,
}

#[derive(Debug, Clone, Copy)]
pub struct PromptAnswer {
    pub choice: ApprovalChoice,
    pub with_guidance: bool,
}

impl PromptAnswer {
    pub fn new(choice: ApprovalChoice) -> Self {
        Self {
            choice,
            with_guidance: false,
        }
    }

    pub fn with_guidance(choice: ApprovalChoice) -> Self {
        Self {
            choice,
            with_guidance: true,
        }
    }
}

/// Interactive approval collaborator (terminal UI, test script, ...).
pub trait ApprovalPrompter: Send {
    /// Display informational text (preview output, rule notices).
    fn show(&mut self, text: &str);
    /// Ask the operator to rule on one tool call.
    fn request_approval(&mut self, prompt: &str) -> PromptAnswer;
    /// Collect free-text guidance after a decision.
    fn request_guidance(&mut self) -> Option<String>;
}

/// Outcome of the approval gate for one call.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    Approved { guidance: bool },
    Denied { guidance: bool, message: String },
}

/// Decision summary exposed to callers that only need the booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalDecision {
    pub approved: bool,
    pub guidance_requested: bool,
}

impl Gate {
    fn approved(guidance: bool) -> Self {
        Gate::Approved { guidance }
    }

    fn denied(guidance: bool) -> Self {
        Gate::Denied {
            guidance,
            message: DENIED_MESSAGE.to_string(),
        }
    }

    pub fn decision(&self) -> ApprovalDecision {
        match self {
            Gate::Approved { guidance } => ApprovalDecision {
                approved: true,
                guidance_requested: *guidance,
            },
            Gate::Denied { guidance, .. } => ApprovalDecision {
                approved: false,
                guidance_requested: *guidance,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Deny,
    Ask,
    Approve,
}

impl RuleKind {
    fn suffix(self) -> &'static str {
        match self {
            RuleKind::Deny => "auto_deny",
            RuleKind::Ask => "ask_approval",
            RuleKind::Approve => "auto_approve",
        }
    }
}

/// Check one rule file against a command. Returns a description of the
/// matching rule. Blank lines, comments, and invalid regexes never match;
/// `!` negation applies to approve files only and fires when the command
/// does NOT match the remainder.
pub fn check_rule_file(path: &Path, command: &str, kind: RuleKind) -> Option<String> {
    let contents = std::fs::read_to_string(path).ok()?;
    for line in contents.lines() {
        let line = line.trim();
        // An empty pattern would match everything.
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if kind == RuleKind::Approve && line.starts_with('!') {
            let pattern = &line[1..];
            if pattern.is_empty() {
                continue;
            }
            match Regex::new(pattern) {
                Ok(re) if !re.is_match(command) => {
                    return Some(format!("Auto approved (negated regex): {}", pattern));
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Skipping invalid regex in {}: {}", path.display(), e);
                }
            }
        } else {
            match Regex::new(line) {
                Ok(re) if re.is_match(command) => return Some(line.to_string()),
                Ok(_) => {}
                Err(e) => {
                    warn!("Skipping invalid regex in {}: {}", path.display(), e);
                }
            }
        }
    }
    None
}

pub struct ApprovalEngine {
    config_dir: PathBuf,
    truncation_limit: usize,
    session: HashSet<String>,
    prompter: Box<dyn ApprovalPrompter>,
}

impl ApprovalEngine {
    pub fn new(config_dir: PathBuf, truncation_limit: usize, prompter: Box<dyn ApprovalPrompter>) -> Self {
        Self {
            config_dir,
            truncation_limit,
            session: HashSet::new(),
            prompter,
        }
    }

    /// Clear every session approval.
    pub fn revoke_session_approvals(&mut self) {
        self.session.clear();
        debug!("All session approvals have been revoked");
    }

    /// Passthrough for informational output (command previews).
    pub fn show(&mut self, text: &str) {
        self.prompter.show(text);
    }

    pub fn prompt_guidance(&mut self) -> Option<String> {
        self.prompter
            .request_guidance()
            .filter(|text| !text.trim().is_empty())
    }

    fn rule_path(&self, tool_name: &str, kind: RuleKind) -> PathBuf {
        self.config_dir.join(format!("{}.{}", tool_name, kind.suffix()))
    }

    fn check_rule(&self, tool_name: &str, kind: RuleKind, command: &str) -> Option<String> {
        check_rule_file(&self.rule_path(tool_name, kind), command, kind)
    }

    /// Gate one tool call. Only `ToolError::CancelAll` escapes as an error.
    ///
    /// Rule files are re-read on every decision so the operator can edit
    /// them mid-session.
    pub fn decide(
        &mut self,
        tool_name: &str,
        args: &JsonMap,
        config: &ToolConfig,
        yolo: &mut bool,
    ) -> Result<Gate, ToolError> {
        if config.auto_approved {
            return Ok(Gate::approved(false));
        }

        let shell_command: Option<String> = if tool_name == SHELL_TOOL {
            args.get("command").and_then(Value::as_str).map(str::to_string)
        } else {
            None
        };

        // Hard deny wins over everything: YOLO mode and the session cache.
        if let Some(cmd) = &shell_command {
            if let Some(rule) = self.check_rule(tool_name, RuleKind::Deny, cmd) {
                self.prompter
                    .show(&format!("   - [X] Command auto denied: {}", rule));
                self.prompter.show(&format!("   - Command was: {}", cmd));
                let message = if *yolo {
                    format!("Command denied by GLOBAL RULE: {}", cmd)
                } else {
                    DENIED_MESSAGE.to_string()
                };
                return Ok(Gate::Denied {
                    guidance: false,
                    message,
                });
            }
        }

        let prompt = format_tool_prompt(tool_name, args, config, self.truncation_limit);

        if *yolo {
            // YOLO bypasses prompting, never the operator's rule files. The
            // danger detector still runs so flagged commands are visible.
            if let Some(cmd) = &shell_command {
                if let Some(rule) = self.check_rule(tool_name, RuleKind::Ask, cmd) {
                    self.prompter.show(&format!(
                        "   - [!] Detected in ask approval file. Regex: {} - YOLO mode respects user rules",
                        rule
                    ));
                    return Ok(Gate::Denied {
                        guidance: false,
                        message: format!("Command denied by GLOBAL RULE: {}", cmd),
                    });
                }
                if let Some(reason) = sandbox::dangerous_patterns(cmd) {
                    self.prompter.show(&format!("   - [!] {}", reason));
                }
            }
            self.prompter.show(&prompt);
            self.prompter.show("Auto approving... running YOLO MODE!");
            return Ok(Gate::approved(false));
        }

        // Three-way split for shell commands: auto-approve, force-manual,
        // or fall through to the normal flow.
        let mut force_reason: Option<String> = None;
        let cache_key = match &shell_command {
            Some(cmd) => {
                if let Some(reason) = sandbox::dangerous_patterns(cmd) {
                    force_reason = Some(reason);
                } else if let Some(rule) = self.check_rule(tool_name, RuleKind::Ask, cmd) {
                    force_reason = Some(format!("Detected in ask approval file. Regex: {}", rule));
                } else if let Some(rule) = self.check_rule(tool_name, RuleKind::Approve, cmd) {
                    debug!("Command auto approved by rule: {}", rule);
                    return Ok(Gate::approved(false));
                } else if sandbox::auto_approved(cmd) {
                    debug!("Read-only command auto approved: {}", cmd);
                    return Ok(Gate::approved(false));
                }
                shell_cache_key(tool_name, cmd)
            }
            None => generic_cache_key(tool_name, args),
        };

        // A dangerous command must be re-confirmed even when its main
        // command was approved for the session.
        if force_reason.is_none() && self.session.contains(&cache_key) {
            debug!("Session approval cache hit: {}", cache_key);
            return Ok(Gate::approved(false));
        }
        if let Some(reason) = &force_reason {
            self.prompter
                .show(&format!("   - [!] {} - requires manual approval", reason));
        }

        let answer = self.prompter.request_approval(&prompt);
        match answer.choice {
            ApprovalChoice::Allow => Ok(Gate::approved(answer.with_guidance)),
            ApprovalChoice::AllowSession => {
                self.session.insert(cache_key);
                Ok(Gate::approved(answer.with_guidance))
            }
            ApprovalChoice::Deny => Ok(Gate::denied(answer.with_guidance)),
            ApprovalChoice::CancelAll => Err(ToolError::CancelAll),
            ApprovalChoice::Yolo => {
                *yolo = true;
                Ok(Gate::approved(answer.with_guidance))
            }
        }
    }
}

fn shell_cache_key(tool_name: &str, command: &str) -> String {
    match sandbox::main_command(command) {
        Some(main) => format!("{}:{}", tool_name, main),
        None => tool_name.to_string(),
    }
}

fn generic_cache_key(tool_name: &str, args: &JsonMap) -> String {
    if args.is_empty() {
        return tool_name.to_string();
    }
    let mut pairs: Vec<String> = args
        .iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("{}={}", key, rendered)
        })
        .collect();
    pairs.sort();
    format!("{}:{}", tool_name, pairs.join("&"))
}

/// Stdin-driven prompter for the terminal.
pub struct TerminalPrompter;

impl ApprovalPrompter for TerminalPrompter {
    fn show(&mut self, text: &str) {
        println!("{}", text);
    }

    fn request_approval(&mut self, prompt: &str) -> PromptAnswer {
        println!("\n{}{}{}", YELLOW, prompt, RESET);
        let stdin = std::io::stdin();
        for attempt in 0..3 {
            print!(
                "{}a) Allow once  s) Allow for session  d) Deny  c) Cancel all  YOLO) YOLO  help) Show help\nChoose (a/s/d/c/YOLO/help): {}",
                RED, RESET
            );
            let _ = std::io::stdout().flush();

            let mut line = String::new();
            if stdin.lock().read_line(&mut line).is_err() {
                break;
            }
            let mut answer = line.trim().to_lowercase();
            let with_guidance = answer.ends_with('+');
            if with_guidance {
                answer.pop();
            }

            let choice = match answer.as_str() {
                "a" | "allow" => Some(ApprovalChoice::Allow),
                "s" | "session" => Some(ApprovalChoice::AllowSession),
                "d" | "deny" => Some(ApprovalChoice::Deny),
                "c" | "cancel" => Some(ApprovalChoice::CancelAll),
                "yolo" => Some(ApprovalChoice::Yolo),
                "help" | "h" => {
                    self.print_help();
                    None
                }
                _ => {
                    println!("{}Invalid choice. Please enter a, s, d, c, YOLO, or help.{}", YELLOW, RESET);
                    None
                }
            };
            if let Some(choice) = choice {
                return PromptAnswer {
                    choice,
                    with_guidance,
                };
            }
            if attempt == 2 {
                println!("{}Max attempts reached. Denying tool call.{}", RED, RESET);
            }
        }
        PromptAnswer::new(ApprovalChoice::Deny)
    }

    fn request_guidance(&mut self) -> Option<String> {
        print!("{}{}Guidance: {}", BOLD, GREEN, RESET);
        let _ = std::io::stdout().flush();
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line).ok()?;
        let text = line.trim().to_string();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl TerminalPrompter {
    fn print_help(&self) {
        println!("\n{}Approval Options:{}", GREEN, RESET);
        println!("{}a) Allow once{} - Execute this tool call just this one time", YELLOW, RESET);
        println!(
            "{}s) Allow for session{} - Allow this type of tool call for the rest of this session",
            YELLOW, RESET
        );
        println!("{}d) Deny{} - Reject this tool call", YELLOW, RESET);
        println!(
            "{}c) Cancel all{} - Cancel all pending tool calls and return to user input",
            YELLOW, RESET
        );
        println!(
            "{}YOLO) YOLO mode{} - Automatically approve all tool calls for the rest of the session",
            YELLOW, RESET
        );
        println!(
            "\nAdd a '+' after any option to attach guidance for the AI, e.g. 'a+'."
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Prompter that replays scripted answers and records what it was shown.
    struct ScriptedPrompter {
        answers: VecDeque<PromptAnswer>,
        guidance: VecDeque<String>,
        shown: Arc<Mutex<Vec<String>>>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedPrompter {
        fn new(answers: Vec<PromptAnswer>) -> Self {
            Self {
                answers: answers.into(),
                guidance: VecDeque::new(),
                shown: Arc::new(Mutex::new(Vec::new())),
                prompts: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl ApprovalPrompter for ScriptedPrompter {
        fn show(&mut self, text: &str) {
            self.shown.lock().unwrap().push(text.to_string());
        }

        fn request_approval(&mut self, prompt: &str) -> PromptAnswer {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.answers
                .pop_front()
                .expect("prompter asked for approval with no scripted answer")
        }

        fn request_guidance(&mut self) -> Option<String> {
            self.guidance.pop_front()
        }
    }

    fn engine_with(dir: &Path, answers: Vec<PromptAnswer>) -> (ApprovalEngine, Arc<Mutex<Vec<String>>>) {
        let prompter = ScriptedPrompter::new(answers);
        let prompts = Arc::clone(&prompter.prompts);
        (
            ApprovalEngine::new(dir.to_path_buf(), 300, Box::new(prompter)),
            prompts,
        )
    }

    fn shell_args(command: &str) -> JsonMap {
        let mut map = JsonMap::new();
        map.insert("command".to_string(), Value::String(command.to_string()));
        map
    }

    fn shell_config() -> ToolConfig {
        ToolConfig {
            hide_arguments: true,
            ..ToolConfig::default()
        }
    }

    #[test]
    fn test_auto_approved_config_skips_everything() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, prompts) = engine_with(dir.path(), vec![]);
        let config = ToolConfig {
            auto_approved: true,
            ..ToolConfig::default()
        };
        let mut yolo = false;
        let gate = engine
            .decide("read_file", &JsonMap::new(), &config, &mut yolo)
            .unwrap();
        assert_eq!(gate, Gate::Approved { guidance: false });
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_allowlisted_safe_command_auto_approved() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, prompts) = engine_with(dir.path(), vec![]);
        let mut yolo = false;
        let gate = engine
            .decide(SHELL_TOOL, &shell_args("ls -la"), &shell_config(), &mut yolo)
            .unwrap();
        assert!(matches!(gate, Gate::Approved { .. }));
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unlisted_safe_command_goes_to_normal_flow() {
        // Not allow-listed, not dangerous: the prompt must appear.
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, prompts) =
            engine_with(dir.path(), vec![PromptAnswer::new(ApprovalChoice::Allow)]);
        let mut yolo = false;
        let gate = engine
            .decide(SHELL_TOOL, &shell_args("git status"), &shell_config(), &mut yolo)
            .unwrap();
        assert!(matches!(gate, Gate::Approved { .. }));
        assert_eq!(prompts.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_auto_deny_blocks_even_in_yolo_mode() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("run_shell_command.auto_deny"), "rm\n").unwrap();
        let (mut engine, prompts) = engine_with(dir.path(), vec![]);
        let mut yolo = true;
        let gate = engine
            .decide(SHELL_TOOL, &shell_args("rm -rf /tmp/x"), &shell_config(), &mut yolo)
            .unwrap();
        match gate {
            Gate::Denied { message, .. } => {
                assert!(message.contains("GLOBAL RULE"), "got: {}", message)
            }
            other => panic!("expected denial, got {:?}", other),
        }
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_auto_deny_beats_session_cache() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, _) = engine_with(
            dir.path(),
            vec![PromptAnswer::new(ApprovalChoice::AllowSession)],
        );
        let mut yolo = false;

        // Warm the cache for `git`.
        let gate = engine
            .decide(SHELL_TOOL, &shell_args("git status"), &shell_config(), &mut yolo)
            .unwrap();
        assert!(matches!(gate, Gate::Approved { .. }));

        // The cache hit skips the prompt.
        let gate = engine
            .decide(SHELL_TOOL, &shell_args("git log"), &shell_config(), &mut yolo)
            .unwrap();
        assert!(matches!(gate, Gate::Approved { .. }));

        // Now a deny rule lands: cached approval must not matter.
        std::fs::write(dir.path().join("run_shell_command.auto_deny"), "^git\n").unwrap();
        let gate = engine
            .decide(SHELL_TOOL, &shell_args("git push"), &shell_config(), &mut yolo)
            .unwrap();
        assert!(matches!(gate, Gate::Denied { .. }));
    }

    #[test]
    fn test_dangerous_command_reprompts_despite_session_cache() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, prompts) = engine_with(
            dir.path(),
            vec![
                PromptAnswer::new(ApprovalChoice::AllowSession),
                PromptAnswer::new(ApprovalChoice::Deny),
            ],
        );
        let mut yolo = false;

        let gate = engine
            .decide(SHELL_TOOL, &shell_args("git status"), &shell_config(), &mut yolo)
            .unwrap();
        assert!(matches!(gate, Gate::Approved { .. }));

        // Same main command, but now piped: the prompt reappears.
        let gate = engine
            .decide(
                SHELL_TOOL,
                &shell_args("git log | head -1"),
                &shell_config(),
                &mut yolo,
            )
            .unwrap();
        assert!(matches!(gate, Gate::Denied { .. }));
        assert_eq!(prompts.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_negated_approve_rules() {
        // `!danger.*` plus `safe.*`: "safe thing" is allowed, "danger thing" is not.
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("run_shell_command.auto_approve"),
            "!danger.*\nsafe.*\n",
        )
        .unwrap();

        let (mut engine, prompts) = engine_with(dir.path(), vec![]);
        let mut yolo = false;
        let gate = engine
            .decide(SHELL_TOOL, &shell_args("safe thing"), &shell_config(), &mut yolo)
            .unwrap();
        assert!(matches!(gate, Gate::Approved { .. }));
        assert!(prompts.lock().unwrap().is_empty());

        let (mut engine, prompts) =
            engine_with(dir.path(), vec![PromptAnswer::new(ApprovalChoice::Deny)]);
        let gate = engine
            .decide(SHELL_TOOL, &shell_args("danger thing"), &shell_config(), &mut yolo)
            .unwrap();
        assert!(matches!(gate, Gate::Denied { .. }));
        assert_eq!(prompts.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_ask_rule_denies_under_yolo() {
        // YOLO has no prompt to fall back to, so a user ask-rule is a denial.
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("run_shell_command.ask_approval"), "^git push\n").unwrap();
        let (mut engine, prompts) = engine_with(dir.path(), vec![]);
        let mut yolo = true;
        let gate = engine
            .decide(
                SHELL_TOOL,
                &shell_args("git push origin main"),
                &shell_config(),
                &mut yolo,
            )
            .unwrap();
        match gate {
            Gate::Denied { message, .. } => assert!(message.contains("GLOBAL RULE")),
            other => panic!("expected denial, got {:?}", other),
        }
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_yolo_approves_dangerous_command_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, prompts) = engine_with(dir.path(), vec![]);
        let mut yolo = true;
        let gate = engine
            .decide(
                SHELL_TOOL,
                &shell_args("cat log | grep error"),
                &shell_config(),
                &mut yolo,
            )
            .unwrap();
        assert!(matches!(gate, Gate::Approved { .. }));
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_ask_approval_rule_forces_prompt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("run_shell_command.ask_approval"), "^ls\n").unwrap();
        // `ls` is allow-listed, but the ask rule takes precedence.
        let (mut engine, prompts) =
            engine_with(dir.path(), vec![PromptAnswer::new(ApprovalChoice::Allow)]);
        let mut yolo = false;
        let gate = engine
            .decide(SHELL_TOOL, &shell_args("ls -la"), &shell_config(), &mut yolo)
            .unwrap();
        assert!(matches!(gate, Gate::Approved { .. }));
        assert_eq!(prompts.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_cancel_all_choice_raises_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, _) = engine_with(dir.path(), vec![PromptAnswer::new(ApprovalChoice::CancelAll)]);
        let mut yolo = false;
        let err = engine
            .decide("write_file", &JsonMap::new(), &ToolConfig::default(), &mut yolo)
            .unwrap_err();
        assert!(err.is_cancel_all());
    }

    #[test]
    fn test_yolo_choice_flips_flag() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, prompts) = engine_with(dir.path(), vec![PromptAnswer::new(ApprovalChoice::Yolo)]);
        let mut yolo = false;
        let gate = engine
            .decide("write_file", &JsonMap::new(), &ToolConfig::default(), &mut yolo)
            .unwrap();
        assert!(matches!(gate, Gate::Approved { .. }));
        assert!(yolo);

        // Subsequent calls bypass the prompt.
        let gate = engine
            .decide("write_file", &JsonMap::new(), &ToolConfig::default(), &mut yolo)
            .unwrap();
        assert!(matches!(gate, Gate::Approved { .. }));
        assert_eq!(prompts.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_comments_and_blank_lines_never_match() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run_shell_command.auto_deny");
        std::fs::write(&path, "# a comment\n\n   \n").unwrap();
        assert!(check_rule_file(&path, "anything at all", RuleKind::Deny).is_none());
    }

    #[test]
    fn test_invalid_regex_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run_shell_command.auto_deny");
        std::fs::write(&path, "[unclosed\nrm\n").unwrap();
        assert!(check_rule_file(&path, "rm -rf /", RuleKind::Deny).is_some());
        assert!(check_rule_file(&path, "ls", RuleKind::Deny).is_none());
    }

    #[test]
    fn test_missing_rule_file_matches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run_shell_command.auto_deny");
        assert!(check_rule_file(&path, "rm -rf /", RuleKind::Deny).is_none());
    }

    #[test]
    fn test_generic_cache_key_is_order_independent() {
        let mut a = JsonMap::new();
        a.insert("x".to_string(), Value::String("1".to_string()));
        a.insert("y".to_string(), Value::String("2".to_string()));
        let mut b = JsonMap::new();
        b.insert("y".to_string(), Value::String("2".to_string()));
        b.insert("x".to_string(), Value::String("1".to_string()));
        assert_eq!(generic_cache_key("tool", &a), generic_cache_key("tool", &b));
    }
}
