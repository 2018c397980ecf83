// Shell command classification
//
// Pure functions deciding whether a command needs manual approval: a fixed
// ordered list of dangerous shell metacharacters, and an allow-list of
// read-only commands eligible for silent auto-approval.
//
// A metacharacter only counts when it sits outside quoted text. Quoting is
// judged by counting the single and double quotes before the match; an odd
// count of either means the match is inside a quote.

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

static DANGER_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r";", "command separator ';'"),
        (r"&&", "'&&' operator"),
        (r"\|\|", "'||' operator"),
        (r"\|", "pipe '|'"),
        (r"\$\(", "command substitution '$('"),
        ("`", "backtick command substitution"),
        (r">>", "append redirect '>>'"),
        (r"&", "background execution '&'"),
        (r"\bsudo\b", "'sudo'"),
        (r"\bsu\b", "'su'"),
        (r">", "output redirect '>'"),
        (r"<", "input redirect '<'"),
    ]
    .iter()
    .map(|(pattern, label)| (Regex::new(pattern).expect("danger pattern regex"), *label))
    .collect()
});

/// Read-only commands eligible for auto-approval.
static SAFE_COMMANDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "ls", "cat", "grep", "rg", "head", "tail", "find", "file", "wc", "du", "stat", "whoami",
        "pwd", "date", "which", "whereis", "type", "echo", "printf", "basename", "dirname",
        "realpath", "readlink",
    ]
    .iter()
    .copied()
    .collect()
});

/// Return the first dangerous pattern found outside quotes, if any.
pub fn dangerous_patterns(command: &str) -> Option<String> {
    for (pattern, label) in DANGER_PATTERNS.iter() {
        for found in pattern.find_iter(command) {
            if !inside_quotes(command, found.start()) {
                return Some(format!("Potentially dangerous pattern {} detected", label));
            }
        }
    }
    None
}

fn inside_quotes(command: &str, position: usize) -> bool {
    let prefix = &command[..position];
    let singles = prefix.chars().filter(|c| *c == '\'').count();
    let doubles = prefix.chars().filter(|c| *c == '"').count();
    singles % 2 == 1 || doubles % 2 == 1
}

/// The basename of the first token, via shell-aware tokenization with a
/// naive whitespace split as fallback.
pub fn main_command(command: &str) -> Option<String> {
    let tokens = shell_words::split(command.trim())
        .unwrap_or_else(|_| command.trim().split_whitespace().map(String::from).collect());
    let first = tokens.into_iter().next()?;
    Path::new(&first)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .or(Some(first))
}

/// True when the command may run without a prompt: the main command is in
/// the read-only allow-list and nothing dangerous appears.
///
/// A `false` here does not mean "deny" - commands outside the allow-list
/// simply go through the normal approval flow.
pub fn auto_approved(command: &str) -> bool {
    let Some(main) = main_command(command) else {
        return false;
    };
    SAFE_COMMANDS.contains(main.as_str()) && dangerous_patterns(command).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_commands_are_safe() {
        assert!(dangerous_patterns("ls -la").is_none());
        assert!(dangerous_patterns("cat Cargo.toml").is_none());
        assert!(dangerous_patterns("git status").is_none());
    }

    #[test]
    fn test_metacharacters_are_dangerous() {
        assert!(dangerous_patterns("echo a; rm b").is_some());
        assert!(dangerous_patterns("cat x | grep y").is_some());
        assert!(dangerous_patterns("echo $(whoami)").is_some());
        assert!(dangerous_patterns("echo `date`").is_some());
        assert!(dangerous_patterns("make && make install").is_some());
        assert!(dangerous_patterns("true || false").is_some());
        assert!(dangerous_patterns("echo x >> file").is_some());
        assert!(dangerous_patterns("sleep 100 &").is_some());
        assert!(dangerous_patterns("sudo apt update").is_some());
        assert!(dangerous_patterns("su root").is_some());
        assert!(dangerous_patterns("echo x > file").is_some());
        assert!(dangerous_patterns("wc -l < file").is_some());
    }

    #[test]
    fn test_quoted_metacharacters_are_safe() {
        assert!(dangerous_patterns(r#"echo "a; b""#).is_none());
        assert!(dangerous_patterns("echo 'x | y'").is_none());
        assert!(dangerous_patterns(r#"grep "foo>bar" file.txt"#).is_none());
        assert!(dangerous_patterns(r#"echo "sudo is a word""#).is_none());
    }

    #[test]
    fn test_unquoted_metacharacter_after_quoted_span() {
        // The quoted separator is fine; the bare one after it is not.
        assert!(dangerous_patterns(r#"echo "a; b"; rm c"#).is_some());
    }

    #[test]
    fn test_sudo_requires_word_boundary() {
        assert!(dangerous_patterns("pseudocode.sh").is_none());
        assert!(dangerous_patterns("sudoku-solver").is_none());
        assert!(dangerous_patterns("sudo reboot").is_some());
    }

    #[test]
    fn test_main_command_extraction() {
        assert_eq!(main_command("ls -la").as_deref(), Some("ls"));
        assert_eq!(main_command("/usr/bin/grep foo bar").as_deref(), Some("grep"));
        assert_eq!(main_command("  cat file  ").as_deref(), Some("cat"));
        assert_eq!(main_command(""), None);
    }

    #[test]
    fn test_main_command_falls_back_on_bad_quoting() {
        // Unbalanced quote breaks tokenization; naive split still works.
        assert_eq!(main_command("echo 'unterminated").as_deref(), Some("echo"));
    }

    #[test]
    fn test_auto_approval_requires_allowlist_and_safety() {
        assert!(auto_approved("ls -la"));
        assert!(auto_approved("grep foo src/main.rs"));
        assert!(auto_approved(r#"echo "a; b""#));
        // Allow-listed but dangerous.
        assert!(!auto_approved("cat x | grep y"));
        // Safe but not allow-listed: normal approval flow, not auto-approval.
        assert!(!auto_approved("git status"));
        assert!(!auto_approved("rm -rf /"));
        assert!(!auto_approved(""));
    }
}
