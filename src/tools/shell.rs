// Shared shell runner
//
// Every subprocess the engine starts goes through here: `run_shell_command`,
// command-type tools, preview commands, and registry config hooks. Commands
// run in their own process group so a timeout can take down descendants as a
// unit: SIGTERM the group, wait a short grace period, SIGKILL if still alive.
// A group that is already gone counts as success.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::tools::error::ToolError;

const TERM_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Run `bash -c <command>` with a hard timeout.
///
/// Returns `ToolError::Timeout` after tearing the process group down; the
/// kill runs on every timeout path, with kill-on-drop as a backstop.
pub async fn run_shell(command: &str, timeout: Duration) -> Result<CommandOutput, ToolError> {
    let mut cmd = Command::new("bash");
    cmd.arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = cmd
        .spawn()
        .map_err(|e| ToolError::execution(format!("Failed to spawn command: {}", e)))?;
    let pid = child.id();

    let mut stdout_pipe = child.stdout.take().expect("stdout was piped");
    let mut stderr_pipe = child.stderr.take().expect("stderr was piped");
    let mut stdout_buf = Vec::new();
    let mut stderr_buf = Vec::new();

    let status = tokio::select! {
        status = async {
            let _ = tokio::join!(
                stdout_pipe.read_to_end(&mut stdout_buf),
                stderr_pipe.read_to_end(&mut stderr_buf),
            );
            child.wait().await
        } => Some(status),
        _ = tokio::time::sleep(timeout) => None,
    };

    match status {
        Some(Ok(status)) => Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&stdout_buf).into_owned(),
            stderr: String::from_utf8_lossy(&stderr_buf).into_owned(),
            exit_code: status.code().unwrap_or(-1),
        }),
        Some(Err(e)) => Err(ToolError::execution(format!(
            "Failed to wait for command: {}",
            e
        ))),
        None => {
            debug!(command, "command overran its timeout, killing process group");
            terminate_group(&mut child, pid).await;
            Err(ToolError::Timeout {
                command: command.to_string(),
                seconds: timeout.as_secs(),
            })
        }
    }
}

#[cfg(unix)]
async fn terminate_group(child: &mut Child, pid: Option<u32>) {
    use nix::errno::Errno;
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pid) = pid else {
        // Already reaped; nothing left to signal.
        return;
    };
    let pgid = Pid::from_raw(pid as i32);

    match killpg(pgid, Signal::SIGTERM) {
        Ok(()) => {}
        Err(Errno::ESRCH) => return,
        Err(e) => warn!("SIGTERM to process group {} failed: {}", pid, e),
    }

    if tokio::time::timeout(TERM_GRACE, child.wait()).await.is_ok() {
        return;
    }

    match killpg(pgid, Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => warn!("SIGKILL to process group {} failed: {}", pid, e),
    }
    let _ = child.wait().await;
}

#[cfg(not(unix))]
async fn terminate_group(child: &mut Child, _pid: Option<u32>) {
    let _ = child.kill().await;
}
