// Toolsmith - run one batch of tool calls from the terminal
//
// Reads an assistant message (JSON with a `tool_calls` array), executes the
// batch under the interactive approval flow, and prints the result messages.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use toolsmith::config::Settings;
use toolsmith::hooks::{NoopSink, ReadOnlyGate};
use toolsmith::messages::AssistantMessage;
use toolsmith::tools::{ApprovalEngine, TerminalPrompter, ToolExecutor, ToolRegistry};

#[derive(Parser)]
#[command(name = "toolsmith", version, about = "Tool-invocation execution engine")]
struct Args {
    /// Path to a JSON file holding the assistant message to execute.
    message: PathBuf,

    /// Bypass interactive approval prompts (hard-deny rules still apply).
    #[arg(long)]
    yolo: bool,

    /// Planning mode: read-only tools only.
    #[arg(long)]
    plan: bool,

    /// Explicit path to the external tool config file.
    #[arg(long)]
    tools_file: Option<PathBuf>,

    /// Print the tool definitions that would be advertised to the model.
    #[arg(long)]
    list_tools: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut settings = Settings::from_env();
    if args.yolo {
        settings.yolo_mode = true;
    }
    if let Some(path) = args.tools_file {
        settings.tools_file_override = Some(path);
    }

    let mut registry = ToolRegistry::new(settings.clone());
    registry.load_external(&mut NoopSink).await;

    if args.list_tools {
        let definitions = registry.get_tool_definitions().await;
        println!("{}", serde_json::to_string_pretty(&definitions)?);
        registry.cleanup().await;
        return Ok(());
    }

    let approvals = ApprovalEngine::new(
        settings.config_dir.clone(),
        settings.truncation_limit,
        Box::new(TerminalPrompter),
    );
    let mut executor = ToolExecutor::new(settings, registry, approvals);
    if args.plan {
        executor = executor.with_planning_gate(Box::new(ReadOnlyGate::default()));
    }

    let contents = std::fs::read_to_string(&args.message)
        .with_context(|| format!("failed to read {}", args.message.display()))?;
    let message: AssistantMessage =
        serde_json::from_str(&contents).context("invalid assistant message")?;

    let (results, cancel_all) = executor.execute_tool_calls(&message).await;
    executor.cleanup().await;

    println!("{}", serde_json::to_string_pretty(&results)?);
    if cancel_all {
        eprintln!("Remaining tool calls were cancelled by the user.");
    }
    eprintln!("{}", executor.stats().summary());

    Ok(())
}
