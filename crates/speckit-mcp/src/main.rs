mod config;
mod init;
mod server;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rmcp::ServiceExt;
use speckit_core::Framework;
use tracing_subscriber::EnvFilter;

use crate::server::SpecKitServer;

#[derive(Debug, Parser)]
#[command(name = "speckit-mcp", version, about = "MCP server for Spec-Kit constitutional context")]
struct Cli {
    /// Framework root holding `memory/` and `chatmodes/`
    #[arg(long, env = "SPEC_KIT_ROOT", global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register speckit-mcp with Claude Code and/or Codex for the current project
    Init,
}

/// Logs go to stderr; stdout carries the protocol.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let root = config::resolve_framework_root(cli.root)?;

    if let Some(Command::Init) = cli.command {
        return init::init_project(&root);
    }

    tracing::info!(root = %root.display(), "Spec-Kit MCP server running on stdio");
    let service = SpecKitServer::new(Framework::new(root))
        .serve(rmcp::transport::io::stdio())
        .await
        .map_err(|e| anyhow::anyhow!("MCP server error: {e}"))?;
    service.waiting().await?;
    Ok(())
}
