//! MCP Git - commit history and Kimai timesheets for language-model agents
//!
//! # Usage
//! ```bash
//! mcp-git                                  # Serve MCP over stdio
//! mcp-git --default-repo ~/src/project     # Fallback repo for calls without repo_path
//! mcp-git --env-file ~/.config/mcp-git.env # Load KIMAI_API_URL / KIMAI_API_TOKEN from a file
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcp_git::config::{
    KimaiConfig, ServerConfig, DEFAULT_GIT_TIMEOUT_SECS, DEFAULT_HTTP_TIMEOUT_SECS,
};
use mcp_git::mcp::{transport, McpServer};

/// MCP Git - commit history and Kimai timesheets over the Model Context Protocol
#[derive(Parser)]
#[command(name = "mcp-git")]
#[command(about = "MCP server for git history and Kimai timesheets", long_about = None)]
struct Cli {
    /// Repository used when a call omits repo_path (defaults to the working directory)
    #[arg(long, value_name = "PATH")]
    default_repo: Option<PathBuf>,

    /// .env file to load instead of ./.env
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Seconds before a git invocation is killed
    #[arg(long, default_value_t = DEFAULT_GIT_TIMEOUT_SECS)]
    git_timeout_secs: u64,

    /// Seconds before a Kimai request is abandoned
    #[arg(long, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    http_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.env_file {
        Some(path) => {
            dotenv::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
        }
        None => {
            dotenv::dotenv().ok();
        }
    }

    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| cli.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let kimai = KimaiConfig::from_env();
    if kimai.is_none() {
        tracing::warn!("KIMAI_API_URL / KIMAI_API_TOKEN not set; push_kimai_entries will fail");
    }

    let mut config = ServerConfig {
        git_timeout: Duration::from_secs(cli.git_timeout_secs),
        http_timeout: Duration::from_secs(cli.http_timeout_secs),
        kimai,
        ..ServerConfig::default()
    };
    if let Some(repo) = cli.default_repo {
        config.default_repo = repo;
    }

    let server = McpServer::new(config).context("Failed to start MCP server")?;
    tracing::info!("mcp-git running on stdio");

    transport::serve_stdio(&server).await?;

    Ok(())
}
