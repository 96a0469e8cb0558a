//! docbase-mcp MCP Server & CLI (Rust)
//!
//! Dual-mode application:
//! - MCP Server Mode (default): Model Context Protocol server using stdio
//! - CLI Mode: Command-line utility for direct tool execution
//!
//! Implements five tools against the DocBase REST API:
//! - `get_post_by_post_id(post_id)` - Fetch one post
//! - `search_posts(query, page, per_page)` - Search the team's posts
//! - `create_post(title, body, ...)` - Create a post
//! - `update_post(post_id, ...)` - Partially update a post
//! - `create_comment(post_id, body, notice)` - Comment on a post

mod cli;
mod config;
mod docbase;
mod error;
mod http;
mod mcp;
mod tools;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use docbase::DocBaseClient;
use error::AppError;
use mcp::{ServerContext, ToolResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_args(&cli.connection);

    match cli.command {
        Some(command) => {
            let log_level = if cli.quiet {
                "error"
            } else if cli.verbose {
                "debug"
            } else {
                "info"
            };
            init_logging(EnvFilter::new(log_level));
            config.warn_if_incomplete();
            run_cli_mode(command, &config).await
        }
        None => {
            init_logging(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));
            config.warn_if_incomplete();
            run_mcp_mode(&config).await
        }
    }
}

/// Logs always go to stderr; stdout carries protocol frames or command output
fn init_logging(filter: EnvFilter) {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run in MCP server mode
async fn run_mcp_mode(config: &Config) -> Result<()> {
    let client = DocBaseClient::new(config.domain.clone(), config.api_token.clone())?;
    info!("Starting docbase-mcp for team '{}'", client.domain());
    debug!("API base URL: {}", client.base_url());
    mcp::handle_stdio(ServerContext::new(client, config.tool_timeout)).await
}

/// Run in CLI mode
async fn run_cli_mode(command: Commands, config: &Config) -> Result<()> {
    let client = match DocBaseClient::new(config.domain.clone(), config.api_token.clone()) {
        Ok(client) => client,
        Err(e) => exit_with(&e),
    };

    let result = match command {
        Commands::GetPost(args) => {
            with_deadline(config.tool_timeout, tools::get_post::execute_get_post(&client, args)).await
        }
        Commands::Search(args) => {
            with_deadline(config.tool_timeout, tools::search_posts::execute_search_posts(&client, args)).await
        }
        Commands::CreatePost(args) => {
            with_deadline(config.tool_timeout, tools::create_post::execute_create_post(&client, args)).await
        }
        Commands::UpdatePost(args) => {
            with_deadline(config.tool_timeout, tools::update_post::execute_update_post(&client, args)).await
        }
        Commands::Comment(args) => {
            with_deadline(
                config.tool_timeout,
                tools::create_comment::execute_create_comment(&client, args),
            )
            .await
        }
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => exit_with(&e),
    }
}

/// Await a tool future under the configured deadline and extract its text
async fn with_deadline<F>(deadline: Duration, fut: F) -> Result<String, AppError>
where
    F: Future<Output = Result<ToolResult, AppError>>,
{
    match timeout(deadline, fut).await {
        Ok(Ok(tool_result)) => Ok(tool_result
            .content
            .first()
            .map(|c| c.text.clone())
            .unwrap_or_default()),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(AppError::Timeout(format!(
            "Request exceeded {} second timeout",
            deadline.as_secs()
        ))),
    }
}

fn exit_with(err: &AppError) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(err.exit_code());
}
