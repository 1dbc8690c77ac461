//! atomicwork-mcp - MCP server exposing Atomicwork tickets over stdio.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use atomicwork_client::AtomicworkClient;
use atomicwork_core::Config;
use atomicwork_mcp::{McpServer, ToolHandler};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "atomicwork-mcp")]
#[command(author, version, about = "MCP server for Atomicwork tickets", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Start the MCP server on stdin/stdout (default)
    Serve,

    /// Print the tool catalog as JSON
    Tools,

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout belongs to the protocol.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await?,
        Commands::Tools => {
            let tools = atomicwork_mcp::tools::available_tools();
            println!("{}", serde_json::to_string_pretty(&tools)?);
        }
        Commands::Config => show_config(&config),
    }

    Ok(())
}

async fn serve(config: Config) -> anyhow::Result<()> {
    if !config.has_api_key() {
        tracing::warn!("ATOMICWORK_API_KEY is not set; tool calls will report it");
    }

    let client = AtomicworkClient::from_config(&config).context("Failed to build HTTP client")?;
    let handler = ToolHandler::new(Arc::new(client), config);

    McpServer::new(handler)
        .run()
        .await
        .context("MCP server stopped on I/O error")?;

    Ok(())
}

fn show_config(config: &Config) {
    println!("Current configuration:");
    println!("  api_key:      {}", config.masked_api_key());
    println!("  base_url:     {}", config.base_url);
    println!("  portal_url:   {}", config.portal_url());
    println!("  user_id:      {}", display_or_unset(&config.user_id));
    println!("  workspace_id: {}", display_or_unset(&config.workspace_id));
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}
