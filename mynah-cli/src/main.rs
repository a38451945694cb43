//! Mynah CLI: serves the Mynah meeting assistant API as MCP tools.
//!
//! The default (and usual) mode is `serve`: speak MCP over stdio until the
//! host closes the pipe. Stdout carries the protocol, so all logging goes to
//! stderr and a JSON log file.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use mynah_core::config::load_config;
use mynah_mcp::transport::StdioTransport;
use mynah_mcp::McpServer;
use mynah_tools::client::MynahClient;
use mynah_tools::registry::ToolRegistry;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Mynah: your meetings, on tap for LLMs
#[derive(Parser, Debug)]
#[command(name = "mynah", version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    /// Subcommand; defaults to `serve`
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the MCP server on stdio (the default)
    Serve,
    /// List the tools this server exposes
    Tools,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    // Human-readable layer for stderr; stdout is reserved for the protocol.
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    // JSON file layer for structured logging
    let log_dir = directories::ProjectDirs::from("dev", "mynah", "mynah")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "mynah.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve().await,
        Commands::Tools => list_tools(),
    }
}

/// Run the MCP server over stdio until the host closes the pipe.
async fn serve() -> anyhow::Result<()> {
    let config = load_config().map_err(|e| anyhow::anyhow!("Configuration error: {e}"))?;
    let client =
        Arc::new(MynahClient::new(&config).map_err(|e| anyhow::anyhow!("Client error: {e}"))?);

    let mut registry = ToolRegistry::new();
    mynah_tools::register_builtin_tools(&mut registry, client);

    info!(
        tools = registry.len(),
        base_url = %config.base_url,
        "Serving Mynah tools over MCP stdio"
    );

    let mut server = McpServer::new(Arc::new(registry));
    let mut transport = StdioTransport::new();
    server
        .run(&mut transport)
        .await
        .map_err(|e| anyhow::anyhow!("MCP server error: {e}"))
}

/// Print the tool table without touching the network.
///
/// Registration needs a client, so one is built with a placeholder key; no
/// tool executes here, so nothing ever goes on the wire.
fn list_tools() -> anyhow::Result<()> {
    let config = mynah_core::MynahConfig {
        api_key: "unused".to_string(),
        ..mynah_core::MynahConfig::default()
    };
    let client = Arc::new(MynahClient::new(&config)?);

    let mut registry = ToolRegistry::new();
    mynah_tools::register_builtin_tools(&mut registry, client);

    let mut names = registry.list_names();
    names.sort();

    println!("{:<20} {:<12} DESCRIPTION", "TOOL", "RISK");
    for name in names {
        if let Some(tool) = registry.get(&name) {
            println!(
                "{:<20} {:<12} {}",
                tool.name(),
                tool.risk_level().to_string(),
                tool.description()
            );
        }
    }
    Ok(())
}
