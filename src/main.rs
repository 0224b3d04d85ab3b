//! switchyard: HTTP request routing and middleware dispatch.
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum (TraceLayer, TimeoutLayer)
//!                       │
//!                       ▼
//!                 DispatcherHandle ──load──▶ Dispatcher snapshot
//!                                              │
//!                       ┌──────────────────────┼───────────────────────┐
//!                       ▼                      ▼                       ▼
//!               route pipeline            mount target           404 / 405 /
//!          global ++ group ++ route      (prefix stripped)       auto-OPTIONS
//!                 mw + handler
//! ```

mod app;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use switchyard::config::{load_config, AppConfig};
use switchyard::dispatch::{Dispatcher, DispatcherHandle};
use switchyard::lifecycle::{forward_signals, Shutdown};
use switchyard::observability::{init_logging, init_metrics};
use switchyard::routing::RouteTable;
use switchyard::HttpServer;

#[derive(Parser)]
#[command(name = "switchyard")]
#[command(about = "HTTP request routing and middleware dispatch", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the demo application (default)
    Serve,
    /// Print the route table in registration order
    Routes {
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    init_logging(&config.observability);

    let dispatcher = app::build(config.dispatch)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Routes { json } => print_routes(dispatcher.table(), json)?,
        Commands::Serve => serve(config, dispatcher).await?,
    }
    Ok(())
}

async fn serve(config: AppConfig, dispatcher: Dispatcher) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        bind_address = %config.server.bind_address,
        request_timeout_secs = config.server.request_timeout_secs,
        auto_options = config.dispatch.auto_options,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let signals = shutdown.clone();
    tokio::spawn(async move { forward_signals(&signals).await });

    let server = HttpServer::new(&config, DispatcherHandle::new(dispatcher));
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn print_routes(table: &RouteTable, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(&table.info())?);
        return Ok(());
    }
    for info in table.info() {
        println!(
            "{:<5} {:<8} {:<28} {}",
            info.id.to_string(),
            info.method,
            info.pattern,
            info.name.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
