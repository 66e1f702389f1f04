//! Quiz console gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                CONSOLE GATEWAY               │
//!   Browser request   │  ┌──────────┐   ┌────────────┐               │
//!   ──────────────────┼─▶│  layers  │──▶│ page guard │──┐            │
//!                     │  │ id/trace │   └────────────┘  │            │
//!                     │  └──────────┘                   ▼            │
//!                     │        ┌──────────────┬──────────────────┐   │
//!                     │        │  /auth/*     │   /proxy/*       │   │
//!                     │        │  sessions    │   session → token│───┼──▶ Backend API
//!                     │        └──────────────┴──────────────────┘   │
//!                     │  ┌────────────────────────────────────────┐  │
//!                     │  │ config · observability · lifecycle     │  │
//!                     │  └────────────────────────────────────────┘  │
//!                     └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use console_gateway::config::load_config;
use console_gateway::lifecycle::{signals, startup, Shutdown};
use console_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "console-gateway")]
#[command(about = "Authenticated API proxy and session server for the quiz admin console")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "CONSOLE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "console-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.base_url,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let run = startup::run(config, &shutdown);
    tokio::pin!(run);

    tokio::select! {
        result = &mut run => result?,
        _ = signals::wait_for_termination() => {
            shutdown.trigger();
            run.await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
