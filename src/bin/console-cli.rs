use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use console_gateway::config::load_config;

#[derive(Parser)]
#[command(name = "console-cli")]
#[command(about = "Operator tooling for the console gateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a bcrypt hash for an account's password_hash field
    HashPassword {
        password: String,

        #[arg(long, default_value_t = bcrypt::DEFAULT_COST)]
        cost: u32,
    },
    /// Load and validate a configuration file
    CheckConfig { path: PathBuf },
    /// Query a running gateway's health endpoint
    Status {
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::HashPassword { password, cost } => {
            println!("{}", bcrypt::hash(password, cost)?);
        }
        Commands::CheckConfig { path } => match load_config(Some(&path)) {
            Ok(config) => {
                println!(
                    "OK: {} account(s), backend {}, {} guard rule(s)",
                    config.accounts.len(),
                    config.backend.base_url,
                    config.console.guards.len()
                );
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Status { url } => {
            let res = reqwest::get(format!("{}/healthz", url.trim_end_matches('/'))).await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
