//! `hotelsocial`: operator CLI over the HotelSocial auth API.
//!
//! Shares the browser client's session core: same middleware chain, same
//! token keys, same `auth-storage` snapshot, persisted to a JSON file
//! instead of `localStorage`.

mod commands;
mod error;
mod file_storage;
mod navigator;
mod transport;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use hotelsocial_session::ApiConfig;
use hotelsocial_session::claims::DEFAULT_REFRESH_LEAD_MINUTES;
use serde_json::Value;

use crate::commands::{CliContext, Command};
use crate::error::CliError;
use crate::file_storage::FileStorage;

#[derive(Parser, Debug)]
#[command(name = "hotelsocial", about = "HotelSocial auth API CLI")]
struct Cli {
    #[arg(
        long,
        env = "HOTELSOCIAL_API_BASE_URL",
        default_value = "http://127.0.0.1:5000"
    )]
    base_url: String,

    #[arg(long, env = "HOTELSOCIAL_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    #[arg(long, env = "HOTELSOCIAL_REFRESH_LEAD_MINUTES", default_value_t = DEFAULT_REFRESH_LEAD_MINUTES)]
    refresh_lead_minutes: u32,

    /// JSON file holding the stored tokens and user snapshot.
    #[arg(
        long,
        env = "HOTELSOCIAL_TOKEN_STORE",
        default_value = ".hotelsocial-session.json"
    )]
    token_store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn context(&self) -> CliContext {
        CliContext {
            config: ApiConfig {
                timeout: Duration::from_secs(self.timeout_secs),
                refresh_lead_minutes: self.refresh_lead_minutes,
                ..ApiConfig::with_base_url(self.base_url.trim())
            },
            storage: FileStorage::new(&self.token_store),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = cli.context();
    match run(&ctx, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(ctx: &CliContext, command: Command) -> Result<(), CliError> {
    let output = commands::execute(ctx, command).await?;
    print_json(&output)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = match value {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other)?,
    };
    println!("{rendered}");
    Ok(())
}
