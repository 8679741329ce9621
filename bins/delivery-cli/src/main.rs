//! Delivery CLI - merchant operations from the terminal
//!
//! Logs in with the platform credentials and exercises the merchant API:
//! merchants, orders and the event queue.

use clap::{Parser, Subcommand};
use delivery_telemetry::{LogFormat, TelemetryConfig};
use owo_colors::OwoColorize;
use std::process::ExitCode;

mod commands;
mod output;
mod session;

use commands::{auth, events, merchants, order};
use session::Login;

/// Merchant API operator CLI
#[derive(Parser)]
#[command(name = "delivery")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Merchant account username
    #[arg(long, global = true, env = "DELIVERY_USERNAME")]
    username: Option<String>,

    /// Merchant account password
    #[arg(long, global = true, env = "DELIVERY_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and show the issued token's lifetime
    Auth,

    /// List merchants, or show one merchant with its statuses
    Merchants {
        /// Merchant ID to inspect
        #[arg(long)]
        id: Option<String>,
    },

    /// Show order details
    Order {
        /// Order reference
        reference: String,

        /// Include courier tracking
        #[arg(short, long)]
        tracking: bool,
    },

    /// Poll the event queue
    Events {
        /// Acknowledge the polled events
        #[arg(long)]
        ack: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        let format = if cli.format == "json" {
            LogFormat::Json
        } else {
            LogFormat::Compact
        };
        if let Err(e) = delivery_telemetry::init_with_config(
            TelemetryConfig::verbose().with_format(format),
        ) {
            eprintln!("{} {}", "Warning:".yellow().bold(), e);
        }
    }

    let login = Login::new(cli.username, cli.password);

    let result = match cli.command {
        Commands::Auth => auth::run(&login, &cli.format).await,
        Commands::Merchants { id } => merchants::run(&login, id.as_deref(), &cli.format).await,
        Commands::Order {
            reference,
            tracking,
        } => order::run(&login, &reference, tracking, &cli.format).await,
        Commands::Events { ack } => events::run(&login, ack, &cli.format).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
