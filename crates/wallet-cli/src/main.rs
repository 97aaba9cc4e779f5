//! Octra wallet CLI
//!
//! Generate a wallet, check its balance, or send the fixed 0.01 OCT transfer.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "octra-wallet")]
#[command(about = "Minimal Octra wallet: generate keys and send transfers")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Wallet file (defaults to ~/.octra/wallet.json, then ./wallet.json)
    #[arg(short, long, global = true)]
    wallet: Option<PathBuf>,

    /// Node RPC base URL, overriding the wallet file
    #[arg(long, global = true, env = "OCTRA_RPC")]
    rpc: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new wallet and print it as JSON
    Generate {
        /// Also write the wallet to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing output file
        #[arg(long)]
        force: bool,
    },

    /// Show address, balance and nonce
    Balance,

    /// Send 0.01 OCT to an address
    Send {
        /// Recipient address
        to: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Generate { output, force } => commands::generate(output.as_deref(), force),
        Commands::Balance => commands::balance(cli.wallet.as_deref(), cli.rpc).await,
        Commands::Send { to } => commands::send(cli.wallet.as_deref(), cli.rpc, &to).await,
    }
}
