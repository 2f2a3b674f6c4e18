//! `gasless-transfer` command line.
//!
//! Reads balances, watches a wallet, checks send-form input and tracks
//! signatures against a Solana RPC endpoint. Signing stays with the smart
//! wallet, so there is no send command here.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use futures_util::StreamExt;
use serde_json::json;

use gasless_transfer::blockchain::amount::{format_major_units, parse_minor_units};
use gasless_transfer::blockchain::{parse_address, RpcClient};
use gasless_transfer::config::{load_or_default, AppConfig};
use gasless_transfer::observability::logging;
use gasless_transfer::{TransferForm, WalletSession};

#[derive(Parser)]
#[command(name = "gasless-transfer")]
#[command(about = "Balance, airdrop and confirmation tooling for passkey smart wallets", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured RPC endpoint
    #[arg(long, env = "SOLANA_RPC_URL")]
    rpc_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the balance of an address
    Balance { address: String },
    /// Poll an address's balance until Ctrl-C
    Watch {
        address: String,
        #[arg(long)]
        interval_ms: Option<u64>,
    },
    /// Validate send-form input without submitting
    Check {
        destination: String,
        amount: String,
        /// Connected smart wallet address
        #[arg(long)]
        sender: Option<String>,
    },
    /// Request a devnet airdrop and wait for confirmation
    Airdrop {
        address: String,
        #[arg(long, default_value = "1")]
        sol: String,
        #[arg(long, default_value_t = 60)]
        timeout_secs: u64,
    },
    /// Wait for a signature to reach the configured commitment
    Confirm {
        signature: String,
        #[arg(long, default_value_t = 60)]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(url) = cli.rpc_url {
        config.rpc.url = url;
    }

    logging::init(&config.observability)?;
    tracing::debug!(rpc_url = %config.rpc.url, "Configuration loaded");

    match cli.command {
        Commands::Balance { address } => balance(&config, &address).await,
        Commands::Watch {
            address,
            interval_ms,
        } => {
            if let Some(ms) = interval_ms {
                config.balance.poll_interval_ms = ms;
            }
            watch(&config, &address).await
        }
        Commands::Check {
            destination,
            amount,
            sender,
        } => check(&config, destination, amount, sender.as_deref()),
        Commands::Airdrop {
            address,
            sol,
            timeout_secs,
        } => airdrop(&config, &address, &sol, timeout_secs).await,
        Commands::Confirm {
            signature,
            timeout_secs,
        } => {
            let client = RpcClient::new(config.rpc.clone())?;
            let status = client.wait_for_confirmation(&signature, timeout_secs).await?;
            print_json(&json!({ "signature": signature, "status": status }))
        }
    }
}

async fn balance(config: &AppConfig, address: &str) -> Result<(), Box<dyn std::error::Error>> {
    let address = parse_address(address)?;
    let client = RpcClient::new(config.rpc.clone())?;
    let lamports = client.get_balance(&address).await?;
    print_json(&json!({
        "address": address.to_string(),
        "lamports": lamports,
        "sol": format_major_units(lamports, config.transfer.units_per_major),
    }))
}

async fn watch(config: &AppConfig, address: &str) -> Result<(), Box<dyn std::error::Error>> {
    let address = parse_address(address)?;
    let client = Arc::new(RpcClient::new(config.rpc.clone())?);
    let session = WalletSession::connect(address);
    let balance_watch = session.watch_balance(client, &config.balance);
    let mut readings = balance_watch.stream();
    let units = config.transfer.units_per_major;

    loop {
        tokio::select! {
            reading = readings.next() => match reading {
                Some(reading) => println!(
                    "{} {} SOL ({} lamports)",
                    session.label(),
                    format_major_units(reading.lamports, units),
                    reading.lamports
                ),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, disconnecting");
                break;
            }
        }
    }

    session.disconnect();
    balance_watch.stopped().await;
    Ok(())
}

fn check(
    config: &AppConfig,
    destination: String,
    amount: String,
    sender: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let sender = sender.map(parse_address).transpose()?;
    let mut form = TransferForm::new(sender, config.transfer.units_per_major);
    form.set_destination(destination);
    form.set_amount(amount);

    print_json(&json!({
        "recipient": form.recipient().map(|p| p.to_string()),
        "lamports": form.minor_units(),
        "destinationHint": form.destination_hint(),
        "amountHint": form.amount_hint(),
        "disabled": form.is_disabled(),
    }))
}

async fn airdrop(
    config: &AppConfig,
    address: &str,
    sol: &str,
    timeout_secs: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let address = parse_address(address)?;
    let lamports = parse_minor_units(sol, config.transfer.units_per_major)
        .ok_or_else(|| format!("Invalid amount '{}'", sol))?;

    let client = RpcClient::new(config.rpc.clone())?;
    let signature = client.request_airdrop(&address, lamports).await?;
    let status = client.wait_for_confirmation(&signature, timeout_secs).await?;
    let balance = client.get_balance(&address).await?;

    print_json(&json!({
        "signature": signature,
        "status": status,
        "lamports": balance,
    }))
}

fn print_json(value: &serde_json::Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
