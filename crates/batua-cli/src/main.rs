use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use batua_core::types::format_sol;
use batua_core::upload::LogoFile;
use batua_core::{
    faucet, signing, transfer, BatuaConfig, CloudinaryHost, LaunchOutcome, Launchpad,
    PinataPinner, WalletSession,
};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "batua")]
#[command(about = "Batua Solana wallet: airdrops, transfers, message signing and token launches")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true, env = "BATUA_CONFIG")]
    config: Option<PathBuf>,

    /// Solana CLI keypair file for the connected wallet
    #[arg(short, long, global = true)]
    keypair: Option<PathBuf>,

    /// RPC URL for the Solana cluster
    #[arg(short, long, global = true)]
    rpc_url: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the connected wallet address
    Address,
    /// Print the connected wallet balance
    Balance,
    /// Request test SOL for the connected wallet
    Airdrop {
        /// Amount in SOL (0.1 to 5)
        #[arg(default_value = "1")]
        amount: String,
    },
    /// Send SOL to another address
    Send {
        recipient: String,
        /// Amount in SOL
        amount: String,
    },
    /// Sign a message with the connected wallet
    Sign { message: String },
    /// Verify a Base58 signature over a message
    Verify {
        message: String,
        signature: String,
        /// Signer address; defaults to the connected wallet
        #[arg(long)]
        pubkey: Option<String>,
    },
    /// Create a Token-2022 token with metadata and mint its supply to you
    Launch {
        #[arg(long)]
        name: String,
        /// Up to 5 characters, uppercased
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value = "9")]
        decimals: String,
        #[arg(long, default_value = "1000000")]
        supply: String,
        #[arg(long, default_value = "")]
        description: String,
        /// JPEG or PNG logo, at most 2MB
        #[arg(long)]
        logo: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("batua={default_level},batua_core={default_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<BatuaConfig> {
    let mut config = BatuaConfig::load(cli.config.as_deref())?;
    if let Some(path) = &cli.keypair {
        config.wallet.keypair_path = Some(path.clone());
    }
    if let Some(url) = &cli.rpc_url {
        config.rpc.url = url.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;

    // Verifying against an explicit key needs no wallet.
    if let Command::Verify { message, signature, pubkey: Some(pubkey) } = &cli.command {
        return verify(message, signature, pubkey);
    }

    let session = WalletSession::from_config(&config)?;
    let result = run(cli.command, &config, &session).await;
    session.disconnect();
    result
}

async fn run(command: Command, config: &BatuaConfig, session: &WalletSession) -> Result<()> {
    match command {
        Command::Address => println!("{}", session.pubkey()),
        Command::Balance => {
            let lamports = transfer::balance(session).await?;
            println!("{} SOL", format_sol(lamports));
        }
        Command::Airdrop { amount } => {
            faucet::request_airdrop(session, &amount)
                .await
                .context("Airdrop failed. Please try again.")?;
            println!("Successfully airdropped {amount} SOL to your wallet");
        }
        Command::Send { recipient, amount } => {
            let signature = transfer::send_sol(session, &recipient, &amount)
                .await
                .context("Transaction failed. Please try again.")?;
            println!(
                "Successfully sent {amount} SOL to {}",
                transfer::shorten_address(recipient.trim())
            );
            println!("{signature}");
        }
        Command::Sign { message } => {
            let record = signing::sign_message(session, &message)?;
            println!("Message signed successfully");
            println!("{}", record.encoded);
        }
        Command::Verify { message, signature, pubkey } => {
            let pubkey = pubkey.unwrap_or_else(|| session.pubkey().to_string());
            verify(&message, &signature, &pubkey)?;
        }
        Command::Launch { name, symbol, decimals, supply, description, logo } => {
            let launchpad = Launchpad::new(
                Arc::new(CloudinaryHost::new(&config.image_host)),
                Arc::new(PinataPinner::new(&config.pinning)),
            );
            launchpad.edit_form(|form| {
                form.name = name;
                form.set_symbol(&symbol);
                form.decimals = decimals;
                form.supply = supply;
                form.description = description;
            });
            if let Some(path) = logo {
                launchpad.stage_logo(LogoFile::read(&path)?)?;
            }
            launch(&launchpad, session).await?;
        }
    }
    Ok(())
}

fn verify(message: &str, signature: &str, pubkey: &str) -> Result<()> {
    if signing::verify_input(message, signature, pubkey)? {
        println!("Message Verified Successfully");
        Ok(())
    } else {
        bail!("Message Verified Failed")
    }
}

async fn launch(launchpad: &Launchpad, session: &WalletSession) -> Result<()> {
    let report = match launchpad.create_token(session).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "token creation failed");
            return Err(e).context("Token creation failed. Please try again.");
        }
    };

    println!("{}", report.summary());
    println!("mint: {}", report.mint);
    println!("metadata: {}", report.metadata_uri);
    if let Some(account) = report.token_account {
        println!("token account: {account}");
    }

    if let LaunchOutcome::PartialSuccess { failed_step, .. } = &report.outcome {
        eprintln!("warning: launch stopped at {failed_step}; the mint and its metadata exist on-chain");
    } else {
        info!(signatures = report.signatures.len(), "launch complete");
    }
    Ok(())
}
