//! # evmabi
//!
//! Command-line interface for the evmabi contract ABI codec.
//!
//! ## Usage
//!
//! ```bash
//! # Raw parameter codec
//! evmabi encode "(string,uint256,bool)" wagmi 420 true
//! evmabi decode "(string,uint256,bool)" 0x...
//! evmabi encode-packed "(address,uint256)" 0x742d35cc6634c0532925a3b844bc9e7595f0ab3d 420
//!
//! # Signatures
//! evmabi selector "transfer(address,uint256)"
//! evmabi topic "Transfer(address,address,uint256)"
//! evmabi signature "function balanceOf(address owner) view returns (uint256)"
//!
//! # Against a definition table
//! evmabi --abi erc20.json calldata transfer 0x742d... 1000
//! evmabi --abi erc20.json decode-calldata 0xa9059cbb...
//! evmabi --abi erc20.json decode-event --topic 0xddf2... --topic 0x... --data 0x...
//! evmabi decode-error 0x08c379a0...
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

use commands::codec::{DecodeArgs, EncodeArgs};
use commands::contract::{CalldataArgs, DecodeCalldataArgs, DecodeErrorArgs, DecodeEventArgs};
use commands::signature::SignatureArgs;
use commands::Context;

/// Ethereum contract ABI codec
#[derive(Parser, Debug)]
#[command(name = "evmabi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Definition table: JSON ABI or human-readable declarations
    #[arg(long, global = true)]
    abi: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Encode values with the standard encoding
    Encode(EncodeArgs),
    /// Decode standard-encoded data
    Decode(DecodeArgs),
    /// Encode values with the packed encoding
    EncodePacked(EncodeArgs),
    /// Function selector of a signature
    Selector(SignatureArgs),
    /// Event topic of a signature
    Topic(SignatureArgs),
    /// Canonical signature and hash of a declaration
    Signature(SignatureArgs),
    /// Encode a function call
    Calldata(CalldataArgs),
    /// Decode a function call
    DecodeCalldata(DecodeCalldataArgs),
    /// Decode an event log
    DecodeEvent(DecodeEventArgs),
    /// Decode revert data
    DecodeError(DecodeErrorArgs),
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set the default ABI file
        #[arg(long)]
        set_abi: Option<PathBuf>,
        /// Set the default log filter
        #[arg(long)]
        set_log_level: Option<String>,
        /// Set the default output mode
        #[arg(long)]
        set_json: Option<bool>,
    },
}

fn main() {
    let cli = Cli::parse();
    let mut config = Config::load();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(cli.log_level.as_deref().unwrap_or(&config.log_level))
    });
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let json = cli.json || config.json;
    let ctx = Context::new(json, cli.abi.or_else(|| config.abi_path.clone()));

    let result = match cli.command {
        Commands::Encode(args) => args.encode(&ctx),
        Commands::Decode(args) => args.execute(&ctx),
        Commands::EncodePacked(args) => args.encode_packed(&ctx),
        Commands::Selector(args) => args.selector(&ctx),
        Commands::Topic(args) => args.topic(&ctx),
        Commands::Signature(args) => args.signature(&ctx),
        Commands::Calldata(args) => args.execute(&ctx),
        Commands::DecodeCalldata(args) => args.execute(&ctx),
        Commands::DecodeEvent(args) => args.execute(&ctx),
        Commands::DecodeError(args) => args.execute(&ctx),
        Commands::Config {
            show,
            set_abi,
            set_log_level,
            set_json,
        } => handle_config(&mut config, show, set_abi, set_log_level, set_json, json),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn handle_config(
    config: &mut Config,
    show: bool,
    set_abi: Option<PathBuf>,
    set_log_level: Option<String>,
    set_json: Option<bool>,
    json: bool,
) -> Result<(), CliError> {
    let mut modified = false;

    if let Some(path) = set_abi {
        let path = std::fs::canonicalize(&path)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
        config.abi_path = Some(path);
        modified = true;
    }

    if let Some(level) = set_log_level {
        EnvFilter::try_new(&level).map_err(|e| CliError::Config(e.to_string()))?;
        config.log_level = level;
        modified = true;
    }

    if let Some(value) = set_json {
        config.json = value;
        modified = true;
    }

    if modified {
        let path = config.save()?;
        Output::new(json)
            .field("status", "saved")
            .field("path", &path.display().to_string())
            .line(&format!("Configuration saved to {}", path.display()))
            .print();
    } else if show {
        let abi = config
            .abi_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        Output::new(json)
            .field("abi_path", &abi)
            .field_value("json", serde_json::Value::Bool(config.json))
            .field("log_level", &config.log_level)
            .line(&format!("ABI: {}", if abi.is_empty() { "-" } else { abi.as_str() }))
            .line(&format!("JSON output: {}", config.json))
            .line(&format!("Log level: {}", config.log_level))
            .print();
    } else {
        Output::new(json)
            .line("Use --show to display config, or --set-abi/--set-log-level/--set-json to modify")
            .print();
    }

    Ok(())
}
