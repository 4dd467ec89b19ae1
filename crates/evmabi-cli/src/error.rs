//! CLI error types

use evmabi_codec::{AbiError, DecodeError, EncodeError, ResolveError, TypeError};
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Command needs a definition table
    #[error("No ABI given: pass --abi <file> or set abi_path in the config")]
    MissingAbi,

    /// Codec error
    #[error(transparent)]
    Abi(#[from] AbiError),

    /// ABI file could not be loaded
    #[error("{0:#}")]
    AbiFile(#[from] anyhow::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config error
    #[error("Config error: {0}")]
    Config(String),
}

macro_rules! impl_from_codec {
    ($($t:ty),*) => {
        $(impl From<$t> for CliError {
            fn from(e: $t) -> Self {
                CliError::Abi(e.into())
            }
        })*
    };
}

impl_from_codec!(TypeError, EncodeError, DecodeError, ResolveError);
