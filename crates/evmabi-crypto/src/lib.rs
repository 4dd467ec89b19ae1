//! # evmabi-crypto
//!
//! Hashing used by the contract ABI codec.
//!
//! - Keccak-256, the signature hash behind selectors and event topics
//! - EIP-55 mixed-case address checksums

#![warn(missing_docs)]
#![warn(clippy::all)]

mod checksum;
mod error;
mod hash;

pub use checksum::{parse_checksummed, to_checksum};
pub use error::CryptoError;
pub use hash::{keccak256, keccak256_concat};
