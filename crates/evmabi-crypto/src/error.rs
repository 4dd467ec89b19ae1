//! Cryptographic errors

use evmabi_primitives::AddressError;
use thiserror::Error;

/// Cryptographic operation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Address could not be parsed at all
    #[error("invalid address: {0}")]
    InvalidAddress(#[from] AddressError),

    /// Mixed-case address whose casing does not match its checksum
    #[error("bad address checksum: expected {expected}")]
    BadChecksum {
        /// Correctly checksummed form
        expected: String,
    },
}
