//! Common error types for primitives

use thiserror::Error;
use crate::address::AddressError;
use crate::hash::HashError;
use crate::int::IntError;

/// Primitive operation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// Address error
    #[error("address error: {0}")]
    Address(#[from] AddressError),

    /// Hash or selector error
    #[error("hash error: {0}")]
    Hash(#[from] HashError),

    /// Integer literal error
    #[error("integer error: {0}")]
    Int(#[from] IntError),
}
