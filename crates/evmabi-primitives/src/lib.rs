//! # evmabi-primitives
//!
//! Fixed-width values that appear in contract ABI words: addresses,
//! 32-byte hashes, 4-byte selectors and 256-bit integers.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;
mod int;

pub use address::{Address, AddressError};
pub use error::PrimitiveError;
pub use hash::{HashError, Selector, H256};
pub use int::{parse_u256, IntError, I256};

// Re-export primitive-types for U256
pub use primitive_types::U256;

/// Size of one ABI word in bytes
pub const WORD_SIZE: usize = 32;

/// Big-endian 32-byte word of an unsigned integer
pub fn u256_to_word(value: &U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u256_to_word() {
        let word = u256_to_word(&U256::from(0x1a4u64));
        assert_eq!(word[30], 0x01);
        assert_eq!(word[31], 0xa4);
        assert!(word[..30].iter().all(|b| *b == 0));
    }
}
