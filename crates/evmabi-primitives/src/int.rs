//! Signed 256-bit integer in sign-magnitude form

use primitive_types::U256;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Integer parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntError {
    /// Not a decimal or `0x` hex number
    #[error("invalid integer literal: {0}")]
    InvalidLiteral(String),
    /// Magnitude does not fit 256 bits
    #[error("integer literal out of 256-bit range: {0}")]
    OutOfRange(String),
}

/// Signed 256-bit integer.
///
/// Kept as magnitude plus sign; zero is never negative. The ABI word form is
/// produced by [`I256::to_twos_complement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct I256 {
    abs: U256,
    negative: bool,
}

impl I256 {
    /// Zero
    pub const ZERO: I256 = I256 {
        abs: U256([0; 4]),
        negative: false,
    };

    /// Create from magnitude and sign
    pub fn new(abs: U256, negative: bool) -> Self {
        Self {
            abs,
            negative: negative && !abs.is_zero(),
        }
    }

    /// Create from i128
    pub fn from_i128(value: i128) -> Self {
        Self::new(U256::from(value.unsigned_abs()), value < 0)
    }

    /// Absolute value
    pub fn abs(&self) -> U256 {
        self.abs
    }

    /// Whether the value is below zero
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }

    /// Whether the value is representable as a `bits`-wide signed integer
    /// (`-2^(bits-1) <= v < 2^(bits-1)`).
    pub fn fits_bits(&self, bits: usize) -> bool {
        if bits == 0 || bits > 256 {
            return false;
        }
        let half = U256::one() << (bits - 1);
        if self.negative {
            self.abs <= half
        } else {
            self.abs < half
        }
    }

    /// 256-bit two's complement word (`2^256 + v` for negative `v`).
    ///
    /// Values outside the int256 range wrap; callers check `fits_bits(256)`.
    pub fn to_twos_complement(&self) -> U256 {
        if self.negative {
            (!self.abs).overflowing_add(U256::one()).0
        } else {
            self.abs
        }
    }

    /// Interpret a 256-bit word as two's complement
    pub fn from_twos_complement(word: U256) -> Self {
        if word.bit(255) {
            Self::new((!word).overflowing_add(U256::one()).0, true)
        } else {
            Self::new(word, false)
        }
    }

    /// Convert to `i64` if it fits
    pub fn as_i64(&self) -> Option<i64> {
        if !self.fits_bits(64) {
            return None;
        }
        let magnitude = self.abs.low_u64();
        if self.negative {
            Some((magnitude as i64).wrapping_neg())
        } else {
            Some(magnitude as i64)
        }
    }

    /// Parse a decimal (`-12`) or hex (`0x0c`, `-0x0c`) literal
    pub fn from_dec_or_hex(s: &str) -> Result<Self, IntError> {
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        Ok(Self::new(parse_u256(digits)?, negative))
    }
}

/// Parse an unsigned decimal or `0x` hex literal into a `U256`
pub fn parse_u256(s: &str) -> Result<U256, IntError> {
    let invalid = || IntError::InvalidLiteral(s.to_string());
    if let Some(hex_digits) = s.strip_prefix("0x") {
        if hex_digits.is_empty() || !hex_digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let significant = hex_digits.trim_start_matches('0');
        if significant.len() > 64 {
            return Err(IntError::OutOfRange(s.to_string()));
        }
        if significant.is_empty() {
            return Ok(U256::zero());
        }
        return U256::from_str_radix(significant, 16).map_err(|_| invalid());
    }
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    U256::from_dec_str(s).map_err(|_| IntError::OutOfRange(s.to_string()))
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.abs)
        } else {
            write!(f, "{}", self.abs)
        }
    }
}

impl FromStr for I256 {
    type Err = IntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dec_or_hex(s)
    }
}

impl From<i64> for I256 {
    fn from(value: i64) -> Self {
        Self::from_i128(value as i128)
    }
}

impl From<i128> for I256 {
    fn from(value: i128) -> Self {
        Self::from_i128(value)
    }
}
