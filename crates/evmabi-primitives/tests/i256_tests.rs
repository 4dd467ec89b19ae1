//! Tests for the signed 256-bit integer

use evmabi_primitives::{parse_u256, I256, U256};
use proptest::prelude::*;

// =============================================================================
// Literal parsing
// =============================================================================

mod parsing {
    use super::*;

    #[test]
    fn decimal_and_hex_agree() {
        let dec: I256 = "-69420".parse().unwrap();
        let hex: I256 = "-0x10f2c".parse().unwrap();
        assert_eq!(dec, hex);
        assert_eq!(dec.to_string(), "-69420");
    }

    #[test]
    fn negative_zero_is_zero() {
        let zero: I256 = "-0".parse().unwrap();
        assert!(!zero.is_negative());
        assert_eq!(zero, I256::ZERO);
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<I256>().is_err());
        assert!("12a".parse::<I256>().is_err());
        assert!("0x".parse::<I256>().is_err());
        assert!("--1".parse::<I256>().is_err());
    }

    #[test]
    fn u256_bounds() {
        let max = format!("0x{}", "f".repeat(64));
        assert_eq!(parse_u256(&max).unwrap(), U256::MAX);
        assert!(parse_u256(&format!("0x1{}", "0".repeat(64))).is_err());
        assert_eq!(parse_u256(&format!("0x000{}", "f".repeat(64))).unwrap(), U256::MAX);
    }
}

// =============================================================================
// Width checks
// =============================================================================

mod widths {
    use super::*;

    #[test]
    fn int8_range() {
        assert!(I256::from_i128(127).fits_bits(8));
        assert!(I256::from_i128(-128).fits_bits(8));
        assert!(!I256::from_i128(128).fits_bits(8));
        assert!(!I256::from_i128(-129).fits_bits(8));
    }

    #[test]
    fn invalid_widths() {
        assert!(!I256::ZERO.fits_bits(0));
        assert!(!I256::ZERO.fits_bits(257));
    }

    #[test]
    fn int256_min_round_trips() {
        let min = I256::new(U256::one() << 255, true);
        assert!(min.fits_bits(256));
        let word = min.to_twos_complement();
        assert_eq!(word, U256::one() << 255);
        assert_eq!(I256::from_twos_complement(word), min);
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn twos_complement_round_trips(v in any::<i128>()) {
        let value = I256::from_i128(v);
        prop_assert_eq!(I256::from_twos_complement(value.to_twos_complement()), value);
    }

    #[test]
    fn as_i64_matches_native(v in any::<i64>()) {
        prop_assert_eq!(I256::from(v).as_i64(), Some(v));
    }

    #[test]
    fn display_parses_back(v in any::<i128>()) {
        let value = I256::from_i128(v);
        prop_assert_eq!(value.to_string(), v.to_string());
        prop_assert_eq!(value.to_string().parse::<I256>().unwrap(), value);
    }

    #[test]
    fn fits_bits_matches_i64_range(v in any::<i128>()) {
        let expected = v >= i64::MIN as i128 && v <= i64::MAX as i128;
        prop_assert_eq!(I256::from_i128(v).fits_bits(64), expected);
    }
}
