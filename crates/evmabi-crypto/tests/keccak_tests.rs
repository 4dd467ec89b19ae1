//! Tests for signature hashing and address checksums

use evmabi_crypto::{keccak256, keccak256_concat, parse_checksummed, to_checksum, CryptoError};
use evmabi_primitives::{Address, H256};

// =============================================================================
// keccak256
// =============================================================================

mod keccak256_tests {
    use super::*;

    #[test]
    fn event_topic_vector() {
        let expected =
            H256::from_hex("0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef")
                .unwrap();
        assert_eq!(keccak256(b"Transfer(address,address,uint256)"), expected);
    }

    #[test]
    fn error_string_selector() {
        assert_eq!(&keccak256(b"Error(string)").as_bytes()[..4], &[0x08, 0xc3, 0x79, 0xa0]);
    }

    #[test]
    fn panic_selector() {
        assert_eq!(&keccak256(b"Panic(uint256)").as_bytes()[..4], &[0x4e, 0x48, 0x7b, 0x71]);
    }

    #[test]
    fn concat_matches_single_buffer() {
        let joined = keccak256(b"transfer(address,uint256)");
        let parts = keccak256_concat(&[&b"transfer("[..], &b"address,uint256"[..], &b")"[..]]);
        assert_eq!(joined, parts);
    }

    #[test]
    fn concat_of_nothing_is_empty_hash() {
        assert_eq!(keccak256_concat(&[]), keccak256(&[]));
    }
}

// =============================================================================
// EIP-55 checksums
// =============================================================================

mod checksum_tests {
    use super::*;

    const CHECKSUMMED: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

    #[test]
    fn lowercase_input_formats_with_checksum() {
        let addr = Address::from_hex(&CHECKSUMMED.to_lowercase()).unwrap();
        assert_eq!(to_checksum(&addr), CHECKSUMMED);
    }

    #[test]
    fn zero_address_has_no_letters() {
        assert_eq!(to_checksum(&Address::ZERO), format!("0x{}", "0".repeat(40)));
    }

    #[test]
    fn single_case_input_skips_check() {
        assert!(parse_checksummed(&CHECKSUMMED.to_lowercase()).is_ok());
        let upper = format!("0x{}", CHECKSUMMED[2..].to_uppercase());
        assert!(parse_checksummed(&upper).is_ok());
    }

    #[test]
    fn wrong_casing_is_rejected() {
        let broken = CHECKSUMMED.replace("fB69", "Fb69");
        match parse_checksummed(&broken) {
            Err(CryptoError::BadChecksum { expected }) => assert_eq!(expected, CHECKSUMMED),
            other => panic!("expected checksum error, got {:?}", other),
        }
    }

    #[test]
    fn malformed_address_is_rejected() {
        assert!(matches!(
            parse_checksummed("0x1234"),
            Err(CryptoError::InvalidAddress(_))
        ));
    }
}
