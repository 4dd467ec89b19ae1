//! EIP-55 mixed-case checksum addresses

use evmabi_primitives::Address;

use crate::{keccak256, CryptoError};

/// Format an address with EIP-55 checksum casing
pub fn to_checksum(address: &Address) -> String {
    let lower = hex::encode(address.as_bytes());
    let hash = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (hash.as_bytes()[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Parse an address, enforcing the checksum when the input is mixed-case.
///
/// All-lowercase and all-uppercase inputs carry no checksum and are accepted.
pub fn parse_checksummed(s: &str) -> Result<Address, CryptoError> {
    let address = Address::from_hex(s)?;
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        let expected = to_checksum(&address);
        if expected[2..] != *digits {
            return Err(CryptoError::BadChecksum { expected });
        }
    }
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VECTORS: [&str; 4] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn test_checksum_vectors() {
        for vector in VECTORS {
            let address = Address::from_hex(vector).unwrap();
            assert_eq!(to_checksum(&address), vector);
        }
    }

    #[test]
    fn test_parse_checksummed_accepts_valid_and_single_case() {
        for vector in VECTORS {
            assert!(parse_checksummed(vector).is_ok());
            assert!(parse_checksummed(&vector.to_lowercase()).is_ok());
        }
    }

    #[test]
    fn test_parse_checksummed_rejects_bad_casing() {
        let result = parse_checksummed("0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert!(matches!(result, Err(CryptoError::BadChecksum { .. })));
    }

    #[test]
    fn test_parse_checksummed_bad_length() {
        assert!(matches!(
            parse_checksummed("0x1234"),
            Err(CryptoError::InvalidAddress(_))
        ));
    }
}
