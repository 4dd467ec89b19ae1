//! Canonical signatures, selectors and topics

use evmabi_crypto::keccak256;
use evmabi_primitives::{Selector, H256};

use crate::abi::ParamType;
use crate::error::TypeError;

/// Canonical signature `name(type,type,...)`.
///
/// Tuple types are written as a parenthesised component list, keeping any
/// array suffix: `tuple[]` with `(uint256,bool)` components becomes
/// `(uint256,bool)[]`.
pub fn signature(name: &str, params: &[ParamType]) -> String {
    let types: Vec<String> = params.iter().map(ToString::to_string).collect();
    format!("{}({})", name, types.join(","))
}

/// Canonical signature from type strings, normalising aliases such as
/// `uint` to `uint256`
pub fn signature_from_types(name: &str, types: &[&str]) -> Result<String, TypeError> {
    let params = types
        .iter()
        .map(|t| ParamType::parse(t))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(signature(name, &params))
}

/// Keccak-256 of the signature text
pub fn signature_hash(signature: &str) -> H256 {
    keccak256(signature.as_bytes())
}

/// First four bytes of the signature hash
pub fn selector(signature: &str) -> Selector {
    signature_hash(signature).selector()
}

/// Full signature hash, used as the first topic of an event log
pub fn topic(signature: &str) -> H256 {
    signature_hash(signature)
}
