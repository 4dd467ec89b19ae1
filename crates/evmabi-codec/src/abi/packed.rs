//! Non-standard packed encoding (`abi.encodePacked`)
//!
//! Top-level values take their natural width with no padding and no length
//! prefix. Elements of an array are padded to a full word each. The result
//! is ambiguous by construction and only suitable as a hash preimage.

use evmabi_primitives::{u256_to_word, WORD_SIZE};
use tracing::trace;

use super::encode::{
    coerce_address, coerce_bytes, coerce_fixed_bytes, coerce_int, coerce_uint, list, mismatch,
};
use super::types::ParamType;
use super::value::Value;
use crate::error::{EncodeError, TypeError};

/// Packed-encode values against parameter types
pub fn encode_packed(params: &[ParamType], values: &[Value]) -> Result<Vec<u8>, EncodeError> {
    if params.len() != values.len() {
        return Err(EncodeError::LengthMismatch {
            expected: params.len(),
            got: values.len(),
        });
    }
    let mut out = Vec::new();
    for (i, (ty, value)) in params.iter().zip(values).enumerate() {
        let path = i.to_string();
        trace!(path = %path, ty = %ty, "packed parameter");
        encode_top_level(ty, value, &path, &mut out)?;
    }
    Ok(out)
}

/// Packed-encode values against type strings such as `"address"` or `"uint8[]"`
pub fn encode_packed_str(types: &[&str], values: &[Value]) -> Result<Vec<u8>, EncodeError> {
    let params = types
        .iter()
        .map(|t| ParamType::parse(t))
        .collect::<Result<Vec<_>, TypeError>>()?;
    encode_packed(&params, values)
}

fn unsupported(ty: &ParamType) -> EncodeError {
    EncodeError::UnsupportedPackedType { ty: ty.to_string() }
}

fn encode_top_level(
    ty: &ParamType,
    value: &Value,
    path: &str,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    match ty {
        ParamType::Address => out.extend_from_slice(coerce_address(value, path)?.as_bytes()),
        ParamType::Uint(bits) => {
            let word = u256_to_word(&coerce_uint(ty, *bits, value, path)?);
            out.extend_from_slice(&word[WORD_SIZE - bits / 8..]);
        }
        ParamType::Int(bits) => {
            let word = u256_to_word(&coerce_int(ty, *bits, value, path)?);
            out.extend_from_slice(&word[WORD_SIZE - bits / 8..]);
        }
        ParamType::Bool => match value {
            Value::Bool(b) => out.push(*b as u8),
            other => return Err(mismatch(ty, other, path)),
        },
        ParamType::FixedBytes(size) => out.extend(coerce_fixed_bytes(ty, *size, value, path)?),
        ParamType::Bytes => out.extend(coerce_bytes(ty, value, path)?),
        ParamType::String => match value {
            Value::String(s) => out.extend_from_slice(s.as_bytes()),
            other => return Err(mismatch(ty, other, path)),
        },
        ParamType::Array(inner) | ParamType::FixedArray(inner, _) => {
            if !inner.is_scalar() {
                return Err(unsupported(ty));
            }
            let elements = list(ty, value, path)?;
            if let ParamType::FixedArray(_, size) = ty {
                if elements.len() != *size {
                    return Err(EncodeError::ArrayLengthMismatch {
                        path: path.to_string(),
                        expected: *size,
                        got: elements.len(),
                    });
                }
            }
            for (i, element) in elements.iter().enumerate() {
                let element_path = format!("{}[{}]", path, i);
                out.extend_from_slice(&encode_padded_element(inner, element, &element_path)?);
            }
        }
        ParamType::Tuple(_) => return Err(unsupported(ty)),
    }
    Ok(())
}

/// One array element, padded to a full word the same way the standard
/// encoding pads it
fn encode_padded_element(ty: &ParamType, value: &Value, path: &str) -> Result<[u8; 32], EncodeError> {
    let word = match ty {
        ParamType::Address => coerce_address(value, path)?.to_word(),
        ParamType::Uint(bits) => u256_to_word(&coerce_uint(ty, *bits, value, path)?),
        ParamType::Int(bits) => u256_to_word(&coerce_int(ty, *bits, value, path)?),
        ParamType::Bool => match value {
            Value::Bool(b) => {
                let mut word = [0u8; 32];
                word[31] = *b as u8;
                word
            }
            other => return Err(mismatch(ty, other, path)),
        },
        ParamType::FixedBytes(size) => {
            let bytes = coerce_fixed_bytes(ty, *size, value, path)?;
            let mut word = [0u8; 32];
            word[..bytes.len()].copy_from_slice(&bytes);
            word
        }
        _ => return Err(unsupported(ty)),
    };
    Ok(word)
}
