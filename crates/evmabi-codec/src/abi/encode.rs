//! Standard (head/tail) ABI encoding

use evmabi_primitives::{u256_to_word, Address, U256, WORD_SIZE};
use tracing::trace;

use super::types::{ParamType, TupleComponent};
use super::value::{hex_bytes, Value};
use crate::error::EncodeError;

/// Encode values against their parameter types.
///
/// The result is the head (one slot per parameter, or the inline width of
/// static tuples and fixed arrays) followed by the tail holding dynamic
/// content. Offsets count from the start of the returned block.
pub fn encode(params: &[ParamType], values: &[Value]) -> Result<Vec<u8>, EncodeError> {
    if params.len() != values.len() {
        return Err(EncodeError::LengthMismatch {
            expected: params.len(),
            got: values.len(),
        });
    }
    let items: Vec<Item<'_>> = params
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (ty, value))| Item {
            ty,
            value,
            path: i.to_string(),
        })
        .collect();
    encode_sequence(&items)
}

/// Encode a function call: `selector || encode(params, values)`
pub fn encode_with_selector(
    selector: [u8; 4],
    params: &[ParamType],
    values: &[Value],
) -> Result<Vec<u8>, EncodeError> {
    let mut out = selector.to_vec();
    out.extend(encode(params, values)?);
    Ok(out)
}

/// Encode a single static value into its 32-byte slot.
///
/// Used for indexed event topics; dynamic types are rejected.
pub fn encode_word(ty: &ParamType, value: &Value) -> Result<[u8; 32], EncodeError> {
    if !ty.is_scalar() {
        return Err(EncodeError::TypeMismatch {
            path: "0".to_string(),
            expected: "single-word type".to_string(),
            got: value.kind(),
        });
    }
    let encoded = encode_value(ty, value, "0")?;
    let mut word = [0u8; 32];
    word.copy_from_slice(&encoded[..WORD_SIZE]);
    Ok(word)
}

struct Item<'a> {
    ty: &'a ParamType,
    value: &'a Value,
    path: String,
}

/// Head/tail layout of one parameter block
fn encode_sequence(items: &[Item<'_>]) -> Result<Vec<u8>, EncodeError> {
    let head_size = items
        .iter()
        .fold(0usize, |acc, item| acc.saturating_add(item.ty.head_size()));

    let mut head = Vec::new();
    let mut tail = Vec::new();

    for item in items {
        let encoded = encode_value(item.ty, item.value, &item.path)?;
        if item.ty.is_dynamic() {
            let offset = head_size.saturating_add(tail.len());
            trace!(path = %item.path, ty = %item.ty, offset, "dynamic parameter");
            head.extend_from_slice(&u256_to_word(&U256::from(offset)));
            tail.extend(encoded);
        } else {
            trace!(path = %item.path, ty = %item.ty, "static parameter");
            head.extend(encoded);
        }
    }

    head.extend(tail);
    Ok(head)
}

/// Full encoding of one value: inline form for static types, tail form for
/// dynamic ones.
fn encode_value(ty: &ParamType, value: &Value, path: &str) -> Result<Vec<u8>, EncodeError> {
    match ty {
        ParamType::Address => Ok(coerce_address(value, path)?.to_word().to_vec()),
        ParamType::Uint(bits) => {
            let v = coerce_uint(ty, *bits, value, path)?;
            Ok(u256_to_word(&v).to_vec())
        }
        ParamType::Int(bits) => {
            let v = coerce_int(ty, *bits, value, path)?;
            Ok(u256_to_word(&v).to_vec())
        }
        ParamType::Bool => {
            let b = match value {
                Value::Bool(b) => *b,
                other => return Err(mismatch(ty, other, path)),
            };
            let mut word = [0u8; 32];
            word[31] = b as u8;
            Ok(word.to_vec())
        }
        ParamType::FixedBytes(size) => {
            let bytes = coerce_fixed_bytes(ty, *size, value, path)?;
            let mut word = [0u8; 32];
            word[..bytes.len()].copy_from_slice(&bytes);
            Ok(word.to_vec())
        }
        ParamType::Bytes => {
            let bytes = coerce_bytes(ty, value, path)?;
            Ok(encode_length_prefixed(&bytes))
        }
        ParamType::String => match value {
            Value::String(s) => Ok(encode_length_prefixed(s.as_bytes())),
            other => Err(mismatch(ty, other, path)),
        },
        ParamType::Array(inner) => {
            let elements = list(ty, value, path)?;
            let items = element_items(inner, elements, path);
            let mut out = u256_to_word(&U256::from(elements.len())).to_vec();
            out.extend(encode_sequence(&items)?);
            Ok(out)
        }
        ParamType::FixedArray(inner, size) => {
            let elements = list(ty, value, path)?;
            if elements.len() != *size {
                return Err(EncodeError::ArrayLengthMismatch {
                    path: path.to_string(),
                    expected: *size,
                    got: elements.len(),
                });
            }
            encode_sequence(&element_items(inner, elements, path))
        }
        ParamType::Tuple(components) => {
            let values = tuple_values(ty, components, value, path)?;
            let items: Vec<Item<'_>> = components
                .iter()
                .zip(values)
                .enumerate()
                .map(|(i, (c, value))| Item {
                    ty: &c.ty,
                    value,
                    path: format!("{}.{}", path, i),
                })
                .collect();
            encode_sequence(&items)
        }
    }
}

fn element_items<'a>(inner: &'a ParamType, elements: &'a [Value], path: &str) -> Vec<Item<'a>> {
    elements
        .iter()
        .enumerate()
        .map(|(i, value)| Item {
            ty: inner,
            value,
            path: format!("{}[{}]", path, i),
        })
        .collect()
}

/// Length word followed by the bytes right-padded to a word boundary
fn encode_length_prefixed(data: &[u8]) -> Vec<u8> {
    let padded_len = data.len().div_ceil(WORD_SIZE) * WORD_SIZE;
    let mut out = Vec::with_capacity(WORD_SIZE + padded_len);
    out.extend_from_slice(&u256_to_word(&U256::from(data.len())));
    out.extend_from_slice(data);
    out.resize(WORD_SIZE + padded_len, 0);
    out
}

pub(crate) fn mismatch(ty: &ParamType, value: &Value, path: &str) -> EncodeError {
    EncodeError::TypeMismatch {
        path: path.to_string(),
        expected: ty.to_string(),
        got: value.kind(),
    }
}

pub(crate) fn coerce_address(value: &Value, path: &str) -> Result<Address, EncodeError> {
    match value {
        Value::Address(a) => Ok(*a),
        Value::String(s) => Address::from_hex(s).map_err(|_| EncodeError::InvalidAddress {
            path: path.to_string(),
            value: s.clone(),
        }),
        Value::FixedBytes(b) | Value::Bytes(b) => {
            Address::from_slice(b).map_err(|_| EncodeError::InvalidBytesLength {
                path: path.to_string(),
                expected: Address::LEN,
                got: b.len(),
            })
        }
        other => Err(mismatch(&ParamType::Address, other, path)),
    }
}

fn overflow(ty: &ParamType, value: &dyn std::fmt::Display, path: &str) -> EncodeError {
    EncodeError::IntegerOverflow {
        path: path.to_string(),
        ty: ty.to_string(),
        value: value.to_string(),
    }
}

/// Unsigned value checked against `bits`
pub(crate) fn coerce_uint(
    ty: &ParamType,
    bits: usize,
    value: &Value,
    path: &str,
) -> Result<U256, EncodeError> {
    let v = match value {
        Value::Uint(v) => *v,
        Value::Int(v) if !v.is_negative() => v.abs(),
        Value::Int(v) => return Err(overflow(ty, v, path)),
        other => return Err(mismatch(ty, other, path)),
    };
    if v.bits() > bits {
        return Err(overflow(ty, &v, path));
    }
    Ok(v)
}

/// Signed value checked against `bits`, returned as a two's complement word
pub(crate) fn coerce_int(
    ty: &ParamType,
    bits: usize,
    value: &Value,
    path: &str,
) -> Result<U256, EncodeError> {
    let v = match value {
        Value::Int(v) => *v,
        Value::Uint(v) => evmabi_primitives::I256::new(*v, false),
        other => return Err(mismatch(ty, other, path)),
    };
    if !v.fits_bits(bits) {
        return Err(overflow(ty, &v, path));
    }
    Ok(v.to_twos_complement())
}

/// Exactly `size` bytes for a `bytesN` parameter
pub(crate) fn coerce_fixed_bytes(
    ty: &ParamType,
    size: usize,
    value: &Value,
    path: &str,
) -> Result<Vec<u8>, EncodeError> {
    let bytes = match value {
        Value::FixedBytes(b) | Value::Bytes(b) => b.clone(),
        Value::Address(a) => a.as_bytes().to_vec(),
        Value::String(s) => hex_bytes(s).ok_or_else(|| EncodeError::InvalidHex {
            path: path.to_string(),
            value: s.clone(),
        })?,
        other => return Err(mismatch(ty, other, path)),
    };
    if bytes.len() != size {
        return Err(EncodeError::InvalidBytesLength {
            path: path.to_string(),
            expected: size,
            got: bytes.len(),
        });
    }
    Ok(bytes)
}

/// Raw content of a dynamic `bytes` parameter
pub(crate) fn coerce_bytes(ty: &ParamType, value: &Value, path: &str) -> Result<Vec<u8>, EncodeError> {
    match value {
        Value::Bytes(b) | Value::FixedBytes(b) => Ok(b.clone()),
        Value::Address(a) => Ok(a.as_bytes().to_vec()),
        Value::String(s) => hex_bytes(s).ok_or_else(|| EncodeError::InvalidHex {
            path: path.to_string(),
            value: s.clone(),
        }),
        other => Err(mismatch(ty, other, path)),
    }
}

pub(crate) fn list<'a>(ty: &ParamType, value: &'a Value, path: &str) -> Result<&'a [Value], EncodeError> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(mismatch(ty, other, path)),
    }
}

/// Tuple component values in declaration order, from a list or a record
pub(crate) fn tuple_values<'a>(
    ty: &ParamType,
    components: &[TupleComponent],
    value: &'a Value,
    path: &str,
) -> Result<Vec<&'a Value>, EncodeError> {
    match value {
        Value::List(items) => {
            if items.len() != components.len() {
                return Err(EncodeError::ArrayLengthMismatch {
                    path: path.to_string(),
                    expected: components.len(),
                    got: items.len(),
                });
            }
            Ok(items.iter().collect())
        }
        Value::Record(fields) => components
            .iter()
            .map(|c| {
                fields
                    .iter()
                    .find(|(name, _)| *name == c.name)
                    .map(|(_, v)| v)
                    .ok_or_else(|| EncodeError::MissingField {
                        path: path.to_string(),
                        field: c.name.clone(),
                    })
            })
            .collect(),
        other => Err(mismatch(ty, other, path)),
    }
}
