//! Standard (head/tail) ABI decoding

use std::cell::Cell;

use evmabi_primitives::{Address, I256, U256, WORD_SIZE};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::types::ParamType;
use super::value::Value;
use crate::error::DecodeError;

/// Strictness knobs for decoding untrusted data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Reject non-zero bits in the unused part of `bool`, `address` and
    /// `bytesN` words. When off, a non-zero bool word reads as `true`.
    pub strict_padding: bool,
    /// Reject `uintN`/`intN` words outside the declared width. When off, the
    /// word is truncated (and sign-extended for `intN`) to the width.
    pub validate_ranges: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            strict_padding: true,
            validate_ranges: true,
        }
    }
}

impl DecodeOptions {
    /// Accept dirty padding and out-of-range integers
    pub fn lenient() -> Self {
        Self {
            strict_padding: false,
            validate_ranges: false,
        }
    }
}

/// Decode ABI data against parameter types with default options
pub fn decode(params: &[ParamType], data: &[u8]) -> Result<Vec<Value>, DecodeError> {
    decode_with(params, data, &DecodeOptions::default())
}

/// Decode ABI data against parameter types.
///
/// No parameters always yields an empty list, whatever the data. With at
/// least one parameter the data must hold at least one word.
///
/// The decoded output may not account for more words than `data` holds, so
/// offsets that alias one block many times are rejected.
pub fn decode_with(
    params: &[ParamType],
    data: &[u8],
    options: &DecodeOptions,
) -> Result<Vec<Value>, DecodeError> {
    if params.is_empty() {
        return Ok(Vec::new());
    }
    if data.is_empty() {
        return Err(DecodeError::ZeroData);
    }
    if data.len() < WORD_SIZE {
        return Err(DecodeError::DataTooSmall { len: data.len() });
    }

    let decoder = Decoder::new(options, data.len());
    let types: Vec<(&ParamType, String)> = params
        .iter()
        .enumerate()
        .map(|(i, ty)| (ty, i.to_string()))
        .collect();
    decoder.decode_sequence(&types, data)
}

/// Decode one static single-word value, e.g. an indexed event topic
pub fn decode_word(
    ty: &ParamType,
    word: &[u8; 32],
    options: &DecodeOptions,
) -> Result<Value, DecodeError> {
    Decoder::new(options, WORD_SIZE).decode_value(ty, word, "0")
}

struct Decoder<'a> {
    options: &'a DecodeOptions,
    /// Words the output may still account for
    budget: Cell<usize>,
    limit: usize,
}

impl<'a> Decoder<'a> {
    fn new(options: &'a DecodeOptions, data_len: usize) -> Self {
        let limit = data_len.div_ceil(WORD_SIZE);
        Self {
            options,
            budget: Cell::new(limit),
            limit,
        }
    }

    fn charge(&self, words: usize, path: &str) -> Result<(), DecodeError> {
        let left = self
            .budget
            .get()
            .checked_sub(words)
            .ok_or_else(|| DecodeError::OutputTooLarge {
                path: path.to_string(),
                limit: self.limit,
            })?;
        self.budget.set(left);
        Ok(())
    }

    /// Decode a head/tail block. `block` starts at the first head slot; all
    /// offsets inside it are relative to that position.
    fn decode_sequence(
        &self,
        types: &[(&ParamType, String)],
        block: &[u8],
    ) -> Result<Vec<Value>, DecodeError> {
        let mut values = Vec::with_capacity(types.len());
        let mut head = 0usize;

        for (ty, path) in types {
            if ty.is_dynamic() {
                let offset = read_usize(block, head, path)?;
                trace!(path = %path, ty = %ty, offset, "dynamic parameter");
                let tail = block.get(offset..).ok_or_else(|| DecodeError::InvalidOffset {
                    path: path.clone(),
                    value: offset.to_string(),
                    len: block.len(),
                })?;
                values.push(self.decode_value(ty, tail, path)?);
                head += WORD_SIZE;
            } else {
                trace!(path = %path, ty = %ty, head, "static parameter");
                let slot = block.get(head..).ok_or_else(|| out_of_bounds(block, head, ty.head_size(), path))?;
                values.push(self.decode_value(ty, slot, path)?);
                head += ty.head_size();
            }
        }

        Ok(values)
    }

    /// Decode a value whose encoding starts at `data[0]`
    fn decode_value(&self, ty: &ParamType, data: &[u8], path: &str) -> Result<Value, DecodeError> {
        match ty {
            ParamType::Address
            | ParamType::Uint(_)
            | ParamType::Int(_)
            | ParamType::Bool
            | ParamType::FixedBytes(_)
            | ParamType::Array(_) => self.charge(1, path)?,
            ParamType::Bytes | ParamType::String => {
                let len = read_usize(data, 0, path)?;
                self.charge(1 + len.div_ceil(WORD_SIZE), path)?;
            }
            ParamType::FixedArray(..) | ParamType::Tuple(_) => {}
        }
        match ty {
            ParamType::Address => {
                let word = read_word(data, 0, path)?;
                if self.options.strict_padding && word[..12].iter().any(|b| *b != 0) {
                    return Err(dirty(ty, path));
                }
                Ok(Value::Address(Address::from_word(&word)))
            }
            ParamType::Uint(bits) => {
                let value = U256::from_big_endian(&read_word(data, 0, path)?);
                if value.bits() <= *bits {
                    Ok(Value::Uint(value))
                } else if self.options.validate_ranges {
                    Err(out_of_range(ty, path))
                } else {
                    Ok(Value::Uint(value & low_mask(*bits)))
                }
            }
            ParamType::Int(bits) => {
                let word = U256::from_big_endian(&read_word(data, 0, path)?);
                let value = I256::from_twos_complement(word);
                if value.fits_bits(*bits) {
                    Ok(Value::Int(value))
                } else if self.options.validate_ranges {
                    Err(out_of_range(ty, path))
                } else {
                    Ok(Value::Int(I256::from_twos_complement(sign_extend(word, *bits))))
                }
            }
            ParamType::Bool => {
                let word = read_word(data, 0, path)?;
                let value = U256::from_big_endian(&word);
                if value > U256::one() && self.options.strict_padding {
                    return Err(DecodeError::InvalidBool {
                        path: path.to_string(),
                        value: value.to_string(),
                    });
                }
                Ok(Value::Bool(!value.is_zero()))
            }
            ParamType::FixedBytes(size) => {
                let word = read_word(data, 0, path)?;
                if self.options.strict_padding && word[*size..].iter().any(|b| *b != 0) {
                    return Err(dirty(ty, path));
                }
                Ok(Value::FixedBytes(word[..*size].to_vec()))
            }
            ParamType::Bytes => Ok(Value::Bytes(read_length_prefixed(data, path)?.to_vec())),
            ParamType::String => {
                let bytes = read_length_prefixed(data, path)?;
                String::from_utf8(bytes.to_vec())
                    .map(Value::String)
                    .map_err(|_| DecodeError::InvalidUtf8 {
                        path: path.to_string(),
                    })
            }
            ParamType::Array(inner) => {
                let len = read_usize(data, 0, path)?;
                let body = &data[WORD_SIZE..];
                // every element needs at least its head slot
                if len.saturating_mul(inner.head_size().max(1)) > body.len() {
                    return Err(DecodeError::InvalidOffset {
                        path: path.to_string(),
                        value: len.to_string(),
                        len: body.len(),
                    });
                }
                let types = element_types(inner, len, path);
                self.decode_sequence(&types, body).map(Value::List)
            }
            ParamType::FixedArray(inner, size) => {
                let needed = size.saturating_mul(inner.head_size().max(1));
                if needed > data.len() {
                    return Err(out_of_bounds(data, 0, needed, path));
                }
                let types = element_types(inner, *size, path);
                self.decode_sequence(&types, data).map(Value::List)
            }
            ParamType::Tuple(components) => {
                let types: Vec<(&ParamType, String)> = components
                    .iter()
                    .enumerate()
                    .map(|(i, c)| (&c.ty, format!("{}.{}", path, i)))
                    .collect();
                let values = self.decode_sequence(&types, data)?;
                Ok(Value::tuple(components.iter().map(|c| c.name.as_str()), values))
            }
        }
    }
}

fn element_types<'a>(inner: &'a ParamType, len: usize, path: &str) -> Vec<(&'a ParamType, String)> {
    (0..len).map(|i| (inner, format!("{}[{}]", path, i))).collect()
}

fn out_of_bounds(data: &[u8], offset: usize, needed: usize, path: &str) -> DecodeError {
    DecodeError::OutOfBounds {
        path: path.to_string(),
        offset,
        needed,
        len: data.len(),
    }
}

fn out_of_range(ty: &ParamType, path: &str) -> DecodeError {
    DecodeError::IntegerOutOfRange {
        path: path.to_string(),
        ty: ty.to_string(),
    }
}

fn dirty(ty: &ParamType, path: &str) -> DecodeError {
    DecodeError::DirtyPadding {
        path: path.to_string(),
        ty: ty.to_string(),
    }
}

fn read_word(data: &[u8], offset: usize, path: &str) -> Result<[u8; 32], DecodeError> {
    offset
        .checked_add(WORD_SIZE)
        .and_then(|end| data.get(offset..end))
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| out_of_bounds(data, offset, WORD_SIZE, path))
}

/// Offset or length word, bounded by the data length
fn read_usize(data: &[u8], offset: usize, path: &str) -> Result<usize, DecodeError> {
    let value = U256::from_big_endian(&read_word(data, offset, path)?);
    if value > U256::from(data.len()) {
        return Err(DecodeError::InvalidOffset {
            path: path.to_string(),
            value: value.to_string(),
            len: data.len(),
        });
    }
    Ok(value.as_usize())
}

fn read_length_prefixed<'d>(data: &'d [u8], path: &str) -> Result<&'d [u8], DecodeError> {
    let len = read_usize(data, 0, path)?;
    data.get(WORD_SIZE..WORD_SIZE + len)
        .ok_or_else(|| out_of_bounds(data, WORD_SIZE, len, path))
}

fn low_mask(bits: usize) -> U256 {
    if bits >= 256 {
        U256::MAX
    } else {
        (U256::one() << bits) - U256::one()
    }
}

/// Keep the low `bits` of `word` and extend its sign bit upwards
fn sign_extend(word: U256, bits: usize) -> U256 {
    if bits >= 256 {
        return word;
    }
    let mask = low_mask(bits);
    let low = word & mask;
    if low.bit(bits - 1) {
        low | !mask
    } else {
        low
    }
}
