//! ABI values

use std::fmt;

use evmabi_primitives::{parse_u256, Address, I256, U256};
use serde_json::Value as Json;

use super::types::{ParamType, TupleComponent};
use crate::error::EncodeError;

/// A value that can be encoded into, or was decoded from, ABI data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Address (20 bytes)
    Address(Address),
    /// Unsigned integer (8-256 bits)
    Uint(U256),
    /// Signed integer (8-256 bits)
    Int(I256),
    /// Boolean
    Bool(bool),
    /// Fixed-size bytes (1-32)
    FixedBytes(Vec<u8>),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// Array, or tuple with unnamed components
    List(Vec<Value>),
    /// Tuple with named components, in declaration order
    Record(Vec<(String, Value)>),
}

impl Value {
    /// Short name of the value kind, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Address(_) => "address",
            Value::Uint(_) => "unsigned integer",
            Value::Int(_) => "signed integer",
            Value::Bool(_) => "bool",
            Value::FixedBytes(_) => "fixed bytes",
            Value::Bytes(_) => "bytes",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Record(_) => "record",
        }
    }

    /// Build a tuple value: a record when every name is non-empty, a
    /// positional list otherwise.
    pub fn tuple<'a>(names: impl IntoIterator<Item = &'a str>, values: Vec<Value>) -> Value {
        let names: Vec<&str> = names.into_iter().collect();
        if names.len() == values.len() && !names.is_empty() && names.iter().all(|n| !n.is_empty()) {
            Value::Record(
                names
                    .into_iter()
                    .map(str::to_string)
                    .zip(values)
                    .collect(),
            )
        } else {
            Value::List(values)
        }
    }

    /// Get the address, if this is one
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Value::Address(a) => Some(*a),
            _ => None,
        }
    }

    /// Get the unsigned integer, if this is one
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Value::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the signed integer, if this is one
    pub fn as_int(&self) -> Option<I256> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the boolean, if this is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the string, if this is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get fixed or dynamic bytes
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::FixedBytes(b) | Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get list elements
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a record field by name
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Structural compatibility with `ty`, as used by overload resolution.
    ///
    /// Accepts the same aliases the encoder does (hex string for address or
    /// bytes, 20-byte value for address) but does not check integer ranges.
    pub fn fits(&self, ty: &ParamType) -> bool {
        match (ty, self) {
            (ParamType::Address, Value::Address(_)) => true,
            (ParamType::Address, Value::String(s)) => Address::looks_like_address(s),
            (ParamType::Address, Value::FixedBytes(b) | Value::Bytes(b)) => b.len() == Address::LEN,
            (ParamType::Uint(_), Value::Uint(_)) => true,
            (ParamType::Uint(_), Value::Int(v)) => !v.is_negative(),
            (ParamType::Int(_), Value::Int(_) | Value::Uint(_)) => true,
            (ParamType::Bool, Value::Bool(_)) => true,
            (ParamType::FixedBytes(size), Value::FixedBytes(b) | Value::Bytes(b)) => b.len() == *size,
            (ParamType::FixedBytes(size), Value::Address(_)) => *size == Address::LEN,
            (ParamType::FixedBytes(size), Value::String(s)) => {
                hex_bytes(s).is_some_and(|b| b.len() == *size)
            }
            (ParamType::Bytes, Value::Bytes(_) | Value::FixedBytes(_) | Value::Address(_)) => true,
            (ParamType::Bytes, Value::String(s)) => hex_bytes(s).is_some(),
            (ParamType::String, Value::String(_)) => true,
            (ParamType::Array(inner), Value::List(items)) => items.iter().all(|v| v.fits(inner)),
            (ParamType::FixedArray(inner, size), Value::List(items)) => {
                items.len() == *size && items.iter().all(|v| v.fits(inner))
            }
            (ParamType::Tuple(components), Value::List(items)) => {
                items.len() == components.len()
                    && components.iter().zip(items).all(|(c, v)| v.fits(&c.ty))
            }
            (ParamType::Tuple(components), Value::Record(fields)) => {
                fields.len() == components.len()
                    && components.iter().all(|c| {
                        fields
                            .iter()
                            .find(|(n, _)| *n == c.name)
                            .is_some_and(|(_, v)| v.fits(&c.ty))
                    })
            }
            _ => false,
        }
    }

    /// Convert a JSON argument into a value of type `ty`.
    ///
    /// Integers may be JSON numbers or decimal / `0x` hex strings; bytes are
    /// `0x` hex strings; tuples are arrays or objects keyed by component name.
    pub fn from_json(ty: &ParamType, json: &Json) -> Result<Value, EncodeError> {
        from_json_at(ty, json, "0")
    }

    /// Convert one JSON argument per parameter; error paths start at the
    /// argument index
    pub fn from_json_args(types: &[ParamType], args: &[Json]) -> Result<Vec<Value>, EncodeError> {
        if types.len() != args.len() {
            return Err(EncodeError::LengthMismatch {
                expected: types.len(),
                got: args.len(),
            });
        }
        types
            .iter()
            .zip(args)
            .enumerate()
            .map(|(i, (ty, json))| from_json_at(ty, json, &i.to_string()))
            .collect()
    }
}

fn from_json_at(ty: &ParamType, json: &Json, path: &str) -> Result<Value, EncodeError> {
    let mismatch = || EncodeError::TypeMismatch {
        path: path.to_string(),
        expected: ty.to_string(),
        got: json_kind(json),
    };
    match ty {
        ParamType::Address => {
            let s = json.as_str().ok_or_else(mismatch)?;
            Address::from_hex(s)
                .map(Value::Address)
                .map_err(|_| EncodeError::InvalidAddress {
                    path: path.to_string(),
                    value: s.to_string(),
                })
        }
        ParamType::Uint(_) => {
            let text = json_number_text(json).ok_or_else(mismatch)?;
            parse_u256(&text)
                .map(Value::Uint)
                .map_err(|_| EncodeError::IntegerOverflow {
                    path: path.to_string(),
                    ty: ty.to_string(),
                    value: text,
                })
        }
        ParamType::Int(_) => {
            let text = json_number_text(json).ok_or_else(mismatch)?;
            text.parse::<I256>()
                .map(Value::Int)
                .map_err(|_| EncodeError::IntegerOverflow {
                    path: path.to_string(),
                    ty: ty.to_string(),
                    value: text,
                })
        }
        ParamType::Bool => match json {
            Json::Bool(b) => Ok(Value::Bool(*b)),
            Json::String(s) if s == "true" => Ok(Value::Bool(true)),
            Json::String(s) if s == "false" => Ok(Value::Bool(false)),
            _ => Err(mismatch()),
        },
        ParamType::FixedBytes(_) | ParamType::Bytes => {
            let s = json.as_str().ok_or_else(mismatch)?;
            let bytes = hex_bytes(s).ok_or_else(|| EncodeError::InvalidHex {
                path: path.to_string(),
                value: s.to_string(),
            })?;
            Ok(if matches!(ty, ParamType::Bytes) {
                Value::Bytes(bytes)
            } else {
                Value::FixedBytes(bytes)
            })
        }
        ParamType::String => json
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(mismatch),
        ParamType::Array(inner) | ParamType::FixedArray(inner, _) => {
            let items = json.as_array().ok_or_else(mismatch)?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| from_json_at(inner, item, &format!("{}[{}]", path, i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List)
        }
        ParamType::Tuple(components) => match json {
            Json::Array(items) => {
                if items.len() != components.len() {
                    return Err(EncodeError::ArrayLengthMismatch {
                        path: path.to_string(),
                        expected: components.len(),
                        got: items.len(),
                    });
                }
                let values = components
                    .iter()
                    .zip(items)
                    .enumerate()
                    .map(|(i, (c, item))| from_json_at(&c.ty, item, &format!("{}.{}", path, i)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::tuple(components.iter().map(|c| c.name.as_str()), values))
            }
            Json::Object(map) => {
                let mut fields = Vec::with_capacity(components.len());
                for TupleComponent { name, ty } in components {
                    let item = map.get(name).ok_or_else(|| EncodeError::MissingField {
                        path: path.to_string(),
                        field: name.clone(),
                    })?;
                    fields.push((name.clone(), from_json_at(ty, item, &format!("{}.{}", path, name))?));
                }
                Ok(Value::Record(fields))
            }
            _ => Err(mismatch()),
        },
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn json_number_text(json: &Json) -> Option<String> {
    match json {
        Json::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        Json::String(s) => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Decode a `0x`-prefixed hex string
pub(crate) fn hex_bytes(s: &str) -> Option<Vec<u8>> {
    s.strip_prefix("0x").and_then(|h| hex::decode(h).ok())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Address(a) => write!(f, "{}", a),
            Value::Uint(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Bool(b) => write!(f, "{}", b),
            Value::FixedBytes(b) | Value::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            Value::String(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Record(fields) => {
                f.write_str("(")?;
                for (i, (name, item)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", name, item)?;
                }
                f.write_str(")")
            }
        }
    }
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Uint(U256::from(v))
            }
        })*
    };
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(I256::from_i128(v as i128))
            }
        })*
    };
}

impl_from_unsigned!(u8, u16, u32, u64, u128, usize);
impl_from_signed!(i8, i16, i32, i64, i128);

impl From<U256> for Value {
    fn from(v: U256) -> Self {
        Value::Uint(v)
    }
}

impl From<I256> for Value {
    fn from(v: I256) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Address> for Value {
    fn from(v: Address) -> Self {
        Value::Address(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}
