//! Native view of decoded values
//!
//! A convenience layer on top of [`Value`] for callers that want plain
//! machine types and JSON. Integers declared 48 bits wide or narrower are
//! surfaced as `i64` (they are exact in a double, so JSON consumers read
//! them as numbers); wider integers stay arbitrary precision and serialize
//! as decimal strings. This split is about presentation only: the wire
//! format is the same for every width.

use evmabi_crypto::to_checksum;
use evmabi_primitives::{Address, I256, U256};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::abi::{ParamType, Value};

/// Widest integer surfaced as `i64`
pub const NATIVE_INT_BITS: usize = 48;

/// Canonical native form of a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Native {
    /// Boolean
    Bool(bool),
    /// Integer declared at most [`NATIVE_INT_BITS`] wide
    Int(i64),
    /// Wider unsigned integer
    BigUint(U256),
    /// Wider signed integer
    BigInt(I256),
    /// Address
    Address(Address),
    /// `bytesN` as a `0x`-prefixed lowercase hex string
    FixedBytes(String),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// String
    String(String),
    /// Array, or tuple with unnamed components
    List(Vec<Native>),
    /// Tuple with named components, in declaration order
    Record(Vec<(String, Native)>),
}

impl Native {
    /// Native form of `value` as declared by `ty`.
    ///
    /// When `value` does not have the shape of `ty` the type information is
    /// dropped and the value is converted on its own.
    pub fn new(ty: &ParamType, value: &Value) -> Self {
        match (ty, value) {
            (ParamType::Uint(bits), Value::Uint(v)) if *bits <= NATIVE_INT_BITS && v.bits() < 64 => {
                Native::Int(v.low_u64() as i64)
            }
            (ParamType::Int(bits), Value::Int(v)) if *bits <= NATIVE_INT_BITS => match v.as_i64() {
                Some(n) => Native::Int(n),
                None => Native::BigInt(*v),
            },
            (ParamType::Array(inner), Value::List(items))
            | (ParamType::FixedArray(inner, _), Value::List(items)) => {
                Native::List(items.iter().map(|item| Native::new(inner, item)).collect())
            }
            (ParamType::Tuple(components), Value::Record(fields)) if components.len() == fields.len() => {
                Native::Record(
                    components
                        .iter()
                        .zip(fields)
                        .map(|(c, (name, v))| (name.clone(), Native::new(&c.ty, v)))
                        .collect(),
                )
            }
            (ParamType::Tuple(components), Value::List(items)) if components.len() == items.len() => {
                Native::List(
                    components
                        .iter()
                        .zip(items)
                        .map(|(c, v)| Native::new(&c.ty, v))
                        .collect(),
                )
            }
            _ => Native::from(value),
        }
    }

    /// Native forms of a decoded parameter list
    pub fn from_values(types: &[ParamType], values: &[Value]) -> Vec<Native> {
        types.iter().zip(values).map(|(ty, v)| Native::new(ty, v)).collect()
    }

    /// JSON tree. Record keys are sorted in the tree; serialize directly
    /// to keep declaration order.
    pub fn to_json(&self) -> serde_json::Value {
        // serializing this enum into a JSON tree cannot fail
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Conversion without type information: every integer stays wide
impl From<&Value> for Native {
    fn from(value: &Value) -> Self {
        match value {
            Value::Address(a) => Native::Address(*a),
            Value::Uint(v) => Native::BigUint(*v),
            Value::Int(v) => Native::BigInt(*v),
            Value::Bool(b) => Native::Bool(*b),
            Value::FixedBytes(b) => Native::FixedBytes(format!("0x{}", hex::encode(b))),
            Value::Bytes(b) => Native::Bytes(b.clone()),
            Value::String(s) => Native::String(s.clone()),
            Value::List(items) => Native::List(items.iter().map(Native::from).collect()),
            Value::Record(fields) => Native::Record(
                fields
                    .iter()
                    .map(|(name, v)| (name.clone(), Native::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Native {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Native::Bool(b) => serializer.serialize_bool(*b),
            Native::Int(n) => serializer.serialize_i64(*n),
            Native::BigUint(v) => serializer.collect_str(v),
            Native::BigInt(v) => serializer.collect_str(v),
            Native::Address(a) => serializer.serialize_str(&to_checksum(a)),
            Native::FixedBytes(s) | Native::String(s) => serializer.serialize_str(s),
            Native::Bytes(b) => serializer.serialize_str(&format!("0x{}", hex::encode(b))),
            Native::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Native::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, v) in fields {
                    map.serialize_entry(name, v)?;
                }
                map.end()
            }
        }
    }
}
