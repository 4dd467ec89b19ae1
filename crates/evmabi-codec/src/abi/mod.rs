//! Parameter-level ABI codec
//!
//! - [`ParamType`]: parsed type descriptors
//! - [`Value`]: values to encode or decoded from data
//! - [`encode`] / [`decode`]: standard head/tail encoding
//! - [`encode_packed`]: non-padded encoding for hash preimages
//!
//! # Example
//!
//! ```rust
//! use evmabi_codec::abi::{decode, encode, ParamType, Value};
//!
//! let params = ParamType::parse_list("(string,uint256,bool)").unwrap();
//! let values = vec![Value::from("wagmi"), Value::from(420u64), Value::from(true)];
//!
//! let data = encode(&params, &values).unwrap();
//! assert_eq!(data.len(), 5 * 32);
//! assert_eq!(decode(&params, &data).unwrap(), values);
//! ```

mod decode;
mod encode;
mod packed;
mod types;
mod value;

pub use decode::{decode, decode_with, decode_word, DecodeOptions};
pub use encode::{encode, encode_with_selector, encode_word};
pub use packed::{encode_packed, encode_packed_str};
pub use types::{ParamType, TupleComponent};
pub use value::Value;

pub(crate) use encode::{coerce_bytes, tuple_values};
pub(crate) use types::{matching_paren, split_top_level, split_type_and_rest};
pub(crate) use value::hex_bytes;
