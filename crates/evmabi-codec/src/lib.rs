//! # evmabi-codec
//!
//! Ethereum contract ABI codec.
//!
//! ## Features
//!
//! - **ParamType / Value**: type descriptors and the values they describe
//! - **Standard codec**: head/tail encoding for calldata, return data, revert
//!   data and log data
//! - **Packed codec**: the non-padded encoding used as hash preimage
//! - **Signatures**: canonical signatures, selectors and event topics
//! - **DefinitionTable**: functions, events and errors loaded from JSON or
//!   human-readable signatures, with overload resolution
//! - **Logs and reverts**: event log decoding, `Error(string)`,
//!   `Panic(uint256)` and custom errors
//!
//! ## Quick Start
//!
//! ```rust
//! use evmabi_codec::{erc20, Value};
//!
//! let table = erc20().unwrap();
//! let data = table
//!     .encode_function_data(
//!         "transfer",
//!         &[
//!             Value::from("0x742d35cc6634c0532925a3b844bc9e7595f0ab3d"),
//!             Value::from(1_000u64),
//!         ],
//!     )
//!     .unwrap();
//! assert_eq!(hex::encode(&data[..4]), "a9059cbb");
//!
//! let call = table.decode_function_data(&data).unwrap();
//! assert_eq!(call.function.signature(), "transfer(address,uint256)");
//! ```
//!
//! ## Overloads
//!
//! ```rust
//! use evmabi_codec::{DefinitionTable, Value};
//!
//! let table = DefinitionTable::from_human_readable([
//!     "function foo(uint256 a)",
//!     "function foo(string a)",
//! ])
//! .unwrap();
//! let f = table.resolve_function("foo", Some(&[Value::from("hi")])).unwrap();
//! assert_eq!(f.signature(), "foo(string)");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
mod call;
mod error;
mod event;
mod item;
pub mod json;
pub mod native;
mod resolve;
mod revert;
pub mod signature;
mod table;

pub use abi::{
    decode, decode_with, encode, encode_packed, encode_with_selector, DecodeOptions, ParamType,
    TupleComponent, Value,
};
pub use call::DecodedCall;
pub use error::{AbiError, DecodeError, EncodeError, ErrorCategory, ResolveError, TypeError};
pub use event::{topic_for, uint_topic, DecodedLog, LogParam};
pub use item::{Constructor, CustomError, Definition, Event, Function, Param, StateMutability};
pub use native::Native;
pub use revert::{
    decode_revert, decode_revert_with, panic_reason, KnownErrors, Revert, ERROR_STRING_SELECTOR,
    PANIC_SELECTOR,
};
pub use signature::{selector, signature, topic};
pub use table::{erc20, DefinitionTable, DefinitionTableBuilder, ERC20};

// Re-export primitives for convenience
pub use evmabi_primitives::{Address, Selector, H256, I256, U256};
