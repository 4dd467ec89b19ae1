//! Revert data decoding
//!
//! Revert data is a 4-byte selector followed by standard-encoded arguments.
//! `Error(string)` and `Panic(uint256)` are emitted by the compiler itself;
//! anything else is a custom error looked up in a [`DefinitionTable`].

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use evmabi_primitives::{Selector, U256};
use tracing::debug;

use crate::abi::{decode_with, DecodeOptions, ParamType, Value};
use crate::error::{AbiError, DecodeError, ResolveError};
use crate::item::{CustomError, Param};
use crate::table::DefinitionTable;

/// `Error(string)` selector
pub const ERROR_STRING_SELECTOR: Selector = Selector::from_bytes([0x08, 0xc3, 0x79, 0xa0]);

/// `Panic(uint256)` selector
pub const PANIC_SELECTOR: Selector = Selector::from_bytes([0x4e, 0x48, 0x7b, 0x71]);

/// Decoded revert reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revert {
    /// `require(cond, "message")` / `revert("message")`
    Reason(String),
    /// Compiler-inserted check failure
    Panic {
        /// Panic code
        code: U256,
        /// Description of a well-known code
        reason: Option<&'static str>,
    },
    /// User-defined error
    Custom {
        /// Error name
        name: String,
        /// Canonical signature
        signature: String,
        /// Arguments, as a record when every input is named
        args: Value,
    },
}

impl fmt::Display for Revert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revert::Reason(reason) => write!(f, "revert: {}", reason),
            Revert::Panic { code, reason } => {
                if code.bits() <= 64 {
                    write!(f, "panic 0x{:02x}", code.low_u64())?;
                } else {
                    write!(f, "panic {:#x}", code)?;
                }
                match reason {
                    Some(reason) => write!(f, ": {}", reason),
                    None => Ok(()),
                }
            }
            Revert::Custom { name, args: Value::List(items), .. } => {
                write!(f, "{}(", name)?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
            Revert::Custom { name, args, .. } => write!(f, "{}{}", name, args),
        }
    }
}

/// Description of a compiler panic code
pub fn panic_reason(code: U256) -> Option<&'static str> {
    if code > U256::from(u8::MAX) {
        return None;
    }
    Some(match code.low_u64() {
        0x00 => "generic compiler panic",
        0x01 => "assertion failed",
        0x11 => "arithmetic underflow or overflow",
        0x12 => "division or modulo by zero",
        0x21 => "conversion into non-existent enum value",
        0x22 => "access to incorrectly encoded storage byte array",
        0x31 => "pop on empty array",
        0x32 => "array index out of bounds",
        0x41 => "out of memory",
        0x51 => "call to zero-initialized function",
        _ => return None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KnownKind {
    Reason,
    Panic,
    Custom,
}

/// Errors recognised without a definition table.
///
/// [`KnownErrors::standard`] holds `Error(string)` and `Panic(uint256)`;
/// callers can extend a copy with their own well-known errors.
#[derive(Debug, Clone)]
pub struct KnownErrors {
    entries: HashMap<Selector, (KnownKind, CustomError)>,
}

impl KnownErrors {
    /// An empty set
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The two compiler-emitted errors, built once per process
    pub fn standard() -> &'static KnownErrors {
        static STANDARD: OnceLock<KnownErrors> = OnceLock::new();
        STANDARD.get_or_init(|| {
            let mut known = KnownErrors::empty();
            known.insert(KnownKind::Reason, standard_error("Error", ParamType::String));
            known.insert(KnownKind::Panic, standard_error("Panic", ParamType::Uint(256)));
            known
        })
    }

    /// Add a well-known custom error
    pub fn with(mut self, error: CustomError) -> Self {
        self.insert(KnownKind::Custom, error);
        self
    }

    fn insert(&mut self, kind: KnownKind, error: CustomError) {
        self.entries.insert(error.selector(), (kind, error));
    }

    /// Definition registered for `selector`
    pub fn get(&self, selector: &Selector) -> Option<&CustomError> {
        self.entries.get(selector).map(|(_, e)| e)
    }

    /// Number of registered errors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for KnownErrors {
    fn default() -> Self {
        KnownErrors::standard().clone()
    }
}

fn standard_error(name: &str, ty: ParamType) -> CustomError {
    CustomError::new(name, vec![Param::new("", ty)])
}

/// Decode revert data against the standard errors and, if given, the
/// custom errors of `table`
pub fn decode_revert(data: &[u8], table: Option<&DefinitionTable>) -> Result<Revert, AbiError> {
    decode_revert_with(data, KnownErrors::standard(), table, &DecodeOptions::default())
}

/// [`decode_revert`] with an explicit known-error set and options
pub fn decode_revert_with(
    data: &[u8],
    known: &KnownErrors,
    table: Option<&DefinitionTable>,
    options: &DecodeOptions,
) -> Result<Revert, AbiError> {
    let selector = Selector::from_prefix(data).ok_or(DecodeError::MissingSelector { len: data.len() })?;
    let args = &data[Selector::LEN..];

    if let Some((kind, error)) = known.entries.get(&selector) {
        let mut values = decode_with(error.input_types(), args, options)?;
        debug!(selector = %selector, signature = error.signature(), "decoded known revert");
        return Ok(match (kind, values.pop()) {
            (KnownKind::Reason, Some(Value::String(reason))) => Revert::Reason(reason),
            (KnownKind::Panic, Some(Value::Uint(code))) => Revert::Panic {
                code,
                reason: panic_reason(code),
            },
            (_, last) => {
                values.extend(last);
                custom(error, values)
            }
        });
    }

    let error = table
        .and_then(|t| t.error_by_selector(&selector))
        .ok_or(ResolveError::UnknownError(selector))?;
    let values = decode_with(error.input_types(), args, options)?;
    debug!(selector = %selector, signature = error.signature(), "decoded custom revert");
    Ok(custom(error, values))
}

fn custom(error: &CustomError, values: Vec<Value>) -> Revert {
    Revert::Custom {
        name: error.name().to_string(),
        signature: error.signature().to_string(),
        args: error.inputs_record(values),
    }
}
