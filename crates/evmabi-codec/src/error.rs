//! Codec error types
//!
//! Every failure is reported through one of the enums below; none of them is
//! recovered internally. [`AbiError::category`] folds them into the five
//! families callers usually branch on.

use evmabi_primitives::{Selector, H256};
use thiserror::Error;

/// Coarse classification of codec failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Unparseable type string, JSON definition or hex string
    MalformedInput,
    /// Count or kind mismatch between descriptors and values
    ShapeMismatch,
    /// Integer outside its width, or data shorter than an offset/length claims
    Range,
    /// Unknown function, event or error
    NotFound,
    /// Overload resolution could not pick a single definition
    Ambiguous,
}

/// Type string parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Base type is not part of the ABI
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// `uintN`/`intN` with N not a multiple of 8 in 8..=256
    #[error("invalid integer width {bits} in `{ty}`")]
    InvalidIntegerWidth {
        /// Offending type string
        ty: String,
        /// Parsed width
        bits: usize,
    },

    /// `bytesN` with N outside 1..=32
    #[error("invalid fixed bytes width {size} in `{ty}`")]
    InvalidBytesWidth {
        /// Offending type string
        ty: String,
        /// Parsed width
        size: usize,
    },

    /// Bracket suffix that is not `[]` or `[N]` with N > 0
    #[error("malformed array suffix in `{0}`")]
    MalformedArray(String),

    /// `tuple` without a component list
    #[error("tuple type `{0}` has no components")]
    MissingComponents(String),

    /// Components attached to a non-tuple type
    #[error("components given for non-tuple type `{0}`")]
    UnexpectedComponents(String),

    /// Unbalanced parentheses or stray text around a tuple
    #[error("malformed tuple in `{0}`")]
    MalformedTuple(String),

    /// Human-readable signature that cannot be split into name and parameters
    #[error("malformed signature `{0}`")]
    MalformedSignature(String),

    /// Unknown `stateMutability` string
    #[error("unknown state mutability `{0}`")]
    UnknownMutability(String),
}

impl TypeError {
    /// Error family
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::MalformedInput
    }
}

/// Encoding error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Different number of values and parameters
    #[error("expected {expected} values, got {got}")]
    LengthMismatch {
        /// Parameter count
        expected: usize,
        /// Value count
        got: usize,
    },

    /// Value kind does not fit the parameter type
    #[error("value at {path} is {got}, expected {expected}")]
    TypeMismatch {
        /// Position of the value (`1`, `0.2`, `3[1]`)
        path: String,
        /// Parameter type
        expected: String,
        /// Value kind
        got: &'static str,
    },

    /// Integer outside the declared width
    #[error("value {value} at {path} does not fit {ty}")]
    IntegerOverflow {
        /// Position of the value
        path: String,
        /// Parameter type
        ty: String,
        /// Offending value
        value: String,
    },

    /// String given for an address is not one
    #[error("invalid address {value:?} at {path}")]
    InvalidAddress {
        /// Position of the value
        path: String,
        /// Offending text
        value: String,
    },

    /// Hex string given for a bytes parameter does not decode
    #[error("invalid hex {value:?} at {path}")]
    InvalidHex {
        /// Position of the value
        path: String,
        /// Offending text
        value: String,
    },

    /// Byte string of the wrong length for `bytesN` or `address`
    #[error("byte length mismatch at {path}: expected {expected}, got {got}")]
    InvalidBytesLength {
        /// Position of the value
        path: String,
        /// Required length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// Fixed-size array or tuple given the wrong number of elements
    #[error("element count mismatch at {path}: expected {expected}, got {got}")]
    ArrayLengthMismatch {
        /// Position of the value
        path: String,
        /// Required count
        expected: usize,
        /// Actual count
        got: usize,
    },

    /// Record value lacking a named tuple component
    #[error("missing field `{field}` at {path}")]
    MissingField {
        /// Position of the record
        path: String,
        /// Component name
        field: String,
    },

    /// Type that packed encoding cannot represent
    #[error("type {ty} is not supported by packed encoding")]
    UnsupportedPackedType {
        /// Offending type
        ty: String,
    },

    /// Type string failed to parse
    #[error(transparent)]
    Type(#[from] TypeError),
}

impl EncodeError {
    /// Error family
    pub fn category(&self) -> ErrorCategory {
        match self {
            EncodeError::InvalidAddress { .. } | EncodeError::InvalidHex { .. } => {
                ErrorCategory::MalformedInput
            }
            EncodeError::IntegerOverflow { .. } => ErrorCategory::Range,
            EncodeError::Type(e) => e.category(),
            _ => ErrorCategory::ShapeMismatch,
        }
    }
}

/// Decoding error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Parameters given but no data at all
    #[error("cannot decode zero data with non-empty params")]
    ZeroData,

    /// Data present but shorter than one word
    #[error("data too small: {len} bytes is less than one 32-byte word")]
    DataTooSmall {
        /// Data length
        len: usize,
    },

    /// Read past the end of the buffer
    #[error("out of bounds at {path}: need {needed} bytes from offset {offset}, have {len}")]
    OutOfBounds {
        /// Position of the value
        path: String,
        /// Read offset
        offset: usize,
        /// Bytes needed from `offset`
        needed: usize,
        /// Buffer length
        len: usize,
    },

    /// Offset or length word larger than the buffer
    #[error("offset or length {value} at {path} exceeds data length {len}")]
    InvalidOffset {
        /// Position of the value
        path: String,
        /// Word value
        value: String,
        /// Buffer length
        len: usize,
    },

    /// Boolean word other than 0 or 1
    #[error("invalid boolean word {value} at {path}")]
    InvalidBool {
        /// Position of the value
        path: String,
        /// Word value
        value: String,
    },

    /// Integer word outside the declared width
    #[error("integer at {path} does not fit {ty}")]
    IntegerOutOfRange {
        /// Position of the value
        path: String,
        /// Parameter type
        ty: String,
    },

    /// Non-zero bits in the unused part of a word
    #[error("non-zero padding for {ty} at {path}")]
    DirtyPadding {
        /// Position of the value
        path: String,
        /// Parameter type
        ty: String,
    },

    /// Offsets reuse the same data so often that the output would outgrow
    /// the input
    #[error("decoded output at {path} exceeds the {limit} words of input")]
    OutputTooLarge {
        /// Position of the value
        path: String,
        /// Input size in words
        limit: usize,
    },

    /// `string` content that is not UTF-8
    #[error("invalid UTF-8 string at {path}")]
    InvalidUtf8 {
        /// Position of the value
        path: String,
    },

    /// Calldata or revert data shorter than a selector
    #[error("data of {len} bytes has no 4-byte selector")]
    MissingSelector {
        /// Data length
        len: usize,
    },

    /// Data starts with a different selector than the definition's
    #[error("selector mismatch: expected {expected}, got {got}")]
    SelectorMismatch {
        /// Definition selector
        expected: Selector,
        /// Selector found in the data
        got: Selector,
    },

    /// Log topics do not match the event's indexed parameters
    #[error("event {event} expects {expected} topics, got {got}")]
    TopicCountMismatch {
        /// Event signature
        event: String,
        /// Required topic count
        expected: usize,
        /// Given topic count
        got: usize,
    },

    /// First topic is not the event's signature hash
    #[error("topic {got} does not match event {event}")]
    TopicMismatch {
        /// Event signature
        event: String,
        /// Given first topic
        got: H256,
    },
}

impl DecodeError {
    /// Error family
    pub fn category(&self) -> ErrorCategory {
        match self {
            DecodeError::InvalidBool { .. }
            | DecodeError::DirtyPadding { .. }
            | DecodeError::InvalidUtf8 { .. } => ErrorCategory::MalformedInput,
            DecodeError::TopicCountMismatch { .. }
            | DecodeError::TopicMismatch { .. }
            | DecodeError::SelectorMismatch { .. } => {
                ErrorCategory::ShapeMismatch
            }
            _ => ErrorCategory::Range,
        }
    }
}

/// Definition lookup error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No definition with this name, selector or topic
    #[error("no function, event or error matches `{0}`")]
    NotFound(String),

    /// Definitions exist but none accepts the candidate arguments
    #[error("no overload of `{query}` accepts {args} given arguments")]
    NoMatchingOverload {
        /// Name or selector looked up
        query: String,
        /// Candidate argument count
        args: usize,
    },

    /// Several overloads accept the arguments equally well
    #[error("ambiguous overloads for `{query}`: {first} and {second}")]
    Ambiguous {
        /// Name looked up
        query: String,
        /// First matching signature
        first: String,
        /// Conflicting signature
        second: String,
    },

    /// Query resolved to a different item kind than requested
    #[error("`{query}` is {found}, expected {expected}")]
    KindMismatch {
        /// Name or selector looked up
        query: String,
        /// Requested kind
        expected: &'static str,
        /// Kind found
        found: &'static str,
    },

    /// Revert selector with no known definition
    #[error("unknown error selector {0}")]
    UnknownError(Selector),

    /// Function calldata selector with no definition
    #[error("unknown function selector {0}")]
    UnknownFunction(Selector),

    /// Log topic with no event definition
    #[error("unknown event topic {0}")]
    UnknownEvent(H256),

    /// Log without topics cannot be matched to a non-anonymous event
    #[error("log has no topics")]
    NoTopics,
}

impl ResolveError {
    /// Error family
    pub fn category(&self) -> ErrorCategory {
        match self {
            ResolveError::Ambiguous { .. } => ErrorCategory::Ambiguous,
            ResolveError::KindMismatch { .. } => ErrorCategory::ShapeMismatch,
            _ => ErrorCategory::NotFound,
        }
    }
}

/// Any codec error
#[derive(Debug, Error)]
pub enum AbiError {
    /// Type string error
    #[error("type error: {0}")]
    Type(#[from] TypeError),

    /// Encoding error
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Decoding error
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Lookup error
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// JSON ABI document error
    #[error("invalid JSON ABI: {0}")]
    Json(#[from] serde_json::Error),
}

impl AbiError {
    /// Error family
    pub fn category(&self) -> ErrorCategory {
        match self {
            AbiError::Type(e) => e.category(),
            AbiError::Encode(e) => e.category(),
            AbiError::Decode(e) => e.category(),
            AbiError::Resolve(e) => e.category(),
            AbiError::Json(_) => ErrorCategory::MalformedInput,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            AbiError::from(TypeError::UnknownType("foo".into())).category(),
            ErrorCategory::MalformedInput
        );
        assert_eq!(
            AbiError::from(EncodeError::LengthMismatch { expected: 1, got: 2 }).category(),
            ErrorCategory::ShapeMismatch
        );
        assert_eq!(
            AbiError::from(EncodeError::IntegerOverflow {
                path: "0".into(),
                ty: "uint8".into(),
                value: "256".into(),
            })
            .category(),
            ErrorCategory::Range
        );
        assert_eq!(
            AbiError::from(DecodeError::DataTooSmall { len: 3 }).category(),
            ErrorCategory::Range
        );
        assert_eq!(
            AbiError::from(ResolveError::NotFound("x".into())).category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            AbiError::from(ResolveError::Ambiguous {
                query: "f".into(),
                first: "f(address)".into(),
                second: "f(string)".into(),
            })
            .category(),
            ErrorCategory::Ambiguous
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            DecodeError::ZeroData.to_string(),
            "cannot decode zero data with non-empty params"
        );
        assert!(DecodeError::DataTooSmall { len: 5 }
            .to_string()
            .starts_with("data too small"));
    }
}
