//! Function, event and error definitions
//!
//! Definitions are immutable once built: the canonical signature, selector
//! or topic and the parameter type list are computed in the constructor and
//! never change afterwards.

use std::fmt;
use std::str::FromStr;

use evmabi_primitives::{Selector, H256};
use serde::{Deserialize, Serialize};

use crate::abi::{matching_paren, split_top_level, split_type_and_rest, ParamType, Value};
use crate::error::TypeError;
use crate::signature::{selector, signature, topic};

/// Function state mutability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    /// Reads nothing from state
    Pure,
    /// Reads but does not modify state
    View,
    /// Modifies state, rejects value
    #[default]
    NonPayable,
    /// Modifies state, accepts value
    Payable,
}

impl StateMutability {
    /// JSON-ABI spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            StateMutability::Pure => "pure",
            StateMutability::View => "view",
            StateMutability::NonPayable => "nonpayable",
            StateMutability::Payable => "payable",
        }
    }

    /// Mutability from the pre-0.4.16 `constant` / `payable` flags
    pub fn from_legacy(constant: bool, payable: bool) -> Self {
        if constant {
            StateMutability::View
        } else if payable {
            StateMutability::Payable
        } else {
            StateMutability::NonPayable
        }
    }
}

impl fmt::Display for StateMutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateMutability {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pure" => Ok(StateMutability::Pure),
            "view" | "constant" => Ok(StateMutability::View),
            "nonpayable" => Ok(StateMutability::NonPayable),
            "payable" => Ok(StateMutability::Payable),
            other => Err(TypeError::UnknownMutability(other.to_string())),
        }
    }
}

/// Function, event or error parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    /// Parameter name, possibly empty
    pub name: String,
    /// Parameter type
    pub ty: ParamType,
    /// Stored in a log topic (event inputs only)
    pub indexed: bool,
    /// Solidity-level type such as `struct Pool.Key`, informational only
    pub internal_type: Option<String>,
}

impl Param {
    /// Create a non-indexed parameter
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            indexed: false,
            internal_type: None,
        }
    }

    /// Create an indexed event parameter
    pub fn indexed(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            indexed: true,
            ..Self::new(name, ty)
        }
    }

    /// Set the Solidity-level type
    pub fn with_internal_type(mut self, internal_type: impl Into<String>) -> Self {
        self.internal_type = Some(internal_type.into());
        self
    }

    /// Parse a human-readable member such as `address indexed from` or
    /// `(uint256,bool)[] memory items`
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let (ty, rest) = split_type_and_rest(s);
        let mut param = Param::new("", ParamType::parse(ty)?);
        for word in rest.split_whitespace() {
            match word {
                "indexed" => param.indexed = true,
                "memory" | "calldata" | "storage" | "payable" => {}
                name => param.name = name.to_string(),
            }
        }
        Ok(param)
    }
}

fn types_of(params: &[Param]) -> Vec<ParamType> {
    params.iter().map(|p| p.ty.clone()).collect()
}

fn names_of(params: &[Param]) -> impl Iterator<Item = &str> {
    params.iter().map(|p| p.name.as_str())
}

/// Split `[keyword] name(params) rest` into its parts
fn split_signature<'a>(s: &'a str, keyword: &str) -> Result<(&'a str, &'a str, &'a str), TypeError> {
    let malformed = || TypeError::MalformedSignature(s.to_string());
    let trimmed = s.trim();
    let body = trimmed
        .strip_prefix(keyword)
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .unwrap_or(trimmed)
        .trim_start();
    let open = body.find('(').ok_or_else(malformed)?;
    let close = matching_paren(body, open).ok_or_else(malformed)?;
    let name = body[..open].trim();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
        return Err(malformed());
    }
    Ok((name, &body[open + 1..close], body[close + 1..].trim()))
}

fn parse_params(list: &str, whole: &str) -> Result<Vec<Param>, TypeError> {
    split_top_level(list)
        .ok_or_else(|| TypeError::MalformedSignature(whole.to_string()))?
        .into_iter()
        .map(Param::parse)
        .collect()
}

/// Function definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    name: String,
    inputs: Vec<Param>,
    outputs: Vec<Param>,
    state_mutability: StateMutability,
    signature: String,
    selector: Selector,
    input_types: Vec<ParamType>,
    output_types: Vec<ParamType>,
}

impl Function {
    /// Create a function definition
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<Param>,
        outputs: Vec<Param>,
        state_mutability: StateMutability,
    ) -> Self {
        let name = name.into();
        let input_types = types_of(&inputs);
        let signature = signature(&name, &input_types);
        Self {
            selector: selector(&signature),
            output_types: types_of(&outputs),
            name,
            inputs,
            outputs,
            state_mutability,
            signature,
            input_types,
        }
    }

    /// Parse a human-readable function such as
    /// `function balanceOf(address owner) view returns (uint256)`.
    ///
    /// The `function` keyword, visibility and `returns` clause are optional.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let (name, params, mut rest) = split_signature(s, "function")?;
        let inputs = parse_params(params, s)?;
        let mut outputs = Vec::new();
        let mut state_mutability = StateMutability::NonPayable;

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix("returns") {
                let after = after.trim_start();
                if !after.starts_with('(') {
                    return Err(TypeError::MalformedSignature(s.to_string()));
                }
                let close = matching_paren(after, 0)
                    .ok_or_else(|| TypeError::MalformedSignature(s.to_string()))?;
                outputs = parse_params(&after[1..close], s)?;
                rest = after[close + 1..].trim_start();
                continue;
            }
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            match &rest[..end] {
                "external" | "public" | "internal" | "private" | "virtual" | "override" => {}
                word => state_mutability = word.parse()?,
            }
            rest = rest[end..].trim_start();
        }

        Ok(Self::new(name, inputs, outputs, state_mutability))
    }

    /// Function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input parameters
    pub fn inputs(&self) -> &[Param] {
        &self.inputs
    }

    /// Output parameters
    pub fn outputs(&self) -> &[Param] {
        &self.outputs
    }

    /// State mutability
    pub fn state_mutability(&self) -> StateMutability {
        self.state_mutability
    }

    /// Canonical signature, e.g. `transfer(address,uint256)`
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// 4-byte selector
    pub fn selector(&self) -> Selector {
        self.selector
    }

    /// Input types in order
    pub fn input_types(&self) -> &[ParamType] {
        &self.input_types
    }

    /// Output types in order
    pub fn output_types(&self) -> &[ParamType] {
        &self.output_types
    }

    /// Name-keyed record of decoded inputs when every input is named
    pub fn inputs_record(&self, values: Vec<Value>) -> Value {
        Value::tuple(names_of(&self.inputs), values)
    }

    /// Name-keyed record of decoded outputs when every output is named
    pub fn outputs_record(&self, values: Vec<Value>) -> Value {
        Value::tuple(names_of(&self.outputs), values)
    }
}

/// Event definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    name: String,
    inputs: Vec<Param>,
    anonymous: bool,
    signature: String,
    topic: H256,
}

impl Event {
    /// Create an event definition
    pub fn new(name: impl Into<String>, inputs: Vec<Param>, anonymous: bool) -> Self {
        let name = name.into();
        let signature = signature(&name, &types_of(&inputs));
        Self {
            topic: topic(&signature),
            name,
            inputs,
            anonymous,
            signature,
        }
    }

    /// Parse a human-readable event such as
    /// `event Transfer(address indexed from, address indexed to, uint256 value)`,
    /// optionally followed by `anonymous`
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let (name, params, rest) = split_signature(s, "event")?;
        let anonymous = match rest {
            "" => false,
            "anonymous" => true,
            _ => return Err(TypeError::MalformedSignature(s.to_string())),
        };
        Ok(Self::new(name, parse_params(params, s)?, anonymous))
    }

    /// Event name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All inputs, indexed or not, in declaration order
    pub fn inputs(&self) -> &[Param] {
        &self.inputs
    }

    /// Whether the log omits the signature topic
    pub fn anonymous(&self) -> bool {
        self.anonymous
    }

    /// Canonical signature
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Signature hash, the first topic of non-anonymous logs
    pub fn topic(&self) -> H256 {
        self.topic
    }

    /// Number of topics a matching log carries
    pub fn topic_count(&self) -> usize {
        let indexed = self.inputs.iter().filter(|p| p.indexed).count();
        if self.anonymous {
            indexed
        } else {
            indexed + 1
        }
    }
}

/// Custom error definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomError {
    name: String,
    inputs: Vec<Param>,
    signature: String,
    selector: Selector,
    input_types: Vec<ParamType>,
}

impl CustomError {
    /// Create an error definition
    pub fn new(name: impl Into<String>, inputs: Vec<Param>) -> Self {
        let name = name.into();
        let input_types = types_of(&inputs);
        let signature = signature(&name, &input_types);
        Self {
            selector: selector(&signature),
            name,
            inputs,
            signature,
            input_types,
        }
    }

    /// Parse a human-readable error such as `error InsufficientBalance(uint256 need)`
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let (name, params, rest) = split_signature(s, "error")?;
        if !rest.is_empty() {
            return Err(TypeError::MalformedSignature(s.to_string()));
        }
        Ok(Self::new(name, parse_params(params, s)?))
    }

    /// Error name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inputs
    pub fn inputs(&self) -> &[Param] {
        &self.inputs
    }

    /// Canonical signature
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// 4-byte selector
    pub fn selector(&self) -> Selector {
        self.selector
    }

    /// Input types in order
    pub fn input_types(&self) -> &[ParamType] {
        &self.input_types
    }

    /// Name-keyed record of decoded inputs when every input is named
    pub fn inputs_record(&self, values: Vec<Value>) -> Value {
        Value::tuple(names_of(&self.inputs), values)
    }
}

/// Constructor definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constructor {
    inputs: Vec<Param>,
    state_mutability: StateMutability,
    input_types: Vec<ParamType>,
}

impl Constructor {
    /// Create a constructor definition
    pub fn new(inputs: Vec<Param>, state_mutability: StateMutability) -> Self {
        Self {
            input_types: types_of(&inputs),
            inputs,
            state_mutability,
        }
    }

    /// Inputs
    pub fn inputs(&self) -> &[Param] {
        &self.inputs
    }

    /// State mutability
    pub fn state_mutability(&self) -> StateMutability {
        self.state_mutability
    }

    /// Input types in order
    pub fn input_types(&self) -> &[ParamType] {
        &self.input_types
    }
}

/// A resolved function, event or error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Definition<'a> {
    /// Function
    Function(&'a Function),
    /// Event
    Event(&'a Event),
    /// Custom error
    Error(&'a CustomError),
}

impl<'a> Definition<'a> {
    /// Item kind, for messages
    pub fn kind(&self) -> &'static str {
        match self {
            Definition::Function(_) => "function",
            Definition::Event(_) => "event",
            Definition::Error(_) => "error",
        }
    }

    /// Item name
    pub fn name(&self) -> &'a str {
        match self {
            Definition::Function(f) => f.name(),
            Definition::Event(e) => e.name(),
            Definition::Error(e) => e.name(),
        }
    }

    /// Canonical signature
    pub fn signature(&self) -> &'a str {
        match self {
            Definition::Function(f) => f.signature(),
            Definition::Event(e) => e.signature(),
            Definition::Error(e) => e.signature(),
        }
    }

    /// Inputs
    pub fn inputs(&self) -> &'a [Param] {
        match self {
            Definition::Function(f) => f.inputs(),
            Definition::Event(e) => e.inputs(),
            Definition::Error(e) => e.inputs(),
        }
    }

    /// The function, if this is one
    pub fn as_function(&self) -> Option<&'a Function> {
        match self {
            Definition::Function(f) => Some(f),
            _ => None,
        }
    }

    /// The event, if this is one
    pub fn as_event(&self) -> Option<&'a Event> {
        match self {
            Definition::Event(e) => Some(e),
            _ => None,
        }
    }

    /// The error, if this is one
    pub fn as_error(&self) -> Option<&'a CustomError> {
        match self {
            Definition::Error(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Functions ====================

    #[test]
    fn test_function_selector_cached() {
        let f = Function::new(
            "transfer",
            vec![
                Param::new("to", ParamType::Address),
                Param::new("amount", ParamType::Uint(256)),
            ],
            vec![Param::new("", ParamType::Bool)],
            StateMutability::NonPayable,
        );
        assert_eq!(f.signature(), "transfer(address,uint256)");
        assert_eq!(f.selector().to_hex(), "0xa9059cbb");
        assert_eq!(f.output_types(), &[ParamType::Bool]);
    }

    #[test]
    fn test_function_parse_full() {
        let f = Function::parse(
            "function balanceOf(address owner) external view returns (uint256 balance)",
        )
        .unwrap();
        assert_eq!(f.name(), "balanceOf");
        assert_eq!(f.inputs()[0].name, "owner");
        assert_eq!(f.outputs()[0].name, "balance");
        assert_eq!(f.state_mutability(), StateMutability::View);
        assert_eq!(f.signature(), "balanceOf(address)");
    }

    #[test]
    fn test_function_parse_minimal() {
        let f = Function::parse("transfer(address,uint)").unwrap();
        assert_eq!(f.signature(), "transfer(address,uint256)");
        assert!(f.outputs().is_empty());
        assert_eq!(f.state_mutability(), StateMutability::NonPayable);
    }

    #[test]
    fn test_function_parse_tuple_params() {
        let f = Function::parse("submit((uint256 id,bytes data)[] memory orders) payable").unwrap();
        assert_eq!(f.signature(), "submit((uint256,bytes)[])");
        assert_eq!(f.inputs()[0].name, "orders");
        assert_eq!(f.state_mutability(), StateMutability::Payable);
    }

    #[test]
    fn test_function_parse_errors() {
        assert!(Function::parse("transfer").is_err());
        assert!(Function::parse("(address)").is_err());
        assert!(Function::parse("f(uint7)").is_err());
        assert!(Function::parse("f(uint256) returns uint256").is_err());
        assert!(matches!(
            Function::parse("f() mutable"),
            Err(TypeError::UnknownMutability(_))
        ));
    }

    // ==================== Events and errors ====================

    #[test]
    fn test_event_parse() {
        let e = Event::parse(
            "event Transfer(address indexed from, address indexed to, uint256 value)",
        )
        .unwrap();
        assert_eq!(e.signature(), "Transfer(address,address,uint256)");
        assert_eq!(
            e.topic().to_hex(),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
        assert!(e.inputs()[0].indexed);
        assert!(!e.inputs()[2].indexed);
        assert_eq!(e.topic_count(), 3);
        assert!(!e.anonymous());
    }

    #[test]
    fn test_event_anonymous() {
        let e = Event::parse("Ping(uint256 indexed id) anonymous").unwrap();
        assert!(e.anonymous());
        assert_eq!(e.topic_count(), 1);
    }

    #[test]
    fn test_error_parse() {
        let e = CustomError::parse("error InsufficientBalance(uint256 available, uint256 required)").unwrap();
        assert_eq!(e.signature(), "InsufficientBalance(uint256,uint256)");
        assert_eq!(e.selector(), selector("InsufficientBalance(uint256,uint256)"));
        assert!(CustomError::parse("error E() view").is_err());
    }

    // ==================== Mutability ====================

    #[test]
    fn test_state_mutability() {
        assert_eq!("view".parse::<StateMutability>().unwrap(), StateMutability::View);
        assert_eq!(StateMutability::from_legacy(true, false), StateMutability::View);
        assert_eq!(StateMutability::from_legacy(false, true), StateMutability::Payable);
        assert_eq!(StateMutability::Payable.to_string(), "payable");
        assert!("mutable".parse::<StateMutability>().is_err());
    }

    #[test]
    fn test_outputs_record() {
        let f = Function::parse("f() returns (uint256 a, bool b)").unwrap();
        let record = f.outputs_record(vec![1u8.into(), true.into()]);
        assert_eq!(record.field("b"), Some(&Value::Bool(true)));
    }
}
