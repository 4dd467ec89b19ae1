//! Calldata, return data, deployment data and error data
//!
//! Item-level helpers: these prepend or check selectors and pick the right
//! parameter list, then defer to the standard codec.

use evmabi_primitives::Selector;

use crate::abi::{decode, encode, encode_with_selector, Value};
use crate::error::{AbiError, DecodeError, EncodeError, ResolveError};
use crate::item::{Constructor, CustomError, Function};
use crate::table::DefinitionTable;

/// Calldata matched to a function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCall<'a> {
    /// Called function
    pub function: &'a Function,
    /// Arguments in declaration order
    pub args: Vec<Value>,
}

impl DecodedCall<'_> {
    /// Arguments as a record (or list when some inputs are unnamed)
    pub fn to_value(&self) -> Value {
        self.function.inputs_record(self.args.clone())
    }
}

/// Split calldata into selector and argument bytes, checking the selector
fn strip_selector(expected: Selector, data: &[u8]) -> Result<&[u8], DecodeError> {
    let got = Selector::from_prefix(data).ok_or(DecodeError::MissingSelector { len: data.len() })?;
    if got != expected {
        return Err(DecodeError::SelectorMismatch { expected, got });
    }
    Ok(&data[Selector::LEN..])
}

impl Function {
    /// Calldata: selector followed by the encoded arguments
    pub fn encode_input(&self, args: &[Value]) -> Result<Vec<u8>, EncodeError> {
        encode_with_selector(*self.selector().as_bytes(), self.input_types(), args)
    }

    /// Arguments from calldata carrying this function's selector
    pub fn decode_input(&self, data: &[u8]) -> Result<Vec<Value>, DecodeError> {
        decode(self.input_types(), strip_selector(self.selector(), data)?)
    }

    /// Return data for `values`
    pub fn encode_output(&self, values: &[Value]) -> Result<Vec<u8>, EncodeError> {
        encode(self.output_types(), values)
    }

    /// Values from return data
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<Value>, DecodeError> {
        decode(self.output_types(), data)
    }
}

impl Constructor {
    /// Deployment data: creation bytecode followed by the encoded arguments
    pub fn encode_deploy(&self, bytecode: &[u8], args: &[Value]) -> Result<Vec<u8>, EncodeError> {
        let mut data = bytecode.to_vec();
        data.extend(encode(self.input_types(), args)?);
        Ok(data)
    }
}

impl CustomError {
    /// Revert data: selector followed by the encoded arguments
    pub fn encode(&self, args: &[Value]) -> Result<Vec<u8>, EncodeError> {
        encode_with_selector(*self.selector().as_bytes(), self.input_types(), args)
    }

    /// Arguments from revert data carrying this error's selector
    pub fn decode(&self, data: &[u8]) -> Result<Vec<Value>, DecodeError> {
        decode(self.input_types(), strip_selector(self.selector(), data)?)
    }
}

impl DefinitionTable {
    /// Calldata for the function `name` resolved against `args`
    pub fn encode_function_data(&self, name: &str, args: &[Value]) -> Result<Vec<u8>, AbiError> {
        let function = self.resolve_function(name, Some(args))?;
        Ok(function.encode_input(args)?)
    }

    /// Match calldata to a function by selector and decode its arguments
    pub fn decode_function_data(&self, data: &[u8]) -> Result<DecodedCall<'_>, AbiError> {
        let selector = Selector::from_prefix(data).ok_or(DecodeError::MissingSelector { len: data.len() })?;
        let function = self
            .function_by_selector(&selector)
            .ok_or(ResolveError::UnknownFunction(selector))?;
        let args = decode(function.input_types(), &data[Selector::LEN..])?;
        Ok(DecodedCall { function, args })
    }

    /// Return data of the function `name`
    pub fn encode_function_result(&self, name: &str, values: &[Value]) -> Result<Vec<u8>, AbiError> {
        Ok(self.resolve_function(name, None)?.encode_output(values)?)
    }

    /// Decode return data of the function `name`
    pub fn decode_function_result(&self, name: &str, data: &[u8]) -> Result<Vec<Value>, AbiError> {
        Ok(self.resolve_function(name, None)?.decode_output(data)?)
    }

    /// Deployment data. Without a declared constructor only an empty
    /// argument list is accepted.
    pub fn encode_deploy_data(&self, bytecode: &[u8], args: &[Value]) -> Result<Vec<u8>, AbiError> {
        match self.constructor() {
            Some(constructor) => Ok(constructor.encode_deploy(bytecode, args)?),
            None if args.is_empty() => Ok(bytecode.to_vec()),
            None => Err(EncodeError::LengthMismatch {
                expected: 0,
                got: args.len(),
            }
            .into()),
        }
    }

    /// Revert data for the custom error `name` resolved against `args`
    pub fn encode_error_result(&self, name: &str, args: &[Value]) -> Result<Vec<u8>, AbiError> {
        Ok(self.resolve_error(name, Some(args))?.encode(args)?)
    }
}
