//! JSON ABI documents
//!
//! Accepts the item array emitted by the Solidity compiler, or an artifact
//! object carrying it under `"abi"`.

use serde::de::Error as _;
use serde::{Deserialize, Serialize};

use crate::abi::{ParamType, TupleComponent};
use crate::error::AbiError;
use crate::item::{Constructor, CustomError, Event, Function, Param, StateMutability};

/// Parameter as written in a JSON ABI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonParam {
    /// Parameter name
    #[serde(default)]
    pub name: String,
    /// Type string; tuples are spelled `tuple`, `tuple[]`, ...
    #[serde(rename = "type")]
    pub ty: String,
    /// Tuple members
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<JsonParam>>,
    /// Event topic flag
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub indexed: bool,
    /// Solidity-level type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
}

/// Item as written in a JSON ABI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonItem {
    /// `function`, `event`, `error`, `constructor`, `fallback` or `receive`
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    /// Item name (absent for constructor, fallback, receive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Inputs
    #[serde(default)]
    pub inputs: Vec<JsonParam>,
    /// Function outputs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<JsonParam>,
    /// `pure`, `view`, `nonpayable` or `payable`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
    /// Legacy flag, read as `view`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<bool>,
    /// Legacy flag, read as `payable`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payable: Option<bool>,
    /// Event without signature topic
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub anonymous: bool,
}

fn default_kind() -> String {
    "function".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Items(Vec<JsonItem>),
    Artifact { abi: Vec<JsonItem> },
}

/// A definition converted from JSON
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiItem {
    /// Function
    Function(Function),
    /// Event
    Event(Event),
    /// Custom error
    Error(CustomError),
    /// Constructor
    Constructor(Constructor),
    /// Fallback function
    Fallback(StateMutability),
    /// Receive function
    Receive,
}

/// Parse a JSON ABI document into raw items
pub fn parse_items(json: &str) -> Result<Vec<JsonItem>, AbiError> {
    Ok(match serde_json::from_str::<Document>(json)? {
        Document::Items(items) => items,
        Document::Artifact { abi } => abi,
    })
}

impl JsonParam {
    /// Build the type descriptor, resolving `tuple` against `components`
    pub fn param_type(&self) -> Result<ParamType, AbiError> {
        let components = self
            .components
            .as_ref()
            .map(|members| {
                members
                    .iter()
                    .map(|m| Ok(TupleComponent::new(m.name.clone(), m.param_type()?)))
                    .collect::<Result<Vec<_>, AbiError>>()
            })
            .transpose()?;
        Ok(ParamType::parse_with_components(&self.ty, components)?)
    }

    /// Convert to a definition parameter
    pub fn to_param(&self) -> Result<Param, AbiError> {
        Ok(Param {
            name: self.name.clone(),
            ty: self.param_type()?,
            indexed: self.indexed,
            internal_type: self.internal_type.clone(),
        })
    }
}

fn params(list: &[JsonParam]) -> Result<Vec<Param>, AbiError> {
    list.iter().map(JsonParam::to_param).collect()
}

impl JsonItem {
    fn state_mutability(&self) -> Result<StateMutability, AbiError> {
        match &self.state_mutability {
            Some(s) => Ok(s.parse()?),
            None => Ok(StateMutability::from_legacy(
                self.constant.unwrap_or(false),
                self.payable.unwrap_or(false),
            )),
        }
    }

    fn required_name(&self) -> Result<&str, AbiError> {
        self.name.as_deref().ok_or_else(|| {
            AbiError::Json(serde_json::Error::custom(format!("{} item without a name", self.kind)))
        })
    }

    /// Convert into a typed definition
    pub fn to_item(&self) -> Result<AbiItem, AbiError> {
        Ok(match self.kind.as_str() {
            "function" => AbiItem::Function(Function::new(
                self.required_name()?,
                params(&self.inputs)?,
                params(&self.outputs)?,
                self.state_mutability()?,
            )),
            "event" => AbiItem::Event(Event::new(
                self.required_name()?,
                params(&self.inputs)?,
                self.anonymous,
            )),
            "error" => AbiItem::Error(CustomError::new(self.required_name()?, params(&self.inputs)?)),
            "constructor" => {
                AbiItem::Constructor(Constructor::new(params(&self.inputs)?, self.state_mutability()?))
            }
            "fallback" => AbiItem::Fallback(self.state_mutability()?),
            "receive" => AbiItem::Receive,
            other => {
                return Err(AbiError::Json(serde_json::Error::custom(format!(
                    "unknown ABI item type `{}`",
                    other
                ))))
            }
        })
    }
}

impl From<&ParamType> for JsonParam {
    fn from(ty: &ParamType) -> Self {
        let components = match innermost(ty) {
            ParamType::Tuple(members) => Some(
                members
                    .iter()
                    .map(|m| JsonParam {
                        name: m.name.clone(),
                        ..JsonParam::from(&m.ty)
                    })
                    .collect(),
            ),
            _ => None,
        };
        JsonParam {
            ty: ty.abi_type_string(),
            components,
            ..Default::default()
        }
    }
}

fn innermost(ty: &ParamType) -> &ParamType {
    match ty {
        ParamType::Array(inner) | ParamType::FixedArray(inner, _) => innermost(inner),
        other => other,
    }
}

impl From<&Param> for JsonParam {
    fn from(param: &Param) -> Self {
        JsonParam {
            name: param.name.clone(),
            indexed: param.indexed,
            internal_type: param.internal_type.clone(),
            ..JsonParam::from(&param.ty)
        }
    }
}
