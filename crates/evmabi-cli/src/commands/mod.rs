//! Subcommand implementations and the helpers they share

pub mod codec;
pub mod contract;
pub mod signature;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use evmabi_codec::{DefinitionTable, Native, Param, ParamType, Value, I256};
use evmabi_crypto::{parse_checksummed, CryptoError};
use serde_json::Value as Json;
use tracing::debug;

use crate::CliError;

/// State shared by every subcommand
pub struct Context {
    /// Print JSON instead of text
    pub json: bool,
    abi_path: Option<PathBuf>,
}

impl Context {
    /// Create a context; the definition table is loaded on first use
    pub fn new(json: bool, abi_path: Option<PathBuf>) -> Self {
        Self { json, abi_path }
    }

    /// The configured definition table, if any
    pub fn optional_table(&self) -> Result<Option<DefinitionTable>, CliError> {
        self.abi_path
            .as_deref()
            .map(load_table)
            .transpose()
            .map_err(CliError::from)
    }

    /// The configured definition table
    pub fn table(&self) -> Result<DefinitionTable, CliError> {
        self.optional_table()?.ok_or(CliError::MissingAbi)
    }
}

/// Load a definition table from a JSON ABI or a file of human-readable
/// declarations (one per line, `#` comments allowed)
pub fn load_table(path: &Path) -> anyhow::Result<DefinitionTable> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read ABI file {}", path.display()))?;
    let trimmed = content.trim_start();
    let table = if trimmed.starts_with('[') || trimmed.starts_with('{') {
        DefinitionTable::from_json_str(&content)
            .with_context(|| format!("Invalid JSON ABI in {}", path.display()))?
    } else {
        let lines = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.starts_with('#') && !line.starts_with("//"));
        DefinitionTable::from_human_readable(lines)
            .with_context(|| format!("Invalid declaration in {}", path.display()))?
    };
    debug!(
        path = %path.display(),
        functions = table.functions().len(),
        events = table.events().len(),
        errors = table.errors().len(),
        "loaded definition table"
    );
    Ok(table)
}

/// Decode a `0x`-prefixed (or bare) hex string
pub fn parse_hex(s: &str) -> Result<Vec<u8>, CliError> {
    let digits = s.trim().strip_prefix("0x").unwrap_or(s.trim());
    hex::decode(digits).map_err(|e| CliError::InvalidHex(format!("{}: {}", s, e)))
}

/// Command-line argument as JSON: arrays, objects and booleans are parsed,
/// everything else is kept as a string for the type-guided conversion
pub fn arg_json(arg: &str) -> Json {
    let trimmed = arg.trim();
    let structured = trimmed.starts_with('[')
        || trimmed.starts_with('{')
        || trimmed == "true"
        || trimmed == "false";
    if structured {
        if let Ok(json) = serde_json::from_str(trimmed) {
            return json;
        }
    }
    Json::String(arg.to_string())
}

/// Arguments converted to values of `types`.
///
/// Mixed-case address arguments must carry a valid EIP-55 checksum.
pub fn parse_args(types: &[ParamType], args: &[String]) -> Result<Vec<Value>, CliError> {
    for (ty, arg) in types.iter().zip(args) {
        if *ty == ParamType::Address {
            if let Err(e @ CryptoError::BadChecksum { .. }) = parse_checksummed(arg.trim()) {
                return Err(CliError::InvalidInput(format!("{}: {}", arg, e)));
            }
        }
    }
    let json: Vec<Json> = args.iter().map(|a| arg_json(a)).collect();
    Ok(Value::from_json_args(types, &json)?)
}

/// Best-effort value for overload resolution before the types are known
pub fn guess_value(json: &Json) -> Value {
    match json {
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => match (n.as_u64(), n.as_i64()) {
            (Some(u), _) => Value::from(u),
            (None, Some(i)) => Value::from(i),
            _ => Value::String(n.to_string()),
        },
        Json::String(s) => match (evmabi_primitives::parse_u256(s), s.parse::<I256>()) {
            (Ok(u), _) if !s.starts_with("0x") => Value::Uint(u),
            (_, Ok(i)) if s.starts_with('-') => Value::Int(i),
            _ => Value::String(s.clone()),
        },
        Json::Array(items) => Value::List(items.iter().map(guess_value).collect()),
        Json::Object(fields) => Value::Record(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), guess_value(v)))
                .collect(),
        ),
        Json::Null => Value::String(String::new()),
    }
}

/// Values as JSON: an object keyed by parameter name when every parameter
/// is named, an array otherwise
pub fn params_json(params: &[Param], values: &[Value]) -> Json {
    let natives = params
        .iter()
        .zip(values)
        .map(|(p, v)| (p.name.as_str(), Native::new(&p.ty, v).to_json()));
    if !params.is_empty() && params.iter().all(|p| !p.name.is_empty()) {
        Json::Object(natives.map(|(name, v)| (name.to_string(), v)).collect())
    } else {
        Json::Array(natives.map(|(_, v)| v).collect())
    }
}

/// Values as text, one per line, prefixed with the parameter name if any
pub fn params_text(params: &[Param], values: &[Value]) -> String {
    params
        .iter()
        .zip(values)
        .map(|(p, v)| {
            if p.name.is_empty() {
                format!("{}: {}", p.ty, v)
            } else {
                format!("{} {}: {}", p.ty, p.name, v)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_arg_json() {
        assert_eq!(arg_json("[1,2]"), json!([1, 2]));
        assert_eq!(arg_json("true"), json!(true));
        assert_eq!(arg_json("420"), json!("420"));
        assert_eq!(arg_json("[oops"), json!("[oops"));
    }

    #[test]
    fn test_guess_value() {
        assert_eq!(guess_value(&json!("420")), Value::from(420u64));
        assert_eq!(guess_value(&json!("-5")), Value::from(-5i64));
        assert_eq!(guess_value(&json!("0x12")), Value::from("0x12"));
        assert_eq!(guess_value(&json!("hello")), Value::from("hello"));
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("0xdead").unwrap(), vec![0xde, 0xad]);
        assert_eq!(parse_hex("beef").unwrap(), vec![0xbe, 0xef]);
        assert!(parse_hex("0xzz").is_err());
    }

    #[test]
    fn test_parse_args_checks_address_casing() {
        let types = [ParamType::Address];
        let good = vec!["0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".to_string()];
        assert!(parse_args(&types, &good).is_ok());

        let bad = vec!["0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".to_string()];
        assert!(matches!(parse_args(&types, &bad), Err(CliError::InvalidInput(_))));

        let lower = vec!["0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".to_string()];
        assert!(parse_args(&types, &lower).is_ok());
    }

    #[test]
    fn test_params_json() {
        let params = vec![
            Param::new("to", ParamType::Address),
            Param::new("amount", ParamType::Uint(8)),
        ];
        let values = vec![Value::Address(Default::default()), Value::from(3u8)];
        let json = params_json(&params, &values);
        assert_eq!(json["amount"], json!(3));

        let unnamed = vec![Param::new("", ParamType::Uint(256))];
        assert_eq!(params_json(&unnamed, &[Value::from(3u8)]), json!(["3"]));
    }
}
