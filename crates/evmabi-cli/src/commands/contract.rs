//! Commands working on contract definitions: calldata, logs and reverts

use clap::Args;
use evmabi_codec::{
    decode_revert, DefinitionTable, Event, Function, LogParam, Native, Param, ResolveError, Revert,
    H256, U256,
};
use serde_json::{json, Value as Json};
use tracing::debug;

use super::{arg_json, guess_value, parse_args, parse_hex, params_json, params_text, Context};
use crate::{output::Output, CliError};

/// `calldata` arguments
#[derive(Debug, Args)]
pub struct CalldataArgs {
    /// Function name (resolved in the ABI) or declaration such as
    /// "transfer(address,uint256)"
    pub function: String,
    /// One value per input; arrays and tuples as JSON
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// `decode-calldata` arguments
#[derive(Debug, Args)]
pub struct DecodeCalldataArgs {
    /// Hex-encoded calldata, selector included
    pub data: String,
    /// Decode against this declaration instead of the ABI
    #[arg(long)]
    pub function: Option<String>,
}

/// `decode-event` arguments
#[derive(Debug, Args)]
pub struct DecodeEventArgs {
    /// Log topics in order (repeat the flag)
    #[arg(long = "topic", required = true)]
    pub topics: Vec<String>,
    /// Hex-encoded log data
    #[arg(long, default_value = "0x")]
    pub data: String,
    /// Decode against this declaration instead of the ABI
    #[arg(long)]
    pub event: Option<String>,
}

/// `decode-error` arguments
#[derive(Debug, Args)]
pub struct DecodeErrorArgs {
    /// Hex-encoded revert data
    pub data: String,
}

impl CalldataArgs {
    /// Encode a function call
    pub fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let function = if self.function.contains('(') {
            Function::parse(&self.function)?
        } else {
            let table = ctx.table()?;
            let function = resolve_call(&table, &self.function, &self.args)?;
            debug!(signature = function.signature(), "resolved function");
            function.clone()
        };
        let values = parse_args(function.input_types(), &self.args)?;
        let data = function.encode_input(&values)?;
        Output::new(ctx.json)
            .field("signature", function.signature())
            .field("selector", &function.selector().to_hex())
            .bytes("data", &data)
            .print();
        Ok(())
    }
}

/// Pick the overload of `name` for raw command-line arguments.
///
/// Overloads whose input types accept the arguments are kept. Several
/// survivors go through the table's resolver with guessed values, which
/// reports ambiguous pairs; otherwise its pick stands if it is a survivor,
/// else the first survivor wins.
fn resolve_call<'t>(
    table: &'t DefinitionTable,
    name: &str,
    args: &[String],
) -> Result<&'t Function, CliError> {
    let accepting: Vec<&Function> = table
        .functions_named(name)
        .into_iter()
        .filter(|f| f.inputs().len() == args.len() && parse_args(f.input_types(), args).is_ok())
        .collect();
    let guesses: Vec<_> = args.iter().map(|a| guess_value(&arg_json(a))).collect();
    match accepting.as_slice() {
        [] => Ok(table.resolve_function(name, Some(&guesses))?),
        [only] => Ok(*only),
        [first, ..] => match table.resolve_function(name, Some(&guesses)) {
            Ok(function) if accepting.contains(&function) => Ok(function),
            Err(e @ ResolveError::Ambiguous { .. }) => Err(e.into()),
            _ => Ok(*first),
        },
    }
}

impl DecodeCalldataArgs {
    /// Decode a function call
    pub fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let data = parse_hex(&self.data)?;
        let (function, args) = match &self.function {
            Some(declaration) => {
                let function = Function::parse(declaration)?;
                let args = function.decode_input(&data)?;
                (function, args)
            }
            None => {
                let table = ctx.table()?;
                let call = table.decode_function_data(&data)?;
                (call.function.clone(), call.args)
            }
        };
        Output::new(ctx.json)
            .field("signature", function.signature())
            .field("selector", &function.selector().to_hex())
            .field_value("args", params_json(function.inputs(), &args))
            .line(function.signature())
            .line(&params_text(function.inputs(), &args))
            .print();
        Ok(())
    }
}

impl DecodeEventArgs {
    /// Decode an event log
    pub fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let topics = self
            .topics
            .iter()
            .map(|t| H256::from_hex(t).map_err(|e| CliError::InvalidHex(format!("{}: {}", t, e))))
            .collect::<Result<Vec<_>, _>>()?;
        let data = parse_hex(&self.data)?;

        let (event, params) = match &self.event {
            Some(declaration) => {
                let event = Event::parse(declaration)?;
                let params = event.decode_log(&topics, &data)?;
                (event, params)
            }
            None => {
                let table = ctx.table()?;
                let log = table.decode_log(&topics, &data)?;
                (log.event.clone(), log.params)
            }
        };

        let json_params: serde_json::Map<String, Json> = event
            .inputs()
            .iter()
            .zip(&params)
            .enumerate()
            .map(|(i, (p, lp))| (param_key(p, i), log_param_json(p, lp)))
            .collect();
        let text = event
            .inputs()
            .iter()
            .zip(&params)
            .map(|(p, lp)| match lp {
                LogParam::Value(v) => format!("{} {}: {}", p.ty, p.name, v),
                LogParam::Hashed(h) => format!("{} {}: <hashed {}>", p.ty, p.name, h.to_hex()),
            })
            .collect::<Vec<_>>()
            .join("\n");

        Output::new(ctx.json)
            .field("event", event.signature())
            .field_value("params", Json::Object(json_params))
            .line(event.signature())
            .line(&text)
            .print();
        Ok(())
    }
}

fn param_key(param: &Param, index: usize) -> String {
    if param.name.is_empty() {
        index.to_string()
    } else {
        param.name.clone()
    }
}

fn log_param_json(param: &Param, value: &LogParam) -> Json {
    match value {
        LogParam::Value(v) => Native::new(&param.ty, v).to_json(),
        LogParam::Hashed(h) => json!({ "hashed": h.to_hex() }),
    }
}

fn code_hex(code: &U256) -> String {
    if code.bits() <= 64 {
        format!("0x{:02x}", code.low_u64())
    } else {
        format!("{:#x}", code)
    }
}

impl DecodeErrorArgs {
    /// Decode revert data
    pub fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let data = parse_hex(&self.data)?;
        let table = ctx.optional_table()?;
        let revert = decode_revert(&data, table.as_ref())?;

        let output = Output::new(ctx.json).line(&revert.to_string());
        let output = match &revert {
            Revert::Reason(reason) => output.field("kind", "reason").field("reason", reason),
            Revert::Panic { code, reason } => output
                .field("kind", "panic")
                .field("code", &code_hex(code))
                .field_value("reason", json!(reason)),
            Revert::Custom {
                name,
                signature,
                args,
            } => output
                .field("kind", "custom")
                .field("name", name)
                .field("signature", signature)
                .field_value("args", Native::from(args).to_json()),
        };
        output.print();
        Ok(())
    }
}
