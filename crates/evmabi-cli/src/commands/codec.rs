//! Raw parameter codec commands

use clap::Args;
use evmabi_codec::abi::{decode_with, encode, encode_packed, DecodeOptions, ParamType};
use evmabi_codec::{Native, Param};
use serde_json::Value as Json;

use super::{parse_args, parse_hex, params_text, Context};
use crate::{output::Output, CliError};

/// `encode` / `encode-packed` arguments
#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Parameter types, e.g. "(string,uint256,bool)"
    pub types: String,
    /// One value per type; arrays and tuples as JSON
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// `decode` arguments
#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Parameter types, e.g. "(string,uint256,bool)"
    pub types: String,
    /// Hex-encoded data
    pub data: String,
    /// Accept dirty padding and out-of-range integers
    #[arg(long)]
    pub lenient: bool,
}

impl EncodeArgs {
    /// Standard head/tail encoding
    pub fn encode(self, ctx: &Context) -> Result<(), CliError> {
        let types = ParamType::parse_list(&self.types)?;
        let values = parse_args(&types, &self.args)?;
        print_data(ctx, &encode(&types, &values)?);
        Ok(())
    }

    /// Packed encoding
    pub fn encode_packed(self, ctx: &Context) -> Result<(), CliError> {
        let types = ParamType::parse_list(&self.types)?;
        let values = parse_args(&types, &self.args)?;
        print_data(ctx, &encode_packed(&types, &values)?);
        Ok(())
    }
}

impl DecodeArgs {
    /// Decode data against the types
    pub fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let types = ParamType::parse_list(&self.types)?;
        let data = parse_hex(&self.data)?;
        let options = if self.lenient {
            DecodeOptions::lenient()
        } else {
            DecodeOptions::default()
        };
        let values = decode_with(&types, &data, &options)?;

        let params: Vec<Param> = types.into_iter().map(|ty| Param::new("", ty)).collect();
        let natives: Vec<Json> = params
            .iter()
            .zip(&values)
            .map(|(p, v)| Native::new(&p.ty, v).to_json())
            .collect();
        Output::new(ctx.json)
            .field_value("values", Json::Array(natives))
            .line(&params_text(&params, &values))
            .print();
        Ok(())
    }
}

fn print_data(ctx: &Context, data: &[u8]) {
    Output::new(ctx.json)
        .bytes("data", data)
        .field_value("size", data.len().into())
        .print();
}
