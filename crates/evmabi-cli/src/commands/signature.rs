//! Signature, selector and topic commands

use clap::Args;
use evmabi_codec::{CustomError, Event, Function};

use super::Context;
use crate::{output::Output, CliError};

/// A declaration or canonical signature
#[derive(Debug, Args)]
pub struct SignatureArgs {
    /// e.g. "transfer(address,uint256)" or
    /// "function transfer(address to, uint256 amount) returns (bool)"
    pub declaration: String,
}

impl SignatureArgs {
    /// Function selector
    pub fn selector(self, ctx: &Context) -> Result<(), CliError> {
        let function = Function::parse(&self.declaration)?;
        let selector = function.selector().to_hex();
        Output::new(ctx.json)
            .field("signature", function.signature())
            .field("selector", &selector)
            .line(&selector)
            .print();
        Ok(())
    }

    /// Event topic
    pub fn topic(self, ctx: &Context) -> Result<(), CliError> {
        let event = Event::parse(&self.declaration)?;
        let topic = event.topic().to_hex();
        Output::new(ctx.json)
            .field("signature", event.signature())
            .field("topic", &topic)
            .line(&topic)
            .print();
        Ok(())
    }

    /// Canonical signature of any declaration, with its hash
    pub fn signature(self, ctx: &Context) -> Result<(), CliError> {
        let declaration = self.declaration.trim();
        let (kind, signature, hash) = match declaration.split_whitespace().next() {
            Some("event") => {
                let event = Event::parse(declaration)?;
                ("event", event.signature().to_string(), event.topic().to_hex())
            }
            Some("error") => {
                let error = CustomError::parse(declaration)?;
                ("error", error.signature().to_string(), error.selector().to_hex())
            }
            _ => {
                let function = Function::parse(declaration)?;
                ("function", function.signature().to_string(), function.selector().to_hex())
            }
        };
        Output::new(ctx.json)
            .field("kind", kind)
            .field("signature", &signature)
            .field("hash", &hash)
            .line(&signature)
            .line(&hash)
            .print();
        Ok(())
    }
}
