//! Definition table
//!
//! Holds the functions, events and errors of one contract interface and the
//! lookup indexes used by the resolver. A table is built once through
//! [`DefinitionTableBuilder`] (or a JSON document) and is read-only after
//! that, so it can be shared across threads behind an `Arc`.

use std::collections::HashMap;

use evmabi_primitives::{Selector, H256};
use tracing::debug;

use crate::error::{AbiError, TypeError};
use crate::item::{Constructor, CustomError, Event, Function, StateMutability};
use crate::json::{parse_items, AbiItem};

/// Immutable set of definitions with name, selector and topic indexes
#[derive(Debug, Clone, Default)]
pub struct DefinitionTable {
    functions: Vec<Function>,
    events: Vec<Event>,
    errors: Vec<CustomError>,
    constructor: Option<Constructor>,
    fallback: Option<StateMutability>,
    receive: bool,
    functions_by_name: HashMap<String, Vec<usize>>,
    events_by_name: HashMap<String, Vec<usize>>,
    errors_by_name: HashMap<String, Vec<usize>>,
    functions_by_selector: HashMap<Selector, usize>,
    errors_by_selector: HashMap<Selector, usize>,
    events_by_topic: HashMap<H256, usize>,
}

impl DefinitionTable {
    /// Start building a table
    pub fn builder() -> DefinitionTableBuilder {
        DefinitionTableBuilder::default()
    }

    /// Load a JSON ABI (item array or `{"abi": [...]}` artifact)
    pub fn from_json_str(json: &str) -> Result<Self, AbiError> {
        let items = parse_items(json)?
            .iter()
            .map(|item| item.to_item())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_items(items))
    }

    /// Build from converted items
    pub fn from_items(items: impl IntoIterator<Item = AbiItem>) -> Self {
        items
            .into_iter()
            .fold(DefinitionTableBuilder::default(), |builder, item| builder.item(item))
            .build()
    }

    /// Build from human-readable declarations such as
    /// `function transfer(address,uint256) returns (bool)`,
    /// `event Transfer(address indexed,address indexed,uint256)` or
    /// `error Unauthorized()`. Lines without a keyword are functions.
    pub fn from_human_readable<'a>(
        lines: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, TypeError> {
        let mut builder = DefinitionTableBuilder::default();
        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            builder = match line.split_whitespace().next() {
                Some("event") => builder.event(Event::parse(line)?),
                Some("error") => builder.error(CustomError::parse(line)?),
                _ => builder.function(Function::parse(line)?),
            };
        }
        Ok(builder.build())
    }

    /// All functions in declaration order
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// All events in declaration order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// All custom errors in declaration order
    pub fn errors(&self) -> &[CustomError] {
        &self.errors
    }

    /// Constructor, if declared
    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }

    /// Fallback mutability, if a fallback function is declared
    pub fn fallback(&self) -> Option<StateMutability> {
        self.fallback
    }

    /// Whether a receive function is declared
    pub fn has_receive(&self) -> bool {
        self.receive
    }

    /// Functions named `name`, overloads in declaration order
    pub fn functions_named(&self, name: &str) -> Vec<&Function> {
        lookup(&self.functions_by_name, &self.functions, name)
    }

    /// Events named `name`, overloads in declaration order
    pub fn events_named(&self, name: &str) -> Vec<&Event> {
        lookup(&self.events_by_name, &self.events, name)
    }

    /// Errors named `name`, overloads in declaration order
    pub fn errors_named(&self, name: &str) -> Vec<&CustomError> {
        lookup(&self.errors_by_name, &self.errors, name)
    }

    /// Function with this selector
    pub fn function_by_selector(&self, selector: &Selector) -> Option<&Function> {
        self.functions_by_selector.get(selector).map(|&i| &self.functions[i])
    }

    /// Custom error with this selector
    pub fn error_by_selector(&self, selector: &Selector) -> Option<&CustomError> {
        self.errors_by_selector.get(selector).map(|&i| &self.errors[i])
    }

    /// Event with this topic
    pub fn event_by_topic(&self, topic: &H256) -> Option<&Event> {
        self.events_by_topic.get(topic).map(|&i| &self.events[i])
    }

    /// Whether the table has no functions, events or errors
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.events.is_empty() && self.errors.is_empty()
    }
}

fn lookup<'a, T>(index: &HashMap<String, Vec<usize>>, items: &'a [T], name: &str) -> Vec<&'a T> {
    index
        .get(name)
        .map(|positions| positions.iter().map(|&i| &items[i]).collect())
        .unwrap_or_default()
}

/// Builder for [`DefinitionTable`]
#[derive(Debug, Default)]
pub struct DefinitionTableBuilder {
    functions: Vec<Function>,
    events: Vec<Event>,
    errors: Vec<CustomError>,
    constructor: Option<Constructor>,
    fallback: Option<StateMutability>,
    receive: bool,
}

impl DefinitionTableBuilder {
    /// Add a function
    pub fn function(mut self, function: Function) -> Self {
        self.functions.push(function);
        self
    }

    /// Add an event
    pub fn event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    /// Add a custom error
    pub fn error(mut self, error: CustomError) -> Self {
        self.errors.push(error);
        self
    }

    /// Set the constructor
    pub fn constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Add any converted item
    pub fn item(self, item: AbiItem) -> Self {
        match item {
            AbiItem::Function(f) => self.function(f),
            AbiItem::Event(e) => self.event(e),
            AbiItem::Error(e) => self.error(e),
            AbiItem::Constructor(c) => self.constructor(c),
            AbiItem::Fallback(mutability) => Self {
                fallback: Some(mutability),
                ..self
            },
            AbiItem::Receive => Self {
                receive: true,
                ..self
            },
        }
    }

    /// Freeze into a table. The first definition wins when two share a
    /// selector or topic.
    pub fn build(self) -> DefinitionTable {
        let mut table = DefinitionTable {
            functions: self.functions,
            events: self.events,
            errors: self.errors,
            constructor: self.constructor,
            fallback: self.fallback,
            receive: self.receive,
            ..Default::default()
        };

        for (i, f) in table.functions.iter().enumerate() {
            table.functions_by_name.entry(f.name().to_string()).or_default().push(i);
            if table.functions_by_selector.contains_key(&f.selector()) {
                debug!(signature = f.signature(), selector = %f.selector(), "duplicate function selector");
            } else {
                table.functions_by_selector.insert(f.selector(), i);
            }
        }
        for (i, e) in table.events.iter().enumerate() {
            table.events_by_name.entry(e.name().to_string()).or_default().push(i);
            if e.anonymous() {
                continue;
            }
            if table.events_by_topic.contains_key(&e.topic()) {
                debug!(signature = e.signature(), topic = %e.topic(), "duplicate event topic");
            } else {
                table.events_by_topic.insert(e.topic(), i);
            }
        }
        for (i, e) in table.errors.iter().enumerate() {
            table.errors_by_name.entry(e.name().to_string()).or_default().push(i);
            if table.errors_by_selector.contains_key(&e.selector()) {
                debug!(signature = e.signature(), selector = %e.selector(), "duplicate error selector");
            } else {
                table.errors_by_selector.insert(e.selector(), i);
            }
        }

        debug!(
            functions = table.functions.len(),
            events = table.events.len(),
            errors = table.errors.len(),
            "built definition table"
        );
        table
    }
}

/// Human-readable ERC-20 interface
pub const ERC20: &[&str] = &[
    "function name() view returns (string)",
    "function symbol() view returns (string)",
    "function decimals() view returns (uint8)",
    "function totalSupply() view returns (uint256)",
    "function balanceOf(address owner) view returns (uint256)",
    "function transfer(address to, uint256 amount) returns (bool)",
    "function approve(address spender, uint256 amount) returns (bool)",
    "function allowance(address owner, address spender) view returns (uint256)",
    "function transferFrom(address from, address to, uint256 amount) returns (bool)",
    "event Transfer(address indexed from, address indexed to, uint256 value)",
    "event Approval(address indexed owner, address indexed spender, uint256 value)",
];

/// Standard ERC-20 interface
pub fn erc20() -> Result<DefinitionTable, TypeError> {
    DefinitionTable::from_human_readable(ERC20.iter().copied())
}
