//! Overload-aware lookup of functions, events and errors
//!
//! A query is one of:
//!
//! - a `0x`-prefixed 4-byte selector, matched against functions then errors
//! - a `0x`-prefixed 32-byte topic, matched against events
//! - a signature such as `transfer(address,uint256)`, compared in canonical
//!   form so aliases and parameter names are allowed
//! - a bare name, matched against functions, events and errors in that order
//!
//! When a name has several definitions the candidate arguments (if any)
//! narrow them down; see [`DefinitionTable::resolve`].

use evmabi_primitives::{Address, Selector, H256};
use tracing::debug;

use crate::abi::{matching_paren, ParamType, Value};
use crate::error::ResolveError;
use crate::item::{CustomError, Definition, Event, Function};
use crate::signature::signature;
use crate::table::DefinitionTable;

enum Query<'q> {
    Selector(Selector),
    Topic(H256),
    Signature(&'q str),
    Name(&'q str),
}

fn classify(query: &str) -> Query<'_> {
    if let Some(digits) = query.strip_prefix("0x") {
        if digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            if digits.len() == 8 {
                if let Ok(selector) = Selector::from_hex(query) {
                    return Query::Selector(selector);
                }
            } else if digits.len() == 64 {
                if let Ok(topic) = H256::from_hex(query) {
                    return Query::Topic(topic);
                }
            }
        }
    }
    if query.contains('(') {
        Query::Signature(query)
    } else {
        Query::Name(query)
    }
}

impl DefinitionTable {
    /// Resolve a name, signature, selector or topic to one definition.
    ///
    /// With several candidates and no arguments, a zero-parameter overload is
    /// preferred, else the first in declaration order. With arguments, the
    /// candidates whose parameters structurally accept them are kept; if more
    /// than one survives and an argument could be read as either of an
    /// `address`/`bytes20` or `address`/`string` pair, resolution fails as
    /// ambiguous, otherwise the first survivor wins.
    pub fn resolve(&self, query: &str, args: Option<&[Value]>) -> Result<Definition<'_>, ResolveError> {
        let candidates = self.candidates(query);
        match candidates.len() {
            0 => Err(ResolveError::NotFound(query.to_string())),
            1 => Ok(candidates[0]),
            _ => pick_overload(query, candidates, args),
        }
    }

    /// Resolve to a function
    pub fn resolve_function(&self, query: &str, args: Option<&[Value]>) -> Result<&Function, ResolveError> {
        let def = self.resolve_kind(query, args, "function", |d| d.as_function().is_some())?;
        def.as_function().ok_or_else(|| kind_mismatch(query, "function", &def))
    }

    /// Resolve to an event
    pub fn resolve_event(&self, query: &str, args: Option<&[Value]>) -> Result<&Event, ResolveError> {
        let def = self.resolve_kind(query, args, "event", |d| d.as_event().is_some())?;
        def.as_event().ok_or_else(|| kind_mismatch(query, "event", &def))
    }

    /// Resolve to a custom error
    pub fn resolve_error(&self, query: &str, args: Option<&[Value]>) -> Result<&CustomError, ResolveError> {
        let def = self.resolve_kind(query, args, "error", |d| d.as_error().is_some())?;
        def.as_error().ok_or_else(|| kind_mismatch(query, "error", &def))
    }

    /// Resolve among candidates of one kind, reporting a kind mismatch when
    /// only other kinds match
    fn resolve_kind(
        &self,
        query: &str,
        args: Option<&[Value]>,
        expected: &'static str,
        is_kind: impl Fn(&Definition<'_>) -> bool,
    ) -> Result<Definition<'_>, ResolveError> {
        let all = self.candidates(query);
        let Some(other) = all.first().copied() else {
            return Err(ResolveError::NotFound(query.to_string()));
        };
        let candidates: Vec<Definition<'_>> = all.into_iter().filter(|d| is_kind(d)).collect();
        match candidates.len() {
            0 => Err(kind_mismatch(query, expected, &other)),
            1 => Ok(candidates[0]),
            _ => pick_overload(query, candidates, args),
        }
    }

    fn candidates(&self, query: &str) -> Vec<Definition<'_>> {
        match classify(query) {
            Query::Selector(selector) => self
                .function_by_selector(&selector)
                .map(Definition::Function)
                .or_else(|| self.error_by_selector(&selector).map(Definition::Error))
                .into_iter()
                .collect(),
            Query::Topic(topic) => self.event_by_topic(&topic).map(Definition::Event).into_iter().collect(),
            Query::Signature(query) => match canonical_signature(query) {
                Some((name, canonical)) => self
                    .named(name)
                    .into_iter()
                    .filter(|d| d.signature() == canonical)
                    .collect(),
                None => Vec::new(),
            },
            Query::Name(name) => self.named(name),
        }
    }

    fn named(&self, name: &str) -> Vec<Definition<'_>> {
        self.functions_named(name)
            .into_iter()
            .map(Definition::Function)
            .chain(self.events_named(name).into_iter().map(Definition::Event))
            .chain(self.errors_named(name).into_iter().map(Definition::Error))
            .collect()
    }
}

/// `f(uint amount)` or `function f(uint256)` in canonical form, with the name
fn canonical_signature(query: &str) -> Option<(&str, String)> {
    let open = query.find('(')?;
    let close = matching_paren(query, open)?;
    let name = query[..open].split_whitespace().last()?;
    let types = ParamType::parse_list(&query[open..=close]).ok()?;
    Some((name, signature(name, &types)))
}

fn kind_mismatch(query: &str, expected: &'static str, found: &Definition<'_>) -> ResolveError {
    ResolveError::KindMismatch {
        query: query.to_string(),
        expected,
        found: found.kind(),
    }
}

fn param_types<'a>(def: &Definition<'a>) -> Vec<&'a ParamType> {
    def.inputs().iter().map(|p| &p.ty).collect()
}

fn pick_overload<'a>(
    query: &str,
    candidates: Vec<Definition<'a>>,
    args: Option<&[Value]>,
) -> Result<Definition<'a>, ResolveError> {
    let Some(args) = args else {
        let chosen = candidates
            .iter()
            .find(|d| d.inputs().is_empty())
            .copied()
            .unwrap_or(candidates[0]);
        debug!(query, signature = chosen.signature(), "resolved overload without arguments");
        return Ok(chosen);
    };

    let survivors: Vec<Definition<'a>> = candidates
        .into_iter()
        .filter(|d| {
            let types = param_types(d);
            types.len() == args.len() && types.iter().zip(args).all(|(ty, v)| v.fits(ty))
        })
        .collect();

    let Some(first) = survivors.first().copied() else {
        return Err(ResolveError::NoMatchingOverload {
            query: query.to_string(),
            args: args.len(),
        });
    };

    let first_types = param_types(&first);
    for other in &survivors[1..] {
        let other_types = param_types(other);
        let conflict = first_types
            .iter()
            .zip(&other_types)
            .zip(args)
            .any(|((a, b), value)| ambiguous(a, b, value));
        if conflict {
            return Err(ResolveError::Ambiguous {
                query: query.to_string(),
                first: first.signature().to_string(),
                second: other.signature().to_string(),
            });
        }
    }

    debug!(
        query,
        signature = first.signature(),
        survivors = survivors.len(),
        "resolved overload by arguments"
    );
    Ok(first)
}

/// Whether `value` reads equally well as `a` and as `b` for one of the known
/// confusable pairs
fn ambiguous(a: &ParamType, b: &ParamType, value: &Value) -> bool {
    let address_like = matches!(value, Value::String(s) if Address::looks_like_address(s));
    match (a, b) {
        (ParamType::Address, ParamType::FixedBytes(20)) | (ParamType::FixedBytes(20), ParamType::Address) => {
            true
        }
        (ParamType::Address, ParamType::String | ParamType::Bytes)
        | (ParamType::String | ParamType::Bytes, ParamType::Address) => address_like,
        (
            ParamType::Array(x) | ParamType::FixedArray(x, _),
            ParamType::Array(y) | ParamType::FixedArray(y, _),
        ) => value
            .as_list()
            .is_some_and(|items| items.iter().any(|item| ambiguous(x, y, item))),
        (ParamType::Tuple(xs), ParamType::Tuple(ys)) if xs.len() == ys.len() => {
            xs.iter().zip(ys).enumerate().any(|(i, (x, y))| {
                let member = match value {
                    Value::List(items) => items.get(i),
                    Value::Record(_) => value.field(&x.name),
                    _ => None,
                };
                member.is_some_and(|m| ambiguous(&x.ty, &y.ty, m))
            })
        }
        _ => false,
    }
}
