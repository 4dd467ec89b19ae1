//! ABI type descriptors and the type string grammar

use std::fmt;
use std::str::FromStr;

use crate::error::TypeError;

/// Solidity parameter types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Address
    Address,
    /// Unsigned integer with bit size (8, 16, ..., 256)
    Uint(usize),
    /// Signed integer with bit size
    Int(usize),
    /// Boolean
    Bool,
    /// Dynamic bytes
    Bytes,
    /// Fixed-size bytes (size 1-32)
    FixedBytes(usize),
    /// UTF-8 string
    String,
    /// Dynamic array
    Array(Box<ParamType>),
    /// Fixed-size array
    FixedArray(Box<ParamType>, usize),
    /// Tuple (struct); never empty
    Tuple(Vec<TupleComponent>),
}

/// Named member of a tuple type. The name may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleComponent {
    /// Component name
    pub name: String,
    /// Component type
    pub ty: ParamType,
}

impl TupleComponent {
    /// Create a component
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Create an unnamed component
    pub fn unnamed(ty: ParamType) -> Self {
        Self::new("", ty)
    }
}

impl ParamType {
    /// Parse a type string such as `uint256`, `bytes12`, `address[3][]` or
    /// `(uint256,bool)[]`.
    ///
    /// `tuple` literals need their components from elsewhere; use
    /// [`ParamType::parse_with_components`].
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        Self::parse_with_components(s, None)
    }

    /// Parse a JSON-ABI style type: `tuple`, `tuple[]`, `tuple[2][]` take
    /// their members from `components`.
    pub fn parse_with_components(
        s: &str,
        components: Option<Vec<TupleComponent>>,
    ) -> Result<Self, TypeError> {
        let s = s.trim();
        if let Some(suffix) = s.strip_prefix("tuple") {
            let components = components
                .filter(|c| !c.is_empty())
                .ok_or_else(|| TypeError::MissingComponents(s.to_string()))?;
            return apply_array_suffix(ParamType::Tuple(components), suffix, s);
        }
        if components.as_ref().is_some_and(|c| !c.is_empty()) {
            return Err(TypeError::UnexpectedComponents(s.to_string()));
        }

        if s.starts_with('(') {
            let close = matching_paren(s, 0).ok_or_else(|| TypeError::MalformedTuple(s.to_string()))?;
            let members = split_top_level(&s[1..close])
                .ok_or_else(|| TypeError::MalformedTuple(s.to_string()))?;
            let mut components = Vec::with_capacity(members.len());
            for member in members {
                let (ty, rest) = split_type_and_rest(member);
                let name = rest.split_whitespace().last().unwrap_or("");
                components.push(TupleComponent::new(name, ParamType::parse(ty)?));
            }
            if components.is_empty() {
                return Err(TypeError::MissingComponents(s.to_string()));
            }
            return apply_array_suffix(ParamType::Tuple(components), &s[close + 1..], s);
        }

        let base_end = s.find(|c| c == '[' || c == ']').unwrap_or(s.len());
        let base = parse_base(&s[..base_end], s)?;
        apply_array_suffix(base, &s[base_end..], s)
    }

    /// Parse a parameter list written as `(t1,t2,...)` or `t1,t2,...`
    pub fn parse_list(s: &str) -> Result<Vec<Self>, TypeError> {
        let s = s.trim();
        if s.is_empty() || s == "()" {
            return Ok(Vec::new());
        }
        let inner = if s.starts_with('(') && matching_paren(s, 0) == Some(s.len() - 1) {
            &s[1..s.len() - 1]
        } else {
            s
        };
        split_top_level(inner)
            .ok_or_else(|| TypeError::MalformedTuple(s.to_string()))?
            .into_iter()
            .map(|member| ParamType::parse(split_type_and_rest(member).0))
            .collect()
    }

    /// Check if this type is dynamic (variable length)
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            ParamType::Tuple(components) => components.iter().any(|c| c.ty.is_dynamic()),
            _ => false,
        }
    }

    /// Bytes this type occupies in the head of an enclosing encoding: the
    /// full inline width for static types, one offset word for dynamic ones.
    pub fn head_size(&self) -> usize {
        match self {
            ParamType::FixedArray(inner, size) if !inner.is_dynamic() => {
                inner.head_size().saturating_mul(*size)
            }
            ParamType::Tuple(components) if !self.is_dynamic() => {
                components
                    .iter()
                    .fold(0usize, |acc, c| acc.saturating_add(c.ty.head_size()))
            }
            _ => 32,
        }
    }

    /// Whether this is a single-word value type (not array, tuple, bytes or string)
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            ParamType::Address
                | ParamType::Uint(_)
                | ParamType::Int(_)
                | ParamType::Bool
                | ParamType::FixedBytes(_)
        )
    }

    /// Type string in JSON-ABI form, where tuples are spelled `tuple`
    /// and their members live in `components`.
    pub fn abi_type_string(&self) -> String {
        match self {
            ParamType::Tuple(_) => "tuple".to_string(),
            ParamType::Array(inner) => format!("{}[]", inner.abi_type_string()),
            ParamType::FixedArray(inner, size) => format!("{}[{}]", inner.abi_type_string(), size),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ParamType {
    /// Canonical form used in signatures: `(uint256,bool)[]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => f.write_str("address"),
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::Int(bits) => write!(f, "int{}", bits),
            ParamType::Bool => f.write_str("bool"),
            ParamType::Bytes => f.write_str("bytes"),
            ParamType::FixedBytes(size) => write!(f, "bytes{}", size),
            ParamType::String => f.write_str("string"),
            ParamType::Array(inner) => write!(f, "{}[]", inner),
            ParamType::FixedArray(inner, size) => write!(f, "{}[{}]", inner, size),
            ParamType::Tuple(components) => {
                f.write_str("(")?;
                for (i, component) in components.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", component.ty)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl FromStr for ParamType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamType::parse(s)
    }
}

fn parse_base(base: &str, whole: &str) -> Result<ParamType, TypeError> {
    match base {
        "address" => return Ok(ParamType::Address),
        "bool" => return Ok(ParamType::Bool),
        "string" => return Ok(ParamType::String),
        "bytes" => return Ok(ParamType::Bytes),
        "uint" => return Ok(ParamType::Uint(256)),
        "int" => return Ok(ParamType::Int(256)),
        _ => {}
    }

    // uint<N> / int<N>
    let int_width = base
        .strip_prefix("uint")
        .map(|rest| (rest, true))
        .or_else(|| base.strip_prefix("int").map(|rest| (rest, false)));
    if let Some((digits, unsigned)) = int_width {
        let bits = parse_width(digits).ok_or_else(|| TypeError::UnknownType(whole.to_string()))?;
        if bits == 0 || bits > 256 || bits % 8 != 0 {
            return Err(TypeError::InvalidIntegerWidth {
                ty: whole.to_string(),
                bits,
            });
        }
        return Ok(if unsigned {
            ParamType::Uint(bits)
        } else {
            ParamType::Int(bits)
        });
    }

    // bytes<N>
    if let Some(digits) = base.strip_prefix("bytes") {
        let size = parse_width(digits).ok_or_else(|| TypeError::UnknownType(whole.to_string()))?;
        if size == 0 || size > 32 {
            return Err(TypeError::InvalidBytesWidth {
                ty: whole.to_string(),
                size,
            });
        }
        return Ok(ParamType::FixedBytes(size));
    }

    Err(TypeError::UnknownType(whole.to_string()))
}

/// Canonical decimal digits: non-empty, ASCII, no leading zero
fn parse_width(digits: &str) -> Option<usize> {
    if digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_digit())
        || (digits.len() > 1 && digits.starts_with('0'))
    {
        return None;
    }
    digits.parse().ok()
}

fn apply_array_suffix(
    mut ty: ParamType,
    mut suffix: &str,
    whole: &str,
) -> Result<ParamType, TypeError> {
    let malformed = || TypeError::MalformedArray(whole.to_string());
    while !suffix.is_empty() {
        let rest = suffix.strip_prefix('[').ok_or_else(malformed)?;
        let close = rest.find(']').ok_or_else(malformed)?;
        let size = &rest[..close];
        ty = if size.is_empty() {
            ParamType::Array(Box::new(ty))
        } else {
            match parse_width(size) {
                Some(n) if n > 0 => ParamType::FixedArray(Box::new(ty), n),
                _ => return Err(malformed()),
            }
        };
        suffix = &rest[close + 1..];
    }
    Ok(ty)
}

/// Index of the `)` closing the `(` at `open`
pub(crate) fn matching_paren(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices().skip_while(|(i, _)| *i < open) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on commas that are not nested inside parentheses. Empty input gives
/// an empty list; an empty member is an error.
pub(crate) fn split_top_level(s: &str) -> Option<Vec<&str>> {
    if s.trim().is_empty() {
        return Some(Vec::new());
    }
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            ',' if depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    parts.push(s[start..].trim());
    if parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    Some(parts)
}

/// Split `"(bool b) c"` / `"uint256 indexed from"` into the type and the
/// remaining words.
pub(crate) fn split_type_and_rest(member: &str) -> (&str, &str) {
    let member = member.trim();
    let mut depth = 0i32;
    for (i, c) in member.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            c if c.is_whitespace() && depth == 0 => return (&member[..i], member[i..].trim()),
            _ => {}
        }
    }
    (member, "")
}
