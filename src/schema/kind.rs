//! Kind tags for schema nodes.
//!
//! The tag drives structural default messages, the unit used in bound
//! messages, and which constraints a node accepts. [`Kind::catalog`] exposes
//! the same table to code generators living outside this crate.

use std::fmt::{self, Display};

use serde_json::Value;

/// The basic kind a schema node checks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `true`/`false`, with string and 0/1 coercion.
    Boolean,
    /// Numbers with no fractional part.
    Integer,
    /// Any finite number.
    Float,
    /// Any finite number.
    Number,
    /// Non-empty strings.
    String,
    /// Arrays, homogeneous or tuple.
    Array,
    /// Plain JSON objects.
    Object,
    /// Any present value.
    Any,
}

/// Number variant carried by a number node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberVariant {
    /// Requires zero remainder modulo 1.
    Integer,
    /// Any finite number.
    Float,
    /// Any finite number.
    Plain,
}

impl NumberVariant {
    /// Returns the kind tag for this variant.
    pub fn kind(self) -> Kind {
        match self {
            NumberVariant::Integer => Kind::Integer,
            NumberVariant::Float => Kind::Float,
            NumberVariant::Plain => Kind::Number,
        }
    }
}

/// A row of the kind catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindInfo {
    /// The kind.
    pub kind: Kind,
    /// Tag name as used in messages and generated code.
    pub name: &'static str,
    /// Message recorded when the structural check fails.
    pub message: &'static str,
}

const CATALOG: [KindInfo; 8] = [
    KindInfo { kind: Kind::Boolean, name: "boolean", message: "must be true or false" },
    KindInfo { kind: Kind::Integer, name: "integer", message: "must be an integer" },
    KindInfo { kind: Kind::Float, name: "float", message: "must be a number" },
    KindInfo { kind: Kind::Number, name: "number", message: "must be a number" },
    KindInfo { kind: Kind::String, name: "string", message: "must be a non empty string" },
    KindInfo { kind: Kind::Array, name: "array", message: "must be an array" },
    KindInfo { kind: Kind::Object, name: "object", message: "must be an object" },
    KindInfo { kind: Kind::Any, name: "any", message: "is required" },
];

impl Kind {
    /// Every supported kind with its tag and default structural message.
    pub fn catalog() -> &'static [KindInfo] {
        &CATALOG
    }

    /// Looks a kind up by its tag name.
    pub fn from_name(name: &str) -> Option<Kind> {
        CATALOG.iter().find(|info| info.name == name).map(|info| info.kind)
    }

    /// Tag name (`"boolean"`, `"integer"`, ...).
    pub fn as_str(self) -> &'static str {
        self.info().name
    }

    /// Message recorded when the structural check for this kind fails.
    pub fn default_message(self) -> &'static str {
        self.info().message
    }

    /// Unit appended to bound messages: `characters`, `items`, or nothing.
    pub fn unit(self) -> &'static str {
        match self {
            Kind::String => "characters",
            Kind::Array => "items",
            _ => "",
        }
    }

    /// True for the three number kinds.
    pub fn is_numeric(self) -> bool {
        matches!(self, Kind::Integer | Kind::Float | Kind::Number)
    }

    fn info(self) -> &'static KindInfo {
        match self {
            Kind::Boolean => &CATALOG[0],
            Kind::Integer => &CATALOG[1],
            Kind::Float => &CATALOG[2],
            Kind::Number => &CATALOG[3],
            Kind::String => &CATALOG[4],
            Kind::Array => &CATALOG[5],
            Kind::Object => &CATALOG[6],
            Kind::Any => &CATALOG[7],
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the JSON type name for a value.
pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
