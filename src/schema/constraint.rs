//! Constraint library.
//!
//! Each function turns a declared bound into a [`Test`] plus the default
//! message for the node's kind, so messages read naturally ("at least 3
//! characters", "at most 10 items", "between 1 and 5"). A constraint the kind
//! cannot evaluate comes back as an [`Unresolved`] reason instead.

use regex::Regex;
use serde_json::{Number, Value};

use super::kind::Kind;
use super::message::Message;

/// A bound check declared on a schema node, in registration order.
#[derive(Debug, Clone)]
pub(crate) enum Constraint {
    Min {
        limit: f64,
        message: Option<Message>,
    },
    Max {
        limit: f64,
        message: Option<Message>,
    },
    Range {
        min: f64,
        max: f64,
        message: Option<Message>,
    },
    Equals {
        value: Value,
        message: Option<Message>,
    },
    Pattern {
        regex: Regex,
        message: Option<Message>,
    },
}

impl Constraint {
    /// Statement name used in configuration errors and error codes.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Constraint::Min { .. } => "min",
            Constraint::Max { .. } => "max",
            Constraint::Range { .. } => "range",
            Constraint::Equals { .. } => "equals",
            Constraint::Pattern { .. } => "pattern",
        }
    }

    pub(crate) fn message(&self) -> Option<&Message> {
        match self {
            Constraint::Min { message, .. }
            | Constraint::Max { message, .. }
            | Constraint::Range { message, .. }
            | Constraint::Equals { message, .. }
            | Constraint::Pattern { message, .. } => message.as_ref(),
        }
    }

    pub(crate) fn set_message(&mut self, new: Message) {
        match self {
            Constraint::Min { message, .. }
            | Constraint::Max { message, .. }
            | Constraint::Range { message, .. }
            | Constraint::Equals { message, .. }
            | Constraint::Pattern { message, .. } => *message = Some(new),
        }
    }

    /// The limit handed to message closures.
    pub(crate) fn limit(&self) -> Value {
        match self {
            Constraint::Min { limit, .. } | Constraint::Max { limit, .. } => number_to_value(*limit),
            Constraint::Range { min, max, .. } => {
                Value::Array(vec![number_to_value(*min), number_to_value(*max)])
            }
            Constraint::Equals { value, .. } => value.clone(),
            Constraint::Pattern { regex, .. } => Value::String(regex.as_str().to_string()),
        }
    }

    /// Resolves this constraint against a kind.
    pub(crate) fn resolve(&self, kind: Kind) -> Result<(Test, String), Unresolved> {
        match self {
            Constraint::Min { limit, .. } => min(kind, *limit).ok_or(Unresolved::Unsupported),
            Constraint::Max { limit, .. } => max(kind, *limit).ok_or(Unresolved::Unsupported),
            Constraint::Range { min, max, .. } => {
                range(kind, *min, *max).ok_or(Unresolved::Unsupported)
            }
            Constraint::Equals { value, .. } => equals(kind, value),
            Constraint::Pattern { regex, .. } => {
                pattern(kind, regex).ok_or(Unresolved::Unsupported)
            }
        }
    }
}

/// Why a constraint could not be resolved against a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Unresolved {
    /// The kind has no notion of this constraint.
    Unsupported,
    /// The literal can never equal a value of the kind.
    LiteralMismatch,
}

/// Conversion of builder arguments into a bound limit.
///
/// Implemented for every primitive integer width and both float widths, so
/// `.max(items.len())` and `.min(-1i64)` work without casts.
pub trait Limit {
    /// The limit as a float.
    fn into_limit(self) -> f64;
}

macro_rules! impl_limit {
    ($($ty:ty),*) => {
        $(
            impl Limit for $ty {
                fn into_limit(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_limit!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// What a bound measures on an already structurally valid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Measure {
    /// The number itself.
    Value,
    /// Unicode scalar count of a string.
    Chars,
    /// Element count of an array.
    Items,
}

impl Measure {
    fn for_kind(kind: Kind) -> Option<Measure> {
        match kind {
            Kind::Integer | Kind::Float | Kind::Number => Some(Measure::Value),
            Kind::String => Some(Measure::Chars),
            Kind::Array => Some(Measure::Items),
            _ => None,
        }
    }

    fn of(self, value: &Value) -> f64 {
        match (self, value) {
            (Measure::Value, Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
            (Measure::Chars, Value::String(s)) => s.chars().count() as f64,
            (Measure::Items, Value::Array(items)) => items.len() as f64,
            _ => f64::NAN,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Predicate {
    AtLeast(f64),
    AtMost(f64),
    Between(f64, f64),
    NumericEquals(f64),
    Equals(Value),
    Matches(Regex),
}

/// A compiled bound check.
#[derive(Debug, Clone)]
pub(crate) struct Test {
    measure: Measure,
    predicate: Predicate,
}

impl Test {
    /// True when the value satisfies the bound.
    pub(crate) fn passes(&self, value: &Value) -> bool {
        match &self.predicate {
            Predicate::AtLeast(limit) => self.measure.of(value) >= *limit,
            Predicate::AtMost(limit) => self.measure.of(value) <= *limit,
            Predicate::Between(min, max) => {
                let n = self.measure.of(value);
                n >= *min && n <= *max
            }
            Predicate::NumericEquals(expected) => value.as_f64() == Some(*expected),
            Predicate::Equals(expected) => value == expected,
            Predicate::Matches(regex) => value.as_str().is_some_and(|s| regex.is_match(s)),
        }
    }

    /// Describes what was measured, for the error's `got` field.
    pub(crate) fn describe(&self, value: &Value) -> String {
        match self.predicate {
            Predicate::Equals(_) | Predicate::NumericEquals(_) | Predicate::Matches(_) => {
                display_value(value)
            }
            _ => with_unit(&format_number(self.measure.of(value)), self.unit()),
        }
    }

    /// Describes the bound, for the error's `expected` field.
    pub(crate) fn expected(&self) -> String {
        match &self.predicate {
            Predicate::AtLeast(limit) => {
                with_unit(&format!("at least {}", format_number(*limit)), self.unit())
            }
            Predicate::AtMost(limit) => {
                with_unit(&format!("at most {}", format_number(*limit)), self.unit())
            }
            Predicate::Between(min, max) => with_unit(
                &format!("between {} and {}", format_number(*min), format_number(*max)),
                self.unit(),
            ),
            Predicate::NumericEquals(n) => format_number(*n),
            Predicate::Equals(value) => display_value(value),
            Predicate::Matches(regex) => format!("string matching '{}'", regex.as_str()),
        }
    }

    fn unit(&self) -> &'static str {
        match self.measure {
            Measure::Value => "",
            Measure::Chars => "characters",
            Measure::Items => "items",
        }
    }
}

/// Inclusive lower bound on a number, string length or array length.
pub fn min_message(kind: Kind, limit: f64) -> String {
    with_unit(&format!("must be at least {}", format_number(limit)), kind.unit())
}

/// Inclusive upper bound on a number, string length or array length.
pub fn max_message(kind: Kind, limit: f64) -> String {
    with_unit(&format!("must be at most {}", format_number(limit)), kind.unit())
}

/// Inclusive range on a number, string length or array length.
pub fn range_message(kind: Kind, min: f64, max: f64) -> String {
    with_unit(
        &format!("must be between {} and {}", format_number(min), format_number(max)),
        kind.unit(),
    )
}

/// Equality with a literal.
pub fn equals_message(value: &Value) -> String {
    format!("must equal {}", display_value(value))
}

pub(crate) fn min(kind: Kind, limit: f64) -> Option<(Test, String)> {
    let measure = Measure::for_kind(kind)?;
    Some((
        Test {
            measure,
            predicate: Predicate::AtLeast(limit),
        },
        min_message(kind, limit),
    ))
}

pub(crate) fn max(kind: Kind, limit: f64) -> Option<(Test, String)> {
    let measure = Measure::for_kind(kind)?;
    Some((
        Test {
            measure,
            predicate: Predicate::AtMost(limit),
        },
        max_message(kind, limit),
    ))
}

pub(crate) fn range(kind: Kind, min: f64, max: f64) -> Option<(Test, String)> {
    let measure = Measure::for_kind(kind)?;
    Some((
        Test {
            measure,
            predicate: Predicate::Between(min, max),
        },
        range_message(kind, min, max),
    ))
}

/// Equality is only offered where a literal can be written down: booleans,
/// strings and numbers. The literal must be of the node's own type, and an
/// integer node rejects fractional literals.
pub(crate) fn equals(kind: Kind, value: &Value) -> Result<(Test, String), Unresolved> {
    let predicate = match (kind, value) {
        (Kind::Boolean, Value::Bool(_)) | (Kind::String, Value::String(_)) => {
            Predicate::Equals(value.clone())
        }
        (kind, Value::Number(n)) if kind.is_numeric() => match n.as_f64() {
            Some(n) if kind != Kind::Integer || n.fract() == 0.0 => Predicate::NumericEquals(n),
            _ => return Err(Unresolved::LiteralMismatch),
        },
        (Kind::Boolean | Kind::String, _) => return Err(Unresolved::LiteralMismatch),
        (kind, _) if kind.is_numeric() => return Err(Unresolved::LiteralMismatch),
        _ => return Err(Unresolved::Unsupported),
    };
    Ok((
        Test {
            measure: Measure::Value,
            predicate,
        },
        equals_message(value),
    ))
}

pub(crate) fn pattern(kind: Kind, regex: &Regex) -> Option<(Test, String)> {
    if kind != Kind::String {
        return None;
    }
    Some((
        Test {
            measure: Measure::Chars,
            predicate: Predicate::Matches(regex.clone()),
        },
        format!("must match pattern '{}'", regex.as_str()),
    ))
}

/// Stores integral numbers as JSON integers and everything else as floats.
pub(crate) fn number_to_value(n: f64) -> Value {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn format_number(n: f64) -> String {
    format!("{}", n)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn with_unit(text: &str, unit: &str) -> String {
    if unit.is_empty() {
        text.to_string()
    } else {
        format!("{} {}", text, unit)
    }
}
