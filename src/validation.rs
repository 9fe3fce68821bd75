//! Runtime state of a single validation call.
//!
//! A [`Scope`] accumulates errors and tracks the path of the value being
//! checked; a [`Slot`] is the mutable location that value lives at, so
//! coercions and hook results can be written back into the caller's data.
//! Nothing here outlives one call, which keeps concurrent validations of the
//! same procedure independent.

use serde_json::{Map, Value};

use crate::error::{SchemaError, SchemaErrors};
use crate::path::{JsonPath, PathSegment};
use crate::schema::{number_to_value, Kind};

/// Error accumulator and path stack for one validation call.
#[derive(Debug, Default)]
pub(crate) struct Scope {
    errors: Vec<SchemaError>,
    path: Vec<PathSegment>,
}

impl Scope {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of errors recorded so far. Nodes compare it before and after
    /// their own checks to tell whether they failed.
    pub(crate) fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub(crate) fn enter(&mut self, segment: PathSegment) {
        self.path.push(segment);
    }

    pub(crate) fn leave(&mut self) {
        self.path.pop();
    }

    /// Path of the value currently being checked.
    pub(crate) fn path(&self) -> JsonPath {
        JsonPath::from_segments(self.path.clone())
    }

    /// Records an error at the current path.
    pub(crate) fn report(&mut self, message: impl Into<String>, code: &str) -> &mut SchemaError {
        let error = SchemaError::new(self.path(), message).with_code(code);
        self.errors.push(error);
        let last = self.errors.len() - 1;
        &mut self.errors[last]
    }

    pub(crate) fn into_errors(self) -> Option<SchemaErrors> {
        SchemaErrors::try_from_vec(self.errors)
    }
}

/// Where the current value lives.
///
/// Root values are always present. A field is absent when its key is
/// missing, an element when its index is past the end of the array.
#[derive(Debug)]
pub(crate) enum Slot<'a> {
    Root(&'a mut Value),
    Field(&'a mut Map<String, Value>, &'a str),
    Element(&'a mut Vec<Value>, usize),
}

impl Slot<'_> {
    pub(crate) fn get(&self) -> Option<&Value> {
        match self {
            Slot::Root(value) => Some(&**value),
            Slot::Field(map, key) => map.get(*key),
            Slot::Element(items, index) => items.get(*index),
        }
    }

    pub(crate) fn get_mut(&mut self) -> Option<&mut Value> {
        match self {
            Slot::Root(value) => Some(&mut **value),
            Slot::Field(map, key) => map.get_mut(*key),
            Slot::Element(items, index) => items.get_mut(*index),
        }
    }

    /// Stores `value`, inserting a missing key or padding a short array
    /// with nulls as needed.
    pub(crate) fn set(&mut self, value: Value) {
        match self {
            Slot::Root(slot) => **slot = value,
            Slot::Field(map, key) => {
                map.insert((*key).to_string(), value);
            }
            Slot::Element(items, index) => {
                if *index >= items.len() {
                    items.resize(*index + 1, Value::Null);
                }
                items[*index] = value;
            }
        }
    }

    /// Moves the value out, leaving `null` behind until it is set again.
    pub(crate) fn take(&mut self) -> Option<Value> {
        self.get_mut().map(std::mem::take)
    }
}

/// Runs the structural check for `kind`, coercing `value` in place when the
/// kind allows it. Returns false when the value does not conform.
pub(crate) fn conform(kind: Kind, value: &mut Value) -> bool {
    match kind {
        Kind::Boolean => match coerce_boolean(value) {
            Some(flag) => {
                *value = Value::Bool(flag);
                true
            }
            None => false,
        },
        Kind::Integer | Kind::Float | Kind::Number => {
            let Some(n) = coerce_number(value) else {
                return false;
            };
            if kind == Kind::Integer && n.fract() != 0.0 {
                return false;
            }
            if !value.is_number() {
                *value = number_to_value(n);
            }
            true
        }
        Kind::String => matches!(value, Value::String(s) if !s.is_empty()),
        Kind::Array => value.is_array(),
        Kind::Object => value.is_object(),
        Kind::Any => true,
    }
}

fn coerce_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => match n.as_f64() {
            Some(x) if x == 1.0 => Some(true),
            Some(x) if x == 0.0 => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
