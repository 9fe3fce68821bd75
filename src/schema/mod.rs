//! Schema definitions.
//!
//! A [`Schema`] is one node of a shape description: a kind (boolean, number,
//! string, array, object, any), an optional flag, the bound checks declared
//! on it, custom messages, and `catch`/`finally` hooks. Nodes are built with
//! consuming builder calls and compiled once, on first use, into a
//! [`Validator`] that is cached on the root node.
//!
//! # Example
//!
//! ```rust
//! use shapecheck::Schema;
//! use serde_json::json;
//!
//! let schema = Schema::object([
//!     ("name", Schema::string().min(2)),
//!     ("age", Schema::number().optional()),
//! ]);
//!
//! let outcome = futures::executor::block_on(
//!     schema.validate(json!({ "name": "Al", "age": "30", "extra": true })),
//! )
//! .unwrap();
//!
//! assert!(outcome.is_valid());
//! assert_eq!(outcome.data, json!({ "name": "Al", "age": 30 }));
//! ```

mod constraint;
mod hooks;
mod kind;
mod message;

pub use constraint::{equals_message, max_message, min_message, range_message, Limit};
pub use hooks::{CatchFn, ErrorSink, FinallyFn, Hook};
pub use kind::{Kind, KindInfo, NumberVariant};
pub use message::{Message, MessageArgs, Property};

pub(crate) use constraint::{number_to_value, Constraint, Test, Unresolved};
pub(crate) use kind::value_type_name;

use std::fmt;
use std::future::Future;

use indexmap::IndexMap;
use parking_lot::RwLock;
use regex::Regex;
use serde_json::Value;
use tracing::trace;

use crate::error::CompileError;
use crate::validator::{Validated, Validator};

/// Items of an array node.
#[derive(Debug, Clone)]
pub enum Items {
    /// Every element is validated against the same node.
    Each(Box<Schema>),
    /// Element `i` is validated against node `i`.
    Tuple(Vec<Schema>),
}

/// The kind-specific part of a node.
#[derive(Debug, Clone)]
pub(crate) enum Node {
    Boolean,
    Number(NumberVariant),
    String,
    Array(Items),
    Object(IndexMap<String, Schema>),
    Any,
}

impl Node {
    fn kind(&self) -> Kind {
        match self {
            Node::Boolean => Kind::Boolean,
            Node::Number(variant) => variant.kind(),
            Node::String => Kind::String,
            Node::Array(_) => Kind::Array,
            Node::Object(_) => Kind::Object,
            Node::Any => Kind::Any,
        }
    }
}

/// Configuration shared by every kind.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeConfig {
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) type_message: Option<Message>,
    pub(crate) catch: Option<Hook>,
    pub(crate) finally: Option<Hook>,
}

/// A schema node.
///
/// Builder methods consume the node and return it, so a schema is written
/// as one call chain. Any builder call discards a procedure compiled for
/// the previous configuration.
pub struct Schema {
    pub(crate) node: Node,
    pub(crate) optional: bool,
    pub(crate) config: NodeConfig,
    compiled: RwLock<Option<Validator>>,
}

impl Schema {
    fn new(node: Node) -> Self {
        Self {
            node,
            optional: false,
            config: NodeConfig::default(),
            compiled: RwLock::new(None),
        }
    }

    /// Creates a boolean node.
    ///
    /// Accepts `true`/`false`, the strings `"true"`, `"false"`, `"0"`, `"1"`
    /// in any case, and the numbers `0` and `1`; coerced values are written
    /// back as booleans.
    pub fn boolean() -> Self {
        Self::new(Node::Boolean)
    }

    /// Creates a number node accepting any finite number.
    ///
    /// Numeric strings and booleans are coerced and written back as numbers.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shapecheck::Schema;
    /// use serde_json::json;
    ///
    /// let outcome = futures::executor::block_on(Schema::number().validate(json!("42"))).unwrap();
    /// assert_eq!(outcome.data, json!(42));
    /// assert!(outcome.errors.is_none());
    /// ```
    pub fn number() -> Self {
        Self::new(Node::Number(NumberVariant::Plain))
    }

    /// Creates a number node that also requires a zero fractional part.
    pub fn integer() -> Self {
        Self::new(Node::Number(NumberVariant::Integer))
    }

    /// Creates a number node for floating point values.
    pub fn float() -> Self {
        Self::new(Node::Number(NumberVariant::Float))
    }

    /// Creates a string node. Present strings must be non-empty.
    pub fn string() -> Self {
        Self::new(Node::String)
    }

    /// Creates a homogeneous array node: every element is validated against
    /// `items`.
    ///
    /// Validation stops at the first invalid element, so at most one element
    /// error is reported per array.
    pub fn array(items: Schema) -> Self {
        Self::new(Node::Array(Items::Each(Box::new(items))))
    }

    /// Creates a tuple array node: element `i` is validated against
    /// `items[i]`, and every position reports its own errors.
    ///
    /// The array's length is not checked against the number of positions.
    pub fn tuple(items: impl IntoIterator<Item = Schema>) -> Self {
        Self::new(Node::Array(Items::Tuple(items.into_iter().collect())))
    }

    /// Creates an object node from `(name, schema)` pairs.
    ///
    /// Properties are checked in the given order. When none of them failed,
    /// keys that are not declared are removed from the object.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shapecheck::Schema;
    ///
    /// let user = Schema::object([
    ///     ("id", Schema::integer().min(1)),
    ///     ("email", Schema::string().pattern(r"@").unwrap()),
    ///     ("tags", Schema::array(Schema::string()).optional()),
    /// ]);
    /// assert_eq!(user.kind(), shapecheck::Kind::Object);
    /// ```
    pub fn object<K, I>(properties: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Schema)>,
    {
        Self::new(Node::Object(
            properties
                .into_iter()
                .map(|(name, schema)| (name.into(), schema))
                .collect(),
        ))
    }

    /// Creates a node that accepts any present value.
    pub fn any() -> Self {
        Self::new(Node::Any)
    }

    /// The node's kind.
    pub fn kind(&self) -> Kind {
        self.node.kind()
    }

    /// True when absence of the value skips every check on this node.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Marks the node optional. Calling it twice has no further effect.
    pub fn optional(self) -> Self {
        self.configure(|schema| schema.optional = true)
    }

    /// Makes an optional node required again.
    pub fn required(self) -> Self {
        self.configure(|schema| schema.optional = false)
    }

    /// Adds an inclusive lower bound: the number itself, a string's
    /// character count, or an array's element count.
    ///
    /// Raises [`CompileError::UnsupportedConstraint`] at compilation on
    /// booleans, objects and `any`.
    pub fn min(self, limit: impl Limit) -> Self {
        let limit = limit.into_limit();
        self.constrain(Constraint::Min {
            limit,
            message: None,
        })
    }

    /// Adds an inclusive upper bound. See [`Schema::min`].
    pub fn max(self, limit: impl Limit) -> Self {
        let limit = limit.into_limit();
        self.constrain(Constraint::Max {
            limit,
            message: None,
        })
    }

    /// Adds an inclusive range. See [`Schema::min`].
    pub fn range(self, min: impl Limit, max: impl Limit) -> Self {
        let (min, max) = (min.into_limit(), max.into_limit());
        self.constrain(Constraint::Range {
            min,
            max,
            message: None,
        })
    }

    /// Requires the value to equal a literal. Numbers compare by value, so
    /// `2` equals `2.0`.
    ///
    /// The literal must have the node's type. A string literal on a boolean
    /// node, or `2.5` on an integer node, raises
    /// [`CompileError::LiteralMismatch`] at compilation.
    pub fn equals(self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.constrain(Constraint::Equals {
            value,
            message: None,
        })
    }

    /// Requires a string to match a regular expression.
    ///
    /// # Errors
    ///
    /// Returns the regex error when `pattern` does not compile.
    pub fn pattern(self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        Ok(self.constrain(Constraint::Pattern {
            regex,
            message: None,
        }))
    }

    /// Sets a custom message for the most recent constraint.
    ///
    /// If no constraint has been added yet, this replaces the message used
    /// when the structural check fails.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shapecheck::Schema;
    /// use serde_json::json;
    ///
    /// let schema = Schema::string()
    ///     .min(5)
    ///     .error("username must be at least 5 characters");
    ///
    /// let outcome = futures::executor::block_on(schema.validate(json!("hi"))).unwrap();
    /// let errors = outcome.errors.unwrap();
    /// assert_eq!(errors.first().message, "username must be at least 5 characters");
    /// ```
    pub fn error(self, message: impl Into<Message>) -> Self {
        let message = message.into();
        self.configure(|schema| match schema.config.constraints.last_mut() {
            Some(last) => last.set_message(message),
            None => schema.config.type_message = Some(message),
        })
    }

    /// Like [`Schema::error`], with the message rendered by a closure that
    /// sees the node's property and the constraint's limit.
    pub fn error_with<F>(self, render: F) -> Self
    where
        F: Fn(&MessageArgs<'_>) -> String + Send + Sync + 'static,
    {
        self.error(Message::dynamic(render))
    }

    /// Supplies a fallback used when the value is absent or invalid.
    ///
    /// The fallback replaces the value and no error is recorded. Replacing an
    /// earlier fallback discards it.
    pub fn catch<F>(self, supplier: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.hook(Hook::catch(supplier))
    }

    /// Asynchronous form of [`Schema::catch`].
    pub fn catch_async<F, Fut>(self, supplier: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Value> + Send + 'static,
    {
        self.hook(Hook::catch_async(supplier))
    }

    /// Transforms the value once the node validated without errors.
    ///
    /// The returned value replaces the field. Messages pushed into the
    /// [`ErrorSink`] are recorded as errors at the node's path.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shapecheck::Schema;
    /// use serde_json::{json, Value};
    ///
    /// let schema = Schema::string().finally(|value, _errors| match value {
    ///     Value::String(s) => Value::String(s.to_uppercase()),
    ///     other => other,
    /// });
    ///
    /// let outcome = futures::executor::block_on(schema.validate(json!("abc"))).unwrap();
    /// assert_eq!(outcome.data, json!("ABC"));
    /// ```
    pub fn finally<F>(self, transform: F) -> Self
    where
        F: Fn(Value, &ErrorSink) -> Value + Send + Sync + 'static,
    {
        self.hook(Hook::finally(transform))
    }

    /// Asynchronous form of [`Schema::finally`].
    pub fn finally_async<F, Fut>(self, transform: F) -> Self
    where
        F: Fn(Value, ErrorSink) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Value> + Send + 'static,
    {
        self.hook(Hook::finally_async(transform))
    }

    /// Compiles a fresh procedure for this schema.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] when a constraint was declared on a kind
    /// that cannot evaluate it, or a range is inverted.
    pub fn compile(&self) -> Result<Validator, CompileError> {
        crate::compile::compile(self)
    }

    /// Returns the cached procedure, compiling it on first use.
    ///
    /// Concurrent first callers may each compile; the first one to store its
    /// procedure wins and the others adopt it. Nothing is cached when
    /// compilation fails.
    pub fn validator(&self) -> Result<Validator, CompileError> {
        if let Some(validator) = self.compiled.read().as_ref() {
            trace!(kind = %self.kind(), "reusing compiled procedure");
            return Ok(validator.clone());
        }

        let validator = self.compile()?;
        let mut cached = self.compiled.write();
        Ok(cached.get_or_insert(validator).clone())
    }

    /// Validates `input`, returning it (coerced, stripped and transformed)
    /// with any errors.
    ///
    /// # Errors
    ///
    /// Fails only when the schema does not compile. Invalid data is reported
    /// through [`Validated::errors`].
    pub async fn validate(&self, input: Value) -> Result<Validated, CompileError> {
        let validator = self.validator()?;
        Ok(validator.validate(input).await)
    }

    /// Validates `data` in place. Coercions, stripped keys and hook results
    /// are written into the caller's value.
    pub async fn validate_in_place(
        &self,
        data: &mut Value,
    ) -> Result<Option<crate::SchemaErrors>, CompileError> {
        let validator = self.validator()?;
        Ok(validator.validate_in_place(data).await)
    }

    /// Validates a copy of `input`, leaving the original untouched.
    pub async fn validate_cloned(&self, input: &Value) -> Result<Validated, CompileError> {
        self.validate(input.clone()).await
    }

    fn configure(mut self, apply: impl FnOnce(&mut Schema)) -> Self {
        *self.compiled.get_mut() = None;
        apply(&mut self);
        self
    }

    fn constrain(self, constraint: Constraint) -> Self {
        self.configure(|schema| schema.config.constraints.push(constraint))
    }

    fn hook(self, hook: Hook) -> Self {
        self.configure(|schema| match hook {
            Hook::Catch(_) => schema.config.catch = Some(hook),
            Hook::Finally(_) => schema.config.finally = Some(hook),
        })
    }
}

impl Clone for Schema {
    /// Clones the configuration. The clone compiles its own procedure.
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
            optional: self.optional,
            config: self.config.clone(),
            compiled: RwLock::new(None),
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("node", &self.node)
            .field("optional", &self.optional)
            .field("config", &self.config)
            .field("compiled", &self.compiled.read().is_some())
            .finish()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Schema>();
    assert_sync::<Schema>();
};
