//! # Shapecheck
//!
//! Declare the shape of JSON data once and validate it with a procedure that
//! is compiled on first use and reused for every later call.
//!
//! ## Overview
//!
//! A schema tree is built from [`Schema`] nodes with chained builder calls.
//! The first validation compiles the whole tree into a [`Validator`]: messages
//! are rendered, constraints resolved, and hooks filed in a [`HookRegistry`]
//! so the tree is never walked again. Validation then:
//!
//! - coerces compatible primitives in place (`"42"` becomes `42`, `"true"`
//!   becomes `true`),
//! - removes undeclared keys from objects whose properties all validated,
//! - records every error with the normalized path of the offending value
//!   (`user.tags[2]`, or `root` for the top-level value).
//!
//! Validation is destructive: the returned data is the caller's input after
//! these changes. Use [`Schema::validate_cloned`] to keep the original.
//!
//! ## Core Types
//!
//! - [`Schema`]: a node of the shape description and its builders
//! - [`Validator`]: a compiled, shareable validation procedure
//! - [`Validated`]: the data plus the errors of one validation call
//! - [`SchemaError`] / [`SchemaErrors`]: located validation errors
//! - [`CompileError`]: a constraint declared on a kind that cannot evaluate it
//! - [`JsonPath`]: normalized error paths and their parser
//!
//! ## Example
//!
//! ```rust
//! use shapecheck::Schema;
//! use serde_json::json;
//!
//! let schema = Schema::object([
//!     ("name", Schema::string().min(2)),
//!     ("tags", Schema::array(Schema::string()).max(3)),
//!     ("admin", Schema::boolean().catch(|| json!(false))),
//! ]);
//!
//! let outcome = futures::executor::block_on(
//!     schema.validate(json!({ "name": "Al", "tags": ["a", 5] })),
//! )
//! .unwrap();
//!
//! let errors = outcome.errors.unwrap();
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors.first().path.to_string(), "tags[1]");
//! assert_eq!(errors.first().message, "must be a non empty string");
//! ```

mod compile;
pub mod error;
pub mod path;
pub mod registry;
pub mod schema;
mod validation;
pub mod validator;

pub use error::{CompileError, SchemaError, SchemaErrors};
pub use path::{JsonPath, PathParseError, PathSegment};
pub use registry::HookRegistry;
pub use schema::{
    ErrorSink, Hook, Items, Kind, KindInfo, Limit, Message, MessageArgs, NumberVariant, Property,
    Schema,
};
pub use validator::{Validated, Validator};

/// Type alias for validation results using SchemaErrors
pub type ValidationResult<T> = stillwater::Validation<T, SchemaErrors>;
