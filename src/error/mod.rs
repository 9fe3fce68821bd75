//! Error types.
//!
//! Validation failures are data ([`SchemaError`], [`SchemaErrors`]) returned
//! inside a validation outcome. Schema configuration mistakes are
//! [`CompileError`]s returned when the procedure is compiled.

mod compile_error;
mod schema_error;

pub use compile_error::CompileError;
pub use schema_error::{SchemaError, SchemaErrors};
