//! Located validation errors.
//!
//! A compiled procedure records one [`SchemaError`] per failed check and
//! hands them back as [`SchemaErrors`], which only exists when something
//! failed.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::path::JsonPath;

/// One failed check.
///
/// `code` names the check that failed: `invalid_type` for a structural or
/// coercion failure, `required` for a missing value, the constraint name
/// (`min`, `max`, `range`, `equals`, `pattern`) for a bound, and `custom`
/// for messages pushed by a `finally` hook. `expected` and `got` describe
/// the failure for display; the procedure fills both.
///
/// # Example
///
/// ```rust
/// use shapecheck::{JsonPath, SchemaError};
///
/// let error = SchemaError::new(JsonPath::root().push_field("age"), "must be a number")
///     .with_code("invalid_type")
///     .with_expected("number")
///     .with_got("object");
///
/// assert_eq!(error.to_string(), "age: must be a number (expected: number) (got: object)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    /// Where the failing value sits.
    pub path: JsonPath,
    /// The rendered message, default or custom.
    pub message: String,
    /// What was found, e.g. `2 characters` or `missing`.
    pub got: Option<String>,
    /// What the check wanted, e.g. `at least 3 characters`.
    pub expected: Option<String>,
    /// Name of the failed check.
    pub code: String,
}

impl SchemaError {
    /// Creates an error with the `custom` code and no details.
    pub fn new(path: JsonPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            got: None,
            expected: None,
            code: "custom".to_string(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)?;
        if let Some(expected) = &self.expected {
            write!(f, " (expected: {})", expected)?;
        }
        if let Some(got) = &self.got {
            write!(f, " (got: {})", got)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

/// The errors of one failed validation call, in check order.
///
/// Object properties come in declaration order, array elements in index
/// order, and a node's bound checks in the order they were declared. The
/// list is never empty. `Semigroup` lets outcomes of separate calls be
/// accumulated through stillwater's `Validation`.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaErrors(NonEmptyVec<SchemaError>);

impl SchemaErrors {
    /// Collects recorded errors, or `None` when nothing failed.
    pub fn try_from_vec(errors: Vec<SchemaError>) -> Option<Self> {
        let mut errors = errors.into_iter();
        let head = NonEmptyVec::singleton(errors.next()?);
        Some(Self(errors.fold(head, |acc, error| {
            acc.combine(NonEmptyVec::singleton(error))
        })))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.0.iter()
    }

    /// Errors recorded at exactly `path`.
    pub fn at_path(&self, path: &JsonPath) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| &e.path == path).collect()
    }

    /// Errors raised by the check named `code`.
    pub fn with_code(&self, code: &str) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| e.code == code).collect()
    }

    /// The first error found.
    pub fn first(&self) -> &SchemaError {
        self.0.head()
    }

    /// Rendered paths, in error order.
    pub fn paths(&self) -> Vec<String> {
        self.0.iter().map(|e| e.path.to_string()).collect()
    }

    /// Messages, in error order.
    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<SchemaError> {
        self.0.into_vec()
    }
}

impl Semigroup for SchemaErrors {
    fn combine(self, other: Self) -> Self {
        SchemaErrors(self.0.combine(other.0))
    }
}

impl Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

impl IntoIterator for SchemaErrors {
    type Item = SchemaError;
    type IntoIter = std::vec::IntoIter<SchemaError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a SchemaErrors {
    type Item = &'a SchemaError;
    type IntoIter = Box<dyn Iterator<Item = &'a SchemaError> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<SchemaError>();
    assert_sync::<SchemaError>();
    assert_send::<SchemaErrors>();
    assert_sync::<SchemaErrors>();
};
