//! Configuration errors raised while compiling a schema.

use crate::schema::Kind;

/// A schema that cannot be turned into a validation procedure.
///
/// These are programmer errors. They are reported when the procedure is
/// compiled, never deferred to a later validation call, and nothing is
/// cached for a schema that failed to compile.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    /// A bound check was attached to a kind that cannot evaluate it.
    #[error("'{kind}' is not supported by '{constraint}' statement (at {path})")]
    UnsupportedConstraint {
        /// Name of the constraint (`min`, `max`, `range`, `equals`, `pattern`).
        constraint: &'static str,
        /// Kind of the node the constraint was attached to.
        kind: Kind,
        /// Normalized path of the offending node.
        path: String,
    },

    /// An `equals` literal that no value of the node's kind can ever match,
    /// such as a string literal on a boolean node.
    #[error("'{constraint}' literal {literal} can never match a '{kind}' value (at {path})")]
    LiteralMismatch {
        /// Name of the constraint.
        constraint: &'static str,
        /// Kind of the node the constraint was attached to.
        kind: Kind,
        /// The literal, in JSON notation.
        literal: String,
        /// Normalized path of the offending node.
        path: String,
    },

    /// A `range` whose lower bound exceeds its upper bound.
    #[error("range lower bound {min} exceeds upper bound {max} (at {path})")]
    InvertedRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
        /// Normalized path of the offending node.
        path: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_constraint_display() {
        let error = CompileError::UnsupportedConstraint {
            constraint: "max",
            kind: Kind::Boolean,
            path: "flags.enabled".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "'boolean' is not supported by 'max' statement (at flags.enabled)"
        );
    }

    #[test]
    fn test_literal_mismatch_display() {
        let error = CompileError::LiteralMismatch {
            constraint: "equals",
            kind: Kind::Boolean,
            literal: "\"true\"".to_string(),
            path: "root".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "'equals' literal \"true\" can never match a 'boolean' value (at root)"
        );
    }
}
