//! Compiled validators and their execution.
//!
//! A [`Validator`] owns a compiled instruction tree and the hooks it calls by
//! index. Both are immutable once compiled, so a validator is cheap to clone
//! and can be shared between tasks and threads; every call keeps its own
//! error list and path.
//!
//! Execution is asynchronous because `catch` and `finally` hooks may be.
//! The procedure suspends at each hook and resumes with its result before
//! moving on to the next check.

use std::fmt;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use stillwater::Validation;
use tracing::trace;

use crate::compile::{Children, Instruction};
use crate::error::SchemaErrors;
use crate::path::PathSegment;
use crate::registry::HookRegistry;
use crate::schema::{value_type_name, ErrorSink, Kind};
use crate::validation::{conform, Scope, Slot};
use crate::ValidationResult;

/// The result of one validation call.
///
/// `data` is the validated input after coercion, key stripping and hook
/// replacement. `errors` is `None` when validation succeeded; it is never
/// an empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    /// The (possibly modified) input.
    pub data: Value,
    /// Every error found, in check order.
    pub errors: Option<SchemaErrors>,
}

impl Validated {
    /// True when no error was recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_none()
    }

    /// Converts into a `Result`, dropping the data on failure.
    pub fn into_result(self) -> Result<Value, SchemaErrors> {
        match self.errors {
            None => Ok(self.data),
            Some(errors) => Err(errors),
        }
    }

    /// Converts into a stillwater `Validation`.
    pub fn into_validation(self) -> ValidationResult<Value> {
        match self.errors {
            None => Validation::Success(self.data),
            Some(errors) => Validation::Failure(errors),
        }
    }
}

/// A compiled validation procedure.
///
/// # Example
///
/// ```rust
/// use shapecheck::Schema;
/// use serde_json::json;
///
/// let validator = Schema::array(Schema::integer()).compile().unwrap();
///
/// let outcome = futures::executor::block_on(validator.validate(json!([1, "2", 3])));
/// assert_eq!(outcome.data, json!([1, 2, 3]));
/// assert!(outcome.is_valid());
/// ```
#[derive(Clone)]
pub struct Validator {
    procedure: Arc<Procedure>,
}

struct Procedure {
    root: Instruction,
    hooks: HookRegistry,
}

impl Validator {
    pub(crate) fn new(root: Instruction, hooks: HookRegistry) -> Self {
        Self {
            procedure: Arc::new(Procedure { root, hooks }),
        }
    }

    /// Kind of the root node.
    pub fn kind(&self) -> Kind {
        self.procedure.root.kind
    }

    /// Hooks the procedure calls by index.
    pub fn hooks(&self) -> &HookRegistry {
        &self.procedure.hooks
    }

    /// True when both handles share one compiled procedure.
    pub fn same_procedure(&self, other: &Validator) -> bool {
        Arc::ptr_eq(&self.procedure, &other.procedure)
    }

    /// Validates `input` and hands it back inside the outcome.
    pub async fn validate(&self, mut input: Value) -> Validated {
        let errors = self.validate_in_place(&mut input).await;
        Validated {
            data: input,
            errors,
        }
    }

    /// Validates a copy of `input`, leaving the original untouched.
    pub async fn validate_cloned(&self, input: &Value) -> Validated {
        self.validate(input.clone()).await
    }

    /// Validates `data` in place and returns the errors, if any.
    pub async fn validate_in_place(&self, data: &mut Value) -> Option<SchemaErrors> {
        let mut scope = Scope::new();
        self.procedure
            .run(&self.procedure.root, Slot::Root(data), &mut scope)
            .await;
        let errors = scope.into_errors();
        trace!(
            kind = %self.kind(),
            errors = errors.as_ref().map_or(0, SchemaErrors::len),
            "validation finished"
        );
        errors
    }

    /// Runs `handler` on the validated data, or returns the failed outcome
    /// without calling it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shapecheck::Schema;
    /// use serde_json::json;
    ///
    /// let validator = Schema::object([("id", Schema::integer())]).compile().unwrap();
    ///
    /// let id = futures::executor::block_on(validator.guard(json!({ "id": "7" }), |data| data["id"].clone()));
    /// assert_eq!(id.unwrap(), json!(7));
    ///
    /// let rejected = futures::executor::block_on(validator.guard(json!({}), |data| data));
    /// assert!(rejected.is_err());
    /// ```
    pub async fn guard<T, F>(&self, input: Value, handler: F) -> Result<T, Validated>
    where
        F: FnOnce(Value) -> T,
    {
        let outcome = self.validate(input).await;
        if outcome.is_valid() {
            Ok(handler(outcome.data))
        } else {
            Err(outcome)
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("root", &self.procedure.root)
            .field("hooks", &self.procedure.hooks)
            .finish()
    }
}

/// Why a node's own checks failed.
struct Failure<'i> {
    message: &'i str,
    code: &'static str,
    expected: String,
    got: String,
}

impl Procedure {
    fn run<'a>(
        &'a self,
        node: &'a Instruction,
        mut slot: Slot<'a>,
        scope: &'a mut Scope,
    ) -> BoxFuture<'a, ()> {
        async move {
            if node.optional && slot.get().is_none() {
                return;
            }

            let mark = scope.error_count();
            match check(node, &mut slot) {
                Ok(()) => self.descend(node, &mut slot, scope).await,
                Err(failure) => self.reject(node, &mut slot, scope, failure).await,
            }

            if let Some(index) = node.finally {
                if scope.error_count() == mark {
                    self.finish(index, &mut slot, scope).await;
                }
            }
        }
        .boxed()
    }

    async fn descend(&self, node: &Instruction, slot: &mut Slot<'_>, scope: &mut Scope) {
        match (&node.children, slot.get_mut()) {
            (Children::Each(item), Some(Value::Array(items))) => {
                let mark = scope.error_count();
                for index in 0..items.len() {
                    scope.enter(PathSegment::Index(index));
                    self.run(item, Slot::Element(&mut *items, index), &mut *scope)
                        .await;
                    scope.leave();
                    if scope.error_count() > mark {
                        break;
                    }
                }
            }
            (Children::Tuple(positions), Some(Value::Array(items))) => {
                for (index, position) in positions.iter().enumerate() {
                    scope.enter(PathSegment::Index(index));
                    self.run(position, Slot::Element(&mut *items, index), &mut *scope)
                        .await;
                    scope.leave();
                }
            }
            (Children::Fields { fields, allowed }, Some(Value::Object(map))) => {
                let mark = scope.error_count();
                for (name, field) in fields {
                    scope.enter(PathSegment::Field(name.clone()));
                    self.run(field, Slot::Field(&mut *map, name), &mut *scope)
                        .await;
                    scope.leave();
                }
                if scope.error_count() == mark {
                    map.retain(|key, _| allowed.contains(key));
                }
            }
            _ => {}
        }
    }

    async fn reject(
        &self,
        node: &Instruction,
        slot: &mut Slot<'_>,
        scope: &mut Scope,
        failure: Failure<'_>,
    ) {
        if let Some(supplier) = node.catch.and_then(|index| self.hooks.catch(index)) {
            let fallback = supplier().await;
            slot.set(fallback);
            return;
        }

        let error = scope.report(failure.message, failure.code);
        error.expected = Some(failure.expected);
        error.got = Some(failure.got);
    }

    async fn finish(&self, index: usize, slot: &mut Slot<'_>, scope: &mut Scope) {
        let (Some(transform), Some(value)) = (self.hooks.finally(index), slot.take()) else {
            return;
        };

        let sink = ErrorSink::new();
        let transformed = transform(value, sink.clone()).await;
        slot.set(transformed);

        for message in sink.drain() {
            scope.report(message, "custom");
        }
    }
}

/// The node's structural check followed by its bound checks.
fn check<'i>(node: &'i Instruction, slot: &mut Slot<'_>) -> Result<(), Failure<'i>> {
    let Some(value) = slot.get_mut() else {
        return Err(Failure {
            message: &node.type_message,
            code: "required",
            expected: node.kind.to_string(),
            got: "missing".to_string(),
        });
    };

    if !conform(node.kind, value) {
        return Err(Failure {
            message: &node.type_message,
            code: "invalid_type",
            expected: node.kind.to_string(),
            got: value_type_name(value).to_string(),
        });
    }

    match node.bounds.iter().find(|bound| !bound.test.passes(value)) {
        Some(bound) => Err(Failure {
            message: &bound.message,
            code: bound.code,
            expected: bound.test.expected(),
            got: bound.test.describe(value),
        }),
        None => Ok(()),
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Validator>();
    assert_sync::<Validator>();
    assert_send::<Validated>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Schema;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn test_failure_context() {
        let validator = Schema::string().min(3).compile().unwrap();
        let outcome = block_on(validator.validate(json!("ab")));
        let errors = outcome.errors.unwrap();
        let error = errors.first();

        assert_eq!(error.code, "min");
        assert_eq!(error.message, "must be at least 3 characters");
        assert_eq!(error.expected.as_deref(), Some("at least 3 characters"));
        assert_eq!(error.got.as_deref(), Some("2 characters"));
        assert_eq!(error.path.to_string(), "root");
    }

    #[test]
    fn test_missing_required_field() {
        let validator = Schema::object([("name", Schema::string())]).compile().unwrap();
        let outcome = block_on(validator.validate(json!({})));
        let errors = outcome.errors.unwrap();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().code, "required");
        assert_eq!(errors.first().message, "must be a non empty string");
        assert_eq!(errors.first().got.as_deref(), Some("missing"));
        assert_eq!(errors.first().path.to_string(), "name");
    }

    #[test]
    fn test_into_validation() {
        let validator = Schema::boolean().compile().unwrap();

        let ok = block_on(validator.validate(json!("0"))).into_validation();
        assert!(matches!(ok, Validation::Success(Value::Bool(false))));

        let failed = block_on(validator.validate(json!("yes"))).into_validation();
        assert!(matches!(failed, Validation::Failure(ref e) if e.len() == 1));
    }

    #[test]
    fn test_into_result() {
        let validator = Schema::integer().compile().unwrap();
        assert_eq!(block_on(validator.validate(json!(4))).into_result().unwrap(), json!(4));
        assert!(block_on(validator.validate(json!(4.5))).into_result().is_err());
    }

    #[test]
    fn test_validate_cloned_keeps_original() {
        let validator = Schema::object([("n", Schema::number())]).compile().unwrap();
        let input = json!({ "n": "5", "drop": 1 });

        let outcome = block_on(validator.validate_cloned(&input));
        assert_eq!(outcome.data, json!({ "n": 5 }));
        assert_eq!(input, json!({ "n": "5", "drop": 1 }));
    }

    #[test]
    fn test_clones_share_procedure() {
        let validator = Schema::any().compile().unwrap();
        let copy = validator.clone();
        assert!(validator.same_procedure(&copy));
        assert!(!validator.same_procedure(&Schema::any().compile().unwrap()));
        assert_eq!(copy.kind(), Kind::Any);
        assert!(copy.hooks().is_empty());
    }
}
