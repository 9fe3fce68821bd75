//! Integration tests for number, integer and float schema validation.

use shapecheck::{Schema, SchemaErrors, Validated};
use serde_json::{json, Value};

/// Helper to extract the data of a successful validation
fn unwrap_success(outcome: Validated) -> Value {
    outcome.into_result().unwrap()
}

/// Helper to extract the errors of a failed validation
fn unwrap_failure(outcome: Validated) -> SchemaErrors {
    outcome.into_result().unwrap_err()
}

#[tokio::test]
async fn test_number_coerces_numeric_string() {
    let outcome = Schema::number().validate(json!("42")).await.unwrap();

    assert!(outcome.errors.is_none());
    assert_eq!(outcome.data, json!(42));
}

#[tokio::test]
async fn test_number_coercion_variants() {
    let schema = Schema::number();

    assert_eq!(unwrap_success(schema.validate(json!(" 7 ")).await.unwrap()), json!(7));
    assert_eq!(unwrap_success(schema.validate(json!("-1.25")).await.unwrap()), json!(-1.25));
    assert_eq!(unwrap_success(schema.validate(json!("1e3")).await.unwrap()), json!(1000));
    assert_eq!(unwrap_success(schema.validate(json!(true)).await.unwrap()), json!(1));
    assert_eq!(unwrap_success(schema.validate(json!(false)).await.unwrap()), json!(0));
}

#[tokio::test]
async fn test_number_rejects_non_numeric() {
    let schema = Schema::number();

    for input in [json!("abc"), json!(""), json!("   "), json!(null), json!([1]), json!({})] {
        let errors = unwrap_failure(schema.validate(input.clone()).await.unwrap());
        assert_eq!(errors.len(), 1, "input {}", input);
        assert_eq!(errors.first().message, "must be a number");
        assert_eq!(errors.first().code, "invalid_type");
    }
}

#[tokio::test]
async fn test_integer_rejects_fraction() {
    let errors = unwrap_failure(Schema::integer().validate(json!(3.5)).await.unwrap());

    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().message, "must be an integer");
}

#[tokio::test]
async fn test_integer_accepts_whole_numbers() {
    let schema = Schema::integer();

    assert_eq!(unwrap_success(schema.validate(json!(3)).await.unwrap()), json!(3));
    assert_eq!(unwrap_success(schema.validate(json!(-8)).await.unwrap()), json!(-8));
    assert_eq!(unwrap_success(schema.validate(json!(2.0)).await.unwrap()), json!(2.0));
    assert_eq!(unwrap_success(schema.validate(json!("12")).await.unwrap()), json!(12));
}

#[tokio::test]
async fn test_integer_rejected_string_is_left_unchanged() {
    let outcome = Schema::integer().validate(json!("3.5")).await.unwrap();

    assert!(!outcome.is_valid());
    assert_eq!(outcome.data, json!("3.5"));
}

#[tokio::test]
async fn test_float_accepts_fractions() {
    let schema = Schema::float();

    assert_eq!(unwrap_success(schema.validate(json!(0.5)).await.unwrap()), json!(0.5));
    assert_eq!(unwrap_success(schema.validate(json!("0.5")).await.unwrap()), json!(0.5));
}

#[tokio::test]
async fn test_min_is_inclusive() {
    let schema = Schema::integer().min(18);

    assert!(schema.validate(json!(18)).await.unwrap().is_valid());

    let errors = unwrap_failure(schema.validate(json!(17)).await.unwrap());
    assert_eq!(errors.first().message, "must be at least 18");
    assert_eq!(errors.first().code, "min");
    assert_eq!(errors.first().got.as_deref(), Some("17"));
    assert_eq!(errors.first().expected.as_deref(), Some("at least 18"));
}

#[tokio::test]
async fn test_max_is_inclusive() {
    let schema = Schema::number().max(1.5);

    assert!(schema.validate(json!(1.5)).await.unwrap().is_valid());

    let errors = unwrap_failure(schema.validate(json!(2)).await.unwrap());
    assert_eq!(errors.first().message, "must be at most 1.5");
    assert_eq!(errors.first().code, "max");
}

#[tokio::test]
async fn test_range() {
    let schema = Schema::integer().range(1, 5);

    assert!(schema.validate(json!(1)).await.unwrap().is_valid());
    assert!(schema.validate(json!(5)).await.unwrap().is_valid());

    let errors = unwrap_failure(schema.validate(json!(6)).await.unwrap());
    assert_eq!(errors.first().message, "must be between 1 and 5");
    assert_eq!(errors.first().code, "range");
}

#[tokio::test]
async fn test_bounds_apply_to_coerced_value() {
    let schema = Schema::number().min(10);

    let outcome = schema.validate(json!("5")).await.unwrap();
    assert!(!outcome.is_valid());
    assert_eq!(outcome.data, json!(5));
}

#[tokio::test]
async fn test_equals_compares_numerically() {
    let schema = Schema::number().equals(2);

    assert!(schema.validate(json!(2.0)).await.unwrap().is_valid());
    assert!(schema.validate(json!("2")).await.unwrap().is_valid());

    let errors = unwrap_failure(schema.validate(json!(3)).await.unwrap());
    assert_eq!(errors.first().message, "must equal 2");
}

#[tokio::test]
async fn test_first_failing_bound_wins() {
    let schema = Schema::integer().min(10).max(5).equals(7);

    let errors = unwrap_failure(schema.validate(json!(3)).await.unwrap());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().code, "min");

    let errors = unwrap_failure(schema.validate(json!(12)).await.unwrap());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().code, "max");
}

#[tokio::test]
async fn test_structural_failure_skips_bounds() {
    let schema = Schema::integer().min(10).error("too small");

    let errors = unwrap_failure(schema.validate(json!("many")).await.unwrap());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().message, "must be an integer");
}

#[tokio::test]
async fn test_custom_messages() {
    let schema = Schema::integer()
        .error("age must be a whole number")
        .min(0)
        .error_with(|args| format!("age cannot be below {}", args.limit.unwrap()));

    let errors = unwrap_failure(schema.validate(json!(1.5)).await.unwrap());
    assert_eq!(errors.first().message, "age must be a whole number");

    let errors = unwrap_failure(schema.validate(json!(-1)).await.unwrap());
    assert_eq!(errors.first().message, "age cannot be below 0");
}

#[tokio::test]
async fn test_coercion_is_idempotent() {
    let schema = Schema::number();

    let first = unwrap_success(schema.validate(json!("3.25")).await.unwrap());
    let second = unwrap_success(schema.validate(first.clone()).await.unwrap());
    assert_eq!(first, second);
    assert_eq!(second, json!(3.25));
}
