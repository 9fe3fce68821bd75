//! Integration tests for array schema validation.

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
async fn test_array_of_strings() {
    let schema = Schema::array(Schema::string());

    assert!(schema.validate(json!(["hello", "world"])).await.unwrap().is_valid());
    assert!(schema.validate(json!([])).await.unwrap().is_valid());
}

#[tokio::test]
async fn test_rejects_non_arrays() {
    let schema = Schema::array(Schema::string());

    for input in [json!("abc"), json!({ "0": "a" }), json!(null), json!(3)] {
        let errors = unwrap_failure(schema.validate(input).await.unwrap());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().message, "must be an array");
        assert_eq!(errors.first().path.to_string(), "root");
    }
}

#[tokio::test]
async fn test_homogeneous_array_stops_at_first_invalid_element() {
    let schema = Schema::array(Schema::string());

    let errors = unwrap_failure(schema.validate(json!(["ok", 5, "x"])).await.unwrap());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().path.to_string(), "[1]");
}

#[tokio::test]
async fn test_later_invalid_elements_are_not_reported() {
    let schema = Schema::array(Schema::integer());

    let errors = unwrap_failure(schema.validate(json!([1, 2, "x", 4.5, null])).await.unwrap());
    assert_eq!(errors.paths(), vec!["[2]".to_string()]);
}

#[tokio::test]
async fn test_elements_before_failure_are_coerced() {
    let schema = Schema::array(Schema::number());

    let outcome = schema.validate(json!(["1", "2", "no", "4"])).await.unwrap();
    assert_eq!(outcome.data, json!([1, 2, "no", "4"]));
}

#[tokio::test]
async fn test_elements_are_coerced() {
    let schema = Schema::array(Schema::boolean());

    let data = unwrap_success(schema.validate(json!(["true", 0, false])).await.unwrap());
    assert_eq!(data, json!([true, false, false]));
}

#[tokio::test]
async fn test_item_count_bounds() {
    let schema = Schema::array(Schema::any()).min(1).max(3);

    let errors = unwrap_failure(schema.validate(json!([])).await.unwrap());
    assert_eq!(errors.first().message, "must be at least 1 items");

    let errors = unwrap_failure(schema.validate(json!([1, 2, 3, 4])).await.unwrap());
    assert_eq!(errors.first().message, "must be at most 3 items");
    assert_eq!(errors.first().got.as_deref(), Some("4 items"));
}

#[tokio::test]
async fn test_failed_bound_skips_elements() {
    let schema = Schema::array(Schema::string()).max(1);

    let errors = unwrap_failure(schema.validate(json!([1, 2])).await.unwrap());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().code, "max");
    assert_eq!(errors.first().path.to_string(), "root");
}

#[tokio::test]
async fn test_tuple_reports_every_position() {
    let schema = Schema::tuple([Schema::string(), Schema::integer(), Schema::boolean()]);

    let errors = unwrap_failure(schema.validate(json!([1, "x", "maybe"])).await.unwrap());
    assert_eq!(
        errors.paths(),
        vec!["[0]".to_string(), "[1]".to_string(), "[2]".to_string()]
    );
}

#[tokio::test]
async fn test_tuple_coerces_positions() {
    let schema = Schema::tuple([Schema::string(), Schema::integer()]);

    let data = unwrap_success(schema.validate(json!(["id", "7"])).await.unwrap());
    assert_eq!(data, json!(["id", 7]));
}

#[tokio::test]
async fn test_tuple_ignores_extra_elements() {
    let schema = Schema::tuple([Schema::string()]);

    let data = unwrap_success(schema.validate(json!(["a", 1, null])).await.unwrap());
    assert_eq!(data, json!(["a", 1, null]));
}

#[tokio::test]
async fn test_tuple_missing_positions() {
    let schema = Schema::tuple([Schema::string(), Schema::integer(), Schema::boolean().optional()]);

    let errors = unwrap_failure(schema.validate(json!(["a"])).await.unwrap());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().path.to_string(), "[1]");
    assert_eq!(errors.first().code, "required");
}

#[tokio::test]
async fn test_tuple_catch_extends_short_array() {
    let schema = Schema::tuple([
        Schema::string(),
        Schema::integer().optional(),
        Schema::boolean().catch(|| json!(false)),
    ]);

    let data = unwrap_success(schema.validate(json!(["a"])).await.unwrap());
    assert_eq!(data, json!(["a", null, false]));
}

#[tokio::test]
async fn test_nested_arrays() {
    let schema = Schema::array(Schema::array(Schema::integer().max(9)));

    assert!(schema.validate(json!([[1, 2], [3]])).await.unwrap().is_valid());

    let errors = unwrap_failure(schema.validate(json!([[1], [2, 30, 40], ["x"]])).await.unwrap());
    assert_eq!(errors.paths(), vec!["[1][1]".to_string()]);
}

#[tokio::test]
async fn test_array_of_objects_error_path() {
    let schema = Schema::object([(
        "users",
        Schema::array(Schema::object([("email", Schema::string())])),
    )]);

    let errors = unwrap_failure(
        schema
            .validate(json!({ "users": [{ "email": "a@x" }, { "email": 3 }] }))
            .await
            .unwrap(),
    );
    assert_eq!(errors.first().path.to_string(), "users[1].email");
}
