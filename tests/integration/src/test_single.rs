//! Single-item compilation, end to end.

use serde_json::json;

use dynoexpr_core::codec::{attr_name, attr_value};
use dynoexpr_core::dynoexpr;

use crate::{init_tracing, placeholder_tokens};

#[test]
fn test_should_compile_all_clauses_of_a_query() {
    init_tracing();

    let output = dynoexpr(json!({
        "KeyCondition": { "id": "567" },
        "Condition": { "rating": "> 4.5" },
        "Filter": { "color": "blue" },
        "Projection": ["weight", "size"],
    }))
    .unwrap();

    assert_eq!(
        output["KeyConditionExpression"],
        json!(format!("({} = {})", attr_name("id"), attr_value(&json!("567"))))
    );
    assert_eq!(
        output["ConditionExpression"],
        json!(format!("({} > {})", attr_name("rating"), attr_value(&json!(4.5))))
    );
    assert_eq!(
        output["FilterExpression"],
        json!(format!("({} = {})", attr_name("color"), attr_value(&json!("blue"))))
    );
    assert_eq!(
        output["ProjectionExpression"],
        json!(format!("{},{}", attr_name("weight"), attr_name("size")))
    );

    let names = output["ExpressionAttributeNames"].as_object().unwrap();
    let resolved: Vec<&str> = names.values().filter_map(|v| v.as_str()).collect();
    for field in ["id", "rating", "color", "weight", "size"] {
        assert!(resolved.contains(&field), "missing name entry for {field}");
    }
    assert_eq!(names.len(), 5);

    let values = output["ExpressionAttributeValues"].as_object().unwrap();
    assert_eq!(values.len(), 3);
    assert_eq!(values[&attr_value(&json!("567"))], json!("567"));
    assert_eq!(values[&attr_value(&json!(4.5))], json!(4.5));
    assert_eq!(values[&attr_value(&json!("blue"))], json!("blue"));
}

#[test]
fn test_should_resolve_every_placeholder_in_every_expression() {
    let output = dynoexpr(json!({
        "KeyCondition": { "id": "begins_with 2022" },
        "Condition": { "rating": "between 2 and 5" },
        "Filter": { "color": ["blue", "not contains(pale)"] },
        "Projection": ["weight"],
        "UpdateSet": { "count": "count + 1" },
        "UpdateRemove": { "legacy": 1 },
    }))
    .unwrap();

    let names = output["ExpressionAttributeNames"].as_object().unwrap();
    let values = output["ExpressionAttributeValues"].as_object().unwrap();

    let mut seen = Vec::new();
    for key in [
        "KeyConditionExpression",
        "ConditionExpression",
        "FilterExpression",
        "ProjectionExpression",
        "UpdateExpression",
    ] {
        let expression = output[key].as_str().unwrap();
        for token in placeholder_tokens(expression) {
            let resolved = if token.starts_with('#') {
                names.contains_key(&token)
            } else {
                values.contains_key(&token)
            };
            assert!(resolved, "orphan placeholder {token} in {key}");
            if !seen.contains(&token) {
                seen.push(token);
            }
        }
    }

    // And the maps carry no unused entries.
    assert_eq!(seen.len(), names.len() + values.len());
}

#[test]
fn test_should_join_filter_fan_out_with_clause_operator() {
    let output = dynoexpr(json!({
        "Filter": { "status": ["IN_PROGRESS", "OPEN"] },
        "FilterLogicalOperator": "OR",
    }))
    .unwrap();

    let name = attr_name("status");
    assert_eq!(
        output["FilterExpression"],
        json!(format!(
            "({name} = {}) OR ({name} = {})",
            attr_value(&json!("IN_PROGRESS")),
            attr_value(&json!("OPEN"))
        ))
    );
    assert!(output.get("FilterLogicalOperator").is_none());
}

#[test]
fn test_should_preserve_passthrough_keys() {
    let output = dynoexpr(json!({
        "TableName": "Table",
        "Key": { "id": 123 },
        "ReturnValues": "ALL_NEW",
        "UpdateSet": { "color": "pink" },
    }))
    .unwrap();

    assert_eq!(output["TableName"], json!("Table"));
    assert_eq!(output["Key"], json!({"id": 123}));
    assert_eq!(output["ReturnValues"], json!("ALL_NEW"));
    assert!(output.get("UpdateSet").is_none());
}

#[test]
fn test_should_merge_pre_seeded_attribute_maps() {
    let output = dynoexpr(json!({
        "Filter": { "a": 1 },
        "ExpressionAttributeNames": { "#b": "b" },
        "ExpressionAttributeValues": { ":b": 2 },
    }))
    .unwrap();

    let names = output["ExpressionAttributeNames"].as_object().unwrap();
    assert_eq!(names["#b"], json!("b"));
    assert_eq!(names[&attr_name("a")], json!("a"));

    let values = output["ExpressionAttributeValues"].as_object().unwrap();
    assert_eq!(values[":b"], json!(2));
    assert_eq!(values[&attr_value(&json!(1))], json!(1));
}

#[test]
fn test_should_compile_boolean_comparisons() {
    let output = dynoexpr(json!({
        "Filter": { "a": "<> true", "b": "<> false" },
    }))
    .unwrap();

    assert_eq!(
        output["FilterExpression"],
        json!(format!(
            "({} <> {}) AND ({} <> {})",
            attr_name("a"),
            attr_value(&json!(true)),
            attr_name("b"),
            attr_value(&json!(false))
        ))
    );
    let values = output["ExpressionAttributeValues"].as_object().unwrap();
    assert_eq!(values.len(), 2);
}

#[test]
fn test_should_compile_nested_paths_with_quoted_segments() {
    let output = dynoexpr(json!({
        "Condition": { "parent.item": "attribute_exists" },
    }))
    .unwrap();

    assert_eq!(
        output["ConditionExpression"],
        json!(format!("(attribute_exists({}))", attr_name("parent.item")))
    );
    let names = output["ExpressionAttributeNames"].as_object().unwrap();
    assert_eq!(names.len(), 2);
    assert!(output.get("ExpressionAttributeValues").is_none());
}
