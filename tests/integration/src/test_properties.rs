//! Contract properties: determinism, placeholder sharing, clause
//! independence.

use serde_json::json;

use dynoexpr_core::codec::{attr_name, attr_value};
use dynoexpr_core::dynoexpr;

use crate::init_tracing;

#[test]
fn test_should_produce_identical_output_for_identical_input() {
    init_tracing();

    let input = json!({
        "KeyCondition": { "id": "567" },
        "Condition": { "rating": "> 4.5" },
        "Filter": { "color": ["blue", "green"] },
        "Projection": ["weight"],
        "UpdateSet": { "count": "count + 1" },
    });

    let first = dynoexpr(input.clone()).unwrap();
    let second = dynoexpr(input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_should_share_name_placeholders_and_split_value_placeholders() {
    // One field across four clauses: the name hashes only on the field text,
    // so all clauses share one placeholder; the three distinct values get
    // three placeholders, with the equal pair collapsing to one.
    let output = dynoexpr(json!({
        "KeyCondition": { "a": 5 },
        "Condition": { "a": "> 10" },
        "Filter": { "a": 2 },
        "UpdateSet": { "a": 2 },
    }))
    .unwrap();

    let name = attr_name("a");
    let names = output["ExpressionAttributeNames"].as_object().unwrap();
    assert_eq!(names.len(), 1);
    assert_eq!(names[&name], json!("a"));

    for key in [
        "KeyConditionExpression",
        "ConditionExpression",
        "FilterExpression",
        "UpdateExpression",
    ] {
        assert!(
            output[key].as_str().unwrap().contains(&name),
            "{key} does not reference the shared name placeholder"
        );
    }

    let values = output["ExpressionAttributeValues"].as_object().unwrap();
    assert_eq!(values.len(), 3);
    assert_eq!(values[&attr_value(&json!(5))], json!(5));
    assert_eq!(values[&attr_value(&json!(10))], json!(10));
    assert_eq!(values[&attr_value(&json!(2))], json!(2));

    let shared = attr_value(&json!(2));
    assert!(output["FilterExpression"].as_str().unwrap().contains(&shared));
    assert!(output["UpdateExpression"].as_str().unwrap().contains(&shared));
}

#[test]
fn test_should_distinguish_values_by_runtime_type() {
    let output = dynoexpr(json!({
        "Filter": { "a": 5, "b": "= 5" },
        "UpdateSet": { "c": "5" },
    }))
    .unwrap();

    // `5` the number (from both clauses) and `"5"` the literal string get
    // separate placeholders.
    let values = output["ExpressionAttributeValues"].as_object().unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values[&attr_value(&json!(5))], json!(5));
    assert_eq!(values[&attr_value(&json!("5"))], json!("5"));
}

#[test]
fn test_should_omit_empty_maps_entirely() {
    let output = dynoexpr(json!({
        "Condition": { "a": "attribute_exists" },
    }))
    .unwrap();
    assert!(output.get("ExpressionAttributeValues").is_none());

    let output = dynoexpr(json!({ "TableName": "Table" })).unwrap();
    assert_eq!(output, json!({ "TableName": "Table" }));
}
