//! Batch and transact request fan-out.

use serde_json::json;

use dynoexpr_core::codec::{attr_name, attr_value};
use dynoexpr_core::dynoexpr;

use crate::init_tracing;

#[test]
fn test_should_compile_batch_get_requests_per_table() {
    init_tracing();

    let output = dynoexpr(json!({
        "RequestItems": {
            "Table-1": {
                "Keys": [{ "id": "foo" }],
                "Projection": ["a", "b"],
            },
            "Table-2": {
                "Keys": [{ "id": "bar" }],
                "Projection": ["c"],
            },
        },
        "ReturnConsumedCapacity": "TOTAL",
    }))
    .unwrap();

    let table1 = &output["RequestItems"]["Table-1"];
    assert_eq!(
        table1["ProjectionExpression"],
        json!(format!("{},{}", attr_name("a"), attr_name("b")))
    );
    assert_eq!(table1["Keys"], json!([{ "id": "foo" }]));
    assert!(table1.get("Projection").is_none());

    let table2 = &output["RequestItems"]["Table-2"];
    assert_eq!(table2["ProjectionExpression"], json!(attr_name("c")));

    assert_eq!(output["ReturnConsumedCapacity"], json!("TOTAL"));
}

#[test]
fn test_should_pass_batch_write_requests_through_unchanged() {
    let writes = json!([
        { "DeleteRequest": { "Key": { "id": "foo" } } },
        { "PutRequest": { "Item": { "id": "bar" } } },
    ]);
    let output = dynoexpr(json!({
        "RequestItems": {
            "Table-Write": writes.clone(),
            "Table-Get": { "Projection": ["a"] },
        },
    }))
    .unwrap();

    assert_eq!(output["RequestItems"]["Table-Write"], writes);
    assert!(
        output["RequestItems"]["Table-Get"]
            .get("ProjectionExpression")
            .is_some()
    );
}

#[test]
fn test_should_compile_each_transact_operation_individually() {
    let output = dynoexpr(json!({
        "TransactItems": [
            {
                "Get": {
                    "TableName": "A",
                    "Key": { "id": 1 },
                    "Projection": ["color"],
                },
            },
            {
                "ConditionCheck": {
                    "TableName": "B",
                    "Key": { "id": 2 },
                    "Condition": { "rating": "> 4" },
                },
            },
            {
                "Update": {
                    "TableName": "C",
                    "Key": { "id": 3 },
                    "UpdateSet": { "color": "pink" },
                },
            },
        ],
        "ClientRequestToken": "token",
    }))
    .unwrap();

    let items = output["TransactItems"].as_array().unwrap();

    assert_eq!(
        items[0]["Get"]["ProjectionExpression"],
        json!(attr_name("color"))
    );
    assert_eq!(items[0]["Get"]["TableName"], json!("A"));

    assert_eq!(
        items[1]["ConditionCheck"]["ConditionExpression"],
        json!(format!(
            "({} > {})",
            attr_name("rating"),
            attr_value(&json!(4))
        ))
    );

    assert_eq!(
        items[2]["Update"]["UpdateExpression"],
        json!(format!(
            "SET {} = {}",
            attr_name("color"),
            attr_value(&json!("pink"))
        ))
    );
    assert!(items[2]["Update"].get("UpdateSet").is_none());

    assert_eq!(output["ClientRequestToken"], json!("token"));
}

#[test]
fn test_should_keep_placeholder_maps_scoped_per_sub_request() {
    let output = dynoexpr(json!({
        "TransactItems": [
            { "Get": { "Projection": ["a"] } },
            { "Get": { "Projection": ["b"] } },
        ],
    }))
    .unwrap();

    let items = output["TransactItems"].as_array().unwrap();
    let first = items[0]["Get"]["ExpressionAttributeNames"]
        .as_object()
        .unwrap();
    let second = items[1]["Get"]["ExpressionAttributeNames"]
        .as_object()
        .unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert!(first.contains_key(&attr_name("a")));
    assert!(second.contains_key(&attr_name("b")));
}
