//! Request-shape tagged union.
//!
//! The original API sniffed the request shape structurally on every access
//! (`"RequestItems" in params`, `"TransactItems" in params`). Here the raw
//! input is parsed once into a tagged union and dispatch is static from then
//! on: `Batch` requires `RequestItems`, `Transact` requires `TransactItems`,
//! and anything else is a single-item request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::params::ExpressionParams;

/// A request in one of the three shapes the compiler accepts.
///
/// Variant order matters for deserialization: `Single` captures arbitrary
/// objects through its passthrough map, so it is tried last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Request {
    /// A batch request (`RequestItems` keyed by table name).
    Batch(BatchRequest),
    /// A transactional request (`TransactItems` array).
    Transact(TransactRequest),
    /// A plain single-item request.
    Single(Box<ExpressionParams>),
}

impl Request {
    /// Classify a raw JSON value into a request shape.
    pub fn from_value(value: JsonValue) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

impl From<ExpressionParams> for Request {
    fn from(params: ExpressionParams) -> Self {
        Self::Single(Box::new(params))
    }
}

/// A batch request: per-table sub-requests under `RequestItems`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchRequest {
    /// Per-table sub-requests.
    pub request_items: BTreeMap<String, BatchItems>,
    /// Keys outside `RequestItems`, preserved unmodified.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}

/// One table's entry in a batch request.
///
/// Get sub-requests are objects and get compiled; write sub-requests are
/// arrays of put/delete records and pass through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchItems {
    /// A write sub-request (array of `PutRequest`/`DeleteRequest` records).
    Write(Vec<JsonValue>),
    /// A get sub-request, compiled like a single-item request.
    Get(Box<ExpressionParams>),
}

/// A transactional request: an array of single-operation items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactRequest {
    /// The transaction's items, each wrapping exactly one operation.
    pub transact_items: Vec<TransactItem>,
    /// Keys outside `TransactItems`, preserved unmodified.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}

/// One item of a transactional request.
///
/// Serde's external tagging matches the wire shape exactly: each item is a
/// single-key object naming the operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransactItem {
    /// A read operation.
    Get(Box<ExpressionParams>),
    /// A conditional write of a full item.
    Put(Box<ExpressionParams>),
    /// A conditional delete.
    Delete(Box<ExpressionParams>),
    /// A conditional update.
    Update(Box<ExpressionParams>),
    /// A standalone condition check.
    ConditionCheck(Box<ExpressionParams>),
}

impl TransactItem {
    /// The wrapped operation parameters.
    #[must_use]
    pub fn params(&self) -> &ExpressionParams {
        match self {
            Self::Get(params)
            | Self::Put(params)
            | Self::Delete(params)
            | Self::Update(params)
            | Self::ConditionCheck(params) => params,
        }
    }
}
