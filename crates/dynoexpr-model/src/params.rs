//! Single-item expression parameters.
//!
//! `ExpressionParams` is both the input and the output of single-item
//! compilation: clause inputs (`Condition`, `Filter`, `Projection`,
//! `Update*`, ...) are consumed by the compiler stages, which fill in the
//! compiled expression strings and the shared placeholder maps. Keys the
//! compiler does not know about (`TableName`, `Key`, ...) are captured by the
//! flattened `extra` map and pass through unmodified.
//!
//! Field naming follows the DynamoDB wire convention (`PascalCase`); empty
//! and absent fields are omitted on serialization so the output carries no
//! `{}` placeholders.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::value::AttrValue;

/// A clause input: field path to value / operator string / fan-out array.
///
/// `serde_json`'s order-preserving map keeps caller insertion order, which
/// the expression-string join order follows.
pub type ClauseMap = serde_json::Map<String, JsonValue>;

/// Logical operator joining the sub-expressions of one clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    /// All sub-expressions must hold.
    #[default]
    And,
    /// Any sub-expression may hold.
    Or,
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
        }
    }
}

/// The action applied by a single-action `Update` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UpdateAction {
    /// Assign values (`SET`).
    #[default]
    Set,
    /// Remove attributes (`REMOVE`).
    Remove,
    /// Add to numbers or sets (`ADD`).
    Add,
    /// Remove elements from sets (`DELETE`).
    Delete,
}

impl fmt::Display for UpdateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set => write!(f, "SET"),
            Self::Remove => write!(f, "REMOVE"),
            Self::Add => write!(f, "ADD"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// Parameters for a single-item request, before and after compilation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExpressionParams {
    /// Key-condition clause input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_condition: Option<ClauseMap>,
    /// Logical operator for the key-condition clause (default `AND`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_condition_logical_operator: Option<LogicalOperator>,

    /// Condition clause input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<ClauseMap>,
    /// Logical operator for the condition clause (default `AND`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_logical_operator: Option<LogicalOperator>,

    /// Filter clause input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<ClauseMap>,
    /// Logical operator for the filter clause (default `AND`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_logical_operator: Option<LogicalOperator>,

    /// Projection clause input: the fields to retrieve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Vec<String>>,

    /// Single-action update clause input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<ClauseMap>,
    /// Action for the single-action update clause (default `SET`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_action: Option<UpdateAction>,

    /// Split-clause update input: `SET` assignments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_set: Option<ClauseMap>,
    /// Split-clause update input: `REMOVE` paths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_remove: Option<ClauseMap>,
    /// Split-clause update input: `ADD` entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_add: Option<ClauseMap>,
    /// Split-clause update input: `DELETE` entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_delete: Option<ClauseMap>,

    /// Compiled key-condition expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_condition_expression: Option<String>,
    /// Compiled condition expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
    /// Compiled filter expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_expression: Option<String>,
    /// Compiled projection expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
    /// Compiled update expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_expression: Option<String>,

    /// Name-placeholder map, shared across all clauses. May be pre-seeded by
    /// the caller; compiled entries merge into it.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub expression_attribute_names: BTreeMap<String, String>,
    /// Value-placeholder map, shared across all clauses. May be pre-seeded by
    /// the caller; compiled entries merge into it.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub expression_attribute_values: BTreeMap<String, AttrValue>,

    /// Keys the compiler does not interpret (`TableName`, `Key`, ...),
    /// preserved unmodified in the output.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}
