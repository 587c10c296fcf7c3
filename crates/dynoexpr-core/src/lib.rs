//! Expression compilation engine for DynamoDB-style item-access parameters.
//!
//! Translates a declarative parameter object (conditions, filters,
//! projections, key conditions, update operations) into the three-part
//! expression syntax of the item-access API: an expression string, a
//! name-placeholder map, and a value-placeholder map. The pipeline is:
//!
//! 1. **Codec**: content-addressed `#n<hash>` / `:v<hash>` placeholder naming.
//! 2. **Parsing**: recognize operator forms embedded in string values
//!    (comparisons, `BETWEEN`, `IN`, function calls, `NOT`, arithmetic
//!    deltas, `list_append`, `if_not_exists`).
//! 3. **Compilation**: per-clause compilers sequenced over one parameter
//!    object, sharing the placeholder maps so equal content reuses tokens
//!    across clauses.
//!
//! The whole computation is pure and synchronous: same input, same output.
//!
//! ```
//! use serde_json::json;
//!
//! let params = dynoexpr_core::dynoexpr(json!({
//!     "TableName": "Table",
//!     "Filter": { "color": "blue" },
//!     "Projection": ["weight", "quantity"],
//! }))
//! .unwrap();
//!
//! assert!(params["FilterExpression"].is_string());
//! assert_eq!(params["TableName"], json!("Table"));
//! ```

pub mod adapter;
pub mod codec;
pub mod compiler;
pub mod condition;
pub mod parser;
pub mod projection;
pub mod update;

pub use adapter::{CreateSetOptions, SetAdapter, TypedSetAdapter};
pub use compiler::{Dynoexpr, dynoexpr};
pub use dynoexpr_model::{
    AttrValue, BatchItems, BatchRequest, ClauseMap, DynamoSet, ExpressionError, ExpressionParams,
    LogicalOperator, Request, SetLiteral, SetType, TransactItem, TransactRequest, UpdateAction,
};
