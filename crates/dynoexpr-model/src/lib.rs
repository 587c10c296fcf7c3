//! Data model for the dynoexpr expression compiler.
//!
//! This crate provides the parameter types consumed and produced by the
//! compiler in `dynoexpr-core`: clause inputs, compiled expression outputs,
//! the request-shape tagged union, attribute values (including vendor-typed
//! Sets), and the error type. All types are plain serde-derived data with no
//! behavior beyond shape detection; the compilation logic lives in
//! `dynoexpr-core`.

pub mod error;
pub mod params;
pub mod request;
pub mod value;

pub use error::ExpressionError;
pub use params::{ClauseMap, ExpressionParams, LogicalOperator, UpdateAction};
pub use request::{BatchItems, BatchRequest, Request, TransactItem, TransactRequest};
pub use value::{AttrValue, DynamoSet, SetLiteral, SetType};
