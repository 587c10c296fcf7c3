//! Vendor set-adapter boundary.
//!
//! The compiler itself never decides what a vendor Set looks like: when an
//! `ADD`/`DELETE` clause promotes an array, the resulting native set must be
//! converted through a caller-injected `SetAdapter` before it can appear in
//! output. The adapter is an explicit dependency of the compiler (held by
//! `Dynoexpr`), not process-wide state, so concurrent callers with different
//! adapters simply hold different compiler values.
//!
//! `TypedSetAdapter` is the shipped implementation: it declares the set's
//! element type from its first member and carries the members as-is. With
//! `validate` enabled it rejects mixed-type sets instead.

use serde_json::Value as JsonValue;

use dynoexpr_model::error::ExpressionError;
use dynoexpr_model::value::{DynamoSet, SetType, json_type_name};

/// Options for constructing a vendor set.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateSetOptions {
    /// Reject sets whose members do not all match the declared type.
    pub validate: bool,
}

/// Converts native collections into vendor-typed sets.
pub trait SetAdapter: std::fmt::Debug + Send + Sync {
    /// Build a vendor set from the members of a native set literal.
    fn create_set(
        &self,
        members: &[JsonValue],
        options: CreateSetOptions,
    ) -> Result<DynamoSet, ExpressionError>;
}

/// Adapter that types a set from its first member.
///
/// Without validation, a mixed collection silently takes the first member's
/// type and keeps all members untouched (the vendor SDK's own behavior);
/// the mismatch then surfaces at request time, not here.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedSetAdapter;

impl SetAdapter for TypedSetAdapter {
    fn create_set(
        &self,
        members: &[JsonValue],
        options: CreateSetOptions,
    ) -> Result<DynamoSet, ExpressionError> {
        let Some(first) = members.first() else {
            return Err(ExpressionError::EmptySet);
        };
        let set_type = match first {
            JsonValue::String(_) => SetType::String,
            JsonValue::Number(_) => SetType::Number,
            other => {
                return Err(ExpressionError::UnsupportedSetMember {
                    found: json_type_name(other).to_owned(),
                });
            }
        };

        if options.validate {
            for member in members {
                let found = json_type_name(member);
                if found != set_type.to_string() {
                    return Err(ExpressionError::MixedSetTypes {
                        expected: set_type.to_string(),
                        found: found.to_owned(),
                    });
                }
            }
        }

        Ok(DynamoSet {
            set_type,
            values: members.to_vec(),
        })
    }
}
