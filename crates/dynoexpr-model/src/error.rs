//! Error type for the expression compiler.
//!
//! The compiler is deliberately permissive: malformed operator strings fall
//! back to literal equality instead of failing (see the parser module in
//! `dynoexpr-core`). The only hard failures are the set-adapter boundary and
//! request-shape deserialization in the JSON entry point.

/// Errors produced while compiling expression parameters.
#[derive(Debug, thiserror::Error)]
pub enum ExpressionError {
    /// A native set reached the output without a configured set adapter.
    #[error("When working with Sets, please provide the adapter.")]
    MissingSetAdapter,

    /// A set member did not match the set's declared type (strict validation).
    #[error("{expected} Set contains {found} value")]
    MixedSetTypes {
        /// Declared element type of the set.
        expected: String,
        /// Type of the offending member.
        found: String,
    },

    /// A set was constructed from an empty collection.
    #[error("Cannot create a Set from an empty collection")]
    EmptySet,

    /// A set member type cannot be represented in any vendor set.
    #[error("Unsupported Set member type: {found}")]
    UnsupportedSetMember {
        /// Type of the offending member.
        found: String,
    },

    /// The input value did not match any known request shape, or the
    /// compiled output failed to serialize.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] serde_json::Error),
}
