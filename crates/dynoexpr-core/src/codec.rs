//! Content-addressed placeholder naming.
//!
//! Attribute names compile to `#n<hash>` tokens and attribute values to
//! `:v<hash>` tokens, where `<hash>` is the last 8 hex characters of the MD5
//! digest of a canonical string form of the content. Naming is a pure
//! function of content: equal content always yields the same placeholder, so
//! placeholders are shared across clauses without collision bookkeeping.
//! Inputs already carrying a `#`/`:` prefix pass through verbatim.

use digest::Digest;
use md5::Md5;
use serde_json::Value as JsonValue;

use dynoexpr_model::value::{AttrValue, SetLiteral};

/// Number of hex characters kept from the end of the MD5 digest.
const HASH_SUFFIX_LEN: usize = 8;

/// Hash a canonical string down to the placeholder suffix.
fn md5_suffix(input: &str) -> String {
    let digest = Md5::digest(input.trim().as_bytes());
    let hex = hex::encode(digest);
    hex[hex.len() - HASH_SUFFIX_LEN..].to_owned()
}

/// Strip one leading and one trailing double quote, independently.
#[must_use]
pub fn unquote(input: &str) -> &str {
    let input = input.strip_prefix('"').unwrap_or(input);
    input.strip_suffix('"').unwrap_or(input)
}

/// Split a field path on `.`, treating double-quoted segments as one literal
/// name (so `a."b.c"` splits into `a` and `b.c`). Quotes are removed; empty
/// segments are dropped.
#[must_use]
pub fn split_by_dot(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest = input;
    while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix('"') {
            if let Some(end) = stripped.find('"') {
                parts.push(stripped[..end].to_owned());
                rest = stripped[end + 1..].trim_start_matches('.');
                continue;
            }
        }
        let end = rest.find('.').unwrap_or(rest.len());
        if end > 0 {
            parts.push(unquote(&rest[..end]).to_owned());
        }
        rest = rest[end..].trim_start_matches('.');
    }
    parts
}

/// Placeholder token for a single path segment.
#[must_use]
pub fn single_attr_name(segment: &str) -> String {
    format!("#n{}", md5_suffix(&canonical_json(&JsonValue::String(segment.to_owned()))))
}

/// Placeholder token for a (possibly dotted) field path.
///
/// Paths already starting with `#` are assumed pre-encoded and returned
/// verbatim; otherwise each segment is hashed independently and the per
/// segment tokens are joined with `.`.
#[must_use]
pub fn attr_name(path: &str) -> String {
    if path.starts_with('#') {
        return path.to_owned();
    }
    split_by_dot(path)
        .iter()
        .map(|segment| single_attr_name(segment))
        .collect::<Vec<_>>()
        .join(".")
}

/// Placeholder token for a JSON value.
///
/// Strings already starting with `:` are treated as pre-supplied value
/// references and returned verbatim.
#[must_use]
pub fn attr_value(value: &JsonValue) -> String {
    if let JsonValue::String(s) = value {
        if s.starts_with(':') {
            return s.clone();
        }
    }
    format!(":v{}", md5_suffix(&canonical_json(value)))
}

/// Placeholder token for any attribute value, including native sets.
#[must_use]
pub fn attr_value_of(value: &AttrValue) -> String {
    match value {
        AttrValue::Json(json) => attr_value(json),
        AttrValue::Set(set) => format!(":v{}", md5_suffix(&canonical_set(set))),
        AttrValue::Vendor(set) => {
            let literal = SetLiteral::from_members(set.values.iter().cloned());
            format!(":v{}", md5_suffix(&canonical_set(&literal)))
        }
    }
}

/// Canonical string form of a JSON value for hashing.
///
/// Primitives are tagged with their type so `5` and `"5"` hash apart;
/// arrays and objects use their compact JSON encoding (object key order is
/// caller insertion order, which `serde_json`'s order-preserving map keeps
/// stable).
fn canonical_json(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "null:null".to_owned(),
        JsonValue::Bool(b) => format!("{b}:boolean"),
        JsonValue::Number(n) => format!("{n}:number"),
        JsonValue::String(s) => format!("{s}:string"),
        JsonValue::Array(_) | JsonValue::Object(_) => {
            serde_json::to_string(value).unwrap_or_default()
        }
    }
}

/// Canonical string form of a native set.
///
/// Members are serialized, sorted, and deduplicated first, so neither member
/// order nor repetition affects the resulting placeholder. The `Set(...)`
/// wrapper keeps sets distinct from arrays with the same members.
fn canonical_set(set: &SetLiteral) -> String {
    let mut members: Vec<String> = set
        .members()
        .iter()
        .map(|m| serde_json::to_string(m).unwrap_or_default())
        .collect();
    members.sort();
    members.dedup();
    format!("Set([{}])", members.join(","))
}
