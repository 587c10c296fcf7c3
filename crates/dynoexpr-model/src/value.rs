//! Attribute value types, including native and vendor-typed Sets.
//!
//! `AttrValue` is the entry type of `ExpressionAttributeValues`. Most entries
//! are plain JSON values; `ADD`/`DELETE` update clauses promote array values
//! to native `SetLiteral`s, which the configured set adapter later converts
//! into vendor-typed `DynamoSet`s. Vendor sets use the DynamoDB single-key
//! wire form (`{"SS": [...]}`) when serialized, the same convention the
//! `AttributeValue` tagged union uses on the wire.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

/// A native, untyped set awaiting vendor promotion.
///
/// Members are deduplicated on construction and keep first-occurrence order.
/// This value never appears in compiled output: the orchestrator either
/// converts it through the set adapter or fails with a configuration error.
#[derive(Debug, Clone, PartialEq)]
pub struct SetLiteral {
    members: Vec<JsonValue>,
}

impl SetLiteral {
    /// Build a set literal from members, dropping duplicates.
    #[must_use]
    pub fn from_members(members: impl IntoIterator<Item = JsonValue>) -> Self {
        let mut deduped: Vec<JsonValue> = Vec::new();
        for member in members {
            if !deduped.contains(&member) {
                deduped.push(member);
            }
        }
        Self { members: deduped }
    }

    /// The deduplicated members in first-occurrence order.
    #[must_use]
    pub fn members(&self) -> &[JsonValue] {
        &self.members
    }

    /// Number of distinct members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// The element type of a vendor set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetType {
    /// String Set (`SS`).
    String,
    /// Number Set (`NS`).
    Number,
    /// Binary Set (`BS`).
    Binary,
}

impl SetType {
    /// Returns the wire-form type key (`SS`, `NS`, `BS`).
    #[must_use]
    pub fn wire_key(&self) -> &'static str {
        match self {
            Self::String => "SS",
            Self::Number => "NS",
            Self::Binary => "BS",
        }
    }
}

impl fmt::Display for SetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "String"),
            Self::Number => write!(f, "Number"),
            Self::Binary => write!(f, "Binary"),
        }
    }
}

/// A vendor-typed set produced by a set adapter.
///
/// The declared type comes from the adapter (normally the type of the first
/// member); members are carried as-is, so a mixed set constructed without
/// validation keeps its original members.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamoSet {
    /// Declared element type.
    pub set_type: SetType,
    /// Set members, untouched by the adapter.
    pub values: Vec<JsonValue>,
}

impl Serialize for DynamoSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.set_type.wire_key(), &self.values)?;
        map.end()
    }
}

/// An entry in `ExpressionAttributeValues`.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// A plain JSON value (string, number, boolean, null, array, object).
    Json(JsonValue),
    /// A native set literal, not yet converted by the adapter.
    Set(SetLiteral),
    /// A vendor-typed set produced by the adapter.
    Vendor(DynamoSet),
}

impl AttrValue {
    /// Returns the JSON value if this is a plain value.
    #[must_use]
    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Self::Json(value) => Some(value),
            Self::Set(_) | Self::Vendor(_) => None,
        }
    }

    /// Returns `true` if this is a native set awaiting promotion.
    #[must_use]
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    /// Returns the vendor set if the adapter has produced one.
    #[must_use]
    pub fn as_vendor(&self) -> Option<&DynamoSet> {
        match self {
            Self::Vendor(set) => Some(set),
            Self::Json(_) | Self::Set(_) => None,
        }
    }
}

impl From<JsonValue> for AttrValue {
    fn from(value: JsonValue) -> Self {
        Self::Json(value)
    }
}

impl Serialize for AttrValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Json(value) => value.serialize(serializer),
            // A native set should have been promoted before serialization;
            // fall back to its member list so output stays valid JSON.
            Self::Set(set) => set.members().serialize(serializer),
            Self::Vendor(set) => set.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for AttrValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Pre-seeded attribute values are always plain JSON; sets only arise
        // inside the compiler or through an adapter.
        JsonValue::deserialize(deserializer).map(Self::Json)
    }
}

/// Human-readable type name of a JSON value, in the vendor's vocabulary
/// (used in set-validation error messages).
#[must_use]
pub fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "Null",
        JsonValue::Bool(_) => "Boolean",
        JsonValue::Number(_) => "Number",
        JsonValue::String(_) => "String",
        JsonValue::Array(_) => "List",
        JsonValue::Object(_) => "Map",
    }
}
