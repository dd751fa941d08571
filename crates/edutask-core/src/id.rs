//! Record identifiers and their transport form.
//!
//! The store works with [`ObjectId`]. Outside the data access layer an
//! identifier only ever travels as `{"$oid": "<24 hex chars>"}`, and inbound
//! identifiers arrive as the bare hex string.

use crate::{EdutaskError, EdutaskResult};
use bson::oid::ObjectId;
use bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Key under which every stored document keeps its identifier.
pub const ID_FIELD: &str = "_id";

/// Key of the string wrapper in the transport form.
pub const OID_KEY: &str = "$oid";

/// A stored document rendered in transport form (relaxed extended JSON).
pub type JsonRecord = Map<String, Value>;

/// A strongly-typed wrapper for record identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub ObjectId);

impl RecordId {
    /// Creates a new identifier, as the store would on insert.
    #[must_use]
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Parses the bare 24-character hex form.
    pub fn parse(s: &str) -> EdutaskResult<Self> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|e| EdutaskError::InvalidId {
                id: s.to_string(),
                message: e.to_string(),
            })
    }

    /// Parses the transport form `{"$oid": "..."}`.
    pub fn from_transport(value: &Value) -> EdutaskResult<Self> {
        let hex = value
            .get(OID_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| EdutaskError::InvalidId {
                id: value.to_string(),
                message: format!("expected an object with a string '{OID_KEY}' field"),
            })?;
        Self::parse(hex)
    }

    /// Renders the transport form `{"$oid": "..."}`.
    #[must_use]
    pub fn to_transport(&self) -> Value {
        json!({ OID_KEY: self.0.to_hex() })
    }

    /// Returns the 24-character hex form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// Returns the inner object id.
    #[must_use]
    pub const fn into_inner(self) -> ObjectId {
        self.0
    }

    /// Returns a filter document selecting this record.
    #[must_use]
    pub fn filter(&self) -> Document {
        bson::doc! { "_id": self.0 }
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = EdutaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<ObjectId> for RecordId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl From<RecordId> for ObjectId {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl From<RecordId> for Bson {
    fn from(id: RecordId) -> Self {
        Bson::ObjectId(id.0)
    }
}

/// Converts a stored document to its transport form.
///
/// Uses relaxed extended JSON, so object ids become `{"$oid": ...}`, dates
/// become `{"$date": ...}` and plain numbers stay numbers.
pub fn to_json_record(document: Document) -> EdutaskResult<JsonRecord> {
    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => Ok(map),
        other => Err(EdutaskError::internal(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Extracts the identifier of a transport record.
pub fn record_id_of(record: &JsonRecord) -> EdutaskResult<RecordId> {
    let value = record
        .get(ID_FIELD)
        .ok_or_else(|| EdutaskError::internal("record has no _id field"))?;
    RecordId::from_transport(value)
}
