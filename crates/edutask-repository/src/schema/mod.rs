//! Collection schema descriptors.
//!
//! A descriptor carries the `$jsonSchema` validator handed to the store when
//! a collection is created, plus the fields that get a unique index. The same
//! rules can be checked locally with [`SchemaDescriptor::validate`].

mod provider;

pub use provider::*;

use bson::{doc, Bson, Document};
use edutask_core::{field_errors_to_edutask_error, EdutaskError, EdutaskResult, FieldError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// BSON type aliases accepted by `bsonType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BsonType {
    String,
    Bool,
    Int,
    Long,
    Double,
    Decimal,
    /// Any numeric type.
    Number,
    ObjectId,
    Array,
    Object,
    Date,
    Null,
}

impl BsonType {
    /// Returns true if `value` has this type.
    #[must_use]
    pub fn accepts(self, value: &Bson) -> bool {
        match (self, value) {
            (Self::String, Bson::String(_))
            | (Self::Bool, Bson::Boolean(_))
            | (Self::Int, Bson::Int32(_))
            | (Self::Long, Bson::Int64(_))
            | (Self::Double, Bson::Double(_))
            | (Self::Decimal, Bson::Decimal128(_))
            | (Self::ObjectId, Bson::ObjectId(_))
            | (Self::Array, Bson::Array(_))
            | (Self::Object, Bson::Document(_))
            | (Self::Date, Bson::DateTime(_))
            | (Self::Null, Bson::Null) => true,
            (Self::Number, v) => matches!(
                v,
                Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_)
            ),
            _ => false,
        }
    }
}

/// A single `bsonType` name or a list of alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    One(BsonType),
    Many(Vec<BsonType>),
}

impl TypeSpec {
    /// Returns true if any listed type accepts `value`.
    #[must_use]
    pub fn accepts(&self, value: &Bson) -> bool {
        match self {
            Self::One(t) => t.accepts(value),
            Self::Many(ts) => ts.iter().any(|t| t.accepts(value)),
        }
    }
}

impl From<BsonType> for TypeSpec {
    fn from(t: BsonType) -> Self {
        Self::One(t)
    }
}

/// The subset of MongoDB's `$jsonSchema` keywords used by Edutask.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bson_type: Option<TypeSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, JsonSchema>,

    /// Schema applied to every element of an array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<JsonSchema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,
}

impl JsonSchema {
    /// Creates an object schema with no constraints.
    #[must_use]
    pub fn object() -> Self {
        Self {
            bson_type: Some(BsonType::Object.into()),
            ..Self::default()
        }
    }

    /// Creates a schema constraining only the type.
    #[must_use]
    pub fn of_type(bson_type: BsonType) -> Self {
        Self {
            bson_type: Some(bson_type.into()),
            ..Self::default()
        }
    }

    /// Adds a property that must be present.
    #[must_use]
    pub fn required_property(mut self, name: impl Into<String>, schema: JsonSchema) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.properties.insert(name, schema);
        self
    }

    /// Adds a property that may be absent.
    #[must_use]
    pub fn optional_property(mut self, name: impl Into<String>, schema: JsonSchema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    fn check_value(&self, path: &str, value: &Bson, errors: &mut Vec<FieldError>) {
        if let Some(spec) = &self.bson_type {
            if !spec.accepts(value) {
                errors.push(FieldError::new(
                    path,
                    "bson_type",
                    format!(
                        "expected {}, found {:?}",
                        describe_spec(spec),
                        value.element_type()
                    ),
                ));
                return;
            }
        }

        match value {
            Bson::Document(inner) => self.check_document(path, inner, errors),
            Bson::Array(elements) => {
                if let Some(items) = &self.items {
                    for (i, element) in elements.iter().enumerate() {
                        items.check_value(&format!("{path}.{i}"), element, errors);
                    }
                }
                if self.unique_items == Some(true) {
                    let has_duplicate = elements
                        .iter()
                        .enumerate()
                        .any(|(i, a)| elements[..i].contains(a));
                    if has_duplicate {
                        errors.push(FieldError::new(path, "unique_items", "array items must be unique"));
                    }
                }
            }
            _ => {}
        }
    }

    fn check_document(&self, path: &str, document: &Document, errors: &mut Vec<FieldError>) {
        for field in &self.required {
            if !document.contains_key(field) {
                errors.push(FieldError::new(
                    join_path(path, field),
                    "required",
                    "is required",
                ));
            }
        }

        for (name, schema) in &self.properties {
            if let Some(value) = document.get(name) {
                schema.check_value(&join_path(path, name), value, errors);
            }
        }
    }
}

fn join_path(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{parent}.{field}")
    }
}

fn describe_spec(spec: &TypeSpec) -> String {
    match spec {
        TypeSpec::One(t) => format!("{t:?}"),
        TypeSpec::Many(ts) => ts
            .iter()
            .map(|t| format!("{t:?}"))
            .collect::<Vec<_>>()
            .join(" | "),
    }
}

/// Validator plus unique fields for one collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    #[serde(rename = "$jsonSchema")]
    pub json_schema: JsonSchema,

    /// Fields that receive a unique index when the collection is created.
    #[serde(default, rename = "uniqueFields", skip_serializing_if = "Vec::is_empty")]
    pub unique_fields: Vec<String>,
}

impl SchemaDescriptor {
    /// Creates a descriptor from a schema with no unique fields.
    #[must_use]
    pub fn new(json_schema: JsonSchema) -> Self {
        Self {
            json_schema,
            unique_fields: Vec::new(),
        }
    }

    /// Adds a field that must be unique across the collection.
    #[must_use]
    pub fn with_unique(mut self, field: impl Into<String>) -> Self {
        self.unique_fields.push(field.into());
        self
    }

    /// Parses a descriptor from its JSON form.
    pub fn from_json_str(json: &str) -> EdutaskResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| EdutaskError::Configuration(format!("Invalid schema descriptor: {e}")))
    }

    /// Renders the `validator` option for collection creation.
    pub fn validator_document(&self) -> EdutaskResult<Document> {
        let schema = bson::to_document(&self.json_schema)?;
        Ok(doc! { "$jsonSchema": schema })
    }

    /// Returns every rule violation in `document`.
    #[must_use]
    pub fn field_errors(&self, document: &Document) -> Vec<FieldError> {
        let mut errors = Vec::new();
        self.json_schema.check_document("", document, &mut errors);
        errors
    }

    /// Checks `document` against the schema.
    pub fn validate(&self, document: &Document) -> EdutaskResult<()> {
        let errors = self.field_errors(document);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(field_errors_to_edutask_error(&errors))
        }
    }
}
