//! Unified error types for the data access and controller layers.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// MongoDB server code for a document that failed collection validation.
pub const DOCUMENT_VALIDATION_FAILURE: i32 = 121;

/// MongoDB server codes for unique index violations.
pub const DUPLICATE_KEY_CODES: [i32; 2] = [11000, 11001];

/// Unified error type for Edutask.
///
/// Store failures keep the store's own message; the variant records which
/// class of failure it was so callers can tell them apart.
#[derive(Error, Debug)]
pub enum EdutaskError {
    // ============ Store Errors ============
    /// Document does not satisfy the collection schema
    #[error("Document failed validation: {0}")]
    Validation(String),

    /// Write violates a unique index
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Connectivity or any other store-layer failure
    #[error("Database error: {0}")]
    Database(String),

    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    // ============ Caller Errors ============
    /// Malformed argument, rejected before reaching the store
    #[error("{0}")]
    InvalidInput(String),

    /// Argument of the wrong type (or absent)
    #[error("Type error: {0}")]
    InvalidType(String),

    /// Identifier string that is not a valid object id
    #[error("Invalid identifier '{id}': {message}")]
    InvalidId { id: String, message: String },

    // ============ Infrastructure Errors ============
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EdutaskError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::DuplicateKey(_) => "DUPLICATE_KEY",
            Self::Database(_) => "DATABASE_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidType(_) => "INVALID_TYPE",
            Self::InvalidId { .. } => "INVALID_ID",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a duplicate key error.
    #[must_use]
    pub fn duplicate_key<T: Into<String>>(message: T) -> Self {
        Self::DuplicateKey(message.into())
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input<T: Into<String>>(message: T) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Maps a server error code to the matching variant.
    ///
    /// Codes other than validation and duplicate key fall through to
    /// [`EdutaskError::Database`].
    #[must_use]
    pub fn from_server_code(code: i32, message: impl Into<String>) -> Self {
        let message = message.into();
        if code == DOCUMENT_VALIDATION_FAILURE {
            Self::Validation(message)
        } else if DUPLICATE_KEY_CODES.contains(&code) {
            Self::DuplicateKey(message)
        } else {
            Self::Database(format!("[{code}] {message}"))
        }
    }

    /// True for failures raised before any store call was attempted.
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::InvalidType(_) | Self::InvalidId { .. }
        )
    }
}

#[cfg(feature = "mongodb")]
impl From<mongodb::error::Error> for EdutaskError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::{ErrorKind, WriteFailure};

        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
                Self::from_server_code(write_error.code, write_error.message.clone())
            }
            ErrorKind::Command(command_error) => {
                Self::from_server_code(command_error.code, command_error.message.clone())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<bson::oid::Error> for EdutaskError {
    fn from(err: bson::oid::Error) -> Self {
        Self::InvalidId {
            id: String::new(),
            message: err.to_string(),
        }
    }
}

impl From<bson::ser::Error> for EdutaskError {
    fn from(err: bson::ser::Error) -> Self {
        Self::Internal(format!("BSON serialization error: {err}"))
    }
}

impl From<bson::de::Error> for EdutaskError {
    fn from(err: bson::de::Error) -> Self {
        Self::Internal(format!("BSON deserialization error: {err}"))
    }
}

impl From<serde_json::Error> for EdutaskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {err}"))
    }
}

/// Field-level validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name (dotted for nested fields)
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl FieldError {
    /// Creates a new field error.
    #[must_use]
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EdutaskError::validation("bad").error_code(), "VALIDATION_ERROR");
        assert_eq!(EdutaskError::duplicate_key("dup").error_code(), "DUPLICATE_KEY");
        assert_eq!(EdutaskError::Database("down".to_string()).error_code(), "DATABASE_ERROR");
        assert_eq!(EdutaskError::not_found("Record", "abc").error_code(), "NOT_FOUND");
        assert_eq!(EdutaskError::invalid_input("bad email").error_code(), "INVALID_INPUT");
        assert_eq!(EdutaskError::InvalidType("none".to_string()).error_code(), "INVALID_TYPE");
        assert_eq!(EdutaskError::internal("oops").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_server_code_mapping() {
        assert!(matches!(
            EdutaskError::from_server_code(121, "Document failed validation"),
            EdutaskError::Validation(_)
        ));
        assert!(matches!(
            EdutaskError::from_server_code(11000, "E11000 duplicate key error"),
            EdutaskError::DuplicateKey(_)
        ));
        assert!(matches!(
            EdutaskError::from_server_code(11001, "E11001 duplicate key on update"),
            EdutaskError::DuplicateKey(_)
        ));

        let other = EdutaskError::from_server_code(13, "Unauthorized");
        assert!(matches!(other, EdutaskError::Database(_)));
        assert!(other.to_string().contains("[13] Unauthorized"));
    }

    #[test]
    fn test_store_message_is_kept() {
        let err = EdutaskError::from_server_code(11000, "E11000 duplicate key error collection: edutask.user");
        assert!(err.to_string().contains("edutask.user"));
    }

    #[test]
    fn test_invalid_input_message_is_verbatim() {
        let err = EdutaskError::invalid_input("Error: invalid email address");
        assert_eq!(err.to_string(), "Error: invalid email address");
    }

    #[test]
    fn test_caller_errors() {
        assert!(EdutaskError::invalid_input("x").is_caller_error());
        assert!(EdutaskError::InvalidType("x".to_string()).is_caller_error());
        assert!(!EdutaskError::validation("x").is_caller_error());
        assert!(!EdutaskError::Database("x".to_string()).is_caller_error());
    }

    #[test]
    fn test_oid_error_conversion() {
        let err: EdutaskError = bson::oid::ObjectId::parse_str("nope").unwrap_err().into();
        assert_eq!(err.error_code(), "INVALID_ID");
    }
}
