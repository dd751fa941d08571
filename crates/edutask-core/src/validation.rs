//! Validation utilities.

use crate::{EdutaskError, FieldError};

/// Message returned for any argument that is not shaped like an email address.
pub const INVALID_EMAIL_MESSAGE: &str = "Error: invalid email address";

/// Converts field-level errors into a single [`EdutaskError::Validation`].
#[must_use]
pub fn field_errors_to_edutask_error(errors: &[FieldError]) -> EdutaskError {
    let message = errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    EdutaskError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    /// Syntactic email shape check: non-empty and contains an `@`.
    ///
    /// Deliverability and RFC 5322 conformance are out of scope; the store
    /// holds whatever shape the caller provides.
    #[must_use]
    pub fn is_email_shaped(value: &str) -> bool {
        !value.is_empty() && value.contains('@') && !value.contains('\n')
    }

    /// Validates that a string is not blank (not empty after trimming).
    #[must_use]
    pub fn not_blank(value: &str) -> bool {
        !value.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(is_email_shaped("test@example.com"));
        assert!(is_email_shaped("a@b"));
        assert!(is_email_shaped("@"));
        assert!(!is_email_shaped(""));
        assert!(!is_email_shaped("invalid-email"));
        assert!(!is_email_shaped("testexample.com"));
        assert!(!is_email_shaped("test@example.com\nother"));
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("x"));
        assert!(!not_blank("   "));
        assert!(!not_blank(""));
    }

    #[test]
    fn test_field_errors_message() {
        let err = field_errors_to_edutask_error(&[
            FieldError::new("name", "required", "is required"),
            FieldError::new("active", "bson_type", "must be bool"),
        ]);
        assert!(matches!(err, EdutaskError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Document failed validation: name: is required; active: must be bool"
        );
    }
}
