//! Result type aliases for Edutask.

use crate::EdutaskError;

/// A specialized `Result` type for Edutask operations.
pub type EdutaskResult<T> = Result<T, EdutaskError>;
