//! Sources of per-collection schema descriptors.

use super::SchemaDescriptor;
use edutask_core::{EdutaskError, EdutaskResult, Interface};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Looks up the schema descriptor for a collection by name.
pub trait ValidatorProvider: Interface {
    /// Returns the descriptor for `collection_name`.
    ///
    /// Fails with [`EdutaskError::Configuration`] when no descriptor exists
    /// or the descriptor cannot be read.
    fn validator(&self, collection_name: &str) -> EdutaskResult<SchemaDescriptor>;
}

/// Reads descriptors from `<directory>/<collection>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileValidatorProvider {
    directory: PathBuf,
}

impl JsonFileValidatorProvider {
    /// Creates a provider rooted at `directory`.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Returns the directory searched for descriptor files.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, collection_name: &str) -> EdutaskResult<PathBuf> {
        let acceptable = !collection_name.is_empty()
            && collection_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !acceptable {
            return Err(EdutaskError::invalid_input(format!(
                "Invalid collection name '{collection_name}'"
            )));
        }
        Ok(self.directory.join(format!("{collection_name}.json")))
    }
}

impl ValidatorProvider for JsonFileValidatorProvider {
    fn validator(&self, collection_name: &str) -> EdutaskResult<SchemaDescriptor> {
        let path = self.path_for(collection_name)?;
        debug!("Loading validator from: {}", path.display());

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            EdutaskError::Configuration(format!(
                "No validator for collection '{}' at {}: {}",
                collection_name,
                path.display(),
                e
            ))
        })?;

        SchemaDescriptor::from_json_str(&contents).map_err(|e| {
            EdutaskError::Configuration(format!("{} ({})", e, path.display()))
        })
    }
}

/// Serves descriptors registered in code.
#[derive(Debug, Clone, Default)]
pub struct StaticValidatorProvider {
    schemas: HashMap<String, SchemaDescriptor>,
}

impl StaticValidatorProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor, replacing any earlier one for the same name.
    #[must_use]
    pub fn with_schema(mut self, collection_name: impl Into<String>, schema: SchemaDescriptor) -> Self {
        self.schemas.insert(collection_name.into(), schema);
        self
    }
}

impl ValidatorProvider for StaticValidatorProvider {
    fn validator(&self, collection_name: &str) -> EdutaskResult<SchemaDescriptor> {
        self.schemas.get(collection_name).cloned().ok_or_else(|| {
            EdutaskError::Configuration(format!(
                "No validator registered for collection '{collection_name}'"
            ))
        })
    }
}
