use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{MapperError, Result};
use crate::mapping::MappingTable;

/// Top-level configuration document holding the named mapping table.
///
/// ```toml
/// [mappings.person_list]
/// root = "/persons/person"
///
/// [mappings.person_list.fields]
/// name = "name"
/// firstname = "firstname"
/// ```
#[derive(Debug, Deserialize)]
pub struct MappingConfig {
    pub mappings: MappingTable,
}

impl MappingConfig {
    /// Parse a mapping table from TOML text.
    pub fn from_str(content: &str) -> Result<Self> {
        let config: MappingConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load a mapping table from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MapperError::Config(format!(
                "Failed to read mapping file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_str(&content)
    }
}
