//! Per-run provider test data.
//!
//! The document is a YAML mapping with a `providers` section keyed by
//! provider name plus any number of other sections (`customization_templates`,
//! `management_systems`, ...). It is loaded once and handed to whoever needs
//! it; nothing here is global.

use crate::entry::ConfigEntry;
use crate::error::DataError;
use crate::path::Path;
use serde_json::Value;
use std::path::Path as FsPath;
use tracing::{debug, info};

/// Name of the section holding provider entries
pub const PROVIDERS_SECTION: &str = "providers";

#[derive(Debug, Clone, PartialEq)]
pub struct TestData {
    document: Value,
    providers: Vec<ConfigEntry>,
}

impl TestData {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DataError> {
        let raw: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let mapping = match &raw {
            serde_yaml::Value::Mapping(mapping) => mapping,
            serde_yaml::Value::Null => return Ok(Self::empty()),
            other => return Err(DataError::InvalidDocument(yaml_kind(other).to_string())),
        };

        // serde_yaml mappings keep document order, serde_json maps do not,
        // so providers are read from the YAML side.
        let providers = match mapping.get(PROVIDERS_SECTION) {
            None | Some(serde_yaml::Value::Null) => Vec::new(),
            Some(serde_yaml::Value::Mapping(section)) => {
                let mut providers = Vec::with_capacity(section.len());
                for (key, block) in section {
                    let name = key.as_str().ok_or_else(|| {
                        DataError::InvalidProviders(format!(
                            "provider keys must be strings, found {}",
                            yaml_kind(key)
                        ))
                    })?;
                    if !block.is_mapping() {
                        return Err(DataError::InvalidProviders(format!(
                            "provider '{}' must be a mapping, found {}",
                            name,
                            yaml_kind(block)
                        )));
                    }
                    providers.push(ConfigEntry::new(name, serde_json::to_value(block)?));
                }
                providers
            }
            Some(other) => {
                return Err(DataError::InvalidProviders(format!(
                    "expected a mapping, found {}",
                    yaml_kind(other)
                )))
            }
        };

        let document = serde_json::to_value(&raw)?;
        debug!(providers = providers.len(), "Loaded test data");
        Ok(Self {
            document,
            providers,
        })
    }

    pub fn from_path(path: impl AsRef<FsPath>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let data = Self::from_yaml_str(&yaml)?;
        info!(
            path = %path.display(),
            providers = data.providers.len(),
            "Loaded test data file"
        );
        Ok(data)
    }

    fn empty() -> Self {
        Self {
            document: Value::Object(Default::default()),
            providers: Vec::new(),
        }
    }

    /// Provider entries in document order
    pub fn providers(&self) -> &[ConfigEntry] {
        &self.providers
    }

    pub fn provider(&self, name: &str) -> Option<&ConfigEntry> {
        self.providers.iter().find(|p| p.name() == name)
    }

    /// A top-level section such as `customization_templates`
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.document.get(name)
    }

    /// Resolve a path from the document root
    pub fn get(&self, path: &Path) -> Option<&Value> {
        path.resolve(&self.document)
    }

    /// Whether `path` resolves, e.g. a template name under its section
    pub fn contains(&self, path: &Path) -> bool {
        self.get(path).is_some()
    }

    pub fn document(&self) -> &Value {
        &self.document
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}
