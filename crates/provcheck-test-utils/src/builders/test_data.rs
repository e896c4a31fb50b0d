//! Builder for whole test-data documents.

use crate::builders::ProviderBuilder;
use provcheck_matrix::{ConfigEntry, DataError, TestData};
use serde_json::Value;
use serde_yaml::Mapping;

/// Assembles a test-data document with providers in insertion order
#[derive(Debug, Clone, Default)]
pub struct TestDataBuilder {
    providers: Vec<ConfigEntry>,
    sections: Vec<(String, Value)>,
}

impl TestDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(mut self, provider: ProviderBuilder) -> Self {
        self.providers.push(provider.build());
        self
    }

    pub fn entry(mut self, entry: ConfigEntry) -> Self {
        self.providers.push(entry);
        self
    }

    /// Add a top-level section such as `customization_templates`
    pub fn section(mut self, name: impl Into<String>, value: Value) -> Self {
        self.sections.push((name.into(), value));
        self
    }

    /// Declare a customization template by name
    pub fn customization_template(mut self, name: &str, template_type: &str) -> Self {
        let index = match self
            .sections
            .iter()
            .position(|(section, _)| section == "customization_templates")
        {
            Some(index) => index,
            None => {
                self.sections
                    .push(("customization_templates".to_string(), Value::Object(Default::default())));
                self.sections.len() - 1
            }
        };
        if let Value::Object(map) = &mut self.sections[index].1 {
            map.insert(
                name.to_string(),
                serde_json::json!({ "type": template_type }),
            );
        }
        self
    }

    /// Render the document as YAML
    pub fn to_yaml(&self) -> Result<String, DataError> {
        let mut providers = Mapping::new();
        for entry in &self.providers {
            providers.insert(
                entry.name().into(),
                serde_yaml::to_value(entry.data())?,
            );
        }

        let mut document = Mapping::new();
        document.insert("providers".into(), serde_yaml::Value::Mapping(providers));
        for (name, value) in &self.sections {
            document.insert(name.as_str().into(), serde_yaml::to_value(value)?);
        }
        Ok(serde_yaml::to_string(&document)?)
    }

    /// Render and load the document, as a test would from a file
    pub fn build(&self) -> Result<TestData, DataError> {
        TestData::from_yaml_str(&self.to_yaml()?)
    }
}
