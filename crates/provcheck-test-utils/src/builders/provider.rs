//! Builder for single provider entries.

use provcheck_matrix::{ConfigEntry, Path, ProviderClass};
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct ProviderBuilder {
    name: String,
    data: Map<String, Value>,
}

impl ProviderBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Map::new(),
        }
    }

    /// An infra provider of the given type and version
    pub fn infra(name: impl Into<String>, provider_type: &str, version: &str) -> Self {
        Self::new(name)
            .provider_type(provider_type)
            .class(ProviderClass::Infra)
            .version(version)
    }

    pub fn provider_type(self, provider_type: &str) -> Self {
        self.set(["type"], provider_type)
    }

    pub fn class(self, class: ProviderClass) -> Self {
        self.set(["class"], class.to_string())
    }

    pub fn version(self, version: &str) -> Self {
        self.set(["version"], version)
    }

    /// Set a field under the `provisioning` block
    pub fn provisioning(self, field: &str, value: impl Into<Value>) -> Self {
        self.set(["provisioning", field], value)
    }

    /// Every field ISO provisioning needs, with plausible values
    pub fn iso_ready(self, kickstart: &str) -> Self {
        self.set(["iso_datastore"], true)
            .provisioning("host", "esx-01.example.com")
            .provisioning("datastore", "iso-ds")
            .provisioning("iso_template", "rhel7-iso")
            .provisioning("iso_file", "rhel-7.iso")
            .provisioning("iso_kickstart", kickstart)
            .provisioning("iso_root_password", "secret")
            .provisioning("iso_image_type", "RHEL-7")
            .provisioning("vlan", "VM Network")
    }

    /// Set `value` at `path`, creating intermediate mappings.
    ///
    /// A non-mapping value on the way is replaced by a mapping.
    pub fn set(mut self, path: impl Into<Path>, value: impl Into<Value>) -> Self {
        let path = path.into();
        let Some((last, parents)) = path.segments().split_last() else {
            return self;
        };

        let mut current = &mut self.data;
        for segment in parents {
            let slot = current
                .entry(segment.as_str().to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = match slot {
                Value::Object(map) => map,
                _ => unreachable!("slot was just made a mapping"),
            };
        }
        current.insert(last.as_str().to_string(), value.into());
        self
    }

    pub fn data(&self) -> Value {
        Value::Object(self.data.clone())
    }

    pub fn build(self) -> ConfigEntry {
        ConfigEntry::new(self.name, Value::Object(self.data))
    }
}
