use crate::path::Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Broad family a provider belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderClass {
    Infra,
    Cloud,
    Container,
    Physical,
    Other,
}

impl fmt::Display for ProviderClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderClass::Infra => write!(f, "infra"),
            ProviderClass::Cloud => write!(f, "cloud"),
            ProviderClass::Container => write!(f, "container"),
            ProviderClass::Physical => write!(f, "physical"),
            ProviderClass::Other => write!(f, "other"),
        }
    }
}

impl FromStr for ProviderClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "infra" => Ok(ProviderClass::Infra),
            "cloud" => Ok(ProviderClass::Cloud),
            "container" => Ok(ProviderClass::Container),
            "physical" => Ok(ProviderClass::Physical),
            "other" => Ok(ProviderClass::Other),
            _ => Err(format!("Unknown provider class: {}", s)),
        }
    }
}

/// One provider's test configuration.
///
/// The data is read-only once the entry is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    name: String,
    data: Value,
}

impl ConfigEntry {
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Provider key, also used as the matrix id
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn get(&self, path: &Path) -> Option<&Value> {
        path.resolve(&self.data)
    }

    /// The `type` field, e.g. `virtualcenter` or `rhevm`
    pub fn provider_type(&self) -> Option<&str> {
        self.data.get("type").and_then(Value::as_str)
    }

    /// The `version` field rendered as a string (YAML often reads `6.5` as a number)
    pub fn version(&self) -> Option<String> {
        match self.data.get("version")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// The `class` field. Unknown classes map to [`ProviderClass::Other`].
    pub fn class(&self) -> Option<ProviderClass> {
        self.data
            .get("class")
            .and_then(Value::as_str)
            .map(|c| c.parse().unwrap_or(ProviderClass::Other))
    }
}

impl fmt::Display for ConfigEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
