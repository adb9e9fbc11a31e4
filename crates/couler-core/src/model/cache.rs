//! Descriptor de memoización de un template.
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cache {
    /// ConfigMap que respalda la cache.
    pub name: String,
    pub key: String,
    pub max_age: String,
}

impl Cache {
    pub fn new(name: impl Into<String>, key: impl Into<String>, max_age: impl Into<String>) -> Self {
        Self { name: name.into(),
               key: key.into(),
               max_age: max_age.into() }
    }

    pub fn to_dict(&self) -> Value {
        json!({
            "key": self.key,
            "maxAge": self.max_age,
            "cache": { "configMap": { "name": self.name } },
        })
    }
}
