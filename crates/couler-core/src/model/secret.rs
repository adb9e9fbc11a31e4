//! Fuentes de variables de entorno adjuntables a un contenedor.
//!
//! Un `EnvSource` declara su capacidad (`EnvSourceKind`); el compilador de
//! contenedores sólo acepta `Secret` en el campo `secret` y rechaza el resto.
use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvSourceKind {
    Secret,
    ConfigMap,
}

/// Contrato para fuentes de entorno.
pub trait EnvSource: Send + Sync + std::fmt::Debug {
    fn kind(&self) -> EnvSourceKind;

    /// Entradas `env` derivadas, en orden de declaración de las claves.
    fn to_env_list(&self) -> Vec<Value>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secret {
    pub name: String,
    pub namespace: String,
    pub data: IndexMap<String, String>,
}

impl Secret {
    /// Crea un secret con nombre estable derivado del contenido.
    pub fn new(namespace: impl Into<String>, data: IndexMap<String, String>) -> Self {
        Self { name: stable_secret_name(&data),
               namespace: namespace.into(),
               data }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Manifest del recurso `Secret` que el orquestador crea antes del workflow.
    pub fn to_manifest(&self) -> Value {
        json!({
            "apiVersion": "v1",
            "kind": "Secret",
            "metadata": { "name": self.name, "namespace": self.namespace },
            "type": "Opaque",
            "stringData": self.data,
        })
    }
}

/// `couler-` + 12 hex de sha256 sobre los pares clave/valor ordenados por clave.
fn stable_secret_name(data: &IndexMap<String, String>) -> String {
    let sorted: BTreeMap<&String, &String> = data.iter().collect();
    let mut h = Sha256::new();
    for (k, v) in sorted {
        h.update(k.as_bytes());
        h.update([0u8]);
        h.update(v.as_bytes());
        h.update([0u8]);
    }
    let hex: String = h.finalize().iter().map(|b| format!("{b:02x}")).collect();
    format!("couler-{}", &hex[..12])
}

impl EnvSource for Secret {
    fn kind(&self) -> EnvSourceKind {
        EnvSourceKind::Secret
    }

    fn to_env_list(&self) -> Vec<Value> {
        self.data
            .keys()
            .map(|k| json!({ "name": k, "valueFrom": { "secretKeyRef": { "name": self.name, "key": k } } }))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigMapRef {
    pub name: String,
    pub keys: Vec<String>,
}

impl ConfigMapRef {
    pub fn new(name: impl Into<String>, keys: Vec<String>) -> Self {
        Self { name: name.into(), keys }
    }

    /// Entrada para `envFrom`.
    pub fn env_from_entry(&self) -> Value {
        json!({ "configMapRef": { "name": self.name } })
    }
}

impl EnvSource for ConfigMapRef {
    fn kind(&self) -> EnvSourceKind {
        EnvSourceKind::ConfigMap
    }

    fn to_env_list(&self) -> Vec<Value> {
        self.keys
            .iter()
            .map(|k| json!({ "name": k, "valueFrom": { "configMapKeyRef": { "name": self.name, "key": k } } }))
            .collect()
    }
}
