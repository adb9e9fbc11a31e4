//! Artifacts declarados por el autor del workflow.
//!
//! - `ArtifactRef`: referencia genérica (nombre + ruta) sin almacenamiento.
//! - `TypedArtifact`: artifact con backend de almacenamiento concreto.
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    pub name: String,
    pub path: String,
    pub is_global: bool,
}

impl ArtifactRef {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self { name: name.into(),
               path: path.into(),
               is_global: false }
    }

    pub fn to_yaml(&self) -> Value {
        let mut yml = Map::new();
        yml.insert("name".into(), Value::from(self.name.clone()));
        yml.insert("path".into(), Value::from(self.path.clone()));
        if self.is_global {
            yml.insert("globalName".into(), Value::from(self.name.clone()));
        }
        Value::Object(yml)
    }
}

/// Backends de almacenamiento soportados por el motor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactStore {
    S3 { bucket: String, key: String, endpoint: Option<String> },
    Oss { bucket: String, key: String, endpoint: Option<String> },
    Git { repo: String, revision: Option<String> },
    Http { url: String },
}

impl ArtifactStore {
    /// Clave del backend dentro de la declaración del artifact.
    pub fn key(&self) -> &'static str {
        match self {
            ArtifactStore::S3 { .. } => "s3",
            ArtifactStore::Oss { .. } => "oss",
            ArtifactStore::Git { .. } => "git",
            ArtifactStore::Http { .. } => "http",
        }
    }

    pub fn to_yaml(&self) -> Value {
        match self {
            ArtifactStore::S3 { bucket, key, endpoint } | ArtifactStore::Oss { bucket, key, endpoint } => {
                let mut body = Map::new();
                if let Some(ep) = endpoint {
                    body.insert("endpoint".into(), Value::from(ep.clone()));
                }
                body.insert("bucket".into(), Value::from(bucket.clone()));
                body.insert("key".into(), Value::from(key.clone()));
                Value::Object(body)
            }
            ArtifactStore::Git { repo, revision } => match revision {
                Some(rev) => json!({ "repo": repo, "revision": rev }),
                None => json!({ "repo": repo }),
            },
            ArtifactStore::Http { url } => json!({ "url": url }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedArtifact {
    pub name: String,
    pub path: String,
    pub store: ArtifactStore,
    pub is_global: bool,
}

impl TypedArtifact {
    pub fn new(name: impl Into<String>, path: impl Into<String>, store: ArtifactStore) -> Self {
        Self { name: name.into(),
               path: path.into(),
               store,
               is_global: false }
    }

    pub fn global(mut self) -> Self {
        self.is_global = true;
        self
    }

    pub fn to_yaml(&self) -> Value {
        let mut yml = Map::new();
        yml.insert("name".into(), Value::from(self.name.clone()));
        yml.insert("path".into(), Value::from(self.path.clone()));
        yml.insert(self.store.key().into(), self.store.to_yaml());
        if self.is_global {
            yml.insert("globalName".into(), Value::from(self.name.clone()));
        }
        Value::Object(yml)
    }
}
