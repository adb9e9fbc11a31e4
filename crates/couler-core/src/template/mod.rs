//! Templates: unidades de trabajo declaradas para el motor de workflows.
//!
//! Un template se construye una vez, se compila a un fragmento de manifest
//! (`Manifest`) y no se muta después. `TemplateBase` contiene los campos
//! comunes y produce el esqueleto; `Container` y `Job` añaden su cuerpo de
//! ejecución. Un `TemplateBase` aislado también es compilable (template
//! genérico).

pub mod container;
pub mod io;
pub mod job;

use indexmap::IndexSet;
use serde_json::{Map, Value};

use crate::config::CompilerConfig;
use crate::errors::TemplateError;
use crate::model::{Cache, RetryStrategy};

pub use container::Container;
pub use io::{Bucket, IoDirection, IoItem, IoItems, TemplateIo};
pub use job::Job;

/// Fragmento de manifest; el orden de inserción es el orden de emisión.
pub type Manifest = Map<String, Value>;

/// Contrato común de los templates compilables.
pub trait Template {
    fn base(&self) -> &TemplateBase;

    fn name(&self) -> &str {
        &self.base().name
    }

    /// Compila el template a su fragmento de manifest.
    fn compile(&self, config: &CompilerConfig) -> Result<Manifest, TemplateError>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateBase {
    /// Único dentro del workflow, no vacío.
    pub name: String,
    pub input: TemplateIo,
    pub output: TemplateIo,
    /// Segundos; se emite como `activeDeadlineSeconds`.
    pub timeout: Option<u64>,
    pub retry: Option<RetryStrategy>,
    pub pool: Option<String>,
    pub cache: Option<Cache>,
    pub daemon: bool,
    pub tolerations: Option<Vec<Value>>,
}

impl TemplateBase {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(),
               ..Default::default() }
    }

    pub fn with_input(mut self, items: impl Into<IoItems>) -> Result<Self, TemplateError> {
        self.input = TemplateIo::classify(items, IoDirection::Input)?;
        Ok(self)
    }

    pub fn with_output(mut self, items: impl Into<IoItems>) -> Result<Self, TemplateError> {
        self.output = TemplateIo::classify(items, IoDirection::Output)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    pub fn with_retry(mut self, retry: RetryStrategy) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn with_pool(mut self, pool: impl Into<String>) -> Self {
        self.pool = Some(pool.into());
        self
    }

    pub fn with_cache(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn daemon(mut self) -> Self {
        self.daemon = true;
        self
    }

    pub fn with_tolerations(mut self, tolerations: Vec<Value>) -> Self {
        self.tolerations = Some(tolerations);
        self
    }

    /// Esqueleto común del manifest. Los campos sin valor se omiten.
    pub fn to_dict(&self) -> Result<Manifest, TemplateError> {
        if self.name.trim().is_empty() {
            return Err(TemplateError::Validation("template name must not be empty".into()));
        }
        let mut template = Manifest::new();
        template.insert("name".into(), Value::from(self.name.clone()));
        if self.daemon {
            template.insert("daemon".into(), Value::Bool(true));
        }
        if let Some(timeout) = self.timeout {
            template.insert("activeDeadlineSeconds".into(), Value::from(timeout));
        }
        if let Some(retry) = &self.retry {
            template.insert("retryStrategy".into(), retry.to_dict()?);
        }
        if let Some(cache) = &self.cache {
            template.insert("memoize".into(), cache.to_dict());
        }
        if let Some(tolerations) = &self.tolerations {
            // copia propia: el manifest nunca comparte la lista del autor
            template.insert("tolerations".into(), Value::Array(tolerations.to_vec()));
        }
        Ok(template)
    }
}

/// Los nombres de `inputs.parameters` no se repiten dentro de un template.
pub(crate) fn ensure_unique_input_parameters(parameters: &[Value]) -> Result<(), TemplateError> {
    let mut seen = IndexSet::new();
    for name in parameters.iter().filter_map(|p| p.get("name").and_then(Value::as_str)) {
        if !seen.insert(name) {
            return Err(TemplateError::DuplicateName { bucket: "input parameters".into(),
                                                      name: name.to_string() });
        }
    }
    Ok(())
}

impl Template for TemplateBase {
    fn base(&self) -> &TemplateBase {
        self
    }

    fn compile(&self, _config: &CompilerConfig) -> Result<Manifest, TemplateError> {
        self.to_dict()
    }
}
