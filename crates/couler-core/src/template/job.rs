//! Template de acción sobre un recurso del cluster.
//!
//! Independientemente del recurso envuelto, un job siempre declara los tres
//! outputs fijos `job-name`, `job-id` y `job-obj`. Las condiciones de éxito y
//! fallo son predicados opacos que evalúa el motor externo.
use log::debug;
use serde_json::{Map, Value};

use super::{ensure_unique_input_parameters, Manifest, Template, TemplateBase};
use crate::config::CompilerConfig;
use crate::constants::JOB_OUTPUT_SELECTORS;
use crate::errors::TemplateError;
use crate::model::ParameterDecl;
use crate::utils::bool_to_str;

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub base: TemplateBase,
    pub args: Vec<ParameterDecl>,
    /// create / apply / delete / patch (opaco).
    pub action: String,
    /// Cuerpo del recurso, opaco para el compilador.
    pub manifest: Value,
    pub set_owner_reference: bool,
    pub success_condition: Option<String>,
    pub failure_condition: Option<String>,
}

impl Job {
    pub fn new(base: TemplateBase, action: impl Into<String>, manifest: impl Into<Value>) -> Self {
        Self { base,
               args: Vec::new(),
               action: action.into(),
               manifest: manifest.into(),
               set_owner_reference: false,
               success_condition: None,
               failure_condition: None }
    }

    pub fn args(mut self, args: Vec<ParameterDecl>) -> Self {
        self.args = args;
        self
    }

    pub fn set_owner_reference(mut self, enabled: bool) -> Self {
        self.set_owner_reference = enabled;
        self
    }

    pub fn success_condition(mut self, condition: impl Into<String>) -> Self {
        self.success_condition = Some(condition.into());
        self
    }

    pub fn failure_condition(mut self, condition: impl Into<String>) -> Self {
        self.failure_condition = Some(condition.into());
        self
    }

    pub fn resource_dict(&self) -> Manifest {
        let mut resource = Manifest::new();
        resource.insert("action".into(), Value::from(self.action.clone()));
        resource.insert("setOwnerReference".into(), Value::from(bool_to_str(self.set_owner_reference)));
        resource.insert("manifest".into(), self.manifest.clone());
        if let Some(cond) = self.success_condition.as_ref().filter(|c| !c.is_empty()) {
            resource.insert("successCondition".into(), Value::from(cond.clone()));
        }
        if let Some(cond) = self.failure_condition.as_ref().filter(|c| !c.is_empty()) {
            resource.insert("failureCondition".into(), Value::from(cond.clone()));
        }
        resource
    }
}

/// Declaraciones fijas de outputs de un job, en orden `job-name`, `job-id`, `job-obj`.
pub fn job_output_declarations() -> Vec<Value> {
    JOB_OUTPUT_SELECTORS.iter()
                        .map(|(name, selector, expr)| {
                            let mut value_from = Map::new();
                            value_from.insert((*selector).into(), Value::from(*expr));
                            let mut decl = Map::new();
                            decl.insert("name".into(), Value::from(*name));
                            decl.insert("valueFrom".into(), Value::Object(value_from));
                            Value::Object(decl)
                        })
                        .collect()
}

impl Template for Job {
    fn base(&self) -> &TemplateBase {
        &self.base
    }

    fn compile(&self, _config: &CompilerConfig) -> Result<Manifest, TemplateError> {
        let mut template = self.base.to_dict()?;
        debug!("compiling job {}: action={}", self.base.name, self.action);
        if !self.args.is_empty() {
            let parameters: Vec<Value> = self.args.iter().map(ParameterDecl::to_dict).collect();
            ensure_unique_input_parameters(&parameters)?;
            let mut inputs = Map::new();
            inputs.insert("parameters".into(), Value::Array(parameters));
            template.insert("inputs".into(), Value::Object(inputs));
        }
        template.insert("resource".into(), Value::Object(self.resource_dict()));

        let mut outputs = Map::new();
        outputs.insert("parameters".into(), Value::Array(job_output_declarations()));
        template.insert("outputs".into(), Value::Object(outputs));
        Ok(template)
    }
}
