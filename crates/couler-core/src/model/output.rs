//! Handles de output: referencias tipadas a valores producidos por un step.
//!
//! Un `Output` es un valor independiente del template que lo produjo: sólo
//! guarda la identidad (step, template, nombre) como strings, nunca un puntero
//! al productor. Las variantes se distinguen por `OutputKind` y comparten una
//! única función de direccionamiento:
//! - forma *valor* (`value`): ruta con puntos, `<step>.<template>.outputs.<type>.<name>`
//!   o `workflow.outputs.<type>.<name>` si es global.
//! - forma *placeholder* (`placeholder`): la dirección envuelta en `{{...}}` para
//!   interpolarla dentro de otro campo.
use serde_json::{Map, Value};

use crate::constants::WORKFLOW_SCOPE;
use crate::utils::quoted_placeholder;

#[derive(Debug, Clone, PartialEq)]
pub enum OutputKind {
    /// Marcador de "sin outputs declarados".
    Empty,
    Parameter { path: String },
    /// `artifact` es la declaración original del artifact en el manifest productor.
    Artifact { path: String, artifact: Value },
    /// Resultado (stdout) de un script.
    Script,
    /// Resultado de un job de recursos: tres direcciones fijas.
    Job { job_name: String, job_id: String, job_obj: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub name: String,
    pub step_name: String,
    pub template_name: String,
    pub is_global: bool,
    pub kind: OutputKind,
}

impl Output {
    fn new(name: impl Into<String>, step_name: impl Into<String>, template_name: impl Into<String>, kind: OutputKind) -> Self {
        Self { name: name.into(),
               step_name: step_name.into(),
               template_name: template_name.into(),
               is_global: false,
               kind }
    }

    pub fn empty(name: impl Into<String>, step_name: impl Into<String>, template_name: impl Into<String>) -> Self {
        Self::new(name, step_name, template_name, OutputKind::Empty)
    }

    pub fn parameter(name: impl Into<String>, step_name: impl Into<String>, template_name: impl Into<String>) -> Self {
        Self::new(name, step_name, template_name, OutputKind::Parameter { path: String::new() })
    }

    pub fn artifact(name: impl Into<String>,
                    step_name: impl Into<String>,
                    template_name: impl Into<String>,
                    path: impl Into<String>,
                    artifact: Value)
                    -> Self {
        Self::new(name, step_name, template_name, OutputKind::Artifact { path: path.into(), artifact })
    }

    pub fn script(step_name: impl Into<String>, template_name: impl Into<String>) -> Self {
        Self::new("result", step_name, template_name, OutputKind::Script)
    }

    pub fn job(step_name: impl Into<String>,
               template_name: impl Into<String>,
               job_name: impl Into<String>,
               job_id: impl Into<String>,
               job_obj: impl Into<String>)
               -> Self {
        Self::new("job",
                  step_name,
                  template_name,
                  OutputKind::Job { job_name: job_name.into(),
                                    job_id: job_id.into(),
                                    job_obj: job_obj.into() })
    }

    /// Marca el output como global al workflow.
    pub fn global(mut self) -> Self {
        self.is_global = true;
        self
    }

    /// Ruta de origen para parámetros y artifacts; no-op para el resto.
    pub fn with_path(mut self, new_path: impl Into<String>) -> Self {
        match &mut self.kind {
            OutputKind::Parameter { path } | OutputKind::Artifact { path, .. } => *path = new_path.into(),
            _ => {}
        }
        self
    }

    pub fn is_artifact(&self) -> bool {
        matches!(self.kind, OutputKind::Artifact { .. })
    }

    pub fn is_job(&self) -> bool {
        matches!(self.kind, OutputKind::Job { .. })
    }

    pub fn is_parameter(&self) -> bool {
        matches!(self.kind, OutputKind::Parameter { .. })
    }

    pub fn path(&self) -> Option<&str> {
        match &self.kind {
            OutputKind::Parameter { path } | OutputKind::Artifact { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Segmento de tipo en la dirección; `None` para scripts.
    pub fn type_segment(&self) -> Option<&'static str> {
        match self.kind {
            OutputKind::Artifact { .. } => Some("artifacts"),
            OutputKind::Script => None,
            OutputKind::Empty | OutputKind::Parameter { .. } | OutputKind::Job { .. } => Some("parameters"),
        }
    }

    /// Forma valor (ruta con puntos). Para jobs es `job_name` tal cual.
    pub fn value(&self) -> String {
        match (&self.kind, self.type_segment()) {
            (OutputKind::Job { job_name, .. }, _) => job_name.clone(),
            (_, None) => format!("{}.{}.outputs.result", self.step_name, self.template_name),
            (_, Some(ty)) if self.is_global => format!("{WORKFLOW_SCOPE}.outputs.{ty}.{}", self.name),
            (_, Some(ty)) => format!("{}.{}.outputs.{ty}.{}", self.step_name, self.template_name, self.name),
        }
    }

    /// Forma placeholder bajo el scope `prefix`. Un job nunca tiene un único
    /// placeholder: devuelve su dirección (`job_name`).
    pub fn placeholder(&self, prefix: &str) -> String {
        match (&self.kind, self.type_segment()) {
            (OutputKind::Job { job_name, .. }, _) => job_name.clone(),
            (_, None) => quoted_placeholder(&format!("{prefix}.{}.outputs.result", self.step_name)),
            (_, Some(ty)) if self.is_global => {
                quoted_placeholder(&format!("{WORKFLOW_SCOPE}.outputs.{ty}.{}.{}", self.step_name, self.name))
            }
            (_, Some(ty)) => quoted_placeholder(&format!("{prefix}.{}.outputs.{ty}.{}", self.step_name, self.name)),
        }
    }

    /// Componentes de un job en el orden fijo `[id, name, obj]`, cada uno como
    /// parámetro con el mismo alcance (global/local) que el handle original.
    pub fn job_components(&self) -> Option<[Output; 3]> {
        let OutputKind::Job { job_name, job_id, job_obj } = &self.kind else {
            return None;
        };
        let component = |address: &str| {
            let name = address.rsplit('.').next().unwrap_or(address);
            let mut out = Output::parameter(name, self.step_name.clone(), self.template_name.clone());
            out.is_global = self.is_global;
            out
        };
        Some([component(job_id), component(job_name), component(job_obj)])
    }

    /// Declaración del output en el template productor.
    pub fn to_yaml(&self) -> Value {
        let mut yml = Map::new();
        yml.insert("name".into(), Value::from(self.name.clone()));
        match &self.kind {
            OutputKind::Parameter { path } => {
                let mut value_from = Map::new();
                value_from.insert("path".into(), Value::from(path.clone()));
                yml.insert("valueFrom".into(), Value::Object(value_from));
            }
            OutputKind::Artifact { path, .. } => {
                yml.insert("path".into(), Value::from(path.clone()));
            }
            _ => {}
        }
        if self.is_global {
            yml.insert("globalName".into(), Value::from(self.name.clone()));
        }
        Value::Object(yml)
    }
}
