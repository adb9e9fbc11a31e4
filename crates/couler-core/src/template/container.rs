//! Template de ejecución en contenedor.
//!
//! Los argumentos posicionales se convierten en parámetros de entrada
//! implícitos con nombres deterministas (`input_parameter_name(template, i)`).
//! El índice `i` sólo avanza con los argumentos que sintetizan parámetros:
//! - output artifact: se omite (se cablea como artifact);
//! - output de job: tres slots (`i`, `i+1`, `i+2`);
//! - parámetro explícito: se pasa tal cual, sin consumir slot;
//! - cualquier otro valor: un slot.
use indexmap::IndexMap;
use log::debug;
use serde_json::{Map, Value};

use super::{ensure_unique_input_parameters, Manifest, Template, TemplateBase};
use crate::config::CompilerConfig;
use crate::constants::OVERWRITE_GPU_ENVS;
use crate::errors::TemplateError;
use crate::model::{Argument, EnvSource, EnvSourceKind, ImagePullPolicy, OutputKind, ParameterDecl, VolumeMount};
use crate::template::io::IoItem;
use crate::utils::{convert_map_to_env_list, gpu_requested, input_parameter_name, quoted_placeholder, StringList};

/// Parámetros que aporta un argumento posicional.
enum ArgSlot<'a> {
    Skipped,
    Implicit(Vec<String>),
    Explicit(&'a ParameterDecl),
}

#[derive(Debug)]
pub struct Container {
    pub base: TemplateBase,
    pub image: String,
    pub command: Vec<String>,
    pub args: Vec<Argument>,
    pub env: Option<IndexMap<String, Value>>,
    pub env_from: Option<Vec<Value>>,
    pub secret: Option<Box<dyn EnvSource>>,
    pub resources: Option<IndexMap<String, Value>>,
    pub image_pull_policy: Option<ImagePullPolicy>,
    pub volume_mounts: Option<Vec<VolumeMount>>,
    pub working_dir: Option<String>,
    pub node_selector: Option<IndexMap<String, String>>,
}

impl Container {
    pub fn new(base: TemplateBase, image: impl Into<String>) -> Self {
        Self { base,
               image: image.into(),
               command: Vec::new(),
               args: Vec::new(),
               env: None,
               env_from: None,
               secret: None,
               resources: None,
               image_pull_policy: None,
               volume_mounts: None,
               working_dir: None,
               node_selector: None }
    }

    pub fn command(mut self, command: impl Into<StringList>) -> Self {
        self.command = command.into().into_vec();
        self
    }

    pub fn args(mut self, args: Vec<Argument>) -> Self {
        self.args = args;
        self
    }

    pub fn arg(mut self, arg: impl Into<Argument>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.env.get_or_insert_with(IndexMap::new).insert(key.into(), value.into());
        self
    }

    pub fn env_from(mut self, source: Value) -> Self {
        self.env_from.get_or_insert_with(Vec::new).push(source);
        self
    }

    pub fn secret(mut self, secret: impl EnvSource + 'static) -> Self {
        self.secret = Some(Box::new(secret));
        self
    }

    pub fn resources(mut self, resources: IndexMap<String, Value>) -> Self {
        self.resources = Some(resources);
        self
    }

    pub fn resource(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.resources.get_or_insert_with(IndexMap::new).insert(key.into(), value.into());
        self
    }

    pub fn image_pull_policy(mut self, policy: ImagePullPolicy) -> Self {
        self.image_pull_policy = Some(policy);
        self
    }

    pub fn volume_mount(mut self, mount: VolumeMount) -> Self {
        self.volume_mounts.get_or_insert_with(Vec::new).push(mount);
        self
    }

    pub fn working_dir(mut self, dir: impl Into<String>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn node_selector(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.node_selector.get_or_insert_with(IndexMap::new).insert(key.into(), value.into());
        self
    }

    pub fn get_volume_mounts(&self) -> &[VolumeMount] {
        self.volume_mounts.as_deref().unwrap_or_default()
    }

    fn validate(&self) -> Result<(), TemplateError> {
        if let Some(secret) = &self.secret {
            if secret.kind() != EnvSourceKind::Secret {
                return Err(TemplateError::Validation(format!("parameter secret should be a Secret, got {:?}",
                                                             secret.kind())));
            }
        }
        Ok(())
    }

    fn arg_slots(&self) -> Vec<ArgSlot<'_>> {
        let mut i = 0;
        let mut slots = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            let slot = match arg {
                Argument::Output(o) if o.is_artifact() => ArgSlot::Skipped,
                Argument::Output(o) if o.is_job() => {
                    let names = (i..i + 3).map(|k| input_parameter_name(&self.base.name, k)).collect();
                    i += 3;
                    ArgSlot::Implicit(names)
                }
                Argument::Parameter(decl) => ArgSlot::Explicit(decl),
                _ => {
                    let name = input_parameter_name(&self.base.name, i);
                    i += 1;
                    ArgSlot::Implicit(vec![name])
                }
            };
            slots.push(slot);
        }
        slots
    }

    /// `inputs.parameters`, en orden de argumentos.
    pub fn input_parameters(&self) -> Vec<Value> {
        let mut parameters = Vec::new();
        for slot in self.arg_slots() {
            match slot {
                ArgSlot::Skipped => {}
                ArgSlot::Implicit(names) => {
                    for name in names {
                        let mut p = Map::new();
                        p.insert("name".into(), Value::from(name));
                        parameters.push(Value::Object(p));
                    }
                }
                ArgSlot::Explicit(decl) => parameters.push(decl.to_dict()),
            }
        }
        parameters
    }

    /// `inputs.artifacts`: outputs artifact de steps previos, sin repetir nombres.
    pub fn input_artifacts(&self) -> Vec<Value> {
        let mut artifacts: Vec<Value> = Vec::new();
        for item in &self.base.input.artifacts {
            let IoItem::Output(o) = item else {
                continue;
            };
            let OutputKind::Artifact { artifact, .. } = &o.kind else {
                continue;
            };
            let declared = match artifact {
                Value::Object(_) => artifact.clone(),
                _ => o.to_yaml(),
            };
            let name = declared.get("name").and_then(Value::as_str).unwrap_or(&o.name);
            if artifacts.iter().any(|x| x.get("name").and_then(Value::as_str) == Some(name)) {
                debug!("template {}: dropping duplicate input artifact '{}'", self.base.name, name);
                continue;
            }
            artifacts.push(declared);
        }
        artifacts
    }

    /// Args del contenedor como placeholders de `inputs.parameters`.
    fn args_as_placeholders(&self) -> Vec<Value> {
        let mut out: Vec<String> = Vec::new();
        let mut push = |name: &str| {
            let placeholder = quoted_placeholder(&format!("inputs.parameters.{name}"));
            if !out.contains(&placeholder) {
                out.push(placeholder);
            }
        };
        for slot in self.arg_slots() {
            match slot {
                ArgSlot::Skipped => {}
                ArgSlot::Implicit(names) => names.iter().for_each(|n| push(n.as_str())),
                ArgSlot::Explicit(decl) => push(decl.name()),
            }
        }
        out.into_iter().map(Value::from).collect()
    }

    /// Cuerpo `container` del manifest.
    pub fn container_dict(&self, config: &CompilerConfig) -> Result<Manifest, TemplateError> {
        self.validate()?;
        let mut container = Manifest::new();
        container.insert("image".into(), Value::from(self.image.clone()));
        container.insert("command".into(), Value::from(self.command.clone()));
        if !self.args.is_empty() {
            container.insert("args".into(), Value::Array(self.args_as_placeholders()));
        }

        let mut env = self.env.clone();
        if !gpu_requested(self.resources.as_ref()) && config.overwrite_gpu_envs {
            debug!("template {}: overriding GPU envs", self.base.name);
            let env = env.get_or_insert_with(IndexMap::new);
            for (k, v) in OVERWRITE_GPU_ENVS {
                env.insert(k.to_string(), Value::from(v));
            }
        }
        if let Some(env) = env.as_ref().filter(|e| !e.is_empty()) {
            container.insert("env".into(), Value::Array(convert_map_to_env_list(env)));
        }
        if let Some(secret) = &self.secret {
            let entries = secret.to_env_list();
            match container.get_mut("env") {
                Some(Value::Array(list)) => list.extend(entries),
                _ => {
                    container.insert("env".into(), Value::Array(entries));
                }
            }
        }
        if let Some(env_from) = &self.env_from {
            container.insert("envFrom".into(), Value::Array(env_from.clone()));
        }
        if let Some(resources) = &self.resources {
            // requests y limits son mapas independientes construidos desde la misma fuente
            let requests: Map<String, Value> = resources.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            let limits: Map<String, Value> = resources.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            let mut body = Map::new();
            body.insert("requests".into(), Value::Object(requests));
            body.insert("limits".into(), Value::Object(limits));
            container.insert("resources".into(), Value::Object(body));
        }
        if let Some(policy) = self.image_pull_policy {
            container.insert("imagePullPolicy".into(), Value::from(policy.as_str()));
        }
        if let Some(mounts) = &self.volume_mounts {
            let mounts = mounts.iter().map(serde_json::to_value).collect::<Result<Vec<_>, _>>()?;
            container.insert("volumeMounts".into(), Value::Array(mounts));
        }
        if let Some(dir) = &self.working_dir {
            container.insert("workingDir".into(), Value::from(dir.clone()));
        }
        Ok(container)
    }
}

impl Template for Container {
    fn base(&self) -> &TemplateBase {
        &self.base
    }

    fn compile(&self, config: &CompilerConfig) -> Result<Manifest, TemplateError> {
        self.validate()?;
        let mut template = self.base.to_dict()?;

        let parameters = self.input_parameters();
        ensure_unique_input_parameters(&parameters)?;
        let artifacts = self.input_artifacts();
        debug!("compiling container {}: {} input parameters, {} input artifacts",
               self.base.name,
               parameters.len(),
               artifacts.len());
        let mut inputs = Map::new();
        if !parameters.is_empty() {
            inputs.insert("parameters".into(), Value::Array(parameters));
        }
        if !artifacts.is_empty() {
            inputs.insert("artifacts".into(), Value::Array(artifacts));
        }
        if !inputs.is_empty() {
            template.insert("inputs".into(), Value::Object(inputs));
        }

        if let Some(selector) = &self.node_selector {
            let selector: Map<String, Value> = selector.iter().map(|(k, v)| (k.clone(), Value::from(v.clone()))).collect();
            template.insert("nodeSelector".into(), Value::Object(selector));
        }

        template.insert("container".into(), Value::Object(self.container_dict(config)?));

        let output = &self.base.output;
        if !output.is_empty() {
            let mut outputs = Map::new();
            if !output.artifacts.is_empty() {
                outputs.insert("artifacts".into(), Value::Array(output.artifacts.iter().map(IoItem::to_yaml).collect()));
            }
            if !output.parameters.is_empty() {
                outputs.insert("parameters".into(),
                               Value::Array(output.parameters.iter().map(IoItem::to_yaml).collect()));
            }
            template.insert("outputs".into(), Value::Object(outputs));
        }
        Ok(template)
    }
}
