//! Constructores de handles de output a partir de la identidad del productor.
//!
//! El orquestador compila un template y luego pide aquí los `Output` que un
//! step posterior podrá referenciar. Los handles se agrupan en `StepOutputs`.
use serde_json::Value;

use crate::constants::{JOB_ADDRESS_ROOT, JOB_ID_OUTPUT, JOB_NAME_OUTPUT, JOB_OBJ_OUTPUT};
use crate::errors::TemplateError;
use crate::model::Output;

/// Outputs de un step agrupados por tipo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutputs {
    pub script: Option<Output>,
    pub job: Option<Output>,
    pub parameters: Vec<Output>,
    pub artifacts: Vec<Output>,
}

fn declared_name(entry: &Value, bucket: &str) -> Result<String, TemplateError> {
    entry.get("name")
         .and_then(Value::as_str)
         .map(str::to_string)
         .ok_or_else(|| TemplateError::Validation(format!("output {bucket} entry without name: {entry}")))
}

fn entries<'a>(outputs: &'a Value, bucket: &str) -> impl Iterator<Item = &'a Value> {
    outputs.get(bucket).and_then(Value::as_array).into_iter().flatten()
}

/// Handles para el bloque `outputs` compilado de un contenedor. Sin outputs
/// devuelve un único marcador vacío `<template>-empty-output`.
pub fn container_output(step_name: &str, template_name: &str, outputs: Option<&Value>) -> Result<StepOutputs, TemplateError> {
    let Some(outputs) = outputs else {
        return Ok(StepOutputs { parameters: vec![Output::empty(format!("{template_name}-empty-output"),
                                                               step_name,
                                                               template_name)],
                                ..Default::default() });
    };

    let mut bundle = StepOutputs::default();
    for entry in entries(outputs, "parameters") {
        let name = declared_name(entry, "parameters")?;
        let mut out = Output::parameter(name, step_name, template_name);
        if let Some(path) = entry.pointer("/valueFrom/path").and_then(Value::as_str) {
            out = out.with_path(path);
        }
        out.is_global = entry.get("globalName").is_some();
        bundle.parameters.push(out);
    }
    for entry in entries(outputs, "artifacts") {
        let name = declared_name(entry, "artifacts")?;
        let path = entry.get("path").and_then(Value::as_str).unwrap_or_default();
        let mut out = Output::artifact(name, step_name, template_name, path, entry.clone());
        out.is_global = entry.get("globalName").is_some();
        bundle.artifacts.push(out);
    }
    Ok(bundle)
}

/// Handle de un job de recursos: tres direcciones fijas bajo `couler.<step>.<template>`.
pub fn job_output(step_name: &str, template_name: &str) -> StepOutputs {
    let address = |output: &str| format!("{JOB_ADDRESS_ROOT}.{step_name}.{template_name}.outputs.parameters.{output}");
    let job = Output::job(step_name,
                          template_name,
                          address(JOB_NAME_OUTPUT),
                          address(JOB_ID_OUTPUT),
                          address(JOB_OBJ_OUTPUT));
    StepOutputs { job: Some(job),
                  ..Default::default() }
}

pub fn script_output(step_name: &str, template_name: &str) -> StepOutputs {
    StepOutputs { script: Some(Output::script(step_name, template_name)),
                  ..Default::default() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OutputKind;
    use serde_json::json;

    #[test]
    fn missing_outputs_yield_empty_marker() {
        let b = container_output("s", "t", None).unwrap();
        assert_eq!(b.parameters.len(), 1);
        assert_eq!(b.parameters[0].name, "t-empty-output");
        assert_eq!(b.parameters[0].kind, OutputKind::Empty);
    }

    #[test]
    fn global_name_marks_output_global() {
        let outputs = json!({
            "parameters": [{"name": "p", "valueFrom": {"path": "/tmp/p"}, "globalName": "p"}],
            "artifacts": [{"name": "a", "path": "/tmp/a"}],
        });
        let b = container_output("s", "t", Some(&outputs)).unwrap();
        assert!(b.parameters[0].is_global);
        assert_eq!(b.parameters[0].path(), Some("/tmp/p"));
        assert!(!b.artifacts[0].is_global);
        assert_eq!(b.artifacts[0].kind,
                   OutputKind::Artifact { path: "/tmp/a".into(),
                                          artifact: json!({"name": "a", "path": "/tmp/a"}) });
    }

    #[test]
    fn nameless_entries_are_rejected() {
        let outputs = json!({"parameters": [{"valueFrom": {"path": "/x"}}]});
        assert!(container_output("s", "t", Some(&outputs)).is_err());
    }

    #[test]
    fn job_addresses_follow_fixed_layout() {
        let job = job_output("s", "t").job.unwrap();
        assert_eq!(job.value(), "couler.s.t.outputs.parameters.job-name");
    }
}
