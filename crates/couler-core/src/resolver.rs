//! Resolución de referencias a outputs dentro de los argumentos de un step.
//!
//! `parse_argo_output` convierte un argumento (literal u `Output`) en el valor
//! que se incrusta en el manifest del step consumidor. `extract_step_return`
//! elige un output representativo de un step y lo normaliza a
//! `{template, step, ruta}` para construcciones de captura de variables.
use serde_json::Value;

use crate::constants::MIN_STEP_RETURN_SEGMENTS;
use crate::errors::TemplateError;
use crate::model::{Argument, Output, ParameterDecl};
use crate::outputs::StepOutputs;
use crate::utils::quoted_placeholder;

/// Resultado de resolver un argumento.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Value(Value),
    /// Job: `[id, name, obj]`, siempre en este orden.
    Triple([String; 3]),
    /// Los artifacts se cablean estructuralmente, no por sustitución.
    Artifact(Output),
    Parameter(ParameterDecl),
}

fn parse_single_output(output: &Output, prefix: &str) -> String {
    if output.is_global {
        quoted_placeholder(&output.value())
    } else {
        quoted_placeholder(&format!("{prefix}.{}.{}", output.step_name, output.name))
    }
}

pub fn parse_argo_output(arg: &Argument, prefix: &str) -> Resolved {
    match arg {
        Argument::Output(o) => match o.job_components() {
            Some([id, name, obj]) => Resolved::Triple([parse_single_output(&id, prefix),
                                                       parse_single_output(&name, prefix),
                                                       parse_single_output(&obj, prefix)]),
            None if o.is_artifact() => Resolved::Artifact(o.clone()),
            None => Resolved::Value(Value::from(parse_single_output(o, prefix))),
        },
        // numeros y booleanos entre comillas simples para evitar la coerción de tipos del motor
        Argument::Literal(v @ (Value::Number(_) | Value::Bool(_))) => Resolved::Value(Value::from(format!("'{v}'"))),
        Argument::Literal(v) => Resolved::Value(v.clone()),
        Argument::Parameter(p) => Resolved::Parameter(p.clone()),
    }
}

/// Lo que devuelve un step a una construcción de control de flujo.
#[derive(Debug, Clone, PartialEq)]
pub enum StepValue {
    Outputs(StepOutputs),
    Literal(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepReturn {
    /// `name` = template productor, `id` = step productor.
    Reference { name: String, id: String, output: String },
    Value(Value),
    /// El step no declaró nada representable.
    Empty,
}

/// Prioridad: script, primer parámetro, primer artifact. El handle de job no
/// es representable como retorno.
fn representative(outputs: &StepOutputs) -> Option<&Output> {
    outputs.script
           .as_ref()
           .or_else(|| outputs.parameters.first())
           .or_else(|| outputs.artifacts.first())
}

pub fn extract_step_return(step_output: &StepValue) -> Result<StepReturn, TemplateError> {
    let outputs = match step_output {
        StepValue::Literal(v) => return Ok(StepReturn::Value(v.clone())),
        StepValue::Outputs(outputs) => outputs,
    };
    let Some(output) = representative(outputs) else {
        return Ok(StepReturn::Empty);
    };

    let value = output.value();
    let segments: Vec<&str> = value.split('.').collect();
    if segments.len() < MIN_STEP_RETURN_SEGMENTS {
        return Err(TemplateError::InvalidStepReturn(value));
    }
    Ok(StepReturn::Reference { name: output.template_name.clone(),
                               id: output.step_name.clone(),
                               output: segments[2..].join(".") })
}
