//! Utilidades compartidas por los compiladores de templates.

use indexmap::IndexMap;
use serde_json::{json, Value};

use crate::constants::INPUT_PARAMETER_PREFIX;

/// Valor escalar o secuencia normalizado siempre a secuencia.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringList(pub Vec<String>);

impl StringList {
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for StringList {
    fn from(s: &str) -> Self {
        StringList(vec![s.to_string()])
    }
}

impl From<String> for StringList {
    fn from(s: String) -> Self {
        StringList(vec![s])
    }
}

impl From<Vec<String>> for StringList {
    fn from(v: Vec<String>) -> Self {
        StringList(v)
    }
}

impl From<Vec<&str>> for StringList {
    fn from(v: Vec<&str>) -> Self {
        StringList(v.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for StringList {
    fn from(v: [&str; N]) -> Self {
        StringList(v.iter().map(|s| s.to_string()).collect())
    }
}

/// Nombre determinista del parámetro implícito `index` de un template.
pub fn input_parameter_name(template_name: &str, index: usize) -> String {
    format!("{INPUT_PARAMETER_PREFIX}-{template_name}-{index}")
}

/// Envuelve una expresión en la sintaxis de placeholder del motor, con comillas
/// incluidas en el valor.
pub fn quoted_placeholder(expr: &str) -> String {
    format!("\"{{{{{expr}}}}}\"")
}

pub fn bool_to_str(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// `true` si el mapa de recursos pide alguna GPU (`gpu` o `<vendor>/gpu`).
pub fn gpu_requested(resources: Option<&IndexMap<String, Value>>) -> bool {
    resources.map(|r| r.keys().any(|k| k == "gpu" || k.ends_with("/gpu"))).unwrap_or(false)
}

/// Texto de un valor de entorno: strings verbatim, el resto en JSON.
pub fn env_value_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Aplana un mapa ordenado a la lista `[{name, value}]` del contenedor.
pub fn convert_map_to_env_list(env: &IndexMap<String, Value>) -> Vec<Value> {
    env.iter().map(|(k, v)| json!({ "name": k, "value": env_value_string(v) })).collect()
}
