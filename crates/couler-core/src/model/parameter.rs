//! Parámetros explícitos y argumentos posicionales de un step.
use serde_json::{Map, Value};

use super::Output;

/// Parámetro de entrada declarado por nombre (con default opcional).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputParameter {
    pub name: String,
    pub default: Option<String>,
}

impl InputParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), default: None }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Parámetro con valor fijo pasado como argumento.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentsParameter {
    pub name: String,
    pub value: String,
}

impl ArgumentsParameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(),
               value: value.into() }
    }
}

/// Declaración de parámetro con nombre explícito; no consume slot implícito.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterDecl {
    Input(InputParameter),
    Arguments(ArgumentsParameter),
}

impl ParameterDecl {
    pub fn name(&self) -> &str {
        match self {
            ParameterDecl::Input(p) => &p.name,
            ParameterDecl::Arguments(p) => &p.name,
        }
    }

    pub fn to_dict(&self) -> Value {
        let mut dict = Map::new();
        dict.insert("name".into(), Value::from(self.name()));
        match self {
            ParameterDecl::Input(InputParameter { default: Some(d), .. }) => {
                dict.insert("default".into(), Value::from(d.clone()));
            }
            ParameterDecl::Arguments(p) => {
                dict.insert("value".into(), Value::from(p.value.clone()));
            }
            ParameterDecl::Input(_) => {}
        }
        Value::Object(dict)
    }
}

impl From<InputParameter> for ParameterDecl {
    fn from(p: InputParameter) -> Self {
        ParameterDecl::Input(p)
    }
}

impl From<ArgumentsParameter> for ParameterDecl {
    fn from(p: ArgumentsParameter) -> Self {
        ParameterDecl::Arguments(p)
    }
}

/// Argumento posicional: literal, parámetro con nombre o referencia a output.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Literal(Value),
    Parameter(ParameterDecl),
    Output(Output),
}

impl From<Value> for Argument {
    fn from(v: Value) -> Self {
        Argument::Literal(v)
    }
}

impl From<&str> for Argument {
    fn from(s: &str) -> Self {
        Argument::Literal(Value::from(s))
    }
}

impl From<String> for Argument {
    fn from(s: String) -> Self {
        Argument::Literal(Value::from(s))
    }
}

impl From<i64> for Argument {
    fn from(n: i64) -> Self {
        Argument::Literal(Value::from(n))
    }
}

impl From<f64> for Argument {
    fn from(n: f64) -> Self {
        Argument::Literal(Value::from(n))
    }
}

impl From<bool> for Argument {
    fn from(b: bool) -> Self {
        Argument::Literal(Value::from(b))
    }
}

impl From<Output> for Argument {
    fn from(o: Output) -> Self {
        Argument::Output(o)
    }
}

impl From<InputParameter> for Argument {
    fn from(p: InputParameter) -> Self {
        Argument::Parameter(p.into())
    }
}

impl From<ArgumentsParameter> for Argument {
    fn from(p: ArgumentsParameter) -> Self {
        Argument::Parameter(p.into())
    }
}
