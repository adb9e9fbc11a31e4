//! Clasificación de entradas/salidas de un template en buckets.
//!
//! Cada `IoItem` declara su capacidad para una dirección (`IoDirection`).
//! La clasificación es una partición estable: el orden relativo dentro de
//! cada bucket es el de la lista original. Un elemento sin capacidad en la
//! dirección pedida es un error, nunca se descarta en silencio.
//!
//! | dirección | parameters        | artifacts                          |
//! |-----------|-------------------|------------------------------------|
//! | input     | `ArtifactRef`     | output de tipo artifact            |
//! | output    | output parámetro  | `TypedArtifact`, output artifact   |
use std::fmt;

use indexmap::IndexSet;
use serde_json::Value;

use crate::errors::TemplateError;
use crate::model::{ArtifactRef, Output, TypedArtifact};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoDirection {
    Input,
    Output,
}

impl fmt::Display for IoDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoDirection::Input => f.write_str("input"),
            IoDirection::Output => f.write_str("output"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Parameters,
    Artifacts,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IoItem {
    ArtifactRef(ArtifactRef),
    Typed(TypedArtifact),
    Output(Output),
}

impl IoItem {
    pub fn name(&self) -> &str {
        match self {
            IoItem::ArtifactRef(a) => &a.name,
            IoItem::Typed(a) => &a.name,
            IoItem::Output(o) => &o.name,
        }
    }

    /// Bucket al que pertenece el elemento en `direction`, si tiene capacidad.
    pub fn capability(&self, direction: IoDirection) -> Option<Bucket> {
        match (direction, self) {
            (IoDirection::Input, IoItem::ArtifactRef(_)) => Some(Bucket::Parameters),
            (IoDirection::Input, IoItem::Output(o)) if o.is_artifact() => Some(Bucket::Artifacts),
            (IoDirection::Output, IoItem::Output(o)) if o.is_parameter() => Some(Bucket::Parameters),
            (IoDirection::Output, IoItem::Output(o)) if o.is_artifact() => Some(Bucket::Artifacts),
            (IoDirection::Output, IoItem::Typed(_)) => Some(Bucket::Artifacts),
            _ => None,
        }
    }

    pub fn to_yaml(&self) -> Value {
        match self {
            IoItem::ArtifactRef(a) => a.to_yaml(),
            IoItem::Typed(a) => a.to_yaml(),
            IoItem::Output(o) => o.to_yaml(),
        }
    }

    fn describe(&self) -> String {
        match self {
            IoItem::ArtifactRef(a) => format!("artifact reference '{}'", a.name),
            IoItem::Typed(a) => format!("typed artifact '{}'", a.name),
            IoItem::Output(o) => format!("{:?} output '{}'", o.kind, o.name),
        }
    }
}

impl From<ArtifactRef> for IoItem {
    fn from(a: ArtifactRef) -> Self {
        IoItem::ArtifactRef(a)
    }
}

impl From<TypedArtifact> for IoItem {
    fn from(a: TypedArtifact) -> Self {
        IoItem::Typed(a)
    }
}

impl From<Output> for IoItem {
    fn from(o: Output) -> Self {
        IoItem::Output(o)
    }
}

/// Elemento único o secuencia, normalizado a secuencia.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IoItems(pub Vec<IoItem>);

impl From<IoItem> for IoItems {
    fn from(item: IoItem) -> Self {
        IoItems(vec![item])
    }
}

impl From<Output> for IoItems {
    fn from(o: Output) -> Self {
        IoItems(vec![o.into()])
    }
}

impl From<TypedArtifact> for IoItems {
    fn from(a: TypedArtifact) -> Self {
        IoItems(vec![a.into()])
    }
}

impl From<ArtifactRef> for IoItems {
    fn from(a: ArtifactRef) -> Self {
        IoItems(vec![a.into()])
    }
}

impl From<Vec<IoItem>> for IoItems {
    fn from(items: Vec<IoItem>) -> Self {
        IoItems(items)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateIo {
    pub parameters: Vec<IoItem>,
    pub artifacts: Vec<IoItem>,
}

impl TemplateIo {
    pub fn classify(items: impl Into<IoItems>, direction: IoDirection) -> Result<Self, TemplateError> {
        let mut io = TemplateIo::default();
        for item in items.into().0 {
            match item.capability(direction) {
                Some(Bucket::Parameters) => io.parameters.push(item),
                Some(Bucket::Artifacts) => io.artifacts.push(item),
                None => {
                    return Err(TemplateError::UnclassifiableIo { direction: direction.to_string(),
                                                                 item: item.describe() })
                }
            }
        }
        if direction == IoDirection::Output {
            ensure_unique(&io.parameters, "output parameters")?;
            ensure_unique(&io.artifacts, "output artifacts")?;
        }
        Ok(io)
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() && self.artifacts.is_empty()
    }
}

fn ensure_unique(items: &[IoItem], bucket: &str) -> Result<(), TemplateError> {
    let mut seen = IndexSet::new();
    for item in items {
        if !seen.insert(item.name()) {
            return Err(TemplateError::DuplicateName { bucket: bucket.to_string(),
                                                      name: item.name().to_string() });
        }
    }
    Ok(())
}
