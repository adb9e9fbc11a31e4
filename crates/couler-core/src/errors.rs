//! Errores del compilador de templates.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TemplateError {
    #[error("validation failed: {0}")] Validation(String),
    #[error("{direction} item cannot be classified: {item}")] UnclassifiableIo { direction: String, item: String },
    #[error("duplicate name '{name}' in {bucket}")] DuplicateName { bucket: String, name: String },
    #[error("incorrect step return representation: {0}")] InvalidStepReturn(String),
    #[error("serialization: {0}")] Serialization(String),
}

impl From<serde_json::Error> for TemplateError {
    fn from(e: serde_json::Error) -> Self {
        TemplateError::Serialization(e.to_string())
    }
}
