//! couler-core: compilador de templates y resolución de referencias a outputs.
//!
//! Convierte descripciones en memoria de steps (contenedores, acciones sobre
//! recursos, templates genéricos) en fragmentos de manifest para un motor de
//! workflows externo, y produce handles (`Output`) con los que un step
//! posterior direcciona valores de uno anterior.
pub mod config;
pub mod constants;
pub mod errors;
pub mod model;
pub mod outputs;
pub mod resolver;
pub mod template;
pub mod utils;

pub use config::{init_dotenv, CompilerConfig};
pub use errors::TemplateError;
pub use model::{Argument, ArgumentsParameter, ArtifactRef, ArtifactStore, InputParameter, Output, OutputKind, ParameterDecl,
                Secret, TypedArtifact};
pub use outputs::{container_output, job_output, script_output, StepOutputs};
pub use resolver::{extract_step_return, parse_argo_output, Resolved, StepReturn, StepValue};
pub use template::{Container, IoDirection, IoItem, Job, Manifest, Template, TemplateBase, TemplateIo};
