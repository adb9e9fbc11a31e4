//! Modelos del compilador (outputs, artifacts, parámetros, adjuntos del contenedor).

pub mod artifact;
pub mod cache;
pub mod output;
pub mod parameter;
pub mod pull_policy;
pub mod retry;
pub mod secret;
pub mod volume;

pub use artifact::{ArtifactRef, ArtifactStore, TypedArtifact};
pub use cache::Cache;
pub use output::{Output, OutputKind};
pub use parameter::{Argument, ArgumentsParameter, InputParameter, ParameterDecl};
pub use pull_policy::ImagePullPolicy;
pub use retry::{Backoff, RetryPolicy, RetryStrategy};
pub use secret::{ConfigMapRef, EnvSource, EnvSourceKind, Secret};
pub use volume::VolumeMount;
