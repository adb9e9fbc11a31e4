//! Configuración del compilador desde variables de entorno.
//!
//! El override de variables GPU se pasa explícitamente a `Template::compile`
//! mediante `CompilerConfig`; no existe estado global mutable.

use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::constants::{DEFAULT_PLACEHOLDER_PREFIX, ENV_OVERWRITE_GPU_ENVS, ENV_PLACEHOLDER_PREFIX};

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Inyecta `OVERWRITE_GPU_ENVS` en contenedores que no piden GPU.
    pub overwrite_gpu_envs: bool,
    /// Scope de las referencias locales (`steps`, `tasks`, ...).
    pub placeholder_prefix: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self { overwrite_gpu_envs: false,
               placeholder_prefix: DEFAULT_PLACEHOLDER_PREFIX.to_string() }
    }
}

impl CompilerConfig {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let overwrite_gpu_envs = env::var(ENV_OVERWRITE_GPU_ENVS).ok().map(|v| parse_flag(&v)).unwrap_or(false);
        let placeholder_prefix = env::var(ENV_PLACEHOLDER_PREFIX).ok()
                                                                 .filter(|v| !v.trim().is_empty())
                                                                 .unwrap_or_else(|| DEFAULT_PLACEHOLDER_PREFIX.to_string());
        Self { overwrite_gpu_envs, placeholder_prefix }
    }

    pub fn with_gpu_env_override(mut self, enabled: bool) -> Self {
        self.overwrite_gpu_envs = enabled;
        self
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
