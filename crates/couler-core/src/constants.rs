//! Constantes del compilador de templates.
//!
//! Valores fijos que forman parte del contrato con el motor de workflows:
//! nombres de outputs de un job, selectores, prefijos de nombres implícitos
//! y el conjunto de variables que anula la visibilidad de GPUs.

/// Variables de entorno inyectadas cuando el contenedor no pide GPU y el
/// override está activo. El orden se conserva en el manifest.
pub const OVERWRITE_GPU_ENVS: [(&str, &str); 2] = [("NVIDIA_VISIBLE_DEVICES", ""),
                                                   ("NVIDIA_DRIVER_CAPABILITIES", "")];

/// Prefijo de los parámetros de entrada sintetizados a partir de args posicionales.
pub const INPUT_PARAMETER_PREFIX: &str = "para";

/// Raíz de las direcciones de outputs de job generadas por `job_output`.
pub const JOB_ADDRESS_ROOT: &str = "couler";

pub const JOB_NAME_OUTPUT: &str = "job-name";
pub const JOB_ID_OUTPUT: &str = "job-id";
pub const JOB_OBJ_OUTPUT: &str = "job-obj";

/// Selectores fijos de los tres outputs de un job (nombre, selector, expresión).
pub const JOB_OUTPUT_SELECTORS: [(&str, &str, &str); 3] = [(JOB_NAME_OUTPUT, "jsonPath", "\"{.metadata.name}\""),
                                                           (JOB_ID_OUTPUT, "jsonPath", "\"{.metadata.uid}\""),
                                                           (JOB_OBJ_OUTPUT, "jqFilter", "\".\"")];

/// Scope usado por defecto al resolver referencias locales.
pub const DEFAULT_PLACEHOLDER_PREFIX: &str = "steps";

/// Scope de las referencias globales del workflow.
pub const WORKFLOW_SCOPE: &str = "workflow";

/// Segmentos mínimos de una dirección válida (`prefix.step.template.outputs...`).
pub const MIN_STEP_RETURN_SEGMENTS: usize = 4;

pub const ENV_OVERWRITE_GPU_ENVS: &str = "COULER_OVERWRITE_GPU_ENVS";
pub const ENV_PLACEHOLDER_PREFIX: &str = "COULER_PLACEHOLDER_PREFIX";
