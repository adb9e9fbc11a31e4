use serde::Serialize;

/// Montaje de volumen dentro del contenedor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    pub name: String,
    pub mount_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_path: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
}

impl VolumeMount {
    pub fn new(name: impl Into<String>, mount_path: impl Into<String>) -> Self {
        Self { name: name.into(),
               mount_path: mount_path.into(),
               sub_path: None,
               read_only: false }
    }

    pub fn with_sub_path(mut self, sub_path: impl Into<String>) -> Self {
        self.sub_path = Some(sub_path.into());
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}
