use std::fmt;
use std::str::FromStr;

use crate::errors::TemplateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePullPolicy {
    Always,
    Never,
    IfNotPresent,
}

impl ImagePullPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImagePullPolicy::Always => "Always",
            ImagePullPolicy::Never => "Never",
            ImagePullPolicy::IfNotPresent => "IfNotPresent",
        }
    }
}

impl fmt::Display for ImagePullPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImagePullPolicy {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(ImagePullPolicy::Always),
            "never" => Ok(ImagePullPolicy::Never),
            "ifnotpresent" => Ok(ImagePullPolicy::IfNotPresent),
            other => Err(TemplateError::Validation(format!("unknown image pull policy '{other}'"))),
        }
    }
}
