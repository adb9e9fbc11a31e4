//! Política de reintentos declarada para el motor externo.
//!
//! El compilador no reintenta nada: sólo normaliza la política a la forma
//! `retryStrategy` del manifest.
use serde::Serialize;
use serde_json::Value;

use crate::errors::TemplateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RetryPolicy {
    #[default]
    Always,
    OnFailure,
    OnError,
    OnTransientError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Backoff {
    pub duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryStrategy {
    pub limit: u32,
    pub retry_policy: RetryPolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backoff: Option<Backoff>,
}

impl RetryStrategy {
    pub fn from_limit(limit: u32) -> Self {
        Self { limit,
               retry_policy: RetryPolicy::default(),
               backoff: None }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = Some(backoff);
        self
    }

    /// Normaliza la política al bloque `retryStrategy`.
    pub fn to_dict(&self) -> Result<Value, TemplateError> {
        if self.limit == 0 {
            return Err(TemplateError::Validation("retry limit must be positive".into()));
        }
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn limit_only_uses_always_policy() {
        assert_eq!(RetryStrategy::from_limit(3).to_dict().unwrap(), json!({"limit": 3, "retryPolicy": "Always"}));
    }

    #[test]
    fn backoff_is_emitted_when_present() {
        let r = RetryStrategy::from_limit(2).with_policy(RetryPolicy::OnError)
                                            .with_backoff(Backoff { duration: "10s".into(),
                                                                    factor: Some(2),
                                                                    max_duration: None });
        assert_eq!(r.to_dict().unwrap(),
                   json!({"limit": 2, "retryPolicy": "OnError", "backoff": {"duration": "10s", "factor": 2}}));
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert!(matches!(RetryStrategy::from_limit(0).to_dict(), Err(TemplateError::Validation(_))));
    }
}
