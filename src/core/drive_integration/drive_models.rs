use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether the current user has a Google Drive account linked on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationStatus {
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// OAuth consent page the user should be sent to. The URL is passed through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUrl {
    pub url: String,
}

/// The part of a backend error body we care about.
#[derive(Debug, Default)]
pub(crate) struct ErrorBody {
    message: Option<Value>,
}

impl ErrorBody {
    /// Parse a failure body. Anything that isn't a JSON object counts as empty.
    pub(crate) fn parse(body: &[u8]) -> Self {
        let message = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|value| value.get("message").cloned());
        Self { message }
    }

    /// The backend's message, if it sent a usable one.
    pub(crate) fn message(&self) -> Option<String> {
        match self.message.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::String(_) | Value::Null | Value::Bool(false) => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            other => Some(other.to_string()),
        }
    }
}
