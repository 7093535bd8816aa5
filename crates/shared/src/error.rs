//! Shared error types for the prediction service client.

use serde::Deserialize;

/// Error envelope returned by the prediction service for rejected requests.
///
/// The service is a FastAPI app, so validation and routing failures come back
/// as `{"detail": ...}`, where `detail` is either a string or a list of
/// validation issues. Handlers that fail internally report `{"error": ...}`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Attempt to parse a non-2xx body into a user-facing message.
/// Prefers `error`, falls back to a string `detail` or the first validation `msg`.
pub fn try_error_detail(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok()?;
    if let Some(error) = parsed.error {
        if !error.trim().is_empty() {
            return Some(error);
        }
    }
    match parsed.detail? {
        serde_json::Value::String(detail) if !detail.trim().is_empty() => Some(detail),
        serde_json::Value::Array(issues) => issues
            .iter()
            .find_map(|issue| issue.get("msg").and_then(|m| m.as_str()))
            .map(str::to_string),
        _ => None,
    }
}

/// API error type for client-side use
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The service answered with a non-2xx status.
    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },
    /// The request never produced a response (DNS, connection reset, timeout).
    #[error("Network error: {0}")]
    Network(String),
    /// The request was superseded or its view went away.
    #[error("request aborted")]
    Aborted,
    /// A required identifier was missing; no request was made.
    #[error("missing identifier ({field})")]
    Validation { field: &'static str },
    /// The service reported a failure inside an otherwise successful response.
    #[error("{0}")]
    SoftPrediction(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

impl ApiError {
    pub fn missing(field: &'static str) -> Self {
        ApiError::Validation { field }
    }

    /// Aborted requests must never reach the view as an error.
    pub fn is_aborted(&self) -> bool {
        matches!(self, ApiError::Aborted)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Http { .. } | ApiError::Network(_))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Deserialize(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_detail_prefers_error_field() {
        let body = r#"{"error": "model not loaded", "detail": "ignored"}"#;
        assert_eq!(try_error_detail(body).as_deref(), Some("model not loaded"));
    }

    #[test]
    fn error_detail_reads_fastapi_validation_list() {
        let body = r#"{"detail": [{"loc": ["query", "teamid"], "msg": "field required"}]}"#;
        assert_eq!(try_error_detail(body).as_deref(), Some("field required"));
    }

    #[test]
    fn error_detail_ignores_non_json() {
        assert_eq!(try_error_detail("<html>502</html>"), None);
    }

    #[test]
    fn validation_message_names_the_field() {
        let err = ApiError::missing("team_id");
        assert_eq!(err.to_string(), "missing identifier (team_id)");
        assert!(!err.is_aborted());
        assert!(!err.is_transport());
    }
}
