use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// JSON error body returned by the remote service on non-2xx responses.
///
/// Every endpoint reports failures as `{"success": false, "message": "..."}`;
/// only `message` is relevant to the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Parse a raw response body, returning the non-empty `message` field
    /// if the body is JSON and carries one.
    pub fn message_from(raw: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(raw)
            .ok()
            .and_then(|body| body.message)
            .filter(|msg| !msg.trim().is_empty())
    }
}
