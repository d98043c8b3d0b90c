use std::time::Duration;

use gengtu_core::error::CoreError;

use crate::api::ApiError;

/// Fallback text when an auth failure carries no server message.
const AUTH_FAILED: &str = "Authentication failed";

/// Everything a page operation can fail with.
///
/// `Network` and `Authentication` are kept apart even though the session
/// gate reacts to both the same way (see [`crate::session::SessionGate`]).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Client-side validation; never reaches the network.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The service answered with a non-2xx status on an auth-bearing call.
    #[error("{message} (HTTP {status})")]
    Authentication { status: u16, message: String },

    /// The request never got an answer (connection refused, DNS, reset).
    ///
    /// Also used for generation calls: a transport failure says nothing
    /// about the generation itself, and the submission is still reset
    /// and recorded like any other generation failure.
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP 402 on generation; carries the server message verbatim.
    #[error("{0}")]
    InsufficientCredits(String),

    /// Any other generation failure.
    #[error("{0}")]
    Generation(String),

    #[error("Generation timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Another submission is still pending.
    #[error("A generation request is already in progress")]
    Busy,

    /// The submit trigger is disabled (no credits, or balance unresolved).
    #[error("Generation is unavailable: no credits remaining")]
    TriggerDisabled,
}

impl ClientError {
    /// Classify a failed session or auth call.
    pub fn from_auth_failure(err: ApiError) -> Self {
        let message = err.server_message();
        match err {
            ApiError::Request(e) => ClientError::Network(e.to_string()),
            ApiError::Status { status, .. } => ClientError::Authentication {
                status,
                message: message.unwrap_or_else(|| AUTH_FAILED.to_string()),
            },
        }
    }

    /// Classify a failed generation call. 402 is reserved for
    /// insufficient credits.
    pub fn from_generation_failure(err: ApiError) -> Self {
        let message = err.server_message();
        match err {
            ApiError::Request(e) => ClientError::Network(e.to_string()),
            ApiError::Status { status, .. } => {
                if status == 402 {
                    ClientError::InsufficientCredits(
                        message.unwrap_or_else(|| "Insufficient credits".to_string()),
                    )
                } else {
                    ClientError::Generation(
                        message.unwrap_or_else(|| format!("Generation failed (HTTP {status})")),
                    )
                }
            }
        }
    }

    /// `true` for errors detected before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Core(CoreError::Validation(_)))
    }
}
