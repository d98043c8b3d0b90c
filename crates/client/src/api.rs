//! REST API client for the gengtu service endpoints.
//!
//! Wraps the service's HTTP API (session, generation, history, auth)
//! using [`reqwest`] with a cookie store, so the session cookie set by
//! `/api/login` is attached to every subsequent request.

use std::time::Duration;

use gengtu_core::auth::{LoginRequest, RegisterRequest};
use gengtu_core::error::ErrorBody;
use gengtu_core::generation::{GenerationRequest, RiddlePayload};
use gengtu_core::history::HistoryEntry;
use gengtu_core::session::CurrentUser;
use reqwest::header::CONTENT_TYPE;

/// Content type assumed when the service omits the header on an image.
const DEFAULT_IMAGE_CONTENT_TYPE: &str = "image/png";

/// HTTP client for one gengtu deployment.
pub struct GengtuApi {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

/// Binary body of a successful generation.
#[derive(Debug)]
pub struct GeneratedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Errors from the REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

impl ApiError {
    /// The `message` field of a JSON error body, if there is one.
    pub fn server_message(&self) -> Option<String> {
        match self {
            ApiError::Status { body, .. } => ErrorBody::message_from(body),
            ApiError::Request(_) => None,
        }
    }
}

impl GengtuApi {
    /// Create a client with its own cookie-enabled connection pool.
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self::with_client(client, base_url, request_timeout))
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    ///
    /// The caller is responsible for enabling the cookie store.
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout,
        }
    }

    /// Base URL without trailing slash, e.g. `http://host:5550`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/user`.
    pub async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        let response = self
            .client
            .get(self.url("/api/user"))
            .timeout(self.request_timeout)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `GET /api/history`, most recent first.
    pub async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        let response = self
            .client
            .get(self.url("/api/history"))
            .timeout(self.request_timeout)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Submit a generation request and return the image bytes.
    ///
    /// Riddles go out as JSON, figurines as a multipart form with a single
    /// `image` part. No client-side timeout is applied here; the caller
    /// bounds the whole round trip.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage, ApiError> {
        let builder = self.client.post(self.url(request.kind().endpoint()));

        let builder = match request {
            GenerationRequest::Riddle { answer, aspect } => builder.json(&RiddlePayload {
                answer,
                selected_size: *aspect,
            }),
            GenerationRequest::Figurine { upload } => {
                let part = reqwest::multipart::Part::bytes(upload.bytes().to_vec())
                    .file_name(upload.file_name().to_string())
                    .mime_str(upload.content_type())?;
                builder.multipart(reqwest::multipart::Form::new().part("image", part))
            }
        };

        let response = Self::ensure_success(builder.send().await?).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_IMAGE_CONTENT_TYPE)
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        Ok(GeneratedImage {
            content_type,
            bytes,
        })
    }

    /// `POST /api/login`. On success the session cookie lands in the
    /// cookie store.
    pub async fn login(&self, request: &LoginRequest) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/api/login"))
            .timeout(self.request_timeout)
            .json(request)
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// `POST /api/register`. Returns the server's confirmation message.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Option<String>, ApiError> {
        let response = self
            .client
            .post(self.url("/api/register"))
            .timeout(self.request_timeout)
            .json(request)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        Ok(ErrorBody::message_from(&body))
    }

    /// `GET /api/logout`.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .get(self.url("/api/logout"))
            .timeout(self.request_timeout)
            .send()
            .await?;

        Self::check_status(response).await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Status`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}
