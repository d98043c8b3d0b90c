//! Login, registration and logout.

use std::sync::Arc;

use gengtu_core::auth::{validate_payload, LoginRequest, RegisterRequest};
use gengtu_core::state::PageEvent;

use crate::api::GengtuApi;
use crate::error::ClientError;
use crate::navigator::Navigator;
use crate::store::Store;

pub struct AuthClient {
    api: Arc<GengtuApi>,
    store: Store,
    navigator: Arc<dyn Navigator>,
    login_url: String,
}

impl AuthClient {
    pub fn new(
        api: Arc<GengtuApi>,
        store: Store,
        navigator: Arc<dyn Navigator>,
        login_url: impl Into<String>,
    ) -> Self {
        Self {
            api,
            store,
            navigator,
            login_url: login_url.into(),
        }
    }

    /// Establish a session cookie. Credentials are validated locally first.
    pub async fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<(), ClientError> {
        let request = LoginRequest {
            email: email.into(),
            password: password.into(),
        };
        validate_payload(&request)?;

        self.api
            .login(&request)
            .await
            .map_err(ClientError::from_auth_failure)?;

        tracing::info!(email = %request.email, "Logged in");
        Ok(())
    }

    /// Create an account. Returns the server's confirmation message, if any.
    pub async fn register(&self, request: RegisterRequest) -> Result<Option<String>, ClientError> {
        validate_payload(&request)?;

        let message = self
            .api
            .register(&request)
            .await
            .map_err(ClientError::from_auth_failure)?;

        tracing::info!(email = %request.email, "Registered");
        Ok(message)
    }

    /// End the session and go to the login flow.
    ///
    /// Best-effort: a failed logout call is logged and navigation
    /// proceeds anyway.
    pub async fn logout(&self) {
        if let Err(err) = self.api.logout().await {
            tracing::warn!(error = %err, "Logout request failed");
        }
        self.store.dispatch(PageEvent::LoggedOut {
            redirect_to: self.login_url.clone(),
        });
        self.navigator.navigate(&self.login_url);
    }
}
