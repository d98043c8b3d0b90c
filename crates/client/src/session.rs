//! Session gate: validates the session and tracks the credit balance.
//!
//! The gate runs [`check_session`](SessionGate::check_session) once when
//! a page mounts and [`refresh_balance`](SessionGate::refresh_balance)
//! after every successful generation. Both hit the current-user
//! endpoint; they differ only in how failure is handled.

use std::sync::Arc;

use gengtu_core::session::Session;
use gengtu_core::state::PageEvent;
use gengtu_core::types::Credits;

use crate::api::GengtuApi;
use crate::error::ClientError;
use crate::navigator::Navigator;
use crate::store::Store;

pub struct SessionGate {
    api: Arc<GengtuApi>,
    store: Store,
    navigator: Arc<dyn Navigator>,
    login_url: String,
}

impl SessionGate {
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

    /// Verify the session and resolve the credit balance.
    ///
    /// A transport failure and a non-2xx status come back as different
    /// error variants, but both leave the page unauthenticated and
    /// navigate to the login flow. The two causes are deliberately not
    /// treated differently: either way the page cannot be used.
    pub async fn check_session(&self) -> Result<Session, ClientError> {
        match self.fetch_credits().await {
            Ok(credits) => {
                self.store.dispatch(PageEvent::SessionResolved { credits });
                tracing::info!(credits, "Session verified");
                Ok(Session::authenticated(credits))
            }
            Err(err) => {
                tracing::warn!(error = %err, login_url = %self.login_url, "Session check failed, redirecting to login");
                self.store.dispatch(PageEvent::SessionRejected {
                    redirect_to: self.login_url.clone(),
                });
                self.navigator.navigate(&self.login_url);
                Err(err)
            }
        }
    }

    /// Re-query the balance after a generation.
    ///
    /// Never navigates: the user is mid-session, so on failure the
    /// balance falls back to zero and the error is only logged.
    pub async fn refresh_balance(&self) -> Credits {
        match self.fetch_credits().await {
            Ok(credits) => {
                self.store.dispatch(PageEvent::BalanceRefreshed { credits });
                tracing::debug!(credits, "Balance refreshed");
                credits
            }
            Err(err) => {
                tracing::warn!(error = %err, "Balance refresh failed, treating balance as 0");
                self.store.dispatch(PageEvent::BalanceRefreshFailed);
                0
            }
        }
    }

    async fn fetch_credits(&self) -> Result<Credits, ClientError> {
        self.api
            .current_user()
            .await
            .map(|user| user.credits)
            .map_err(ClientError::from_auth_failure)
    }
}
