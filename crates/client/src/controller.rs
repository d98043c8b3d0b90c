//! Generation controller: one credit-gated generation at a time.
//!
//! Lifecycle of a submission:
//!
//! 1. claim the `pending` slot (a second caller gets [`ClientError::Busy`]);
//! 2. validate the form (no network on failure);
//! 3. POST to the kind's endpoint, bounded by the generation timeout;
//! 4. on 2xx, publish the image as the current artifact (releasing the
//!    previous one) and mark the submission succeeded;
//! 5. only then refresh the balance and the history.
//!
//! Any failure in steps 2-4 resets `pending` and records a user-visible
//! message. Nothing is retried.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use gengtu_core::artifact::{Artifact, ArtifactRegistry, DownloadSnapshot};
use gengtu_core::generation::{GenerationForm, GenerationResult};
use gengtu_core::state::PageEvent;

use crate::api::GengtuApi;
use crate::error::ClientError;
use crate::history::HistoryCache;
use crate::session::SessionGate;
use crate::store::Store;

pub struct GenerationController {
    api: Arc<GengtuApi>,
    store: Store,
    gate: Arc<SessionGate>,
    history: Arc<HistoryCache>,
    artifacts: Mutex<ArtifactRegistry>,
    timeout: Duration,
}

impl GenerationController {
    pub fn new(
        api: Arc<GengtuApi>,
        store: Store,
        gate: Arc<SessionGate>,
        history: Arc<HistoryCache>,
        timeout: Duration,
    ) -> Self {
        Self {
            api,
            store,
            gate,
            history,
            artifacts: Mutex::new(ArtifactRegistry::new()),
            timeout,
        }
    }

    /// Run one generation from form to displayed artifact.
    pub async fn submit(&self, form: GenerationForm) -> Result<GenerationResult, ClientError> {
        self.store
            .begin_submission()
            .map_err(|_| ClientError::Busy)?;

        let kind = form.kind();
        match self.generate(form).await {
            Ok(result) => {
                self.store
                    .dispatch(PageEvent::SubmissionSucceeded(result.clone()));
                tracing::info!(kind = ?kind, handle = %result.handle, "Generation succeeded");

                self.refresh_after_success().await;
                Ok(result)
            }
            Err(err) => {
                if err.is_validation() {
                    tracing::debug!(kind = ?kind, error = %err, "Generation form rejected");
                } else {
                    tracing::warn!(kind = ?kind, error = %err, "Generation failed");
                }
                self.store.dispatch(PageEvent::SubmissionFailed {
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Copy of the current artifact for download.
    pub fn download(&self) -> Option<DownloadSnapshot> {
        let artifacts = self.artifacts();
        let handle = artifacts.current()?.handle();
        artifacts.snapshot(handle)
    }

    /// Content type and size of the current artifact, if any.
    pub fn current_artifact_info(&self) -> Option<(String, usize)> {
        self.artifacts()
            .current()
            .map(|a| (a.content_type().to_string(), a.bytes().len()))
    }

    /// Release every artifact; called when the page goes away.
    pub fn teardown(&self) -> usize {
        let mut artifacts = self.artifacts();
        let released = artifacts.release_all();
        tracing::debug!(
            released,
            total_released = artifacts.released_count(),
            "Released artifacts on teardown"
        );
        released
    }

    pub fn live_artifacts(&self) -> usize {
        self.artifacts().live_count()
    }

    // ---- private helpers ----

    async fn generate(&self, form: GenerationForm) -> Result<GenerationResult, ClientError> {
        let request = form.validate()?;
        let kind = request.kind();

        tracing::info!(kind = ?kind, endpoint = kind.endpoint(), "Submitting generation request");

        let image = tokio::time::timeout(self.timeout, self.api.generate(&request))
            .await
            .map_err(|_| ClientError::Timeout(self.timeout))?
            .map_err(ClientError::from_generation_failure)?;

        let artifact = Artifact::new(kind, image.content_type, image.bytes);
        let result = GenerationResult {
            handle: artifact.handle(),
            kind,
            created_at: artifact.created_at(),
        };

        let superseded = self.artifacts().publish(artifact);
        if let Some(released) = superseded {
            tracing::debug!(%released, "Released superseded artifact");
        }

        Ok(result)
    }

    /// Issue exactly one balance refresh and one history refresh. Both
    /// are sent together and may complete in either order; failures are
    /// logged by the components themselves.
    async fn refresh_after_success(&self) {
        let (credits, history) = tokio::join!(self.gate.refresh_balance(), self.history.refresh());
        tracing::debug!(credits, history_len = history.len(), "Post-generation refresh done");
    }

    fn artifacts(&self) -> MutexGuard<'_, ArtifactRegistry> {
        self.artifacts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
