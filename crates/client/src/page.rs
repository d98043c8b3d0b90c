//! One generator page: state container plus the components acting on it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gengtu_core::artifact::DownloadSnapshot;
use gengtu_core::error::CoreError;
use gengtu_core::generation::{GenerationForm, GenerationKind, GenerationResult};
use gengtu_core::history::{HistoryEntry, HistoryView};
use gengtu_core::session::Session;
use gengtu_core::state::PageState;

use crate::api::GengtuApi;
use crate::auth::AuthClient;
use crate::config::ClientConfig;
use crate::controller::GenerationController;
use crate::error::ClientError;
use crate::history::HistoryCache;
use crate::navigator::Navigator;
use crate::session::SessionGate;
use crate::store::Store;

/// A meme or figurine generator page.
///
/// Owns the [`Store`] and wires the session gate, history cache,
/// generation controller and auth client to it. The submit trigger lives
/// here: [`submit`](Self::submit) refuses to call the controller while
/// the trigger is disabled.
pub struct GeneratorPage {
    kind: GenerationKind,
    store: Store,
    gate: Arc<SessionGate>,
    history: Arc<HistoryCache>,
    controller: GenerationController,
    auth: AuthClient,
}

impl GeneratorPage {
    /// Build a page with its own HTTP client.
    pub fn new(
        config: &ClientConfig,
        kind: GenerationKind,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let api = GengtuApi::new(config.api_base_url.clone(), config.request_timeout())
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self::with_api(Arc::new(api), config, kind, navigator))
    }

    /// Build a page around an existing API client.
    pub fn with_api(
        api: Arc<GengtuApi>,
        config: &ClientConfig,
        kind: GenerationKind,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let store = Store::new();
        let gate = Arc::new(SessionGate::new(
            Arc::clone(&api),
            store.clone(),
            Arc::clone(&navigator),
            config.login_url.clone(),
        ));
        let history = Arc::new(HistoryCache::new(
            Arc::clone(&api),
            store.clone(),
            kind.history_filter(),
        ));
        let controller = GenerationController::new(
            Arc::clone(&api),
            store.clone(),
            Arc::clone(&gate),
            Arc::clone(&history),
            config.generation_timeout(),
        );
        let auth = AuthClient::new(api, store.clone(), navigator, config.login_url.clone());

        Self {
            kind,
            store,
            gate,
            history,
            controller,
            auth,
        }
    }

    pub fn kind(&self) -> GenerationKind {
        self.kind
    }

    /// Page activation: check the session and load history together.
    ///
    /// History loads even if the session check fails; its own failures
    /// never affect the result.
    pub async fn mount(&self) -> Result<Session, ClientError> {
        let (session, history) = tokio::join!(self.gate.check_session(), self.history.refresh());
        tracing::debug!(kind = ?self.kind, history_len = history.len(), "Page mounted");
        session
    }

    /// The submit trigger.
    ///
    /// While a request is pending this returns [`ClientError::Busy`];
    /// with no credits (or an unresolved balance) it returns
    /// [`ClientError::TriggerDisabled`]. Neither sends anything.
    pub async fn submit(&self, form: GenerationForm) -> Result<GenerationResult, ClientError> {
        if form.kind() != self.kind {
            return Err(CoreError::Validation(format!(
                "This page generates {:?} images, not {:?}",
                self.kind,
                form.kind()
            ))
            .into());
        }

        let (pending, enabled) = self.store.read(|s| (s.pending, s.trigger_enabled()));
        if pending {
            return Err(ClientError::Busy);
        }
        if !enabled {
            tracing::debug!(kind = ?self.kind, "Submit ignored, trigger disabled");
            return Err(ClientError::TriggerDisabled);
        }

        self.controller.submit(form).await
    }

    pub fn trigger_enabled(&self) -> bool {
        self.store.read(PageState::trigger_enabled)
    }

    /// Clone of the full page state for rendering.
    pub fn state(&self) -> PageState {
        self.store.snapshot()
    }

    pub fn credits_label(&self) -> String {
        self.store.read(|s| s.session.credits_label())
    }

    /// History entries, or the page's empty-state message.
    pub fn history_view(&self) -> Result<Vec<HistoryEntry>, &'static str> {
        self.store.read(|s| match s.history_view(self.kind) {
            HistoryView::Empty(message) => Err(message),
            HistoryView::Entries(entries) => Ok(entries.to_vec()),
        })
    }

    pub fn history_image_url(&self, entry: &HistoryEntry) -> String {
        self.history.image_url(entry)
    }

    /// Re-fetch history on demand.
    pub async fn refresh_history(&self) -> Vec<HistoryEntry> {
        self.history.refresh().await
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    /// Snapshot of the current artifact.
    pub fn download(&self) -> Option<DownloadSnapshot> {
        self.controller.download()
    }

    /// Write the current artifact into `dir`. Returns the written path, or
    /// `None` when nothing has been generated yet.
    pub async fn save_download(&self, dir: &Path) -> std::io::Result<Option<PathBuf>> {
        let Some(snapshot) = self.download() else {
            return Ok(None);
        };
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&snapshot.file_name);
        tokio::fs::write(&path, &snapshot.bytes).await?;
        tracing::info!(path = %path.display(), bytes = snapshot.bytes.len(), "Saved artifact");
        Ok(Some(path))
    }

    pub fn live_artifacts(&self) -> usize {
        self.controller.live_artifacts()
    }

    /// Content type and size of the artifact on display.
    pub fn current_artifact_info(&self) -> Option<(String, usize)> {
        self.controller.current_artifact_info()
    }

    /// Release page-owned resources.
    pub fn teardown(&self) -> usize {
        self.controller.teardown()
    }
}
