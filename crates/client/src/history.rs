//! History cache: the signed-in user's past artifacts.

use std::sync::Arc;

use gengtu_core::history::{HistoryEntry, HistoryFilter};
use gengtu_core::state::PageEvent;

use crate::api::GengtuApi;
use crate::store::Store;

/// Keeps the page's history list in sync with the server.
///
/// Every successful fetch replaces the cached list wholesale. A failed
/// fetch is logged and the previous list stays in place.
pub struct HistoryCache {
    api: Arc<GengtuApi>,
    store: Store,
    filter: HistoryFilter,
}

impl HistoryCache {
    pub fn new(api: Arc<GengtuApi>, store: Store, filter: HistoryFilter) -> Self {
        Self { api, store, filter }
    }

    /// Fetch the history and return what the page now shows.
    pub async fn refresh(&self) -> Vec<HistoryEntry> {
        match self.api.history().await {
            Ok(entries) => {
                let fetched = entries.len();
                let entries = self.filter.apply(entries);
                tracing::debug!(fetched, kept = entries.len(), "History refreshed");
                self.store.dispatch(PageEvent::HistoryReplaced(entries.clone()));
                entries
            }
            Err(err) => {
                tracing::warn!(error = %err, "History refresh failed, keeping cached entries");
                self.store.read(|state| state.history.clone())
            }
        }
    }

    /// Absolute URL of an entry's image.
    pub fn image_url(&self, entry: &HistoryEntry) -> String {
        entry.resolved_image_url(self.api.base_url())
    }
}
