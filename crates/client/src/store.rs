//! Shared handle to a page's [`PageState`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gengtu_core::error::CoreError;
use gengtu_core::state::{PageEvent, PageState};

/// Cheaply cloneable handle to one page's state.
///
/// The lock is never held across an `.await`; every method takes it,
/// does its work and releases it before returning.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<Mutex<PageState>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an event through the reducer.
    pub fn dispatch(&self, event: PageEvent) {
        tracing::trace!(?event, "Dispatching page event");
        self.lock().apply(event);
    }

    /// Claim the submission slot; fails if a request is already pending.
    pub fn begin_submission(&self) -> Result<(), CoreError> {
        self.lock().begin_submission()
    }

    /// Run a read-only closure against the current state.
    pub fn read<R>(&self, f: impl FnOnce(&PageState) -> R) -> R {
        f(&self.lock())
    }

    /// Clone of the whole state, for rendering.
    pub fn snapshot(&self) -> PageState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        // A panic inside the reducer leaves the state usable; keep going.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let store = Store::new();
        let other = store.clone();
        other.dispatch(PageEvent::SessionResolved { credits: 4 });
        assert_eq!(store.read(|s| s.session.credits), Some(4));
    }

    #[test]
    fn begin_submission_is_exclusive() {
        let store = Store::new();
        assert!(store.begin_submission().is_ok());
        assert!(store.clone().begin_submission().is_err());
    }
}
