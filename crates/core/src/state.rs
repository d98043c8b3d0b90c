//! Page state container.
//!
//! A generator page owns exactly one [`PageState`]. The session gate,
//! the history cache and the generation controller never mutate it
//! directly; they report what happened as a [`PageEvent`] and the
//! reducer applies it. The `pending` flag is the only coordination
//! primitive between submissions.

use crate::error::CoreError;
use crate::generation::{GenerationKind, GenerationResult};
use crate::history::{HistoryEntry, HistoryView};
use crate::session::Session;
use crate::types::Credits;

#[derive(Debug, Clone, Default)]
pub struct PageState {
    pub session: Session,
    /// `true` while a generation request is in flight.
    pub pending: bool,
    /// The artifact currently on display.
    pub current: Option<GenerationResult>,
    /// Filtered history, most recent first.
    pub history: Vec<HistoryEntry>,
    /// User-visible message of the last failed submission.
    pub error: Option<String>,
    /// Set once the page navigated away to the login flow.
    pub redirected_to: Option<String>,
}

/// Everything that can happen to a page.
#[derive(Debug, Clone)]
pub enum PageEvent {
    SessionResolved { credits: Credits },
    SessionRejected { redirect_to: String },
    BalanceRefreshed { credits: Credits },
    /// Post-generation balance refresh failed; credits fall back to zero.
    BalanceRefreshFailed,
    SubmissionSucceeded(GenerationResult),
    SubmissionFailed { message: String },
    HistoryReplaced(Vec<HistoryEntry>),
    LoggedOut { redirect_to: String },
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: PageEvent) {
        match event {
            PageEvent::SessionResolved { credits } | PageEvent::BalanceRefreshed { credits } => {
                self.session = Session::authenticated(credits);
            }
            PageEvent::SessionRejected { redirect_to } => {
                self.session = Session::rejected();
                self.redirected_to = Some(redirect_to);
            }
            PageEvent::BalanceRefreshFailed => {
                self.session.credits = Some(0);
            }
            PageEvent::SubmissionSucceeded(result) => {
                self.pending = false;
                self.error = None;
                self.current = Some(result);
            }
            PageEvent::SubmissionFailed { message } => {
                self.pending = false;
                self.error = Some(message);
            }
            PageEvent::HistoryReplaced(entries) => {
                self.history = entries;
            }
            PageEvent::LoggedOut { redirect_to } => {
                *self = PageState {
                    redirected_to: Some(redirect_to),
                    ..PageState::default()
                };
            }
        }
    }

    /// Claim the single submission slot.
    ///
    /// Check and set happen in one step, so two callers can never both
    /// see `pending == false`.
    pub fn begin_submission(&mut self) -> Result<(), CoreError> {
        if self.pending {
            return Err(CoreError::Conflict(
                "A generation request is already in progress".into(),
            ));
        }
        self.pending = true;
        self.error = None;
        Ok(())
    }

    /// Whether the submit trigger is enabled.
    pub fn trigger_enabled(&self) -> bool {
        !self.pending && self.session.can_generate()
    }

    pub fn history_view(&self, kind: GenerationKind) -> HistoryView<'_> {
        if self.history.is_empty() {
            HistoryView::Empty(kind.empty_history_message())
        } else {
            HistoryView::Entries(&self.history)
        }
    }
}
