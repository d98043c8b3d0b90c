//! History entries as returned by the history endpoint.

use serde::{Deserialize, Serialize};

use crate::types::HistoryId;

/// One past artifact of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: HistoryId,
    /// The riddle answer for memes, [`crate::generation::FIGURINE_CAPTION`]
    /// for figurines.
    #[serde(rename = "riddle_answer")]
    pub caption: String,
    /// Server-relative path, e.g. `/static/generated/abc.png`.
    pub image_url: String,
}

impl HistoryEntry {
    /// Absolute image URL: the API base URL followed by the relative path.
    pub fn resolved_image_url(&self, api_base_url: &str) -> String {
        if self.image_url.starts_with('/') {
            format!("{}{}", api_base_url.trim_end_matches('/'), self.image_url)
        } else {
            format!("{api_base_url}{}", self.image_url)
        }
    }
}

/// Client-side subset applied after each history fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HistoryFilter {
    #[default]
    All,
    /// Keep only entries whose caption equals the marker exactly.
    Caption(String),
}

impl HistoryFilter {
    pub fn matches(&self, entry: &HistoryEntry) -> bool {
        match self {
            HistoryFilter::All => true,
            HistoryFilter::Caption(marker) => entry.caption == *marker,
        }
    }

    /// Filter a freshly fetched sequence, preserving server order.
    pub fn apply(&self, entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
        match self {
            HistoryFilter::All => entries,
            HistoryFilter::Caption(_) => entries.into_iter().filter(|e| self.matches(e)).collect(),
        }
    }
}

/// What a page renders in its history panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryView<'a> {
    /// Nothing to show; render the page's empty-state message.
    Empty(&'static str),
    Entries(&'a [HistoryEntry]),
}
