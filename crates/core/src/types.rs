/// Server-assigned identifier of a history row.
pub type HistoryId = i64;

/// Per-user generation quota as reported by the current-user endpoint.
pub type Credits = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
