use chrono::{DateTime, Local};
use serde::Serialize;

/// A free-text review attached to an open detail view. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRecord {
    pub text: String,
    /// Short local date, `MM/DD/YYYY`.
    pub date: String,
}

impl ReviewRecord {
    /// Builds a review from raw input. Returns `None` when the text is blank.
    pub fn new(text: &str, now: DateTime<Local>) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            date: now.format("%m/%d/%Y").to_string(),
        })
    }
}
