//! News event message type.

use serde::{Deserialize, Serialize};

/// A single news headline ready to be published.
///
/// The JSON payload carries exactly two fields, `title` and `published_at`,
/// in that order. `published_at` is an ISO 8601 date-time without offset.
/// The payload is compact JSON with no whitespace after `:` or `,`, and
/// non-ASCII text is written as UTF-8 rather than `\u` escapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsEvent {
    pub title: String,
    pub published_at: String,
}

impl NewsEvent {
    pub fn new(title: impl Into<String>, published_at: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            published_at: published_at.into(),
        }
    }

    /// Message key: the title as UTF-8 bytes.
    pub fn key(&self) -> &[u8] {
        self.title.as_bytes()
    }

    /// Encode the event as a UTF-8 JSON payload.
    pub fn to_payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
