use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single to-do entry.
///
/// Tasks are created by [`crate::store::TaskStore::add`] and only ever mutated
/// by toggling `done`. They are never removed one at a time, only in bulk.
///
/// The serialized shape is `{"text": .., "date": .., "done": ..}`, where
/// `date` is an ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    /// Creation time. Never changes after the task is created.
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    pub fn new(text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            created_at,
            done: false,
        }
    }
}
