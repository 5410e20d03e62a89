//! Error types for the task store and its persistence.

use thiserror::Error;

/// Errors returned by [`crate::store::TaskStore`] mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A toggle referenced a storage position that does not exist.
    #[error("task index {index} is out of range (list has {len} tasks)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors returned when writing the task list to its durable slot.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to serialize task list: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
