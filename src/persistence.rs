//! Mirrors the task list into a durable slot.
//!
//! Nothing here keeps its own copy of the list. `save` always writes the full
//! list it is handed and `load` is only consulted at startup.

use crate::db::Database;
use crate::error::PersistError;
use crate::models::Task;

/// Slot name used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "tasks";

/// Where a task list survives between sessions.
pub trait TaskPersistence {
    /// The stored list, or `None` if the slot is empty or unreadable.
    fn load(&self) -> Option<Vec<Task>>;

    /// Replace the stored list entirely.
    fn save(&self, tasks: &[Task]) -> Result<(), PersistError>;
}

/// Persists the list as JSON in one [`Database`] slot.
#[derive(Clone)]
pub struct SlotPersistence {
    db: Database,
    key: String,
}

impl SlotPersistence {
    pub fn new(db: Database, key: impl Into<String>) -> Self {
        Self {
            db,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl TaskPersistence for SlotPersistence {
    fn load(&self) -> Option<Vec<Task>> {
        let raw = match self.db.get_slot(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %self.key, "Failed to read task slot: {:#}", e);
                return None;
            }
        };

        // A stored `null` counts as empty, same as a missing slot.
        match serde_json::from_str::<Option<Vec<Task>>>(&raw) {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::warn!(key = %self.key, "Ignoring malformed task slot: {}", e);
                None
            }
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<(), PersistError> {
        let json = serde_json::to_string(tasks)?;
        self.db.put_slot(&self.key, &json)?;
        tracing::debug!(key = %self.key, count = tasks.len(), "Saved task list");
        Ok(())
    }
}

/// The in-memory variant: nothing is loaded and nothing is written.
#[derive(Debug, Clone, Copy, Default)]
pub struct EphemeralPersistence;

impl TaskPersistence for EphemeralPersistence {
    fn load(&self) -> Option<Vec<Task>> {
        None
    }

    fn save(&self, _tasks: &[Task]) -> Result<(), PersistError> {
        Ok(())
    }
}

impl<P: TaskPersistence + ?Sized> TaskPersistence for Box<P> {
    fn load(&self) -> Option<Vec<Task>> {
        (**self).load()
    }

    fn save(&self, tasks: &[Task]) -> Result<(), PersistError> {
        (**self).save(tasks)
    }
}
