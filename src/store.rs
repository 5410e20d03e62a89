//! The in-memory task list.

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::Task;

/// Owns the canonical, creation-ordered list of tasks for a session.
///
/// There is a single writer. Every mutation either applies fully or leaves
/// the list untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from whatever the durable slot held, or from nothing.
    pub fn load_initial(persisted: Option<Vec<Task>>) -> Self {
        Self {
            tasks: persisted.unwrap_or_default(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.done).count()
    }

    /// Append a new, not-done task created now.
    pub fn add(&mut self, text: impl Into<String>) -> &Task {
        self.add_at(text, Utc::now())
    }

    pub fn add_at(&mut self, text: impl Into<String>, created_at: DateTime<Utc>) -> &Task {
        self.tasks.push(Task::new(text, created_at));
        &self.tasks[self.tasks.len() - 1]
    }

    /// Flip `done` on the task at a storage index, returning its new value.
    pub fn toggle(&mut self, index: usize) -> Result<bool, StoreError> {
        let len = self.tasks.len();
        let task = self
            .tasks
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })?;
        task.done = !task.done;
        Ok(task.done)
    }

    /// Drop every done task, keeping the rest in order. Returns how many went.
    pub fn remove_done(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.done);
        before - self.tasks.len()
    }

    /// Drop every task. Returns how many went.
    pub fn clear(&mut self) -> usize {
        let removed = self.tasks.len();
        self.tasks.clear();
        removed
    }
}
