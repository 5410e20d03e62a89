//! Event handling for the to-do list.
//!
//! [`TodoController`] owns the store and its collaborators. Each handler runs
//! to completion before the next event is taken. A mutating handler always
//! mutates, then saves, then renders.

use crate::format::DateFormatter;
use crate::persistence::TaskPersistence;
use crate::render::{project_rows, Renderer, Row};
use crate::store::TaskStore;

pub const CONFIRM_CLEAN: &str = "Remove all completed tasks? This cannot be undone.";
pub const CONFIRM_EMPTY: &str = "Remove all tasks? This cannot be undone.";
pub const BLANK_REJECTED: &str = "Task text cannot be empty.";

/// User decisions and notices the controller cannot make on its own.
pub trait Prompt {
    /// Ask a yes/no question. Blocks until answered.
    fn confirm(&mut self, message: &str) -> bool;

    /// Show a notice without waiting for the user.
    fn notify(&mut self, message: &str);
}

impl<P: Prompt + ?Sized> Prompt for Box<P> {
    fn confirm(&mut self, message: &str) -> bool {
        (**self).confirm(message)
    }

    fn notify(&mut self, message: &str) {
        (**self).notify(message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ControllerOptions {
    pub formatter: DateFormatter,
    /// Accept tasks whose text is empty or whitespace.
    pub allow_blank: bool,
}

/// Result of submitting the input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submit {
    Added,
    Rejected,
}

/// Result of a confirmed bulk removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOutcome {
    Declined,
    Removed(usize),
}

pub struct TodoController<P, R, Q> {
    store: TaskStore,
    persistence: P,
    renderer: R,
    prompt: Q,
    options: ControllerOptions,
    rows: Vec<Row>,
    input: String,
}

impl<P, R, Q> TodoController<P, R, Q>
where
    P: TaskPersistence,
    R: Renderer,
    Q: Prompt,
{
    /// Load the durable slot, build the store and render it once.
    pub fn start(persistence: P, renderer: R, prompt: Q, options: ControllerOptions) -> Self {
        let store = TaskStore::load_initial(persistence.load());
        tracing::debug!(count = store.len(), "Loaded task list");

        let mut controller = Self {
            store,
            persistence,
            renderer,
            prompt,
            options,
            rows: Vec::new(),
            input: String::new(),
        };
        controller.render();
        controller
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn prompt(&self) -> &Q {
        &self.prompt
    }

    /// Rows as last rendered, newest first.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Add the input text as a new task.
    ///
    /// Blank text is rejected unless `allow_blank` is set. A rejected submit
    /// leaves the list, the slot and the input untouched.
    pub fn submit(&mut self) -> Submit {
        if !self.options.allow_blank && self.input.trim().is_empty() {
            tracing::debug!("Rejected blank task");
            self.prompt.notify(BLANK_REJECTED);
            return Submit::Rejected;
        }

        let text = std::mem::take(&mut self.input);
        self.store.add(text);
        tracing::debug!(count = self.store.len(), "Added task");
        self.persist();
        self.render();
        Submit::Added
    }

    /// Flip a task by storage index. Out-of-range indexes are ignored.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.store.toggle(index) {
            Ok(done) => {
                tracing::debug!(index, done, "Toggled task");
                self.persist();
                self.render();
                true
            }
            Err(e) => {
                tracing::warn!("Ignoring toggle: {}", e);
                false
            }
        }
    }

    /// Flip the task shown at a display position (0 is the newest).
    pub fn toggle_row(&mut self, position: usize) -> bool {
        let Some(index) = self.rows.get(position).map(|row| row.index) else {
            tracing::warn!(position, rows = self.rows.len(), "Ignoring toggle of missing row");
            return false;
        };
        self.toggle(index)
    }

    /// Remove completed tasks after confirmation.
    pub fn clean(&mut self) -> BulkOutcome {
        if !self.prompt.confirm(CONFIRM_CLEAN) {
            return BulkOutcome::Declined;
        }
        let removed = self.store.remove_done();
        tracing::debug!(removed, "Removed completed tasks");
        self.persist();
        self.render();
        BulkOutcome::Removed(removed)
    }

    /// Remove every task after confirmation.
    pub fn empty(&mut self) -> BulkOutcome {
        if !self.prompt.confirm(CONFIRM_EMPTY) {
            return BulkOutcome::Declined;
        }
        let removed = self.store.clear();
        tracing::debug!(removed, "Removed all tasks");
        self.persist();
        self.render();
        BulkOutcome::Removed(removed)
    }

    /// Re-render the current list without changing it.
    pub fn render(&mut self) {
        self.rows = project_rows(self.store.tasks(), &self.options.formatter);
        if let Err(e) = self.renderer.render(&self.rows) {
            tracing::warn!("Failed to render task list: {}", e);
        }
    }

    // The in-memory list stays authoritative when the write fails.
    fn persist(&mut self) {
        if let Err(e) = self.persistence.save(self.store.tasks()) {
            tracing::error!("Failed to save task list: {:#}", e);
            self.prompt
                .notify(&format!("Could not save tasks, changes will be lost on exit: {}", e));
        }
    }
}
