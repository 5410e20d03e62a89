//! Domain models for tickoff.
//!
//! - [`Task`]: one to-do entry with its text, creation time and done flag.
//!
//! Storage order is creation order (oldest first). Display order is the
//! reverse; see [`crate::render`].

mod task;

pub use task::*;
