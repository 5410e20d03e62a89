//! A small to-do list: an ordered task store, a durable slot that mirrors
//! it, and a renderer that projects it newest-first.
//!
//! [`controller::TodoController`] wires the pieces together. It is the only
//! type with side effects on what the user sees.

pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod format;
pub mod models;
pub mod persistence;
pub mod render;
pub mod store;
