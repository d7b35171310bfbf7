//! Corkboard: a kanban project tracker.
//!
//! The crate has two halves. The server side ([`api`] over [`db`])
//! exposes boards, columns, tasks, users and search as a JSON REST
//! surface backed by SQLite. The client side ([`client`]) is the
//! UI-independent core of a front end: optimistic state with rollback,
//! drag-and-drop ordering, session persistence and debounced search.

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod types;
