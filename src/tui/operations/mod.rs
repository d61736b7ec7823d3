//! Async operation management for the category TUI
//!
//! Screens spawn their network calls through a [`RequestTracker`] so results
//! of cancelled or superseded requests can be recognised and dropped.

pub mod request_tracker;

pub use request_tracker::{RequestKind, RequestTracker, Ticket};
