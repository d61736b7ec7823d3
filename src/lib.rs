//! category-desk: a terminal client for the category REST API
//!
//! The crate is split into the HTTP layer (`api`), the record types
//! (`models`, `validation`), configuration, the headless command line
//! (`cli`) and the interactive terminal UI (`tui`).

pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod tui;
pub mod validation;
