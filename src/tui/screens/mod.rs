//! Screen modules for the category TUI

pub mod category_table;
pub mod entry_form;

pub use category_table::CategoryTableScreen;
pub use entry_form::EntryFormScreen;
