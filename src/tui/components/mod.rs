//! Reusable UI components for the category TUI

pub mod category_table;
pub mod file_picker;
pub mod form_field;
pub mod notification;
pub mod row_editor;

pub use category_table::CategoryTableView;
pub use file_picker::FilePicker;
pub use form_field::{Form, FormField};
pub use notification::{NoticeKind, Notification};
pub use row_editor::RowEditor;
