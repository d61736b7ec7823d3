//! Spreadsheet file picker

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::models::SpreadsheetKind;
use crate::tui::ui::{SelectableList, Styles};

/// How deep below the root directory files are listed
const MAX_SCAN_DEPTH: usize = 3;

/// Lists `.xlsx`/`.xls` files below a directory and tracks the chosen one
pub struct FilePicker {
    pub root: PathBuf,
    pub files: SelectableList<PathBuf>,
    pub selected_file: Option<PathBuf>,
    pub is_focused: bool,
}

impl FilePicker {
    pub fn new(root: &Path) -> Self {
        let mut picker = Self {
            root: root.to_path_buf(),
            files: SelectableList::new(Vec::new()),
            selected_file: None,
            is_focused: false,
        };
        picker.rescan();
        picker
    }

    /// Re-read the directory; a chosen file that disappeared is dropped
    pub fn rescan(&mut self) {
        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .max_depth(MAX_SCAN_DEPTH)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry while scanning {}: {}", self.root.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| SpreadsheetKind::from_path(path).is_some())
            .collect();
        files.sort();

        debug!("Found {} spreadsheet(s) under {}", files.len(), self.root.display());

        if let Some(ref chosen) = self.selected_file {
            if !files.contains(chosen) {
                self.selected_file = None;
            }
        }
        self.files.set_items(files);
    }

    /// Choose the highlighted file
    pub fn select_highlighted(&mut self) -> Option<&Path> {
        self.selected_file = self.files.selected().cloned();
        self.selected_file.as_deref()
    }

    pub fn clear_selection(&mut self) {
        self.selected_file = None;
    }

    pub fn has_selection(&self) -> bool {
        self.selected_file.is_some()
    }

    fn display_name(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = if self.files.is_empty() {
            vec![ListItem::new(Span::styled(
                "No .xlsx or .xls files found (Ctrl+R to rescan)",
                Styles::inactive(),
            ))]
        } else {
            self.files
                .items
                .iter()
                .enumerate()
                .map(|(i, path)| {
                    let chosen = self.selected_file.as_ref() == Some(path);
                    let marker = if chosen { "[x] " } else { "[ ] " };
                    let style = if self.is_focused && Some(i) == self.files.selected_index() {
                        Styles::selected()
                    } else if chosen {
                        Styles::success()
                    } else {
                        Style::default()
                    };
                    ListItem::new(Line::from(Span::styled(
                        format!("{}{}", marker, self.display_name(path)),
                        style,
                    )))
                })
                .collect()
        };

        let title = match self.selected_file {
            Some(ref path) => format!("Excel File - selected: {}", self.display_name(path)),
            None => "Excel File (.xlsx, .xls)".to_string(),
        };

        let border_style = if self.is_focused {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let list = List::new(items).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style),
        );

        f.render_stateful_widget(list, area, &mut self.files.state);
    }
}
