//! Category table widget with inline edit cells

use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};
use std::collections::HashMap;

use super::row_editor::RowEditor;
use crate::models::{Category, CategoryField};
use crate::tui::ui::Styles;

const HEADERS: [&str; 5] = ["UID", "Retail Store Type", "Store Types", "Description", "Actions"];

/// Borrowed view of the table screen's state for one draw
pub struct CategoryTableView<'a> {
    pub categories: &'a [Category],
    pub editors: &'a HashMap<String, RowEditor>,
    pub saving: &'a dyn Fn(&str) -> bool,
    pub title: String,
    pub is_loading: bool,
}

impl<'a> CategoryTableView<'a> {
    fn action_label(&self, uid: &str) -> &'static str {
        if (self.saving)(uid) {
            "Saving..."
        } else if self.editors.contains_key(uid) {
            "[Save]"
        } else {
            "[Edit]"
        }
    }

    fn row(&self, category: &'a Category) -> Row<'a> {
        let editor = self.editors.get(&category.uid);

        let mut cells = vec![Cell::from(category.uid.as_str())];
        for field in CategoryField::MUTABLE {
            let cell = match editor.and_then(|e| e.input(field)) {
                Some(input) if input.is_focused => {
                    Cell::from(Span::styled(input.display_with_caret(), Styles::editing()))
                }
                Some(input) => Cell::from(Span::styled(input.value.clone(), Styles::warning())),
                None => Cell::from(category.get(field)),
            };
            cells.push(cell);
        }

        let action_style = if editor.is_some() {
            Styles::warning()
        } else {
            Styles::info()
        };
        cells.push(Cell::from(Span::styled(self.action_label(&category.uid), action_style)));

        Row::new(cells)
    }

    pub fn render(&self, f: &mut Frame, area: Rect, state: &mut TableState) {
        let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h)))
            .style(Styles::title())
            .bottom_margin(1);

        let rows: Vec<Row> = if self.categories.is_empty() {
            let message = if self.is_loading {
                "Loading categories..."
            } else {
                "No categories"
            };
            vec![Row::new(vec![Cell::from(Span::styled(message, Styles::inactive()))])]
        } else {
            self.categories.iter().map(|c| self.row(c)).collect()
        };

        let widths = [
            Constraint::Length(12),
            Constraint::Percentage(22),
            Constraint::Percentage(22),
            Constraint::Percentage(36),
            Constraint::Length(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .title(self.title.as_str())
                    .borders(Borders::ALL),
            )
            .highlight_style(Styles::selected())
            .highlight_symbol("> ");

        f.render_stateful_widget(table, area, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_label_follows_row_state() {
        let categories = vec![
            Category::new("A", "r", "s", "d"),
            Category::new("B", "r", "s", "d"),
            Category::new("C", "r", "s", "d"),
        ];
        let mut editors = HashMap::new();
        editors.insert("B".to_string(), RowEditor::new(&categories[1]));
        editors.insert("C".to_string(), RowEditor::new(&categories[2]));
        let saving = |uid: &str| uid == "C";

        let view = CategoryTableView {
            categories: &categories,
            editors: &editors,
            saving: &saving,
            title: "Categories".to_string(),
            is_loading: false,
        };

        assert_eq!(view.action_label("A"), "[Edit]");
        assert_eq!(view.action_label("B"), "[Save]");
        assert_eq!(view.action_label("C"), "Saving...");
    }
}
