//! Category table screen with inline edit-in-place
//!
//! Each row is either viewed or edited. Edits are buffered per uid and only
//! reach the displayed list through a save followed by a fresh fetch.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::TableState,
    Frame,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::api::CategoryApi;
use crate::config::Config;
use crate::models::{Category, CategoryChanges};
use crate::tui::{
    app::Screen,
    components::{CategoryTableView, Notification, RowEditor},
    events::{AppEvent, EventSender, TableEvent},
    handlers::CommonKeyHandler,
    operations::{RequestKind, RequestTracker},
    traits::{FormHandler, Navigable, ScreenAction, ScreenView},
};

pub const UPDATE_SUCCESS: &str = "Category updated successfully!";
pub const UPDATE_REJECTED: &str = "Error: Unable to update the category.";
pub const UPDATE_FAILED: &str = "An error occurred while updating the category.";
pub const LOAD_FAILED: &str = "An error occurred while loading categories.";

/// Category table screen state
pub struct CategoryTableScreen {
    api: Arc<dyn CategoryApi>,
    events: EventSender,
    pub categories: Vec<Category>,
    pub state: TableState,
    /// Rows in edit state, by uid
    pub editors: HashMap<String, RowEditor>,
    /// Buffered edits, by uid then field
    pub pending: HashMap<String, CategoryChanges>,
    pub notification: Notification,
    requests: RequestTracker,
}

impl CategoryTableScreen {
    pub fn new(config: &Config, api: Arc<dyn CategoryApi>, events: EventSender) -> Self {
        Self {
            api,
            events,
            categories: Vec::new(),
            state: TableState::default(),
            editors: HashMap::new(),
            pending: HashMap::new(),
            notification: Notification::new(config.table_notice_delay()),
            requests: RequestTracker::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.requests.is_in_flight(&RequestKind::Fetch)
    }

    pub fn is_saving(&self, uid: &str) -> bool {
        self.requests.is_in_flight(&RequestKind::Save(uid.to_string()))
    }

    pub fn is_editing(&self, uid: &str) -> bool {
        self.editors.contains_key(uid)
    }

    pub fn selected_uid(&self) -> Option<&str> {
        self.state
            .selected()
            .and_then(|i| self.categories.get(i))
            .map(|category| category.uid.as_str())
    }

    /// Fetch the whole list; an older fetch still running is superseded
    pub fn refresh(&mut self) {
        debug!("Fetching categories");
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        self.requests.start(RequestKind::Fetch, move |ticket| async move {
            let result = api.list_categories().await;
            events.send(AppEvent::Table(TableEvent::Loaded { ticket, result }));
        });
    }

    /// Put a row into edit state, pre-filled with its current values
    pub fn enter_edit(&mut self, uid: &str) -> bool {
        if self.editors.contains_key(uid) {
            return false;
        }
        match self.categories.iter().find(|c| c.uid == uid) {
            Some(category) => {
                debug!("Editing category {}", uid);
                self.editors.insert(uid.to_string(), RowEditor::new(category));
                true
            }
            None => false,
        }
    }

    /// Send the buffered edits of a row. Returns true when a request was
    /// started.
    pub fn save(&mut self, uid: &str) -> bool {
        if !self.editors.contains_key(uid) {
            return false;
        }
        if self.is_saving(uid) {
            debug!("Save of {} ignored, already in flight", uid);
            return false;
        }

        let changes = self.pending.get(uid).cloned().unwrap_or_default();
        info!("Saving category {} ({} changed field(s))", uid, changes.len());

        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        let uid = uid.to_string();
        self.requests
            .start(RequestKind::Save(uid.clone()), move |ticket| async move {
                let result = api.update_category(&uid, &changes).await;
                events.send(AppEvent::Table(TableEvent::Saved { ticket, uid, result }));
            });
        true
    }

    /// Buffer the focused input's value of the row being edited
    fn record_edit(&mut self, uid: &str) {
        let Some(editor) = self.editors.get(uid) else {
            return;
        };
        if let Some(field) = editor.current_field() {
            let value = editor.value(field).unwrap_or_default().to_string();
            self.pending
                .entry(uid.to_string())
                .or_default()
                .set(field, value);
        }
    }

    fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;

        let present = |uid: &String| self.categories.iter().any(|c| &c.uid == uid);
        self.editors.retain(|uid, _| present(uid));
        self.pending.retain(|uid, _| present(uid));

        let selected = match self.state.selected() {
            _ if self.categories.is_empty() => None,
            Some(i) => Some(i.min(self.categories.len() - 1)),
            None => Some(0),
        };
        self.state.select(selected);
    }

    /// Apply a finished request; results of cancelled or superseded
    /// requests are dropped
    pub fn apply_event(&mut self, event: TableEvent, now: Instant) {
        match event {
            TableEvent::Loaded { ticket, result } => {
                if !self.requests.finish(&RequestKind::Fetch, ticket) {
                    return;
                }
                match result {
                    Ok(categories) => {
                        info!("Loaded {} categories", categories.len());
                        self.set_categories(categories);
                    }
                    Err(e) => {
                        error!("Error fetching categories: {}", e);
                        self.notification.error(LOAD_FAILED, now);
                    }
                }
            }
            TableEvent::Saved {
                ticket,
                uid,
                result,
            } => {
                if !self.requests.finish(&RequestKind::Save(uid.clone()), ticket) {
                    return;
                }
                match result {
                    Ok(()) => {
                        info!("Category {} updated", uid);
                        self.editors.remove(&uid);
                        self.pending.remove(&uid);
                        self.notification.success(UPDATE_SUCCESS, now);
                        self.refresh();
                    }
                    Err(e) if e.is_rejection() => {
                        warn!("Update of category {} rejected: {}", uid, e);
                        self.notification.error(UPDATE_REJECTED, now);
                    }
                    Err(e) => {
                        error!("Error updating category {}: {}", uid, e);
                        self.notification.error(UPDATE_FAILED, now);
                    }
                }
            }
        }
    }

    /// Drop in-flight work and everything fetched or edited
    pub fn reset(&mut self) {
        self.requests.cancel_all();
        self.categories.clear();
        self.editors.clear();
        self.pending.clear();
        self.state.select(None);
        self.notification.dismiss();
    }

    fn handle_editor_key(&mut self, uid: &str, key: KeyEvent) {
        let Some(editor) = self.editors.get_mut(uid) else {
            return;
        };
        let edits_value = matches!(
            key.code,
            KeyCode::Char(_) | KeyCode::Backspace | KeyCode::Delete
        );
        if CommonKeyHandler::handle_form_keys(editor, key) && edits_value {
            self.record_edit(uid);
        }
    }
}

impl Navigable for CategoryTableScreen {
    fn navigate_up(&mut self) {
        if self.categories.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.categories.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    fn navigate_down(&mut self) {
        if self.categories.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + 1) % self.categories.len(),
            None => 0,
        };
        self.state.select(Some(i));
    }

    fn get_selected_index(&self) -> Option<usize> {
        self.state.selected()
    }

    fn set_selected_index(&mut self, index: Option<usize>) {
        self.state.select(index);
    }

    fn get_item_count(&self) -> usize {
        self.categories.len()
    }
}

impl ScreenView for CategoryTableScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(area);

        let is_loading = self.is_loading();
        let title = if is_loading {
            "Category Table - Loading...".to_string()
        } else {
            format!("Category Table ({})", self.categories.len())
        };

        let requests = &self.requests;
        let saving = |uid: &str| requests.is_in_flight(&RequestKind::Save(uid.to_string()));
        let view = CategoryTableView {
            categories: &self.categories,
            editors: &self.editors,
            saving: &saving,
            title,
            is_loading,
        };
        view.render(f, chunks[0], &mut self.state);

        self.notification.render(f, chunks[1]);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('r') {
                self.refresh();
            }
            return ScreenAction::None;
        }

        if CommonKeyHandler::handle_navigation_keys(self, key) {
            return ScreenAction::None;
        }

        let Some(uid) = self.selected_uid().map(str::to_string) else {
            return ScreenAction::None;
        };

        match key.code {
            KeyCode::Enter if self.is_editing(&uid) => {
                self.save(&uid);
            }
            KeyCode::Enter => {
                self.enter_edit(&uid);
            }
            _ if self.is_editing(&uid) => self.handle_editor_key(&uid, key),
            _ => {}
        }
        ScreenAction::None
    }

    fn screen_type(&self) -> Screen {
        Screen::CategoryTable
    }

    fn on_enter(&mut self) {
        self.refresh();
    }

    fn on_exit(&mut self) {
        self.reset();
    }

    fn tick(&mut self, now: Instant) {
        self.notification.tick(now);
    }

    fn help_text(&self) -> &'static str {
        "Category Table:\n\
        ↑/↓ - Select row\n\
        PgUp/PgDn - First / last row\n\
        Enter - Edit row, or save an edited row\n\
        Tab / Shift+Tab - Move between inputs of an edited row\n\
        Ctrl+R - Reload categories"
    }
}
