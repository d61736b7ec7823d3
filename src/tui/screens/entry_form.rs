//! Category entry form screen
//!
//! Four validated text inputs that create a category, plus a spreadsheet
//! picker for bulk import. Both report through one notification banner.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::api::{read_upload_file, CategoryApi};
use crate::config::Config;
use crate::models::{Category, CategoryField};
use crate::tui::{
    app::Screen,
    components::{FilePicker, Form, FormField, Notification},
    events::{AppEvent, EventSender, FormEvent},
    handlers::CommonKeyHandler,
    operations::{RequestKind, RequestTracker},
    traits::{FormHandler, ScreenAction, ScreenView},
    ui::Styles,
};

pub const SUBMIT_SUCCESS: &str = "Category submitted successfully!";
pub const SUBMIT_REJECTED: &str = "Error: Unable to submit the category.";
pub const SUBMIT_FAILED: &str = "An error occurred while submitting the category.";
pub const UPLOAD_SUCCESS: &str = "Excel file uploaded successfully!";
pub const UPLOAD_REJECTED: &str = "Error uploading file.";
pub const UPLOAD_FAILED: &str = "An error occurred while uploading the file.";

/// Which part of the screen receives typing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormFocus {
    Fields,
    FilePicker,
}

/// Entry form screen state
pub struct EntryFormScreen {
    api: Arc<dyn CategoryApi>,
    events: EventSender,
    pub form: Form,
    pub focus: FormFocus,
    pub file_picker: FilePicker,
    pub notification: Notification,
    requests: RequestTracker,
}

fn category_form() -> Form {
    Form::new(
        CategoryField::ALL
            .iter()
            .map(|&field| {
                FormField::new(field.label(), field.rules()).with_placeholder(field.placeholder())
            })
            .collect(),
    )
}

impl EntryFormScreen {
    pub fn new(config: &Config, api: Arc<dyn CategoryApi>, events: EventSender) -> Self {
        Self {
            api,
            events,
            form: category_form(),
            focus: FormFocus::Fields,
            file_picker: FilePicker::new(&config.upload_dir),
            notification: Notification::new(config.form_notice_delay()),
            requests: RequestTracker::new(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.requests.is_in_flight(&RequestKind::Submit)
    }

    pub fn is_uploading(&self) -> bool {
        self.requests.is_in_flight(&RequestKind::Upload)
    }

    /// Upload is enabled once a file is chosen and no upload is running
    pub fn can_upload(&self) -> bool {
        self.file_picker.has_selection() && !self.is_uploading()
    }

    fn set_focus(&mut self, focus: FormFocus) {
        self.focus = focus;
        self.form.set_focused(focus == FormFocus::Fields);
        self.file_picker.is_focused = focus == FormFocus::FilePicker;
    }

    /// Record built from the current input values, as typed
    pub fn category(&self) -> Category {
        let mut category = Category::default();
        for (field, input) in CategoryField::ALL.iter().zip(&self.form.fields) {
            let value = input.value().to_string();
            match field {
                CategoryField::Uid => category.uid = value,
                CategoryField::RetailStoreType => category.retail_store_type = value,
                CategoryField::StoreTypes => category.store_types = value,
                CategoryField::Description => category.description = value,
            }
        }
        category
    }

    /// Validate and send the form. Returns true when a request was started.
    pub fn submit(&mut self) -> bool {
        if self.is_submitting() {
            debug!("Submit ignored, a submission is already in flight");
            return false;
        }

        if !self.form.validate_all() {
            debug!("Submit blocked by validation: {:?}", self.form.errors());
            return false;
        }

        let category = self.category();
        info!("Submitting category {}", category.uid);

        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        self.requests.start(RequestKind::Submit, move |ticket| async move {
            let result = api.create_category(&category).await;
            events.send(AppEvent::Form(FormEvent::Submitted { ticket, result }));
        });
        true
    }

    /// Send the chosen spreadsheet. Returns true when a request was started.
    pub fn upload(&mut self) -> bool {
        if self.is_uploading() {
            debug!("Upload ignored, an upload is already in flight");
            return false;
        }

        let Some(path) = self.file_picker.selected_file.clone() else {
            debug!("Upload ignored, no file selected");
            return false;
        };

        info!("Uploading {}", path.display());

        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        self.requests.start(RequestKind::Upload, move |ticket| async move {
            let result = match read_upload_file(&path).await {
                Ok(file) => api.upload_spreadsheet(file).await,
                Err(e) => Err(e),
            };
            events.send(AppEvent::Form(FormEvent::Uploaded { ticket, result }));
        });
        true
    }

    /// Apply a finished request; results of cancelled requests are dropped
    pub fn apply_event(&mut self, event: FormEvent, now: Instant) {
        match event {
            FormEvent::Submitted { ticket, result } => {
                if !self.requests.finish(&RequestKind::Submit, ticket) {
                    return;
                }
                match result {
                    Ok(()) => {
                        info!("Category submitted");
                        self.form.reset();
                        self.notification.success(SUBMIT_SUCCESS, now);
                    }
                    Err(e) if e.is_rejection() => {
                        warn!("Category submission rejected: {}", e);
                        self.notification.error(SUBMIT_REJECTED, now);
                    }
                    Err(e) => {
                        error!("Error submitting category: {}", e);
                        self.notification.error(SUBMIT_FAILED, now);
                    }
                }
            }
            FormEvent::Uploaded { ticket, result } => {
                if !self.requests.finish(&RequestKind::Upload, ticket) {
                    return;
                }
                match result {
                    Ok(()) => {
                        info!("Spreadsheet uploaded");
                        self.notification.success(UPLOAD_SUCCESS, now);
                    }
                    Err(e) if e.is_rejection() => {
                        warn!("Spreadsheet upload rejected: {}", e);
                        self.notification.error(UPLOAD_REJECTED, now);
                    }
                    Err(e) => {
                        error!("Error uploading Excel file: {}", e);
                        self.notification.error(UPLOAD_FAILED, now);
                    }
                }
            }
        }
    }

    /// Drop in-flight work and return to the initial state
    pub fn reset(&mut self) {
        self.requests.cancel_all();
        self.form.reset();
        self.file_picker.clear_selection();
        self.notification.dismiss();
        self.set_focus(FormFocus::Fields);
    }

    fn handle_fields_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.submit();
            }
            KeyCode::Tab if self.form.is_last_field() => self.set_focus(FormFocus::FilePicker),
            KeyCode::BackTab if self.form.get_current_field() == 0 => {
                self.set_focus(FormFocus::FilePicker)
            }
            _ => {
                CommonKeyHandler::handle_form_keys(&mut self.form, key);
            }
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => {
                self.form.set_current_field(0);
                self.set_focus(FormFocus::Fields);
            }
            KeyCode::BackTab => {
                let last = self.form.get_field_count().saturating_sub(1);
                self.form.set_current_field(last);
                self.set_focus(FormFocus::Fields);
            }
            KeyCode::Up => self.file_picker.files.previous(),
            KeyCode::Down => self.file_picker.files.next(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(path) = self.file_picker.select_highlighted() {
                    debug!("Selected {}", path.display());
                }
            }
            _ => {}
        }
    }

    fn draw_form(&self, f: &mut Frame, area: Rect) {
        let title = if self.is_submitting() {
            "Category Entry Form - Submitting..."
        } else {
            "Category Entry Form"
        };
        let block = Block::default()
            .title(Span::styled(title, Styles::title()))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let mut constraints = vec![Constraint::Length(3); self.form.fields.len()];
        constraints.push(Constraint::Length(1));
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (field, row) in self.form.fields.iter().zip(rows.iter()) {
            field.render(f, *row);
        }

        let (hint, style) = if self.is_submitting() {
            ("Submitting...", Styles::inactive())
        } else {
            ("Enter / Ctrl+S: Submit", Styles::info())
        };
        if let Some(row) = rows.last() {
            f.render_widget(
                Paragraph::new(Span::styled(hint, style)).alignment(Alignment::Center),
                *row,
            );
        }
    }

    fn draw_upload(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        self.file_picker.render(f, chunks[0]);

        let button = if self.is_uploading() {
            Span::styled("Uploading...", Styles::inactive())
        } else if self.can_upload() {
            Span::styled("Ctrl+U: Upload Excel", Styles::success())
        } else {
            Span::styled("Upload Excel (choose a file first)", Styles::inactive())
        };
        f.render_widget(
            Paragraph::new(Line::from(button)).alignment(Alignment::Center),
            chunks[1],
        );
    }
}

impl ScreenView for EntryFormScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3 * self.form.fields.len() as u16 + 3),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(area);

        self.draw_form(f, chunks[0]);
        self.draw_upload(f, chunks[1]);
        self.notification.render(f, chunks[2]);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => {
                    self.submit();
                }
                KeyCode::Char('u') => {
                    self.upload();
                }
                KeyCode::Char('r') => self.file_picker.rescan(),
                _ => {}
            }
            return ScreenAction::None;
        }

        match self.focus {
            FormFocus::Fields => self.handle_fields_key(key),
            FormFocus::FilePicker => self.handle_picker_key(key),
        }
        ScreenAction::None
    }

    fn screen_type(&self) -> Screen {
        Screen::EntryForm
    }

    fn on_enter(&mut self) {
        self.file_picker.rescan();
    }

    fn on_exit(&mut self) {
        self.reset();
    }

    fn tick(&mut self, now: Instant) {
        self.notification.tick(now);
    }

    fn help_text(&self) -> &'static str {
        "Entry Form:\n\
        Tab / Shift+Tab - Move between inputs and file list\n\
        Enter - Submit (in an input)\n\
        Ctrl+S - Submit\n\
        ↑/↓ - Move in file list\n\
        Enter / Space - Choose file\n\
        Ctrl+R - Rescan files\n\
        Ctrl+U - Upload chosen file"
    }
}
