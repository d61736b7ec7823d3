//! Main TUI application state and logic

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame, Terminal,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;
use tracing::{debug, info};

use super::{
    events::{self, AppEvent},
    handlers::CommonKeyHandler,
    screens::{CategoryTableScreen, EntryFormScreen},
    traits::{ScreenAction, ScreenView},
    components::Notification,
    ui::{centered_rect, Styles},
};
use crate::api::CategoryApi;
use crate::config::Config;

const TICK_RATE: Duration = Duration::from_millis(200);
const HELP_RECENT_MESSAGES: usize = 5;

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    EntryForm,
    CategoryTable,
}

impl Screen {
    pub const ALL: [Screen; 2] = [Screen::EntryForm, Screen::CategoryTable];

    pub fn title(&self) -> &'static str {
        match self {
            Screen::EntryForm => "Category Form",
            Screen::CategoryTable => "Category Table",
        }
    }

    fn index(&self) -> usize {
        match self {
            Screen::EntryForm => 0,
            Screen::CategoryTable => 1,
        }
    }
}

/// Main TUI application state
pub struct App {
    /// Current active screen
    pub current_screen: Screen,
    /// Application configuration
    pub config: Config,

    // Screen states
    pub entry_form: EntryFormScreen,
    pub category_table: CategoryTableScreen,

    // Global application state
    pub should_quit: bool,
    pub show_help_popup: bool,
    events: UnboundedReceiver<AppEvent>,
}

impl App {
    /// Create a new TUI application; no screen is mounted until `start`
    pub fn new(config: Config, api: Arc<dyn CategoryApi>) -> Self {
        let (sender, events) = events::channel();
        Self {
            current_screen: Screen::EntryForm,
            entry_form: EntryFormScreen::new(&config, Arc::clone(&api), sender.clone()),
            category_table: CategoryTableScreen::new(&config, api, sender),
            config,
            should_quit: false,
            show_help_popup: false,
            events,
        }
    }

    /// Mount the first screen
    pub fn start(&mut self, screen: Screen) {
        info!("Starting on {}", screen.title());
        self.current_screen = screen;
        self.screen_mut().on_enter();
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut terminal_events = EventStream::new();
        let mut ticker = tokio::time::interval(TICK_RATE);

        loop {
            terminal.draw(|f| self.draw(f))?;

            tokio::select! {
                maybe_event = terminal_events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key_event(key);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                Some(event) = self.events.recv() => {
                    self.handle_app_event(event, Instant::now());
                }
                _ = ticker.tick() => {
                    self.tick(Instant::now());
                }
            }

            if self.should_quit {
                break;
            }
        }

        self.screen_mut().on_exit();
        Ok(())
    }

    fn screen_mut(&mut self) -> &mut dyn ScreenView {
        match self.current_screen {
            Screen::EntryForm => &mut self.entry_form,
            Screen::CategoryTable => &mut self.category_table,
        }
    }

    fn screen(&self) -> &dyn ScreenView {
        match self.current_screen {
            Screen::EntryForm => &self.entry_form,
            Screen::CategoryTable => &self.category_table,
        }
    }

    /// Notification banner of the current screen
    fn notification(&self) -> &Notification {
        match self.current_screen {
            Screen::EntryForm => &self.entry_form.notification,
            Screen::CategoryTable => &self.category_table.notification,
        }
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if self.show_help_popup && key.code == KeyCode::Esc {
            self.show_help_popup = false;
            return;
        }

        let action = match CommonKeyHandler::handle_global_keys(key) {
            Some(action) => action,
            None if self.show_help_popup => ScreenAction::None,
            None => self.screen_mut().handle_key_event(key),
        };

        match action {
            ScreenAction::NavigateTo(screen) => self.navigate_to_screen(screen),
            ScreenAction::ToggleHelp => self.show_help_popup = !self.show_help_popup,
            ScreenAction::Quit => {
                info!("Quit requested");
                self.should_quit = true;
            }
            ScreenAction::None => {}
        }
    }

    /// Route a finished request to the screen that started it
    pub fn handle_app_event(&mut self, event: AppEvent, now: Instant) {
        match event {
            AppEvent::Form(event) => self.entry_form.apply_event(event, now),
            AppEvent::Table(event) => self.category_table.apply_event(event, now),
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.entry_form.tick(now);
        self.category_table.tick(now);
    }

    /// Unmount the current screen and mount another
    pub fn navigate_to_screen(&mut self, screen: Screen) {
        if screen == self.current_screen {
            return;
        }
        debug!("Navigating from {:?} to {:?}", self.current_screen, screen);
        self.screen_mut().on_exit();
        self.current_screen = screen;
        self.show_help_popup = false;
        self.screen_mut().on_enter();
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_tabs(f, chunks[0]);
        self.screen_mut().draw(f, chunks[1]);
        self.draw_status_bar(f, chunks[2]);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn draw_tabs(&self, f: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Screen::ALL
            .iter()
            .enumerate()
            .map(|(i, screen)| Line::from(format!("F{} {}", i + 2, screen.title())))
            .collect();

        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL))
            .select(self.current_screen.index())
            .highlight_style(Styles::title());

        f.render_widget(tabs, area);
    }

    /// Draw status bar with the active shortcuts
    fn draw_status_bar(&self, f: &mut Frame, area: Rect) {
        let status = Line::from(vec![
            Span::styled(self.current_screen.title(), Styles::info()),
            Span::raw(" | F1: Help | F2/F3: Switch | Ctrl+Q: Quit | "),
            Span::styled(self.config.api.base_url.as_str(), Styles::inactive()),
        ]);

        let status_bar = Paragraph::new(status).block(Block::default().borders(Borders::ALL));
        f.render_widget(status_bar, area);
    }

    /// Draw help popup with context-sensitive shortcuts
    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 60, area);

        f.render_widget(Clear, popup_area);

        let help_popup = Paragraph::new(self.get_context_help())
            .block(
                Block::default()
                    .title("Help - Context Shortcuts")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        f.render_widget(help_popup, popup_area);
    }

    fn get_context_help(&self) -> String {
        let global_help = "Global Shortcuts:\n\
            F1 - Toggle this help (Esc closes)\n\
            F2 - Category form\n\
            F3 - Category table\n\
            Ctrl+C / Ctrl+Q - Quit\n\n";

        let mut help = format!("{}{}", global_help, self.screen().help_text());

        let recent = self.notification().recent_lines(HELP_RECENT_MESSAGES);
        if !recent.is_empty() {
            help.push_str("\n\nRecent messages:\n");
            help.push_str(&recent.join("\n"));
        }
        help
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{ApiCall, MockCategoryApi};
    use crate::models::Category;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn app() -> (App, Arc<MockCategoryApi>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.upload_dir = dir.path().to_path_buf();

        let api = Arc::new(MockCategoryApi::new(vec![Category::new(
            "C1", "Grocery", "Chain", "Test",
        )]));
        (App::new(config, api.clone()), api, dir)
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        app.handle_key_event(KeyEvent::new(code, modifiers));
    }

    fn rendered(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_table_loads_when_mounted() {
        let (mut app, api, _dir) = app();
        app.start(Screen::CategoryTable);

        let event = app.events.recv().await.unwrap();
        app.handle_app_event(event, Instant::now());

        assert_eq!(api.calls(), vec![ApiCall::List]);
        assert_eq!(app.category_table.categories.len(), 1);
        assert!(rendered(&mut app).contains("Grocery"));
    }

    #[tokio::test]
    async fn test_leaving_table_resets_it() {
        let (mut app, _api, _dir) = app();
        app.start(Screen::CategoryTable);
        let event = app.events.recv().await.unwrap();
        app.handle_app_event(event, Instant::now());
        app.category_table.enter_edit("C1");

        press(&mut app, KeyCode::F(2), KeyModifiers::NONE);
        assert_eq!(app.current_screen, Screen::EntryForm);
        assert!(app.category_table.categories.is_empty());
        assert!(app.category_table.editors.is_empty());

        press(&mut app, KeyCode::F(3), KeyModifiers::NONE);
        assert_eq!(app.current_screen, Screen::CategoryTable);
        assert!(app.category_table.is_loading());
    }

    #[tokio::test]
    async fn test_help_popup_swallows_screen_keys() {
        let (mut app, _api, _dir) = app();
        app.start(Screen::EntryForm);

        press(&mut app, KeyCode::F(1), KeyModifiers::NONE);
        assert!(app.show_help_popup);
        assert!(rendered(&mut app).contains("Help - Context Shortcuts"));

        press(&mut app, KeyCode::Char('x'), KeyModifiers::NONE);
        assert!(app.entry_form.form.fields[0].value().is_empty());

        press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(!app.show_help_popup);
        press(&mut app, KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(app.entry_form.form.fields[0].value(), "x");
    }

    #[tokio::test]
    async fn test_help_lists_messages_after_banner_hides() {
        let (mut app, _api, _dir) = app();
        app.start(Screen::EntryForm);
        assert!(!app.get_context_help().contains("Recent messages:"));

        let start = Instant::now();
        app.entry_form.notification.error("Error uploading file.", start);
        app.tick(start + Duration::from_secs(10));
        assert!(!app.entry_form.notification.is_visible());

        press(&mut app, KeyCode::F(1), KeyModifiers::NONE);
        let help = app.get_context_help();
        assert!(help.contains("Recent messages:"));
        assert!(help.contains("✗ Error uploading file."));
        assert!(rendered(&mut app).contains("Error uploading file."));
    }

    #[tokio::test]
    async fn test_ctrl_q_quits() {
        let (mut app, _api, _dir) = app();
        app.start(Screen::EntryForm);
        assert!(rendered(&mut app).contains("Category Entry Form"));

        press(&mut app, KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }
}
