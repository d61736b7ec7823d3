//! Core traits for the category TUI
//!
//! These traits give the two screens and their editable components a common
//! shape so the app shell and the key handlers can treat them uniformly.

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use tokio::time::Instant;

use crate::tui::app::Screen as ScreenType;

/// Actions that can be returned from screen event handling
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    /// Navigate to a different screen
    NavigateTo(ScreenType),
    /// Show or hide the help popup
    ToggleHelp,
    /// Quit the application
    Quit,
    /// No action taken
    None,
}

/// Core trait for all TUI screens
pub trait ScreenView {
    /// Draw the screen content
    fn draw(&mut self, f: &mut Frame, area: Rect);

    /// Handle keyboard input and return an action for the shell
    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction;

    /// Get the screen type identifier
    fn screen_type(&self) -> ScreenType;

    /// Called when the screen is mounted
    fn on_enter(&mut self) {}

    /// Called when the screen is unmounted; in-flight work is abandoned
    fn on_exit(&mut self) {}

    /// Periodic tick used for timers
    fn tick(&mut self, _now: Instant) {}

    /// Context help shown in the popup
    fn help_text(&self) -> &'static str;
}

/// Trait for screens with navigable lists
pub trait Navigable {
    /// Move selection up
    fn navigate_up(&mut self);

    /// Move selection down
    fn navigate_down(&mut self);

    /// Get currently selected index
    fn get_selected_index(&self) -> Option<usize>;

    /// Set selected index
    fn set_selected_index(&mut self, index: Option<usize>);

    /// Get total number of items
    fn get_item_count(&self) -> usize;

    /// Navigate to first item
    fn navigate_to_first(&mut self) {
        if self.get_item_count() > 0 {
            self.set_selected_index(Some(0));
        }
    }

    /// Navigate to last item
    fn navigate_to_last(&mut self) {
        let count = self.get_item_count();
        if count > 0 {
            self.set_selected_index(Some(count - 1));
        }
    }
}

/// Trait for groups of text inputs with one focused input
pub trait FormHandler {
    /// Get current field index
    fn get_current_field(&self) -> usize;

    /// Set current field
    fn set_current_field(&mut self, field: usize);

    /// Get total number of fields
    fn get_field_count(&self) -> usize;

    /// Move to next field
    fn next_field(&mut self) {
        let current = self.get_current_field();
        let total = self.get_field_count();
        if total > 0 {
            self.set_current_field((current + 1) % total);
        }
    }

    /// Move to previous field
    fn previous_field(&mut self) {
        let current = self.get_current_field();
        let total = self.get_field_count();
        if total > 0 {
            self.set_current_field(if current == 0 { total - 1 } else { current - 1 });
        }
    }

    /// Mutable access to the focused input
    fn current_input_mut(&mut self) -> Option<&mut crate::tui::ui::InputField>;

    /// Handle character input for current field
    fn handle_char_input(&mut self, c: char) {
        if let Some(input) = self.current_input_mut() {
            input.insert_char(c);
        }
    }

    /// Handle backspace for current field
    fn handle_backspace(&mut self) {
        if let Some(input) = self.current_input_mut() {
            input.delete_char();
        }
    }

    /// Handle delete for current field
    fn handle_delete(&mut self) {
        if let Some(input) = self.current_input_mut() {
            input.delete_char_forward();
        }
    }
}
