//! Common event handlers for the category TUI
//!
//! Reusable key handling shared by the screens and the app shell.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::traits::{FormHandler, Navigable, ScreenAction};
use crate::tui::app::Screen;

/// Common keyboard event handling utilities
pub struct CommonKeyHandler;

impl CommonKeyHandler {
    /// Handle keys that work on every screen
    pub fn handle_global_keys(key: KeyEvent) -> Option<ScreenAction> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => Some(ScreenAction::Quit),
            KeyCode::F(1) => Some(ScreenAction::ToggleHelp),
            KeyCode::F(2) => Some(ScreenAction::NavigateTo(Screen::EntryForm)),
            KeyCode::F(3) => Some(ScreenAction::NavigateTo(Screen::CategoryTable)),
            _ => None,
        }
    }

    /// Handle list navigation; returns true when the key was consumed
    pub fn handle_navigation_keys<T: Navigable>(navigable: &mut T, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up => navigable.navigate_up(),
            KeyCode::Down => navigable.navigate_down(),
            KeyCode::PageUp => navigable.navigate_to_first(),
            KeyCode::PageDown => navigable.navigate_to_last(),
            _ => return false,
        }
        true
    }

    /// Handle field focus and text editing; returns true when the key was
    /// consumed. Control-modified characters are left to the caller.
    pub fn handle_form_keys<T: FormHandler>(form: &mut T, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.previous_field(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                form.handle_char_input(c)
            }
            KeyCode::Backspace => form.handle_backspace(),
            KeyCode::Delete => form.handle_delete(),
            KeyCode::Left => Self::with_input(form, |input| input.move_cursor_left()),
            KeyCode::Right => Self::with_input(form, |input| input.move_cursor_right()),
            KeyCode::Home => Self::with_input(form, |input| input.move_cursor_to_start()),
            KeyCode::End => Self::with_input(form, |input| input.move_cursor_to_end()),
            _ => return false,
        }
        true
    }

    fn with_input<T: FormHandler>(form: &mut T, f: impl FnOnce(&mut crate::tui::ui::InputField)) {
        if let Some(input) = form.current_input_mut() {
            f(input);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::ui::InputField;

    struct TwoInputs {
        inputs: [InputField; 2],
        current: usize,
    }

    impl FormHandler for TwoInputs {
        fn get_current_field(&self) -> usize {
            self.current
        }

        fn set_current_field(&mut self, field: usize) {
            self.current = field;
        }

        fn get_field_count(&self) -> usize {
            self.inputs.len()
        }

        fn current_input_mut(&mut self) -> Option<&mut InputField> {
            self.inputs.get_mut(self.current)
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_form_keys_type_and_cycle_focus() {
        let mut form = TwoInputs {
            inputs: [InputField::new("a"), InputField::new("b")],
            current: 0,
        };

        assert!(CommonKeyHandler::handle_form_keys(&mut form, key(KeyCode::Char('x'))));
        assert!(CommonKeyHandler::handle_form_keys(&mut form, key(KeyCode::Tab)));
        assert!(CommonKeyHandler::handle_form_keys(&mut form, key(KeyCode::Char('y'))));
        assert!(CommonKeyHandler::handle_form_keys(&mut form, key(KeyCode::Tab)));

        assert_eq!(form.current, 0);
        assert_eq!(form.inputs[0].value, "x");
        assert_eq!(form.inputs[1].value, "y");
    }

    #[test]
    fn test_form_keys_leave_control_chords_alone() {
        let mut form = TwoInputs {
            inputs: [InputField::new("a"), InputField::new("b")],
            current: 0,
        };
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(!CommonKeyHandler::handle_form_keys(&mut form, ctrl_s));
        assert!(form.inputs[0].is_empty());
    }

    #[test]
    fn test_global_keys() {
        assert_eq!(
            CommonKeyHandler::handle_global_keys(key(KeyCode::F(3))),
            Some(ScreenAction::NavigateTo(Screen::CategoryTable))
        );
        assert_eq!(
            CommonKeyHandler::handle_global_keys(KeyEvent::new(
                KeyCode::Char('q'),
                KeyModifiers::CONTROL
            )),
            Some(ScreenAction::Quit)
        );
        assert_eq!(CommonKeyHandler::handle_global_keys(key(KeyCode::Char('q'))), None);
    }
}
