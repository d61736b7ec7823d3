//! Form field component for validated user input

use ratatui::{layout::Rect, widgets::Block, Frame};

use crate::tui::{
    traits::FormHandler,
    ui::{InputField, Styles},
};
use crate::validation::{check_all, FieldRule};

/// Text input with validation rules and an inline error
#[derive(Debug, Clone)]
pub struct FormField {
    pub input: InputField,
    pub rules: Vec<FieldRule>,
    pub validation_error: Option<String>,
}

impl FormField {
    pub fn new(label: &str, rules: Vec<FieldRule>) -> Self {
        Self {
            input: InputField::new(label),
            rules,
            validation_error: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.input.placeholder = placeholder.to_string();
        self
    }

    pub fn value(&self) -> &str {
        &self.input.value
    }

    pub fn set_value(&mut self, value: &str) {
        self.input.set_value(value);
        self.validation_error = None;
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.validation_error = None;
    }

    /// Validate field value, recording the error inline
    pub fn validate(&mut self) -> bool {
        self.validation_error = check_all(&self.rules, &self.input.value).err();
        self.validation_error.is_none()
    }

    /// Render the form field; the error is shown in the title
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let block = match self.validation_error {
            Some(ref error) => Block::default()
                .title(format!("{} - Error: {}", self.input.label, error))
                .title_style(Styles::error()),
            None => Block::default().title(self.input.label.as_str()),
        };
        self.input.render_with_block(f, area, block);
    }
}

/// Form container that manages multiple fields
#[derive(Debug, Clone)]
pub struct Form {
    pub fields: Vec<FormField>,
    pub current_field: usize,
    pub is_focused: bool,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        let mut form = Self {
            fields,
            current_field: 0,
            is_focused: true,
        };
        form.update_focus();
        form
    }

    fn update_focus(&mut self) {
        let focused = self.is_focused;
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.input.set_focus(focused && i == self.current_field);
        }
    }

    /// Give or take keyboard focus from the whole form
    pub fn set_focused(&mut self, focused: bool) {
        self.is_focused = focused;
        self.update_focus();
    }

    pub fn is_last_field(&self) -> bool {
        self.current_field + 1 == self.fields.len()
    }

    /// Validate all fields; every field gets its own error
    pub fn validate_all(&mut self) -> bool {
        let mut all_valid = true;
        for field in &mut self.fields {
            if !field.validate() {
                all_valid = false;
            }
        }
        all_valid
    }

    /// Return to the initial empty state
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.clear();
        }
        self.current_field = 0;
        self.update_focus();
    }

    pub fn errors(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter_map(|field| field.validation_error.as_deref())
            .collect()
    }
}

impl FormHandler for Form {
    fn get_current_field(&self) -> usize {
        self.current_field
    }

    fn set_current_field(&mut self, field: usize) {
        if field < self.fields.len() {
            self.current_field = field;
            self.update_focus();
        }
    }

    fn get_field_count(&self) -> usize {
        self.fields.len()
    }

    fn current_input_mut(&mut self) -> Option<&mut InputField> {
        self.fields
            .get_mut(self.current_field)
            .map(|field| &mut field.input)
    }

    fn handle_char_input(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.current_field) {
            field.input.insert_char(c);
            field.validation_error = None;
        }
    }

    fn handle_backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.current_field) {
            field.input.delete_char();
            field.validation_error = None;
        }
    }

    fn handle_delete(&mut self) {
        if let Some(field) = self.fields.get_mut(self.current_field) {
            field.input.delete_char_forward();
            field.validation_error = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> Form {
        Form::new(vec![
            FormField::new("UID", vec![FieldRule::required("UID is required")]),
            FormField::new("Description", vec![FieldRule::required("Description is required")]),
        ])
    }

    #[test]
    fn test_validate_all_marks_each_failing_field() {
        let mut form = sample_form();
        form.fields[1].set_value("filled");

        assert!(!form.validate_all());
        assert_eq!(form.errors(), vec!["UID is required"]);
    }

    #[test]
    fn test_typing_clears_field_error() {
        let mut form = sample_form();
        form.validate_all();
        form.handle_char_input('A');
        assert_eq!(form.fields[0].validation_error, None);
        assert!(form.fields[1].validation_error.is_some());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut form = sample_form();
        form.handle_char_input('A');
        form.next_field();
        form.handle_char_input('B');
        form.reset();

        assert!(form.fields.iter().all(|field| field.value().is_empty()));
        assert_eq!(form.current_field, 0);
        assert!(form.fields[0].input.is_focused);
    }

    #[test]
    fn test_unfocused_form_has_no_focused_input() {
        let mut form = sample_form();
        form.set_focused(false);
        assert!(form.fields.iter().all(|field| !field.input.is_focused));
        form.set_focused(true);
        assert!(form.fields[0].input.is_focused);
    }
}
