//! Inline editor for one table row

use crate::models::{Category, CategoryField};
use crate::tui::{traits::FormHandler, ui::InputField};

/// Text inputs for the mutable fields of a row in edit state
#[derive(Debug, Clone)]
pub struct RowEditor {
    pub uid: String,
    inputs: Vec<(CategoryField, InputField)>,
    current: usize,
}

impl RowEditor {
    /// Start editing, pre-filled with the row's current values
    pub fn new(category: &Category) -> Self {
        let inputs = CategoryField::MUTABLE
            .iter()
            .map(|&field| {
                (
                    field,
                    InputField::new(field.label()).with_value(category.get(field)),
                )
            })
            .collect();

        let mut editor = Self {
            uid: category.uid.clone(),
            inputs,
            current: 0,
        };
        editor.update_focus();
        editor
    }

    fn update_focus(&mut self) {
        let current = self.current;
        for (i, (_, input)) in self.inputs.iter_mut().enumerate() {
            input.set_focus(i == current);
        }
    }

    /// Field the keyboard is editing
    pub fn current_field(&self) -> Option<CategoryField> {
        self.inputs.get(self.current).map(|(field, _)| *field)
    }

    pub fn value(&self, field: CategoryField) -> Option<&str> {
        self.input(field).map(|input| input.value.as_str())
    }

    pub fn input(&self, field: CategoryField) -> Option<&InputField> {
        self.inputs
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, input)| input)
    }
}

impl FormHandler for RowEditor {
    fn get_current_field(&self) -> usize {
        self.current
    }

    fn set_current_field(&mut self, field: usize) {
        if field < self.inputs.len() {
            self.current = field;
            self.update_focus();
        }
    }

    fn get_field_count(&self) -> usize {
        self.inputs.len()
    }

    fn current_input_mut(&mut self) -> Option<&mut InputField> {
        self.inputs.get_mut(self.current).map(|(_, input)| input)
    }
}
