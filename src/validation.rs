//! Field-level validation rules shared by the entry form and the CLI

/// A single rule applied to a text value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRule {
    /// Value must contain something other than whitespace
    Required(String),
    /// Value must not exceed the given number of characters
    MaxChars(usize, String),
}

impl FieldRule {
    pub fn required(message: &str) -> Self {
        FieldRule::Required(message.to_string())
    }

    pub fn max_chars(limit: usize, message: &str) -> Self {
        FieldRule::MaxChars(limit, message.to_string())
    }

    /// Check a value against this rule
    pub fn check(&self, value: &str) -> Result<(), String> {
        match self {
            FieldRule::Required(message) => {
                if value.trim().is_empty() {
                    return Err(message.clone());
                }
            }
            FieldRule::MaxChars(limit, message) => {
                if value.chars().count() > *limit {
                    return Err(message.clone());
                }
            }
        }
        Ok(())
    }
}

/// Apply rules in order and return the first failure
pub fn check_all(rules: &[FieldRule], value: &str) -> Result<(), String> {
    rules.iter().try_for_each(|rule| rule.check(value))
}
