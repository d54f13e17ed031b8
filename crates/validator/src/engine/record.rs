//! Field records.

use crate::foundation::FieldValue;

/// One named slot of input: its current value and the errors recorded
/// against it.
///
/// The name is fixed at creation and the error list only grows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldRecord {
    name: String,
    value: FieldValue,
    errors: Vec<String>,
}

impl FieldRecord {
    /// Creates a record with no errors.
    pub fn new(name: impl Into<String>, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            value,
            errors: Vec::new(),
        }
    }

    /// The field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current value.
    #[must_use]
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Errors recorded so far, oldest first.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// The first recorded error, if any.
    #[must_use]
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }

    pub(crate) fn set_value(&mut self, value: FieldValue) {
        self.value = value;
    }

    pub(crate) fn take_value(&mut self) -> FieldValue {
        std::mem::take(&mut self.value)
    }

    pub(crate) fn push_error(&mut self, message: String) {
        self.errors.push(message);
    }
}
