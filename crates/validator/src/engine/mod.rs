//! The validation engine
//!
//! [`FormValidator`] owns every [`FieldRecord`], the cursor, the chain and
//! group validity flags and the [`GroupErrors`] aggregate. Rules never touch
//! that state: they return a [`Verdict`] and the engine does the
//! bookkeeping.
//!
//! ```text
//! FormValidator::new(input)
//!     └── field("email")  ──► FieldChain (cursor = "email", chain valid)
//!             ├── required()     rule      ──► Verdict ──► errors / flags
//!             ├── to_lower()     transform ──► value rewrite
//!             └── when(cond)     gate      ──► value emptied if closed
//! ```

mod chain;
mod errors;
mod gate;
mod record;

pub use chain::FieldChain;
pub use errors::{GroupErrors, OWN_ERRORS_KEY};
pub use gate::{Comparator, Condition, ParseComparatorError};
pub use record::FieldRecord;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace};

use crate::foundation::{
    FieldValue, FormError, MessageCatalog, Rule, RuleContext, Transform, Verdict,
};
use crate::transforms::{Sanitizer, Sanitizers};

static EMPTY_VALUE: FieldValue = FieldValue::Empty;

// ============================================================================
// FORM VALIDATOR
// ============================================================================

/// Fluent, stateful validator over a key/value submission.
///
/// # Examples
///
/// ```rust
/// use formcheck_validator::prelude::*;
///
/// let mut form = FormValidator::new([
///     ("user_name", "  ferris "),
///     ("email", "ferris@example"),
///     ("password", "hunter2"),
///     ("password_again", "hunter3"),
/// ]);
///
/// form.field("user_name").required().alpha().min_size(3);
/// form.field("email").required().email();
/// form.field("password_again").equal(Operand::field("password"));
///
/// assert!(!form.is_group_valid());
/// assert_eq!(form.value("user_name").and_then(FieldValue::as_text), Some("ferris"));
/// assert_eq!(form.all_errors(), ["Please enter a valid email", "Fields did not match"]);
/// ```
#[derive(Debug, Clone)]
pub struct FormValidator {
    fields: IndexMap<String, FieldRecord>,
    cursor: Option<usize>,
    chain_valid: bool,
    group_valid: bool,
    group_errors: GroupErrors,
    messages: MessageCatalog,
    sanitizers: Sanitizers,
}

impl Default for FormValidator {
    fn default() -> Self {
        FormValidatorBuilder::default().build(std::iter::empty::<(String, FieldValue)>())
    }
}

impl FormValidator {
    /// Builds a validator with the default messages and sanitizers.
    ///
    /// Text values are trimmed; lists and maps are stored unchanged.
    pub fn new<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self::builder().build(values)
    }

    /// Starts a builder for custom messages or sanitizers.
    #[must_use]
    pub fn builder() -> FormValidatorBuilder {
        FormValidatorBuilder::default()
    }

    /// Builds a validator from a JSON object of field values.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotAnObject`] unless `input` is an object.
    pub fn from_json(input: &Value) -> Result<Self, FormError> {
        Self::builder().build_json(input)
    }

    /// Parses JSON text and builds a validator from it.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Json`] on malformed JSON and
    /// [`FormError::NotAnObject`] unless the document is an object.
    pub fn from_json_str(input: &str) -> Result<Self, FormError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_json(&value)
    }

    /// Selects a field and returns the chain handle for it.
    ///
    /// A field that does not exist yet is created with an empty value.
    /// Selecting resets chain validity but keeps recorded errors.
    pub fn field(&mut self, name: &str) -> FieldChain<'_> {
        let index = self.select(name);
        FieldChain::new(self, index)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Current value of a field.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name).map(FieldRecord::value)
    }

    /// Current value of the selected field, `None` before any selection.
    #[must_use]
    pub fn current_value(&self) -> Option<&FieldValue> {
        self.cursor.map(|index| self.value_at(index))
    }

    /// Name of the selected field.
    #[must_use]
    pub fn current_field(&self) -> Option<&str> {
        self.cursor.map(|index| self.name_at(index))
    }

    /// Errors recorded for a field; empty for unknown fields.
    #[must_use]
    pub fn errors(&self, name: &str) -> &[String] {
        self.fields
            .get(name)
            .map(FieldRecord::errors)
            .unwrap_or_default()
    }

    /// Errors recorded for a field, joined with `joiner`.
    #[must_use]
    pub fn errors_joined(&self, name: &str, joiner: &str) -> String {
        self.errors(name).join(joiner)
    }

    /// First error recorded for a field, or `""`.
    #[must_use]
    pub fn first_error(&self, name: &str) -> &str {
        self.fields
            .get(name)
            .and_then(FieldRecord::first_error)
            .unwrap_or_default()
    }

    /// Every recorded message in field-then-message order.
    #[must_use]
    pub fn all_errors(&self) -> Vec<&str> {
        self.group_errors.messages().collect()
    }

    /// Every recorded message joined with `joiner`.
    #[must_use]
    pub fn all_errors_joined(&self, joiner: &str) -> String {
        self.group_errors.joined(joiner)
    }

    /// Whether the chain on the selected field has passed so far.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.chain_valid
    }

    /// Whether every rule run so far, on any field, has passed.
    #[must_use]
    pub fn is_group_valid(&self) -> bool {
        self.group_valid
    }

    /// The group-level error aggregate.
    #[must_use]
    pub fn group_errors(&self) -> &GroupErrors {
        &self.group_errors
    }

    /// All field records in input order, lazily created fields last.
    pub fn fields(&self) -> impl Iterator<Item = &FieldRecord> {
        self.fields.values()
    }

    /// All field names in input order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// The message catalog of this instance.
    #[must_use]
    pub fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    /// The sanitizer overrides of this instance.
    #[must_use]
    pub fn sanitizers(&self) -> &Sanitizers {
        &self.sanitizers
    }

    // ------------------------------------------------------------------------
    // Engine internals driven by FieldChain
    // ------------------------------------------------------------------------

    fn select(&mut self, name: &str) -> usize {
        let index = match self.fields.get_index_of(name) {
            Some(index) => index,
            None => {
                debug!(field = name, "creating missing field");
                let (index, _) = self
                    .fields
                    .insert_full(name.to_owned(), FieldRecord::new(name, FieldValue::Empty));
                index
            }
        };
        trace!(field = name, "field selected");
        self.cursor = Some(index);
        self.chain_valid = true;
        index
    }

    fn value_at(&self, index: usize) -> &FieldValue {
        self.fields
            .get_index(index)
            .map_or(&EMPTY_VALUE, |(_, record)| record.value())
    }

    fn name_at(&self, index: usize) -> &str {
        self.fields
            .get_index(index)
            .map_or("", |(name, _)| name.as_str())
    }

    fn errors_at(&self, index: usize) -> &[String] {
        self.fields
            .get_index(index)
            .map(|(_, record)| record.errors())
            .unwrap_or_default()
    }

    fn apply_rule<R: Rule + ?Sized>(&mut self, index: usize, rule: &R) {
        let verdict = {
            let Some((name, record)) = self.fields.get_index(index) else {
                return;
            };
            let value = record.value();

            if rule.runs_on_empty() {
                if !self.chain_valid {
                    trace!(field = %name, rule = rule.code(), "skipped after earlier failure");
                    return;
                }
            } else if value.is_empty() {
                trace!(field = %name, rule = rule.code(), "skipped on empty value");
                return;
            }

            let verdict = rule.evaluate(value, &RuleContext::new(&self.fields, name));
            match &verdict.error {
                Some(error) => debug!(
                    field = %name,
                    rule = rule.code(),
                    code = %error.code,
                    "rule failed"
                ),
                None => trace!(field = %name, rule = rule.code(), "rule passed"),
            }
            verdict
        };

        let Verdict { error, value } = verdict;
        if let Some(value) = value {
            self.set_value_at(index, value);
        }
        if let Some(error) = error {
            let message = match rule.message_override() {
                Some(message) if !message.is_empty() => message.to_owned(),
                _ => self.messages.render(&error),
            };
            self.chain_valid = false;
            self.record_error(index, message);
        }
    }

    fn apply_transform<T: Transform + ?Sized>(&mut self, index: usize, transform: &T) {
        let Some((name, record)) = self.fields.get_index_mut(index) else {
            return;
        };
        if record.value().is_empty() {
            return;
        }
        let value = record.take_value();
        record.set_value(value.map_text(&|text: &str| transform.apply(text)));
        trace!(field = %name, "value transformed");
    }

    fn apply_sanitizer(&mut self, index: usize, kind: Sanitizer) {
        let sanitizer = self.sanitizers.bind(kind);
        self.apply_transform(index, &sanitizer);
    }

    fn apply_gate(&mut self, index: usize, condition: &Condition) {
        let blocker = {
            let Some((name, _)) = self.fields.get_index(index) else {
                return;
            };
            condition
                .first_failure(&RuleContext::new(&self.fields, name))
                .map(str::to_owned)
        };
        if let Some(blocker) = blocker {
            debug!(
                field = self.name_at(index),
                blocker = %blocker,
                comparator = %condition.comparator(),
                "gate closed, value emptied"
            );
            self.set_value_at(index, FieldValue::Empty);
        }
    }

    fn set_value_at(&mut self, index: usize, value: FieldValue) {
        if let Some((_, record)) = self.fields.get_index_mut(index) {
            record.set_value(value);
        }
    }

    fn record_error(&mut self, index: usize, message: String) {
        if let Some((name, record)) = self.fields.get_index_mut(index) {
            self.group_errors.record(name, message.clone());
            record.push_error(message);
        }
        self.group_valid = false;
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for a [`FormValidator`] with custom messages or sanitizers.
///
/// ```rust
/// use formcheck_validator::prelude::*;
///
/// let mut form = FormValidator::builder()
///     .message("required", "Missing!")
///     .sanitizer(Sanitizer::SanitizeTitle, |s: &str| s.replace(' ', "+"))
///     .build([("title", "Hello World"), ("body", "")]);
///
/// form.field("body").required();
/// form.field("title").sanitize_title();
/// assert_eq!(form.first_error("body"), "Missing!");
/// assert_eq!(form.value("title").and_then(FieldValue::as_text), Some("Hello+World"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormValidatorBuilder {
    messages: MessageCatalog,
    sanitizers: Sanitizers,
}

impl FormValidatorBuilder {
    /// Replaces the whole message catalog.
    #[must_use = "builder methods must be chained or built"]
    pub fn messages(mut self, messages: MessageCatalog) -> Self {
        self.messages = messages;
        self
    }

    /// Overrides the default message of one rule code.
    #[must_use = "builder methods must be chained or built"]
    pub fn message(mut self, code: impl Into<String>, template: impl Into<String>) -> Self {
        self.messages.set(code.into(), template.into());
        self
    }

    /// Replaces the whole sanitizer table.
    #[must_use = "builder methods must be chained or built"]
    pub fn sanitizers(mut self, sanitizers: Sanitizers) -> Self {
        self.sanitizers = sanitizers;
        self
    }

    /// Installs one sanitizer override.
    #[must_use = "builder methods must be chained or built"]
    pub fn sanitizer<F>(mut self, kind: Sanitizer, sanitizer: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.sanitizers.set(kind, sanitizer);
        self
    }

    /// Builds the validator from field values. Text values are trimmed.
    pub fn build<I, K, V>(self, values: I) -> FormValidator
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let fields = values
            .into_iter()
            .map(|(name, value)| {
                let name = name.into();
                let record = FieldRecord::new(name.clone(), value.into().trimmed());
                (name, record)
            })
            .collect();

        FormValidator {
            fields,
            cursor: None,
            chain_valid: true,
            group_valid: true,
            group_errors: GroupErrors::new(),
            messages: self.messages,
            sanitizers: self.sanitizers,
        }
    }

    /// Builds the validator from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotAnObject`] unless `input` is an object.
    pub fn build_json(self, input: &Value) -> Result<FormValidator, FormError> {
        let Value::Object(entries) = input else {
            return Err(FormError::NotAnObject {
                found: json_kind(input),
            });
        };
        Ok(self.build(
            entries
                .iter()
                .map(|(name, value)| (name.clone(), FieldValue::from(value.clone()))),
        ))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
