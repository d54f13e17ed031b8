//! The chain handle returned by [`FormValidator::field`].

use super::{Condition, FormValidator};
use crate::foundation::{FieldValue, Rule, Transform};
use crate::rules::{self, CharClass, IpVersion, Operand};
use crate::transforms::{Capitalize, Lowercase, Sanitizer, TitleCase, Trim, Uppercase};

/// Handle on the selected field.
///
/// Every method consumes the handle and returns it, so calls chain
/// regardless of earlier failures. The handle refers to its field by
/// position in the validator's field map, never by reference.
///
/// # Examples
///
/// ```
/// use formcheck_validator::prelude::*;
///
/// let mut form = FormValidator::new([("nick", "  CrAb "), ("age", "12")]);
/// let nick = form.field("nick").required().alpha().to_lower();
/// assert!(nick.is_valid());
/// assert_eq!(nick.value().as_text(), Some("crab"));
///
/// let age = nick.field("age").integer().min_value(18.0);
/// assert_eq!(age.first_error(), "Please enter a value greater than 18");
/// ```
#[derive(Debug)]
pub struct FieldChain<'a> {
    form: &'a mut FormValidator,
    index: usize,
}

impl<'a> FieldChain<'a> {
    pub(super) fn new(form: &'a mut FormValidator, index: usize) -> Self {
        Self { form, index }
    }

    // ========================================================================
    // Core
    // ========================================================================

    /// Runs any rule against the field.
    pub fn check<R: Rule>(self, rule: R) -> Self {
        self.form.apply_rule(self.index, &rule);
        self
    }

    /// Rewrites the field value with a transform.
    pub fn transform<T: Transform>(self, transform: T) -> Self {
        self.form.apply_transform(self.index, &transform);
        self
    }

    /// Applies a sanitizer, using the validator's override if one is installed.
    pub fn sanitize(self, kind: Sanitizer) -> Self {
        self.form.apply_sanitizer(self.index, kind);
        self
    }

    /// Empties the field unless `condition` holds. Records nothing.
    pub fn when(self, condition: Condition) -> Self {
        self.form.apply_gate(self.index, &condition);
        self
    }

    /// Selects another field.
    pub fn field(self, name: &str) -> Self {
        let index = self.form.select(name);
        Self {
            form: self.form,
            index,
        }
    }

    /// Overwrites the field value. The value is stored as given.
    pub fn set_value(self, value: impl Into<FieldValue>) -> Self {
        self.form.set_value_at(self.index, value.into());
        self
    }

    /// Records an error found outside the chain, such as a uniqueness
    /// check against a datastore. Marks both the chain and the group invalid.
    pub fn set_error(self, message: impl Into<String>) -> Self {
        self.form.chain_valid = false;
        self.form.record_error(self.index, message.into());
        self
    }

    /// Releases the handle.
    pub fn finish(self) -> &'a mut FormValidator {
        self.form
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Name of the selected field.
    #[must_use]
    pub fn name(&self) -> &str {
        self.form.name_at(self.index)
    }

    /// Current value of the selected field.
    #[must_use]
    pub fn value(&self) -> &FieldValue {
        self.form.value_at(self.index)
    }

    /// Whether the chain has passed so far.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.form.is_valid()
    }

    /// Whether every rule run so far, on any field, has passed.
    #[must_use]
    pub fn is_group_valid(&self) -> bool {
        self.form.is_group_valid()
    }

    /// Errors recorded for the selected field.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        self.form.errors_at(self.index)
    }

    /// First error recorded for the selected field, or `""`.
    #[must_use]
    pub fn first_error(&self) -> &str {
        self.errors().first().map_or("", String::as_str)
    }

    // ========================================================================
    // Rules
    // ========================================================================

    /// See [`rules::Required`].
    pub fn required(self) -> Self {
        self.check(rules::required())
    }

    /// See [`rules::Email`].
    pub fn email(self) -> Self {
        self.check(rules::email())
    }

    /// See [`rules::Url`].
    pub fn url(self) -> Self {
        self.check(rules::url())
    }

    /// See [`rules::Alpha`].
    pub fn alpha(self) -> Self {
        self.check(rules::alpha())
    }

    /// See [`rules::Text`].
    pub fn text(self) -> Self {
        self.check(rules::text())
    }

    /// See [`rules::MinSize`].
    pub fn min_size(self, size: usize) -> Self {
        self.check(rules::min_size(size))
    }

    /// See [`rules::MaxSize`].
    pub fn max_size(self, size: usize) -> Self {
        self.check(rules::max_size(size))
    }

    /// See [`rules::Integer`].
    pub fn integer(self) -> Self {
        self.check(rules::integer())
    }

    /// See [`rules::Float`].
    pub fn float(self) -> Self {
        self.check(rules::float())
    }

    /// See [`rules::Number`].
    pub fn number(self) -> Self {
        self.check(rules::number())
    }

    /// See [`rules::Boolean`].
    pub fn boolean(self) -> Self {
        self.check(rules::boolean())
    }

    /// See [`rules::MinValue`].
    pub fn min_value(self, min: f64) -> Self {
        self.check(rules::min_value(min))
    }

    /// See [`rules::MaxValue`].
    pub fn max_value(self, max: f64) -> Self {
        self.check(rules::max_value(max))
    }

    /// See [`rules::OneOf`].
    pub fn one_of<I, S>(self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.check(rules::one_of(items))
    }

    /// See [`rules::Equal`].
    pub fn equal(self, operand: impl Into<Operand>) -> Self {
        self.check(rules::equal(operand))
    }

    /// See [`rules::IsIn`].
    pub fn is_in(self, operand: impl Into<Operand>) -> Self {
        self.check(rules::is_in(operand))
    }

    /// See [`rules::Matches`].
    pub fn matches(self, pattern: &str) -> Self {
        self.check(rules::matches(pattern))
    }

    /// See [`rules::Chars`].
    pub fn chars(self, classes: impl IntoIterator<Item = CharClass>) -> Self {
        self.check(rules::chars(classes))
    }

    /// See [`rules::Ip`].
    pub fn ip(self, version: IpVersion) -> Self {
        self.check(rules::ip(version))
    }

    /// See [`rules::DateTime`].
    pub fn datetime(self, format: &str) -> Self {
        self.check(rules::datetime(format))
    }

    /// See [`rules::ConvertDate`].
    pub fn convert_date(self, input: &str, output: &str, timezone: Option<&str>) -> Self {
        self.check(rules::convert_date(input, output, timezone))
    }

    /// See [`rules::Callback`].
    pub fn callback<F>(self, predicate: F) -> Self
    where
        F: Fn(&FieldValue) -> bool,
    {
        self.check(rules::callback(predicate))
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// Lowercases the value.
    pub fn to_lower(self) -> Self {
        self.transform(Lowercase)
    }

    /// Uppercases the value.
    pub fn to_upper(self) -> Self {
        self.transform(Uppercase)
    }

    /// Uppercases the first character of each word.
    pub fn to_title(self) -> Self {
        self.transform(TitleCase)
    }

    /// Uppercases the first character.
    pub fn to_capital(self) -> Self {
        self.transform(Capitalize)
    }

    /// Trims surrounding whitespace.
    pub fn trim(self) -> Self {
        self.transform(Trim)
    }

    /// [`Sanitizer::EscAttr`]
    pub fn esc_attr(self) -> Self {
        self.sanitize(Sanitizer::EscAttr)
    }

    /// [`Sanitizer::EscHtml`]
    pub fn esc_html(self) -> Self {
        self.sanitize(Sanitizer::EscHtml)
    }

    /// [`Sanitizer::EscJs`]
    pub fn esc_js(self) -> Self {
        self.sanitize(Sanitizer::EscJs)
    }

    /// [`Sanitizer::EscTextarea`]
    pub fn esc_textarea(self) -> Self {
        self.sanitize(Sanitizer::EscTextarea)
    }

    /// [`Sanitizer::EscUrl`]
    pub fn esc_url(self) -> Self {
        self.sanitize(Sanitizer::EscUrl)
    }

    /// [`Sanitizer::SanitizeText`]
    pub fn sanitize_text_field(self) -> Self {
        self.sanitize(Sanitizer::SanitizeText)
    }

    /// [`Sanitizer::SanitizeTitle`]
    pub fn sanitize_title(self) -> Self {
        self.sanitize(Sanitizer::SanitizeTitle)
    }

    /// [`Sanitizer::SanitizeEmail`]
    pub fn sanitize_email(self) -> Self {
        self.sanitize(Sanitizer::SanitizeEmail)
    }

    /// [`Sanitizer::SanitizeHtmlClass`]
    pub fn sanitize_html_class(self) -> Self {
        self.sanitize(Sanitizer::SanitizeHtmlClass)
    }

    /// [`Sanitizer::SanitizeUrl`]
    pub fn sanitize_url(self) -> Self {
        self.sanitize(Sanitizer::SanitizeUrl)
    }
}
