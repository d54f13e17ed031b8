//! Core traits for the rule contract
//!
//! A [`Rule`] looks at the current value of the selected field and returns a
//! [`Verdict`]. It never touches engine state: the engine decides whether the
//! rule runs at all (emptiness-skip), and does every piece of bookkeeping on
//! failure (chain validity, group validity, error lists).

use indexmap::IndexMap;

use crate::engine::FieldRecord;
use crate::foundation::{FieldValue, ValidationError};

// ============================================================================
// VERDICT
// ============================================================================

/// Outcome of a single rule evaluation.
///
/// The tuple of the rule contract: whether the value passed, an optional
/// replacement value, and the error describing a failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Verdict {
    /// `Some` when the rule failed.
    pub error: Option<ValidationError>,
    /// `Some` when the rule wants the field value replaced.
    pub value: Option<FieldValue>,
}

impl Verdict {
    /// The value passed and stays as it is.
    #[must_use]
    pub fn pass() -> Self {
        Self::default()
    }

    /// The value failed.
    #[must_use]
    pub fn fail(error: impl Into<ValidationError>) -> Self {
        Self {
            error: Some(error.into()),
            value: None,
        }
    }

    /// Pass when `ok`, otherwise fail with the lazily built error.
    pub fn check(ok: bool, error: impl FnOnce() -> ValidationError) -> Self {
        if ok { Self::pass() } else { Self::fail(error()) }
    }

    /// The value passed and is replaced.
    #[must_use]
    pub fn rewrite(value: FieldValue) -> Self {
        Self {
            error: None,
            value: Some(value),
        }
    }

    /// Attaches a replacement value to any verdict.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_value(mut self, value: FieldValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Returns `true` when no error was produced.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

// ============================================================================
// RULE CONTEXT
// ============================================================================

/// Read-only view of the engine handed to rules.
///
/// Cross-field rules (`equal`, `is_in`) resolve other fields through it.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    fields: &'a IndexMap<String, FieldRecord>,
    current: &'a str,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn new(fields: &'a IndexMap<String, FieldRecord>, current: &'a str) -> Self {
        Self { fields, current }
    }

    /// Name of the field being validated.
    #[must_use]
    pub fn field_name(&self) -> &'a str {
        self.current
    }

    /// Stored value of another field, `None` if it was never provided or selected.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<&'a FieldValue> {
        self.fields.get(name).map(FieldRecord::value)
    }

    /// Returns `true` if a field with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

// ============================================================================
// RULE TRAIT
// ============================================================================

/// A validation step that plugs into a field chain.
///
/// # Examples
///
/// ```rust
/// use formcheck_validator::foundation::{FieldValue, Rule, RuleContext, ValidationError, Verdict};
///
/// struct NoSpaces;
///
/// impl Rule for NoSpaces {
///     fn code(&self) -> &'static str {
///         "no_spaces"
///     }
///
///     fn evaluate(&self, value: &FieldValue, _ctx: &RuleContext<'_>) -> Verdict {
///         Verdict::check(value.all_text(&mut |s| !s.contains(' ')), || {
///             ValidationError::new("no_spaces", "Spaces are not allowed")
///         })
///     }
/// }
/// ```
pub trait Rule {
    /// Identifier used for the default message lookup and for logging.
    fn code(&self) -> &'static str;

    /// Evaluates the rule against the current value.
    fn evaluate(&self, value: &FieldValue, ctx: &RuleContext<'_>) -> Verdict;

    /// Whether the rule runs on empty values. Only `required` says yes.
    fn runs_on_empty(&self) -> bool {
        false
    }

    /// Custom message that replaces the default one on failure.
    fn message_override(&self) -> Option<&str> {
        None
    }
}

impl<R: Rule + ?Sized> Rule for &R {
    fn code(&self) -> &'static str {
        (**self).code()
    }

    fn evaluate(&self, value: &FieldValue, ctx: &RuleContext<'_>) -> Verdict {
        (**self).evaluate(value, ctx)
    }

    fn runs_on_empty(&self) -> bool {
        (**self).runs_on_empty()
    }

    fn message_override(&self) -> Option<&str> {
        (**self).message_override()
    }
}

impl<R: Rule + ?Sized> Rule for Box<R> {
    fn code(&self) -> &'static str {
        (**self).code()
    }

    fn evaluate(&self, value: &FieldValue, ctx: &RuleContext<'_>) -> Verdict {
        (**self).evaluate(value, ctx)
    }

    fn runs_on_empty(&self) -> bool {
        (**self).runs_on_empty()
    }

    fn message_override(&self) -> Option<&str> {
        (**self).message_override()
    }
}

// ============================================================================
// RULE EXTENSION TRAIT
// ============================================================================

/// Combinator methods for rules.
pub trait RuleExt: Rule + Sized {
    /// Replaces the default error message of this rule.
    ///
    /// An empty message keeps the default.
    ///
    /// ```rust
    /// use formcheck_validator::prelude::*;
    ///
    /// let mut form = FormValidator::new([("user_name", "")]);
    /// form.field("user_name")
    ///     .check(Required.message("You must choose a user name!"));
    /// assert_eq!(form.first_error("user_name"), "You must choose a user name!");
    /// ```
    fn message(self, message: impl Into<String>) -> WithMessage<Self> {
        WithMessage::new(self, message)
    }
}

impl<T: Rule> RuleExt for T {}

/// Rule wrapper carrying a custom failure message.
#[derive(Debug, Clone)]
pub struct WithMessage<R> {
    inner: R,
    message: String,
}

impl<R> WithMessage<R> {
    /// Wraps `inner` with a custom message.
    pub fn new(inner: R, message: impl Into<String>) -> Self {
        Self {
            inner,
            message: message.into(),
        }
    }

    /// Returns a reference to the wrapped rule.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Extracts the wrapped rule.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Rule> Rule for WithMessage<R> {
    fn code(&self) -> &'static str {
        self.inner.code()
    }

    fn evaluate(&self, value: &FieldValue, ctx: &RuleContext<'_>) -> Verdict {
        self.inner.evaluate(value, ctx)
    }

    fn runs_on_empty(&self) -> bool {
        self.inner.runs_on_empty()
    }

    fn message_override(&self) -> Option<&str> {
        if self.message.is_empty() {
            self.inner.message_override()
        } else {
            Some(&self.message)
        }
    }
}

// ============================================================================
// TRANSFORM TRAIT
// ============================================================================

/// A pure rewrite of a text value.
///
/// Transforms run under the same emptiness-skip policy as rules but never
/// touch validity or errors. Sequences are rewritten leaf by leaf.
pub trait Transform {
    /// Rewrites one text leaf.
    fn apply(&self, input: &str) -> String;
}

impl<T: Transform + ?Sized> Transform for &T {
    fn apply(&self, input: &str) -> String {
        (**self).apply(input)
    }
}

/// Adapts a closure into a [`Transform`].
#[derive(Clone, Copy)]
pub struct MapText<F>(pub F);

impl<F> std::fmt::Debug for MapText<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapText").finish_non_exhaustive()
    }
}

impl<F: Fn(&str) -> String> Transform for MapText<F> {
    fn apply(&self, input: &str) -> String {
        (self.0)(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysFails;

    impl Rule for AlwaysFails {
        fn code(&self) -> &'static str {
            "always"
        }

        fn evaluate(&self, _value: &FieldValue, _ctx: &RuleContext<'_>) -> Verdict {
            Verdict::fail(ValidationError::code("always"))
        }
    }

    #[test]
    fn test_verdict_constructors() {
        assert!(Verdict::pass().is_valid());
        assert!(!Verdict::fail(ValidationError::code("x")).is_valid());
        let rewritten = Verdict::rewrite(FieldValue::from("y"));
        assert!(rewritten.is_valid());
        assert_eq!(rewritten.value, Some(FieldValue::from("y")));
    }

    #[test]
    fn test_with_message_override() {
        let rule = AlwaysFails.message("custom");
        assert_eq!(rule.message_override(), Some("custom"));
        assert_eq!(rule.code(), "always");
    }

    #[test]
    fn test_empty_message_keeps_default() {
        let rule = AlwaysFails.message("");
        assert_eq!(rule.message_override(), None);
    }

    #[test]
    fn test_map_text_transform() {
        let t = MapText(|s: &str| s.replace('-', "_"));
        assert_eq!(t.apply("a-b"), "a_b");
    }
}
