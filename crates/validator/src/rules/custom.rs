//! User-supplied predicates.

use std::fmt;

use crate::foundation::{FieldValue, Rule, RuleContext, ValidationError, Verdict};

/// Wraps a predicate over the whole field value.
///
/// Failures use the `callback` message unless overridden with
/// [`RuleExt::message`](crate::foundation::RuleExt::message).
///
/// # Examples
///
/// ```
/// use formcheck_validator::prelude::*;
///
/// let mut form = FormValidator::new([("answer", "42")]);
/// let valid = form
///     .field("answer")
///     .callback(|value: &FieldValue| value.as_text() == Some("42"))
///     .is_valid();
/// assert!(valid);
/// ```
#[derive(Clone, Copy)]
pub struct Callback<F> {
    predicate: F,
}

impl<F> Callback<F>
where
    F: Fn(&FieldValue) -> bool,
{
    /// Creates the rule.
    pub const fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> fmt::Debug for Callback<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback").finish_non_exhaustive()
    }
}

impl<F> Rule for Callback<F>
where
    F: Fn(&FieldValue) -> bool,
{
    fn code(&self) -> &'static str {
        "callback"
    }

    fn evaluate(&self, value: &FieldValue, _ctx: &RuleContext<'_>) -> Verdict {
        Verdict::check((self.predicate)(value), || ValidationError::code("callback"))
    }
}

/// Creates a [`Callback`] rule.
pub const fn callback<F>(predicate: F) -> Callback<F>
where
    F: Fn(&FieldValue) -> bool,
{
    Callback::new(predicate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::eval;

    #[test]
    fn test_callback_sees_whole_value() {
        let two_tags = callback(|value: &FieldValue| value.size() == 2);
        assert!(eval(&two_tags, FieldValue::from(vec!["a", "b"])).is_valid());

        let verdict = eval(&two_tags, FieldValue::from(vec!["a"]));
        assert_eq!(verdict.error.unwrap().code, "callback");
    }
}
