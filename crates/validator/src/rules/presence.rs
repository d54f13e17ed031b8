//! Presence rule

use crate::foundation::{FieldValue, Rule, RuleContext, ValidationError, Verdict};

/// Fails when the value is empty.
///
/// The only rule evaluated on empty values. It is skipped once the chain has
/// already failed, so it belongs first in a chain:
///
/// ```rust
/// use formcheck_validator::prelude::*;
///
/// let mut form = FormValidator::new([("user_name", "  ")]);
/// let ok = form.field("user_name").required().alpha().min_size(5).is_valid();
/// assert!(!ok);
/// assert_eq!(form.first_error("user_name"), "This field is required");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Required;

impl Rule for Required {
    fn code(&self) -> &'static str {
        "required"
    }

    fn evaluate(&self, value: &FieldValue, _ctx: &RuleContext<'_>) -> Verdict {
        Verdict::check(!value.is_empty(), || ValidationError::code("required"))
    }

    fn runs_on_empty(&self) -> bool {
        true
    }
}

/// Creates a [`Required`] rule.
#[must_use]
pub const fn required() -> Required {
    Required
}
