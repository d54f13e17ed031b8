//! Size rules
//!
//! Size means characters for text and element count for sequences.

use crate::foundation::{FieldValue, Rule, RuleContext, ValidationError, Verdict};

/// Value must have at least `size` characters (or elements).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MinSize {
    /// Minimum size, inclusive.
    pub size: usize,
}

impl MinSize {
    /// Creates a new minimum size rule.
    #[must_use]
    pub const fn new(size: usize) -> Self {
        Self { size }
    }
}

impl Rule for MinSize {
    fn code(&self) -> &'static str {
        "min_size"
    }

    fn evaluate(&self, value: &FieldValue, _ctx: &RuleContext<'_>) -> Verdict {
        Verdict::check(value.size() >= self.size, || {
            ValidationError::code("min_size")
                .with_param("size", self.size)
                .with_param("actual", value.size())
        })
    }
}

/// Value must have at most `size` characters (or elements).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaxSize {
    /// Maximum size, inclusive.
    pub size: usize,
}

impl MaxSize {
    /// Creates a new maximum size rule.
    #[must_use]
    pub const fn new(size: usize) -> Self {
        Self { size }
    }
}

impl Rule for MaxSize {
    fn code(&self) -> &'static str {
        "max_size"
    }

    fn evaluate(&self, value: &FieldValue, _ctx: &RuleContext<'_>) -> Verdict {
        Verdict::check(value.size() <= self.size, || {
            ValidationError::code("max_size")
                .with_param("size", self.size)
                .with_param("actual", value.size())
        })
    }
}

/// Creates a [`MinSize`] rule.
#[must_use]
pub const fn min_size(size: usize) -> MinSize {
    MinSize::new(size)
}

/// Creates a [`MaxSize`] rule.
#[must_use]
pub const fn max_size(size: usize) -> MaxSize {
    MaxSize::new(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::eval;
    use rstest::rstest;

    #[rstest]
    #[case("hello", 5, true)]
    #[case("hell", 5, false)]
    #[case("héllo", 5, true)]
    fn test_min_size_text(#[case] input: &str, #[case] size: usize, #[case] ok: bool) {
        assert_eq!(eval(&min_size(size), input.into()).is_valid(), ok);
    }

    #[test]
    fn test_size_counts_elements() {
        let value = FieldValue::from(vec!["a", "b", "c"]);
        assert!(eval(&max_size(3), value.clone()).is_valid());
        assert!(!eval(&max_size(2), value).is_valid());
    }

    #[test]
    fn test_error_carries_size_param() {
        let verdict = eval(&min_size(10), "short".into());
        let error = verdict.error.unwrap();
        assert_eq!(error.param("size"), Some("10"));
        assert_eq!(error.param("actual"), Some("5"));
    }
}
