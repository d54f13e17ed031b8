//! Conditional gate
//!
//! A gate compares other fields' stored values against expected values.
//! When any comparison fails, the current field's value is emptied, which
//! turns every later rule in the chain into a no-op. A closed gate is not
//! a failure: nothing is recorded and chain validity is untouched.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use smallvec::SmallVec;

use crate::foundation::{FieldValue, RuleContext};
use crate::rules::numeric::compare_loose;

// ============================================================================
// COMPARATOR
// ============================================================================

/// How a stored value is compared against the expected one.
///
/// Ordering comparisons are numeric when both sides parse as numbers and
/// lexicographic otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Comparator {
    /// `equal`, `==`
    #[default]
    Equal,
    /// `not_equal`, `!=`, `<>`
    NotEqual,
    /// `smaller`, `<`
    Less,
    /// `bigger`, `>`
    Greater,
    /// `<=`
    LessOrEqual,
    /// `>=`
    GreaterOrEqual,
    /// `exist`, `exists`: the field is present, whatever its value.
    Exists,
}

/// Returned when a comparator name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown comparator `{0}`")]
pub struct ParseComparatorError(String);

impl Comparator {
    /// Canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::NotEqual => "not_equal",
            Self::Less => "smaller",
            Self::Greater => "bigger",
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
            Self::Exists => "exists",
        }
    }

    /// Evaluates the comparator. `stored` is `None` when the field is absent,
    /// which fails every comparator.
    #[must_use]
    pub fn holds(self, stored: Option<&FieldValue>, expected: &str) -> bool {
        let Some(stored) = stored else {
            return false;
        };
        if self == Self::Exists {
            return true;
        }
        let Some(text) = stored.as_text() else {
            return self == Self::NotEqual;
        };

        let ordering = compare_loose(text, expected);
        match self {
            Self::Equal => ordering == Ordering::Equal,
            Self::NotEqual => ordering != Ordering::Equal,
            Self::Less => ordering == Ordering::Less,
            Self::Greater => ordering == Ordering::Greater,
            Self::LessOrEqual => ordering != Ordering::Greater,
            Self::GreaterOrEqual => ordering != Ordering::Less,
            Self::Exists => true,
        }
    }
}

impl FromStr for Comparator {
    type Err = ParseComparatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "equal" | "==" => Ok(Self::Equal),
            "not_equal" | "!=" | "<>" => Ok(Self::NotEqual),
            "smaller" | "<" => Ok(Self::Less),
            "bigger" | ">" => Ok(Self::Greater),
            "<=" => Ok(Self::LessOrEqual),
            ">=" => Ok(Self::GreaterOrEqual),
            "exist" | "exists" => Ok(Self::Exists),
            other => Err(ParseComparatorError(other.to_owned())),
        }
    }
}

impl TryFrom<String> for Comparator {
    type Error = ParseComparatorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CONDITION
// ============================================================================

/// One or more `(field, expected)` checks sharing a comparator.
///
/// # Examples
///
/// ```
/// use formcheck_validator::prelude::*;
///
/// let mut form = FormValidator::new([("contact", "phone"), ("email", "not-an-address")]);
/// // The address is only checked when the user asked to be contacted by e-mail.
/// let valid = form
///     .field("email")
///     .when(Condition::equals("contact", "email"))
///     .email()
///     .is_valid();
/// assert!(valid);
/// assert_eq!(form.value("email"), Some(&FieldValue::Empty));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    checks: SmallVec<[(String, String); 2]>,
    comparator: Comparator,
}

impl Condition {
    /// A single check.
    pub fn new(field: impl Into<String>, expected: impl Into<String>, comparator: Comparator) -> Self {
        let mut checks = SmallVec::new();
        checks.push((field.into(), expected.into()));
        Self { checks, comparator }
    }

    /// `field == expected`
    pub fn equals(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::new(field, expected, Comparator::Equal)
    }

    /// `field != expected`
    pub fn not_equals(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::new(field, expected, Comparator::NotEqual)
    }

    /// `field < expected`
    pub fn less_than(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::new(field, expected, Comparator::Less)
    }

    /// `field > expected`
    pub fn greater_than(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::new(field, expected, Comparator::Greater)
    }

    /// `field <= expected`
    pub fn at_most(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::new(field, expected, Comparator::LessOrEqual)
    }

    /// `field >= expected`
    pub fn at_least(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::new(field, expected, Comparator::GreaterOrEqual)
    }

    /// The field exists.
    pub fn exists(field: impl Into<String>) -> Self {
        Self::new(field, "", Comparator::Exists)
    }

    /// Adds another check with the same comparator.
    #[must_use = "builder methods must be chained or built"]
    pub fn and(mut self, field: impl Into<String>, expected: impl Into<String>) -> Self {
        self.checks.push((field.into(), expected.into()));
        self
    }

    /// The shared comparator.
    #[must_use]
    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    /// The `(field, expected)` pairs, in evaluation order.
    pub fn checks(&self) -> impl Iterator<Item = (&str, &str)> {
        self.checks
            .iter()
            .map(|(field, expected)| (field.as_str(), expected.as_str()))
    }

    /// Name of the first field whose check fails, or `None` if the gate is open.
    #[must_use]
    pub fn first_failure<'c>(&'c self, ctx: &RuleContext<'_>) -> Option<&'c str> {
        self.checks().find_map(|(field, expected)| {
            (!self.comparator.holds(ctx.value_of(field), expected)).then_some(field)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FieldRecord;
    use indexmap::IndexMap;
    use rstest::rstest;

    #[rstest]
    #[case("==", Comparator::Equal)]
    #[case("equal", Comparator::Equal)]
    #[case("<>", Comparator::NotEqual)]
    #[case("not_equal", Comparator::NotEqual)]
    #[case("smaller", Comparator::Less)]
    #[case("bigger", Comparator::Greater)]
    #[case("<=", Comparator::LessOrEqual)]
    #[case(">=", Comparator::GreaterOrEqual)]
    #[case("exist", Comparator::Exists)]
    fn test_comparator_spellings(#[case] input: &str, #[case] expected: Comparator) {
        assert_eq!(input.parse::<Comparator>(), Ok(expected));
    }

    #[test]
    fn test_unknown_comparator() {
        let err = "~=".parse::<Comparator>().unwrap_err();
        assert_eq!(err.to_string(), "unknown comparator `~=`");
    }

    #[rstest]
    #[case(Comparator::Equal, "10", "10.0", true)]
    #[case(Comparator::Less, "9", "10", true)]
    #[case(Comparator::Less, "b", "a", false)]
    #[case(Comparator::GreaterOrEqual, "10", "10", true)]
    #[case(Comparator::NotEqual, "x", "y", true)]
    #[case(Comparator::Exists, "", "", true)]
    fn test_comparator_holds(
        #[case] comparator: Comparator,
        #[case] stored: &str,
        #[case] expected: &str,
        #[case] holds: bool,
    ) {
        assert_eq!(comparator.holds(Some(&stored.into()), expected), holds);
    }

    #[test]
    fn test_missing_field_fails_every_comparator() {
        for comparator in [Comparator::Equal, Comparator::NotEqual, Comparator::Exists] {
            assert!(!comparator.holds(None, ""));
        }
    }

    #[test]
    fn test_sequence_only_satisfies_not_equal() {
        let stored = FieldValue::from(vec!["a"]);
        assert!(!Comparator::Equal.holds(Some(&stored), "a"));
        assert!(Comparator::NotEqual.holds(Some(&stored), "a"));
        assert!(Comparator::Exists.holds(Some(&stored), ""));
    }

    #[test]
    fn test_first_failure_short_circuits_in_order() {
        let fields: IndexMap<String, FieldRecord> = [("a", "1"), ("b", "2")]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), FieldRecord::new(k, v.into())))
            .collect();
        let ctx = RuleContext::new(&fields, "c");

        let open = Condition::equals("a", "1").and("b", "2");
        assert_eq!(open.first_failure(&ctx), None);

        let closed = Condition::equals("a", "1").and("missing", "").and("b", "3");
        assert_eq!(closed.first_failure(&ctx), Some("missing"));
    }
}
