//! Membership and comparison rules
//!
//! `equal` and `is_in` compare the current field against an [`Operand`],
//! which may name another field. An operand naming a field that does not
//! exist resolves to nothing, and the comparison fails.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::foundation::{FieldValue, Rule, RuleContext, ValidationError, Verdict};
use crate::rules::numeric::compare_loose;

// ============================================================================
// OPERAND
// ============================================================================

/// Right-hand side of a cross-field comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// The stored value of another field.
    Field(String),
    /// A literal text or sequence.
    Value(FieldValue),
    /// A size: characters for text, elements for sequences.
    Length(usize),
}

impl Operand {
    /// Refers to another field by name.
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// Resolves the operand against the engine. `Length` resolves to its
    /// decimal text; a field missing from the form resolves to `None`.
    #[must_use]
    pub fn resolve<'a>(&'a self, ctx: &RuleContext<'a>) -> Option<Cow<'a, FieldValue>> {
        match self {
            Self::Field(name) => ctx.value_of(name).map(Cow::Borrowed),
            Self::Value(value) => Some(Cow::Borrowed(value)),
            Self::Length(n) => Some(Cow::Owned(FieldValue::Text(n.to_string()))),
        }
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl From<String> for Operand {
    fn from(value: String) -> Self {
        Self::Value(value.into())
    }
}

impl From<FieldValue> for Operand {
    fn from(value: FieldValue) -> Self {
        Self::Value(value)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for Operand {
    fn from(values: Vec<T>) -> Self {
        Self::Value(values.into())
    }
}

impl<T: Into<FieldValue>, const N: usize> From<[T; N]> for Operand {
    fn from(values: [T; N]) -> Self {
        Self::Value(values.into())
    }
}

impl From<usize> for Operand {
    fn from(size: usize) -> Self {
        Self::Length(size)
    }
}

// ============================================================================
// ONE OF
// ============================================================================

/// Case-insensitive membership in a fixed list of choices.
///
/// ```rust
/// use formcheck_validator::prelude::*;
///
/// let mut form = FormValidator::new([("color", "Blue")]);
/// assert!(form.field("color").one_of(["blue", "red", "green"]).is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneOf {
    items: Vec<String>,
    lowered: Vec<String>,
}

impl OneOf {
    /// Creates the rule from its choices.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        let lowered = items.iter().map(|item| item.to_lowercase()).collect();
        Self { items, lowered }
    }

    /// Parses a colon-separated list such as `"blue:red:green"`.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(':'))
    }

    /// The accepted choices, as given.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }
}

impl Rule for OneOf {
    fn code(&self) -> &'static str {
        "one_of"
    }

    fn evaluate(&self, value: &FieldValue, _ctx: &RuleContext<'_>) -> Verdict {
        let ok = value.all_text(&mut |s| self.lowered.contains(&s.to_lowercase()));
        Verdict::check(ok, || {
            ValidationError::code("one_of").with_param("items", self.items.join(" / "))
        })
    }
}

/// Creates a [`OneOf`] rule.
pub fn one_of<I, S>(items: I) -> OneOf
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    OneOf::new(items)
}

// ============================================================================
// EQUAL
// ============================================================================

/// Value must equal the operand.
///
/// - `Length(n)`: the value's size is exactly `n`.
/// - Sequences compare as multisets (order does not matter).
/// - Text compares numerically when both sides are numbers (`"1.0"` equals `"1"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equal {
    operand: Operand,
}

impl Equal {
    /// Creates the rule.
    pub fn new(operand: impl Into<Operand>) -> Self {
        Self {
            operand: operand.into(),
        }
    }
}

impl Rule for Equal {
    fn code(&self) -> &'static str {
        "equal"
    }

    fn evaluate(&self, value: &FieldValue, ctx: &RuleContext<'_>) -> Verdict {
        let ok = match &self.operand {
            Operand::Length(n) => value.size() == *n,
            operand => operand
                .resolve(ctx)
                .is_some_and(|other| values_equal(value, &other)),
        };
        Verdict::check(ok, || ValidationError::code("equal"))
    }
}

/// Creates an [`Equal`] rule.
pub fn equal(operand: impl Into<Operand>) -> Equal {
    Equal::new(operand)
}

fn values_equal(left: &FieldValue, right: &FieldValue) -> bool {
    match (left.as_text(), right.as_text()) {
        (Some(l), Some(r)) => compare_loose(l, r) == Ordering::Equal,
        (None, None) => same_elements(&left.elements(), &right.elements()),
        _ => false,
    }
}

fn same_elements(left: &[&FieldValue], right: &[&FieldValue]) -> bool {
    left.len() == right.len()
        && left.iter().all(|item| {
            left.iter().filter(|other| other == &item).count()
                == right.iter().filter(|other| other == &item).count()
        })
}

// ============================================================================
// IS IN
// ============================================================================

/// Containment check with shape-dependent semantics.
///
/// | current value | operand  | passes when                                         |
/// |---------------|----------|-----------------------------------------------------|
/// | sequence      | scalar   | the scalar appears anywhere in the value (keys too) |
/// | sequence      | sequence | every operand element is an element of the value   |
/// | scalar        | sequence | the value appears anywhere in the operand (keys too)|
/// | scalar        | scalar   | the value is a substring of the operand             |
///
/// ```rust
/// use formcheck_validator::prelude::*;
///
/// let mut form = FormValidator::new([("color", "blue")]);
/// assert!(form.field("color").is_in(["red", "green", "blue"]).is_valid());
/// assert!(!form.field("color").is_in(["red", "green"]).is_valid());
/// assert_eq!(form.first_error("color"), "Value is not in");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsIn {
    operand: Operand,
}

impl IsIn {
    /// Creates the rule.
    pub fn new(operand: impl Into<Operand>) -> Self {
        Self {
            operand: operand.into(),
        }
    }
}

impl Rule for IsIn {
    fn code(&self) -> &'static str {
        "is_in"
    }

    fn evaluate(&self, value: &FieldValue, ctx: &RuleContext<'_>) -> Verdict {
        let ok = self
            .operand
            .resolve(ctx)
            .is_some_and(|input| is_contained(value, &input));
        Verdict::check(ok, || ValidationError::code("is_in"))
    }
}

/// Creates an [`IsIn`] rule.
pub fn is_in(operand: impl Into<Operand>) -> IsIn {
    IsIn::new(operand)
}

fn is_contained(value: &FieldValue, input: &FieldValue) -> bool {
    match (value.is_sequence(), input.is_sequence()) {
        (true, false) => value.contains_deep(&input.to_string()),
        (true, true) => {
            let have = value.elements();
            input.elements().iter().all(|wanted| have.contains(wanted))
        }
        (false, true) => input.contains_deep(&value.to_string()),
        (false, false) => input.to_string().contains(&value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{eval, eval_with};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_one_of_is_case_insensitive() {
        assert!(eval(&one_of(["blue", "red"]), "RED".into()).is_valid());
        let error = eval(&OneOf::parse("blue:red:green"), "pink".into())
            .error
            .unwrap();
        assert_eq!(error.param("items"), Some("blue / red / green"));
    }

    #[test]
    fn test_equal_other_field() {
        let fields = [("password", "s3cret")];
        assert!(eval_with(&equal(Operand::field("password")), "s3cret".into(), &fields).is_valid());
        assert!(!eval_with(&equal(Operand::field("password")), "other".into(), &fields).is_valid());
    }

    #[test]
    fn test_equal_unknown_field_fails() {
        assert!(!eval(&equal(Operand::field("missing")), "x".into()).is_valid());
    }

    #[test]
    fn test_equal_length() {
        assert!(eval(&equal(5usize), "hello".into()).is_valid());
        assert!(eval(&equal(2usize), FieldValue::from(vec!["a", "b"])).is_valid());
        assert!(!eval(&equal(3usize), "hello".into()).is_valid());
    }

    #[test]
    fn test_equal_sequences_ignore_order() {
        let value = FieldValue::from(vec!["b", "a", "a"]);
        assert!(eval(&equal(vec!["a", "b", "a"]), value.clone()).is_valid());
        assert!(!eval(&equal(vec!["a", "b", "b"]), value.clone()).is_valid());
        assert!(!eval(&equal("a"), value).is_valid());
    }

    #[test]
    fn test_equal_numeric_text() {
        assert!(eval(&equal("1.0"), "1".into()).is_valid());
    }

    #[test]
    fn test_is_in_scalar_in_list() {
        assert!(eval(&is_in(["red", "green", "blue"]), "blue".into()).is_valid());
        assert!(!eval(&is_in(["red", "green"]), "blue".into()).is_valid());
    }

    #[test]
    fn test_is_in_scalar_in_nested_keys() {
        let input = FieldValue::from(json!({ "warm": { "red": 1 }, "cold": ["blue"] }));
        assert!(eval(&is_in(input.clone()), "red".into()).is_valid());
        assert!(eval(&is_in(input.clone()), "blue".into()).is_valid());
        assert!(!eval(&is_in(input), "green".into()).is_valid());
    }

    #[test]
    fn test_is_in_list_contains_scalar() {
        let value = FieldValue::from(vec!["red", "blue"]);
        assert!(eval(&is_in("blue"), value.clone()).is_valid());
        assert!(!eval(&is_in("green"), value).is_valid());
    }

    #[test]
    fn test_is_in_list_contains_every_input_element() {
        let value = FieldValue::from(vec!["red", "green", "blue"]);
        assert!(eval(&is_in(vec!["red", "blue"]), value.clone()).is_valid());
        assert!(!eval(&is_in(vec!["red", "pink"]), value).is_valid());
    }

    #[test]
    fn test_is_in_substring() {
        assert!(eval(&is_in("dark blue sea"), "blue".into()).is_valid());
        assert!(!eval(&is_in("bl"), "blue".into()).is_valid());
    }

    #[test]
    fn test_is_in_other_field() {
        let fields = [("palette", "red green blue")];
        assert!(eval_with(&is_in(Operand::field("palette")), "green".into(), &fields).is_valid());
        assert!(!eval(&is_in(Operand::field("palette")), "green".into()).is_valid());
    }

    #[test]
    fn test_unknown_field_fails_for_list_with_blank_leaf() {
        let value = FieldValue::from(vec!["x", ""]);
        assert!(!eval(&is_in(Operand::field("missing")), value.clone()).is_valid());
        assert!(!eval(&equal(Operand::field("missing")), value).is_valid());
    }
}
