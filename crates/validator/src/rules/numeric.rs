//! Numeric and boolean rules
//!
//! Form input is text, so these rules check what the text *looks like*
//! rather than a runtime type.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::foundation::ValidationError;

static INTEGER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+-]?[0-9]+$").unwrap());

static FLOAT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)$").unwrap());

static NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$").unwrap()
});

/// Parses numeric form text (`"42"`, `"-1.5"`, `"2e3"`).
///
/// Rejects `inf`, `NaN`, hex and surrounding whitespace.
#[must_use]
pub fn parse_number(input: &str) -> Option<f64> {
    if NUMBER_REGEX.is_match(input) {
        input.parse().ok()
    } else {
        None
    }
}

/// Compares two form values: numerically when both parse as numbers,
/// lexicographically otherwise.
#[must_use]
pub fn compare_loose(left: &str, right: &str) -> Ordering {
    match (parse_number(left), parse_number(right)) {
        (Some(l), Some(r)) => l.partial_cmp(&r).unwrap_or(Ordering::Equal),
        _ => left.cmp(right),
    }
}

/// Recognised boolean spellings, matched case-insensitively.
const TRUTHY: &[&str] = &["1", "true", "on", "yes"];
const FALSY: &[&str] = &["0", "false", "off", "no"];

/// Parses a boolean form value.
#[must_use]
pub fn parse_bool(input: &str) -> Option<bool> {
    let lowered = input.to_ascii_lowercase();
    if TRUTHY.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSY.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}

crate::rule! {
    /// Optional sign followed by digits.
    pub Integer => "integer";
    text(input) { INTEGER_REGEX.is_match(input) }
    fn integer();
}

crate::rule! {
    /// Optional sign, digits and an optional decimal part.
    pub Float => "float";
    text(input) { FLOAT_REGEX.is_match(input) }
    fn float();
}

crate::rule! {
    /// Any decimal number, exponent notation included.
    pub Number => "number";
    text(input) { parse_number(input).is_some() }
    fn number();
}

crate::rule! {
    /// `true`/`false`, `1`/`0`, `yes`/`no` or `on`/`off`.
    pub Boolean => "boolean";
    text(input) { parse_bool(input).is_some() }
    fn boolean();
}

crate::rule! {
    /// Numeric value greater than or equal to `min`.
    #[derive(Copy, PartialEq)]
    pub MinValue { min: f64 } => "min_value";
    text(self, input) { parse_number(input).is_some_and(|n| n >= self.min) }
    error(self) { ValidationError::code("min_value").with_param("min", self.min) }
    fn min_value(min: f64);
}

crate::rule! {
    /// Numeric value lower than or equal to `max`.
    #[derive(Copy, PartialEq)]
    pub MaxValue { max: f64 } => "max_value";
    text(self, input) { parse_number(input).is_some_and(|n| n <= self.max) }
    error(self) { ValidationError::code("max_value").with_param("max", self.max) }
    fn max_value(max: f64);
}
