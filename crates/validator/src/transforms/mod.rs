//! Value transforms
//!
//! Case conversion and whitespace trimming, plus the escaping and
//! sanitizing family in [`sanitize`]. Transforms rewrite every text leaf
//! of a value and never affect validity.

pub mod sanitize;

pub use sanitize::{BoundSanitizer, Sanitizer, SanitizerFn, Sanitizers};

use crate::foundation::Transform;

/// Lowercases the whole text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Lowercase;

impl Transform for Lowercase {
    fn apply(&self, input: &str) -> String {
        input.to_lowercase()
    }
}

/// Uppercases the whole text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Uppercase;

impl Transform for Uppercase {
    fn apply(&self, input: &str) -> String {
        input.to_uppercase()
    }
}

/// Uppercases the first character of every whitespace-separated word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TitleCase;

impl Transform for TitleCase {
    fn apply(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut at_word_start = true;
        for c in input.chars() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            at_word_start = c.is_whitespace();
        }
        out
    }
}

/// Uppercases the first character only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capitalize;

impl Transform for Capitalize {
    fn apply(&self, input: &str) -> String {
        let mut chars = input.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Strips leading and trailing whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Trim;

impl Transform for Trim {
    fn apply(&self, input: &str) -> String {
        input.trim().to_owned()
    }
}
