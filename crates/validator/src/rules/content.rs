//! Text content rules
//!
//! Format checks over text values: e-mail, URL, alphabetic text, regular
//! expressions and character classes.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::foundation::{FieldValue, Rule, RuleContext, RuleError, ValidationError, Verdict};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$"
    ).unwrap()
});

/// Scheme-less shorthand accepted alongside absolute URLs: `www.example.com/path`.
static WWW_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((http|ftp|https)://)?www\..*.\.\w\w\w?(/.*)?(\?.*)?$").unwrap()
});

static ALPHA_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static TEXT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\p{L}\p{M} ]+$").unwrap());

// ============================================================================
// FORMATS
// ============================================================================

crate::rule! {
    /// Validates e-mail address syntax. The domain needs at least one dot.
    pub Email => "email";
    text(input) { EMAIL_REGEX.is_match(input) }
    fn email();
}

crate::rule! {
    /// Validates an absolute `http`, `https` or `ftp` URL with a host, or the
    /// `www.` shorthand.
    pub Url => "url";
    text(input) { is_absolute_url(input) || WWW_REGEX.is_match(input) }
    fn url();
}

crate::rule! {
    /// Only ASCII letters.
    pub Alpha => "alpha";
    text(input) { ALPHA_REGEX.is_match(input) }
    fn alpha();
}

crate::rule! {
    /// Letters of any script, combining marks and spaces.
    pub Text => "text";
    text(input) { TEXT_REGEX.is_match(input) }
    fn text();
}

fn is_absolute_url(input: &str) -> bool {
    ::url::Url::parse(input).is_ok_and(|parsed| {
        matches!(parsed.scheme(), "http" | "https" | "ftp")
            && parsed.host_str().is_some_and(|host| !host.is_empty())
    })
}

// ============================================================================
// REGEX
// ============================================================================

/// Validates text against a regular expression.
///
/// Accepts a bare pattern (`^[^<>]+$`) or a slash-delimited one with trailing
/// flags (`/^abc$/i`). A pattern that does not compile is not a panic: every
/// evaluation reports it as a field error.
#[derive(Debug, Clone)]
pub struct Matches {
    pattern: Result<Regex, RuleError>,
}

impl Matches {
    /// Compiles `pattern`. Compilation errors are kept and reported on use.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let source = strip_delimiters(pattern);
        Self {
            pattern: Regex::new(&source).map_err(|e| RuleError::InvalidPattern {
                pattern: pattern.to_owned(),
                reason: e.to_string(),
            }),
        }
    }

    /// Returns the compiled expression, or the compile error.
    pub fn regex(&self) -> Result<&Regex, &RuleError> {
        self.pattern.as_ref()
    }
}

impl Rule for Matches {
    fn code(&self) -> &'static str {
        "regex"
    }

    fn evaluate(&self, value: &FieldValue, _ctx: &RuleContext<'_>) -> Verdict {
        match &self.pattern {
            Ok(re) => Verdict::check(value.all_text(&mut |s| re.is_match(s)), || {
                ValidationError::code("regex").with_param("pattern", re.as_str())
            }),
            Err(error) => Verdict::fail(error.clone()),
        }
    }
}

/// Creates a [`Matches`] rule.
#[must_use]
pub fn matches(pattern: &str) -> Matches {
    Matches::new(pattern)
}

/// Turns `/body/flags` into `(?flags)body`; anything else is returned as is.
fn strip_delimiters(pattern: &str) -> String {
    let Some(rest) = pattern.strip_prefix('/') else {
        return pattern.to_owned();
    };
    let Some(end) = rest.rfind('/') else {
        return pattern.to_owned();
    };
    let (body, flags) = (&rest[..end], &rest[end + 1..]);
    if !flags.chars().all(|c| matches!(c, 'i' | 'm' | 's' | 'x' | 'u')) {
        return pattern.to_owned();
    }

    // `u` (UTF-8 mode) is always on in `regex`.
    let inline: String = flags.chars().filter(|&c| c != 'u').collect();
    if inline.is_empty() {
        body.to_owned()
    } else {
        format!("(?{inline}){body}")
    }
}

// ============================================================================
// CHARACTER CLASSES
// ============================================================================

/// A named character class accepted by [`Chars`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CharClass {
    /// ASCII letters.
    Alpha,
    /// ASCII digits.
    Number,
    /// `-` and `_`.
    Dash,
    /// The space character.
    Space,
    /// ASCII punctuation.
    Special,
    /// Letters, digits and `_`.
    Word,
    /// Lowercase ASCII letters.
    Lowercase,
    /// Uppercase ASCII letters.
    Uppercase,
    /// Hexadecimal digits.
    Hex,
    /// Letters and digits.
    Alnum,
}

impl CharClass {
    fn bracket_item(self) -> &'static str {
        match self {
            Self::Alpha => "[:alpha:]",
            Self::Number => "[:digit:]",
            Self::Dash => r"\-_",
            Self::Space => " ",
            Self::Special => "[:punct:]",
            Self::Word => "[:word:]",
            Self::Lowercase => "[:lower:]",
            Self::Uppercase => "[:upper:]",
            Self::Hex => "[:xdigit:]",
            Self::Alnum => "[:alnum:]",
        }
    }
}

impl FromStr for CharClass {
    type Err = std::convert::Infallible;

    /// Unknown names fall back to [`CharClass::Alnum`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "alpha" => Self::Alpha,
            "number" => Self::Number,
            "dash" => Self::Dash,
            "space" => Self::Space,
            "special" => Self::Special,
            "word" => Self::Word,
            "lowercase" => Self::Lowercase,
            "uppercase" => Self::Uppercase,
            "hex" => Self::Hex,
            _ => Self::Alnum,
        })
    }
}

/// Text made only of the allowed character classes.
///
/// ```rust
/// use formcheck_validator::prelude::*;
///
/// let mut form = FormValidator::new([("handle", "snake_case-name")]);
/// let ok = form
///     .field("handle")
///     .chars([CharClass::Lowercase, CharClass::Dash])
///     .is_valid();
/// assert!(ok);
/// ```
#[derive(Debug, Clone)]
pub struct Chars {
    classes: Vec<CharClass>,
    inner: Matches,
}

impl Chars {
    /// Builds the rule from a set of classes.
    #[must_use]
    pub fn new(classes: impl IntoIterator<Item = CharClass>) -> Self {
        let classes: Vec<CharClass> = classes.into_iter().collect();
        let body: String = classes.iter().map(|c| c.bracket_item()).collect();
        let inner = Matches::new(&format!("^[{body}]+$"));
        Self { classes, inner }
    }

    /// Parses a comma-separated class list such as `"alpha,number,dash"`.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(',').filter_map(|name| name.parse().ok()))
    }

    /// The allowed classes.
    #[must_use]
    pub fn classes(&self) -> &[CharClass] {
        &self.classes
    }
}

impl Rule for Chars {
    fn code(&self) -> &'static str {
        "regex"
    }

    fn evaluate(&self, value: &FieldValue, ctx: &RuleContext<'_>) -> Verdict {
        self.inner.evaluate(value, ctx)
    }
}

/// Creates a [`Chars`] rule.
#[must_use]
pub fn chars(classes: impl IntoIterator<Item = CharClass>) -> Chars {
    Chars::new(classes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::eval;
    use rstest::rstest;

    #[rstest]
    #[case("a@b.com", true)]
    #[case("first.last+tag@mail.example.org", true)]
    #[case("a@b", false)]
    #[case("not an email", false)]
    #[case("@example.com", false)]
    fn test_email(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(eval(&email(), input.into()).is_valid(), ok);
    }

    #[rstest]
    #[case("https://example.com", true)]
    #[case("http://example.com/path?q=1", true)]
    #[case("ftp://files.example.com", true)]
    #[case("www.example.com", true)]
    #[case("www.example.com/about", true)]
    #[case("mailto:someone@example.com", false)]
    #[case("example", false)]
    fn test_url(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(eval(&url(), input.into()).is_valid(), ok);
    }

    #[rstest]
    #[case("Hello", true)]
    #[case("Hello World", false)]
    #[case("abc123", false)]
    fn test_alpha(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(eval(&alpha(), input.into()).is_valid(), ok);
    }

    #[rstest]
    #[case("Árvíztűrő tükörfúrógép", true)]
    #[case("Hello World", true)]
    #[case("R2D2", false)]
    fn test_text(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(eval(&text(), input.into()).is_valid(), ok);
    }

    #[test]
    fn test_text_rule_checks_every_list_entry() {
        let value = FieldValue::from(vec!["a@b.com", "broken"]);
        assert!(!eval(&email(), value).is_valid());
    }

    #[test]
    fn test_delimited_pattern_with_flags() {
        assert_eq!(strip_delimiters("/^abc$/i"), "(?i)^abc$");
        assert_eq!(strip_delimiters("/^abc$/u"), "^abc$");
        assert_eq!(strip_delimiters("^abc$"), "^abc$");
        assert!(eval(&matches("/^abc$/i"), "ABC".into()).is_valid());
    }

    #[test]
    fn test_invalid_pattern_is_reported_not_raised() {
        let verdict = eval(&matches("(unclosed"), "anything".into());
        let error = verdict.error.unwrap();
        assert_eq!(error.code, "invalid_rule");
        assert_eq!(error.param("pattern"), Some("(unclosed"));
    }

    #[rstest]
    #[case("alpha,number", "abc123", true)]
    #[case("alpha,number", "abc 123", false)]
    #[case("alpha,space", "abc def", true)]
    #[case("hex", "deadBEEF", true)]
    #[case("hex", "xyz", false)]
    #[case("lowercase,dash", "kebab-and_snake", true)]
    fn test_chars(#[case] classes: &str, #[case] input: &str, #[case] ok: bool) {
        assert_eq!(eval(&Chars::parse(classes), input.into()).is_valid(), ok);
    }

    #[test]
    fn test_unknown_class_means_alnum() {
        assert_eq!(Chars::parse("bogus").classes(), &[CharClass::Alnum]);
    }
}
