//! Error types
//!
//! Two very different things live here:
//!
//! - [`ValidationError`] is *data*: the verdict a rule hands back to the engine
//!   when a value does not pass. The engine turns it into a message and files it
//!   under the current field. It is never propagated with `?`.
//! - [`RuleError`] and [`FormError`] are ordinary Rust errors. `RuleError` is
//!   raised inside a rule when its own parameters are unusable (a bad regex, an
//!   unknown timezone) and is folded back into a `ValidationError` so the chain
//!   keeps going. `FormError` is returned by fallible constructors.
//!
//! All string fields use `Cow<'static, str>` so static codes never allocate.

use std::borrow::Cow;
use std::fmt;

use smallvec::SmallVec;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A failed rule evaluation.
///
/// `code` selects the default message from the
/// [`MessageCatalog`](crate::foundation::MessageCatalog); `params` fill the
/// `{placeholders}` of that template. `message` is used only when the catalog
/// has no entry for `code`.
///
/// # Examples
///
/// ```rust
/// use formcheck_validator::foundation::ValidationError;
///
/// let error = ValidationError::new("min_size", "").with_param("size", "5");
/// assert_eq!(error.param("size"), Some("5"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier, e.g. `"required"`, `"email"`, `"min_size"`.
    pub code: Cow<'static, str>,

    /// Fallback message. Empty when the catalog is expected to supply one.
    pub message: Cow<'static, str>,

    /// Template parameters, in insertion order (typically 0-2).
    pub params: SmallVec<[(Cow<'static, str>, String); 2]>,
}

impl ValidationError {
    /// Creates a new validation error with a code and fallback message.
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            params: SmallVec::new(),
        }
    }

    /// Creates an error that relies entirely on the catalog for its text.
    pub fn code(code: impl Into<Cow<'static, str>>) -> Self {
        Self::new(code, "")
    }

    /// Adds a template parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(mut self, key: impl Into<Cow<'static, str>>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.code)?;
        } else {
            write!(f, "{}: {}", self.code, self.message)?;
        }

        if !self.params.is_empty() {
            write!(f, " (")?;
            for (i, (k, v)) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k}={v}")?;
            }
            write!(f, ")")?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// RULE CONFIGURATION ERRORS
// ============================================================================

/// A rule could not be evaluated because its own parameters are malformed.
///
/// These never abort a chain. The engine reports them against the current
/// field through the usual error path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// The regular expression passed to `matches` does not compile.
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// The timezone passed to `convert_date` is not `UTC`, `Z` or `±HH:MM`.
    #[error("unsupported timezone `{0}`")]
    UnsupportedTimezone(String),

    /// A date format string contains no recognisable fields.
    #[error("unusable date format `{0}`")]
    InvalidDateFormat(String),
}

impl From<RuleError> for ValidationError {
    fn from(error: RuleError) -> Self {
        match &error {
            RuleError::UnsupportedTimezone(tz) => {
                ValidationError::new("date_timezone", error.to_string()).with_param("timezone", tz)
            }
            RuleError::InvalidPattern { pattern, .. } => {
                ValidationError::new("invalid_rule", error.to_string()).with_param("pattern", pattern)
            }
            RuleError::InvalidDateFormat(format) => {
                ValidationError::new("invalid_rule", error.to_string()).with_param("format", format)
            }
        }
    }
}

// ============================================================================
// CONSTRUCTION ERRORS
// ============================================================================

/// Errors raised while building a [`FormValidator`](crate::FormValidator).
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// `from_json` expects a top-level object mapping field names to values.
    #[error("form input must be a JSON object, got {found}")]
    NotAnObject {
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// The input text is not valid JSON.
    #[error("form input is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_keep_order() {
        let error = ValidationError::code("range")
            .with_param("min", 1)
            .with_param("max", 10);

        assert_eq!(error.param("min"), Some("1"));
        assert_eq!(error.param("max"), Some("10"));
        assert_eq!(error.param("actual"), None);
        assert_eq!(error.to_string(), "range (min=1, max=10)");
    }

    #[test]
    fn test_static_code_is_borrowed() {
        let error = ValidationError::code("required");
        assert!(matches!(error.code, Cow::Borrowed(_)));
    }

    #[test]
    fn test_timezone_error_converts_with_param() {
        let error: ValidationError = RuleError::UnsupportedTimezone("Mars/Base".into()).into();
        assert_eq!(error.code, "date_timezone");
        assert_eq!(error.param("timezone"), Some("Mars/Base"));
    }

    #[test]
    fn test_pattern_error_keeps_reason() {
        let error: ValidationError = RuleError::InvalidPattern {
            pattern: "(".into(),
            reason: "unclosed group".into(),
        }
        .into();
        assert_eq!(error.code, "invalid_rule");
        assert!(error.message.contains("unclosed group"));
    }
}
