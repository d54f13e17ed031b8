//! Default error messages
//!
//! Each [`FormValidator`](crate::FormValidator) owns its own
//! [`MessageCatalog`]. Overriding a message on one instance never leaks into
//! another.

use std::borrow::Cow;

use indexmap::IndexMap;

use crate::foundation::ValidationError;

/// Code used when neither the catalog nor the error itself has any text.
pub const FALLBACK_CODE: &str = "callback";

const DEFAULTS: &[(&str, &str)] = &[
    ("required", "This field is required"),
    ("date", "Please enter a valid datetime"),
    ("date_timezone", "The supplied timezone [{timezone}] is not supported."),
    ("email", "Please enter a valid email"),
    ("url", "Please enter a valid url"),
    // `alpha` accepts ASCII letters only, `text` any letters and spaces.
    ("alpha", "Only letters are permitted"),
    ("text", "Only letters and spaces are permitted"),
    ("min_size", "Please enter more than {size} characters"),
    ("max_size", "Please enter less than {size} characters"),
    ("float", "Only numbers are permitted"),
    ("integer", "Only numbers are permitted"),
    ("number", "Only numbers are permitted"),
    ("boolean", "Only true or false are permitted"),
    ("max_value", "Please enter a value lower than {max}"),
    ("min_value", "Please enter a value greater than {min}"),
    ("one_of", "Please choose one of \" {items} \""),
    ("equal", "Fields did not match"),
    ("regex", "Please choose a valid value"),
    ("is_in", "Value is not in"),
    ("ip", "Please enter a valid IP address"),
    ("callback", "Please enter a valid value"),
];

/// Message templates keyed by rule code.
///
/// Templates may reference error parameters as `{name}`.
///
/// # Examples
///
/// ```rust
/// use formcheck_validator::foundation::{MessageCatalog, ValidationError};
///
/// let catalog = MessageCatalog::default().with_message("min_size", "At least {size}, please");
/// let error = ValidationError::code("min_size").with_param("size", 5);
/// assert_eq!(catalog.render(&error), "At least 5, please");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCatalog {
    templates: IndexMap<Cow<'static, str>, Cow<'static, str>>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            templates: DEFAULTS
                .iter()
                .map(|&(code, text)| (Cow::Borrowed(code), Cow::Borrowed(text)))
                .collect(),
        }
    }
}

impl MessageCatalog {
    /// Creates a catalog without any templates.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            templates: IndexMap::new(),
        }
    }

    /// Sets or replaces the template for `code`.
    pub fn set(
        &mut self,
        code: impl Into<Cow<'static, str>>,
        template: impl Into<Cow<'static, str>>,
    ) {
        self.templates.insert(code.into(), template.into());
    }

    /// Builder form of [`set`](Self::set).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(
        mut self,
        code: impl Into<Cow<'static, str>>,
        template: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.set(code, template);
        self
    }

    /// Template registered for `code`.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&str> {
        self.templates.get(code).map(AsRef::as_ref)
    }

    /// Iterates over `(code, template)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.templates.iter().map(|(k, v)| (k.as_ref(), v.as_ref()))
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns `true` if no template is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Produces the final message for a failed rule.
    ///
    /// Catalog template for the code, then the error's own message, then the
    /// generic fallback.
    #[must_use]
    pub fn render(&self, error: &ValidationError) -> String {
        if let Some(template) = self.get(&error.code) {
            return fill_template(template, error);
        }
        if !error.message.is_empty() {
            return fill_template(&error.message, error);
        }
        self.get(FALLBACK_CODE)
            .map(|template| fill_template(template, error))
            .unwrap_or_default()
    }
}

impl<K, V> Extend<(K, V)> for MessageCatalog
where
    K: Into<Cow<'static, str>>,
    V: Into<Cow<'static, str>>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (code, template) in iter {
            self.set(code, template);
        }
    }
}

/// Replaces `{name}` placeholders with the error's parameters.
///
/// Unknown placeholders are left verbatim.
fn fill_template(template: &str, error: &ValidationError) -> String {
    if error.params.is_empty() || !template.contains('{') {
        return template.to_owned();
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match error.param(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
