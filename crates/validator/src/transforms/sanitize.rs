//! Escaping and sanitizing transforms
//!
//! Every [`Sanitizer`] has a generic fallback written here. A host that
//! has richer implementations injects them through a [`Sanitizers`] table
//! when building the validator; kinds without an override keep using the
//! fallback.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::foundation::Transform;

/// Character reference at the start of the text: `&amp;`, `&#39;`, `&#x27;`.
static ENTITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:[a-zA-Z][a-zA-Z0-9]*|#[0-9]+|#[xX][0-9a-fA-F]+);").unwrap()
});

static SLUG_STRIP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_\s-]").unwrap());

static SLUG_COLLAPSE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s-]+").unwrap());


/// Schemes kept by [`escape_url`].
pub const ALLOWED_PROTOCOLS: &[&str] = &[
    "http", "https", "ftp", "ftps", "mailto", "news", "irc", "gopher", "nntp", "feed", "telnet",
];

// ============================================================================
// SANITIZER KINDS
// ============================================================================

/// The escaping and sanitizing transforms a chain can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sanitizer {
    /// Escapes text for an HTML attribute value.
    EscAttr,
    /// Escapes text for an HTML body.
    EscHtml,
    /// Escapes text for an inline JavaScript string.
    EscJs,
    /// Makes text safe inside a `<textarea>`.
    EscTextarea,
    /// Cleans and encodes a URL for HTML output.
    EscUrl,
    /// Single-line plain text: tags and line breaks removed.
    SanitizeText,
    /// URL-friendly slug.
    SanitizeTitle,
    /// Keeps only characters allowed in an e-mail address.
    SanitizeEmail,
    /// Makes text usable as an HTML class name. Falls back to the slug.
    SanitizeHtmlClass,
    /// Keeps only characters allowed in a URL.
    SanitizeUrl,
}

impl Sanitizer {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::EscAttr,
        Self::EscHtml,
        Self::EscJs,
        Self::EscTextarea,
        Self::EscUrl,
        Self::SanitizeText,
        Self::SanitizeTitle,
        Self::SanitizeEmail,
        Self::SanitizeHtmlClass,
        Self::SanitizeUrl,
    ];

    /// Snake-case name, as used in rule plans and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::EscAttr => "esc_attr",
            Self::EscHtml => "esc_html",
            Self::EscJs => "esc_js",
            Self::EscTextarea => "esc_textarea",
            Self::EscUrl => "esc_url",
            Self::SanitizeText => "sanitize_text_field",
            Self::SanitizeTitle => "sanitize_title",
            Self::SanitizeEmail => "sanitize_email",
            Self::SanitizeHtmlClass => "sanitize_html_class",
            Self::SanitizeUrl => "sanitize_url",
        }
    }

    /// The generic implementation used when no override is installed.
    #[must_use]
    pub fn fallback(self, input: &str) -> String {
        match self {
            Self::EscAttr | Self::EscHtml => escape_html(input),
            Self::EscJs => escape_js(input),
            Self::EscTextarea => strip_tags(input),
            Self::EscUrl => escape_url(input),
            Self::SanitizeText => sanitize_text(input),
            Self::SanitizeTitle | Self::SanitizeHtmlClass => slugify(input),
            Self::SanitizeEmail => input.chars().filter(|c| is_email_char(*c)).collect(),
            Self::SanitizeUrl => input.chars().filter(|c| is_url_char(*c)).collect(),
        }
    }
}

impl fmt::Display for Sanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// OVERRIDE TABLE
// ============================================================================

/// A host-supplied sanitizer implementation.
pub type SanitizerFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Per-kind overrides for the fallback sanitizers.
///
/// # Examples
///
/// ```
/// use formcheck_validator::prelude::*;
///
/// let sanitizers = Sanitizers::new().with(Sanitizer::SanitizeTitle, |s: &str| s.replace(' ', "_"));
/// assert_eq!(sanitizers.apply(Sanitizer::SanitizeTitle, "a b"), "a_b");
/// assert_eq!(sanitizers.apply(Sanitizer::EscHtml, "<b>"), "&lt;b&gt;");
/// ```
#[derive(Clone, Default)]
pub struct Sanitizers {
    overrides: HashMap<Sanitizer, SanitizerFn>,
}

impl fmt::Debug for Sanitizers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.overrides.keys().map(|kind| kind.name()).collect();
        kinds.sort_unstable();
        f.debug_struct("Sanitizers")
            .field("overrides", &kinds)
            .finish()
    }
}

impl Sanitizers {
    /// An empty table: every kind uses its fallback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs an override.
    #[must_use = "builder methods must be chained or built"]
    pub fn with<F>(mut self, kind: Sanitizer, sanitizer: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.set(kind, sanitizer);
        self
    }

    /// Installs or replaces an override.
    pub fn set<F>(&mut self, kind: Sanitizer, sanitizer: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.overrides.insert(kind, Arc::new(sanitizer));
    }

    /// Returns `true` if `kind` has an override.
    #[must_use]
    pub fn has_override(&self, kind: Sanitizer) -> bool {
        self.overrides.contains_key(&kind)
    }

    /// Runs the override for `kind`, or its fallback.
    #[must_use]
    pub fn apply(&self, kind: Sanitizer, input: &str) -> String {
        match self.overrides.get(&kind) {
            Some(sanitizer) => sanitizer(input),
            None => kind.fallback(input),
        }
    }

    /// Resolves `kind` into a standalone [`Transform`].
    #[must_use]
    pub fn bind(&self, kind: Sanitizer) -> BoundSanitizer {
        BoundSanitizer {
            kind,
            custom: self.overrides.get(&kind).cloned(),
        }
    }
}

/// A sanitizer kind resolved against a [`Sanitizers`] table.
#[derive(Clone)]
pub struct BoundSanitizer {
    kind: Sanitizer,
    custom: Option<SanitizerFn>,
}

impl BoundSanitizer {
    /// The sanitizer kind.
    #[must_use]
    pub fn kind(&self) -> Sanitizer {
        self.kind
    }
}

impl fmt::Debug for BoundSanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundSanitizer")
            .field("kind", &self.kind)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

impl Transform for BoundSanitizer {
    fn apply(&self, input: &str) -> String {
        match &self.custom {
            Some(sanitizer) => sanitizer(input),
            None => self.kind.fallback(input),
        }
    }
}

// ============================================================================
// FALLBACKS
// ============================================================================

/// Escapes `& < > " '`, leaving existing character references alone.
#[must_use]
pub fn escape_html(input: &str) -> String {
    escape_specials(input, true)
}

fn escape_specials(input: &str, single_quotes: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for (i, c) in input.char_indices() {
        match c {
            '&' if ENTITY_REGEX.is_match(&input[i..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' if single_quotes => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

/// Removes everything between `<` and the next `>`, including unclosed tags.
#[must_use]
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for c in input.chars() {
        match (in_tag, c) {
            (false, '<') => in_tag = true,
            (true, '>') => in_tag = false,
            (false, other) => out.push(other),
            (true, _) => {}
        }
    }
    out
}

/// Escapes text for a single-quoted JavaScript string inside HTML.
#[must_use]
pub fn escape_js(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in escape_specials(input, false).chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\r' => {}
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

/// Plain single-line text: tags stripped, line breaks removed, trimmed.
#[must_use]
pub fn sanitize_text(input: &str) -> String {
    strip_tags(input)
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n'))
        .collect::<String>()
        .trim()
        .to_owned()
}

/// Lowercase slug: tags stripped, ASCII alphanumerics, `_` and `-` kept,
/// runs of whitespace and dashes turned into a single `-`.
#[must_use]
pub fn slugify(input: &str) -> String {
    let lowered = strip_tags(input).to_ascii_lowercase();
    let kept = SLUG_STRIP_REGEX.replace_all(&lowered, "");
    SLUG_COLLAPSE_REGEX.replace_all(&kept, "-").into_owned()
}

fn is_email_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-=?^_`{|}~@.[]".contains(c)
}

fn is_url_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "$-_.+!*'(),{}|\\^~[]`<>#%\";/?:@&=".contains(c)
}

fn is_escaped_url_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || !c.is_ascii() || "-~+_.?#=!&;,/:%@$|*'()[]".contains(c)
}

/// Cleans a URL for HTML output.
///
/// Spaces become `%20`, characters outside the URL alphabet are dropped,
/// `http://` is prepended to scheme-less absolute links, links whose scheme
/// is not in [`ALLOWED_PROTOCOLS`] become empty, and `&` / `'` are encoded
/// as `&#038;` / `&#039;`. Relative links (`/path`, `#anchor`, `?query`)
/// are kept as they are.
#[must_use]
pub fn escape_url(input: &str) -> String {
    let cleaned: String = input
        .trim()
        .replace(' ', "%20")
        .chars()
        .filter(|c| is_escaped_url_char(*c))
        .collect();
    if cleaned.is_empty() {
        return cleaned;
    }

    let url = if cleaned.contains(':') || cleaned.starts_with(['/', '#', '?']) {
        cleaned
    } else {
        format!("http://{cleaned}")
    };

    if let Some((scheme, _)) = url.split_once(':') {
        let is_scheme = !scheme.contains(['/', '?', '#']);
        if is_scheme && !ALLOWED_PROTOCOLS.contains(&scheme.to_ascii_lowercase().as_str()) {
            return String::new();
        }
    }

    url.replace("&amp;", "&").replace('&', "&#038;").replace('\'', "&#039;")
}
