//! Field values
//!
//! Form input is mostly text, but multi-select widgets and bracketed field
//! names (`tags[]`, `address[city]`) produce sequences and keyed maps. The
//! engine treats all of them through [`FieldValue`].

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// The current value of a field.
///
/// # Examples
///
/// ```rust
/// use formcheck_validator::FieldValue;
///
/// assert!(FieldValue::from("").is_empty());
/// assert!(FieldValue::from(Vec::<String>::new()).is_empty());
/// assert!(!FieldValue::from("0").is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No value at all. Serialized as `null`.
    #[default]
    Empty,
    /// A single text value.
    Text(String),
    /// An ordered sequence of values.
    List(Vec<FieldValue>),
    /// Keyed values, in insertion order.
    Map(IndexMap<String, FieldValue>),
}

impl FieldValue {
    /// Returns `true` for `Empty`, `""`, an empty list and an empty map.
    ///
    /// Every rule except `required` is skipped while this holds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Map(entries) => entries.is_empty(),
        }
    }

    /// Returns the text if this is a scalar value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Empty => Some(""),
            _ => None,
        }
    }

    /// Returns `true` for `List` and `Map`.
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::List(_) | Self::Map(_))
    }

    /// Trims leading and trailing whitespace of a text value.
    ///
    /// Sequences are left untouched.
    #[must_use]
    pub fn trimmed(self) -> Self {
        match self {
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.len() == s.len() {
                    Self::Text(s)
                } else {
                    Self::Text(trimmed.to_owned())
                }
            }
            other => other,
        }
    }

    /// Size used by `min_size` / `max_size`: characters for text,
    /// element count for sequences.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Text(s) => s.chars().count(),
            Self::List(items) => items.len(),
            Self::Map(entries) => entries.len(),
        }
    }

    /// Returns `true` if `predicate` holds for every text leaf.
    pub fn all_text(&self, predicate: &mut impl FnMut(&str) -> bool) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => predicate(s),
            Self::List(items) => items.iter().all(|item| item.all_text(predicate)),
            Self::Map(entries) => entries.values().all(|item| item.all_text(predicate)),
        }
    }

    /// Rewrites every text leaf, preserving structure.
    #[must_use]
    pub fn map_text(self, f: &impl Fn(&str) -> String) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Text(s) => Self::Text(f(&s)),
            Self::List(items) => Self::List(items.into_iter().map(|v| v.map_text(f)).collect()),
            Self::Map(entries) => {
                Self::Map(entries.into_iter().map(|(k, v)| (k, v.map_text(f))).collect())
            }
        }
    }

    /// Deep search: a text leaf equal to `needle`, or a map key equal to
    /// `needle`, anywhere in the structure.
    #[must_use]
    pub fn contains_deep(&self, needle: &str) -> bool {
        match self {
            Self::Empty => false,
            Self::Text(s) => s == needle,
            Self::List(items) => items.iter().any(|item| item.contains_deep(needle)),
            Self::Map(entries) => entries
                .iter()
                .any(|(key, item)| key == needle || item.contains_deep(needle)),
        }
    }

    /// Shallow element list of a sequence. Maps yield their values.
    #[must_use]
    pub fn elements(&self) -> Vec<&FieldValue> {
        match self {
            Self::List(items) => items.iter().collect(),
            Self::Map(entries) => entries.values().collect(),
            _ => Vec::new(),
        }
    }

    /// Human-readable name of the variant, used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Self::Map(entries) => {
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}={item}")?;
                }
                Ok(())
            }
        }
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Text(if value { "1".to_owned() } else { String::new() })
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Text(value.to_string())
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>, const N: usize> From<[T; N]> for FieldValue {
    fn from(values: [T; N]) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FieldValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Empty,
            Value::Bool(b) => b.into(),
            Value::Number(n) => Self::Text(n.to_string()),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(entries) => {
                Self::Map(entries.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}
