//! Group-level error aggregation.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// Key used by [`GroupErrors::to_json`] when a field has both its own
/// messages and nested children.
pub const OWN_ERRORS_KEY: &str = "_errors";

/// Every error recorded during a validation pass, by field, in the order
/// fields first failed.
///
/// # Examples
///
/// ```
/// use formcheck_validator::prelude::*;
///
/// let mut form = FormValidator::new([("age", "abc"), ("name", "")]);
/// form.field("age").integer().min_value(18.0);
/// form.field("name").required();
///
/// let flat: Vec<_> = form.group_errors().flatten().collect();
/// assert_eq!(flat, [
///     ("age.0".to_owned(), "Only numbers are permitted"),
///     ("age.1".to_owned(), "Please enter a value greater than 18"),
///     ("name.0".to_owned(), "This field is required"),
/// ]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupErrors {
    by_field: IndexMap<String, Vec<String>>,
}

impl GroupErrors {
    /// Creates an empty aggregate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message under `field`. Repeated messages are kept.
    pub fn record(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        match self.by_field.get_mut(field) {
            Some(messages) => messages.push(message),
            None => {
                self.by_field.insert(field.to_owned(), vec![message]);
            }
        }
    }

    /// Messages recorded for `field`; empty if none.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.by_field
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }

    /// Number of fields with at least one error.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_field.len()
    }

    /// Fields and their messages.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.by_field
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// `(path, message)` pairs in field-then-message order, where the path
    /// is `field.index`.
    pub fn flatten(&self) -> impl Iterator<Item = (String, &str)> {
        self.by_field.iter().flat_map(|(field, messages)| {
            messages
                .iter()
                .enumerate()
                .map(move |(i, message)| (format!("{field}.{i}"), message.as_str()))
        })
    }

    /// All messages in field-then-message order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.by_field.values().flatten().map(String::as_str)
    }

    /// All messages joined with `joiner`.
    #[must_use]
    pub fn joined(&self, joiner: &str) -> String {
        self.messages().collect::<Vec<_>>().join(joiner)
    }

    /// Nests composite field names into objects.
    ///
    /// `address[city]` and `address.city` both land under
    /// `{"address": {"city": [...]}}`; empty segments (`tags[]`) are dropped.
    /// A field that has messages of its own and nested children keeps its
    /// own messages under [`OWN_ERRORS_KEY`].
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut root = Map::new();
        for (field, messages) in &self.by_field {
            let mut path: Vec<&str> = field
                .split(['[', ']', '.'])
                .filter(|segment| !segment.is_empty())
                .collect();
            if path.is_empty() {
                path.push(field);
            }
            insert_at(&mut root, &path, messages);
        }
        Value::Object(root)
    }
}

fn insert_at(node: &mut Map<String, Value>, path: &[&str], messages: &[String]) {
    let Some((head, rest)) = path.split_first() else {
        return;
    };
    let new_messages = messages.iter().cloned().map(Value::String);

    if rest.is_empty() {
        match node.get_mut(*head) {
            Some(Value::Array(existing)) => existing.extend(new_messages),
            Some(Value::Object(children)) => match children.get_mut(OWN_ERRORS_KEY) {
                Some(Value::Array(own)) => own.extend(new_messages),
                _ => {
                    children.insert(OWN_ERRORS_KEY.to_owned(), Value::Array(new_messages.collect()));
                }
            },
            _ => {
                node.insert((*head).to_owned(), Value::Array(new_messages.collect()));
            }
        }
        return;
    }

    let entry = node
        .entry((*head).to_owned())
        .or_insert_with(|| Value::Object(Map::new()));
    if let Value::Array(own) = entry {
        let own = std::mem::take(own);
        let mut children = Map::new();
        children.insert(OWN_ERRORS_KEY.to_owned(), Value::Array(own));
        *entry = Value::Object(children);
    }
    if let Value::Object(children) = entry {
        insert_at(children, rest, messages);
    }
}
