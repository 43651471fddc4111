//! Filters and sort orders understood by every store backend.

use std::cmp::Ordering;

use serde_json::Value;

use crate::document::Document;

/// Selection predicate for [`crate::DocumentStore::find_where`].
///
/// A field holding an array matches when any of its elements matches, so
/// `Filter::eq("genre", id)` selects every book tagged with that genre.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq { field: String, value: Value },
    In { field: String, values: Vec<Value> },
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn any_of<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::Eq { field, value } => {
                field_matches(doc.field(field).as_ref(), |candidate| candidate == value)
            }
            Filter::In { field, values } => field_matches(doc.field(field).as_ref(), |candidate| {
                values.iter().any(|value| value == candidate)
            }),
        }
    }
}

fn field_matches(field: Option<&Value>, predicate: impl Fn(&Value) -> bool) -> bool {
    match field {
        Some(Value::Array(items)) => items.iter().any(|item| predicate(item)),
        Some(value) => predicate(value),
        None => false,
    }
}

/// Ascending sort order for [`crate::DocumentStore::find_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
}

impl Sort {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        compare_values(a.field(&self.field).as_ref(), b.field(&self.field).as_ref())
    }
}

// Missing and null sort first, then numbers, then strings. Anything else ties.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match (a, b) {
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
