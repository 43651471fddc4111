use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Generated identity of a stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Time-ordered id, so natural order follows insertion order.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parse an id taken from a URL. Returns `None` for anything malformed.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for DocumentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl From<DocumentId> for Value {
    fn from(id: DocumentId) -> Self {
        Value::String(id.to_string())
    }
}

/// A stored JSON document. The id lives outside the body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub body: Map<String, Value>,
}

impl Document {
    pub fn new(id: DocumentId, body: Map<String, Value>) -> Self {
        Self { id, body }
    }

    /// Field lookup. `id` resolves to the document id.
    pub fn field(&self, name: &str) -> Option<Value> {
        if name == "id" {
            return Some(self.id.into());
        }
        self.body.get(name).cloned()
    }
}
