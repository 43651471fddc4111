use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failures raised by a [`crate::DocumentStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store is closed")]
    Closed,

    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid document in collection '{collection}': {reason}")]
    InvalidDocument { collection: String, reason: String },

    #[error("failed to load seed data: {0}")]
    Seed(String),
}

impl StoreError {
    pub fn invalid_document(collection: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            collection: collection.into(),
            reason: reason.into(),
        }
    }
}
