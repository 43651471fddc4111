use catalog_db::{DocumentId, Entity};
use serde::{Deserialize, Serialize};

use crate::MOUNT_PATH;

/// A catalog book. Each book references one author and any number of genres,
/// and blocks deletion of both while it exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: DocumentId,
    pub summary: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub genre: Vec<DocumentId>,
}

impl Entity for Book {
    const COLLECTION: &'static str = "books";

    fn url_for(id: &DocumentId) -> String {
        format!("{MOUNT_PATH}/book/{id}")
    }
}
