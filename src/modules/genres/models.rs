use catalog_db::{DocumentId, Entity};
use serde::{Deserialize, Serialize};

use crate::MOUNT_PATH;

/// A book genre. Names are unique ignoring case and accents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
}

impl Entity for Genre {
    const COLLECTION: &'static str = "genres";

    fn url_for(id: &DocumentId) -> String {
        format!("{MOUNT_PATH}/genre/{id}")
    }
}
