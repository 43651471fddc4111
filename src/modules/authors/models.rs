use catalog_db::{DocumentId, Entity};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::MOUNT_PATH;

/// A book author. Name fields are stored as sanitized by the author form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub first_name: String,
    pub family_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub date_of_death: Option<NaiveDate>,
}

impl Entity for Author {
    const COLLECTION: &'static str = "authors";

    fn url_for(id: &DocumentId) -> String {
        format!("{MOUNT_PATH}/author/{id}")
    }
}

impl Author {
    /// "Family, First" as shown in listings.
    pub fn name(&self) -> String {
        format!("{}, {}", self.family_name, self.first_name)
    }

    /// Birth and death dates, e.g. "Dec 10, 1815 - Nov 27, 1852".
    pub fn lifespan(&self) -> String {
        let display = |date: Option<NaiveDate>| {
            date.map(|d| d.format("%b %-d, %Y").to_string())
                .unwrap_or_default()
        };

        match (self.date_of_birth, self.date_of_death) {
            (None, None) => String::new(),
            (born, died) => format!("{} - {}", display(born), display(died)),
        }
    }
}
