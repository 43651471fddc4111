use askama::Template;
use catalog_db::Record;

use super::models::Author;
use crate::modules::books::models::Book;
use crate::validation::FieldError;

#[derive(Template)]
#[template(path = "author_list.html")]
pub struct AuthorListView {
    pub title: &'static str,
    pub author_list: Vec<Record<Author>>,
}

#[derive(Template)]
#[template(path = "author_detail.html")]
pub struct AuthorDetailView {
    pub title: &'static str,
    pub author: Record<Author>,
    pub author_books: Vec<Record<Book>>,
}

#[derive(Template)]
#[template(path = "author_form.html")]
pub struct AuthorFormView {
    pub title: &'static str,
    pub author: AuthorFormValues,
    pub errors: Vec<FieldError>,
}

#[derive(Template)]
#[template(path = "author_delete.html")]
pub struct AuthorDeleteView {
    pub title: &'static str,
    pub author: Record<Author>,
    pub author_books: Vec<Record<Book>>,
}

/// Author fields as the form inputs show them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorFormValues {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: String,
    pub date_of_death: String,
}

impl From<&Author> for AuthorFormValues {
    fn from(author: &Author) -> Self {
        let input = |date: Option<chrono::NaiveDate>| {
            date.map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        };

        Self {
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: input(author.date_of_birth),
            date_of_death: input(author.date_of_death),
        }
    }
}
