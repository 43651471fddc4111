use askama::Template;
use catalog_db::Record;

use super::models::Genre;
use crate::modules::books::models::Book;
use crate::validation::FieldError;

#[derive(Template)]
#[template(path = "genre_list.html")]
pub struct GenreListView {
    pub title: &'static str,
    pub genre_list: Vec<Record<Genre>>,
}

#[derive(Template)]
#[template(path = "genre_detail.html")]
pub struct GenreDetailView {
    pub title: &'static str,
    pub genre: Record<Genre>,
    pub genre_books: Vec<Record<Book>>,
}

#[derive(Template)]
#[template(path = "genre_form.html")]
pub struct GenreFormView {
    pub title: &'static str,
    pub genre: Genre,
    pub errors: Vec<FieldError>,
}

#[derive(Template)]
#[template(path = "genre_delete.html")]
pub struct GenreDeleteView {
    pub title: &'static str,
    pub genre: Record<Genre>,
    pub genre_books: Vec<Record<Book>>,
}
