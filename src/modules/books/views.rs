use askama::Template;
use catalog_db::Record;

use super::models::Book;
use crate::modules::authors::models::Author;
use crate::modules::genres::models::Genre;

/// One row of the book list.
pub struct BookListItem {
    pub url: String,
    pub title: String,
    pub author_name: String,
}

#[derive(Template)]
#[template(path = "book_list.html")]
pub struct BookListView {
    pub title: &'static str,
    pub book_list: Vec<BookListItem>,
}

#[derive(Template)]
#[template(path = "book_detail.html")]
pub struct BookDetailView {
    pub title: &'static str,
    pub book: Record<Book>,
    pub author: Option<Record<Author>>,
    pub genres: Vec<Record<Genre>>,
}
