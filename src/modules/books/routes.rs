use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use catalog_db::{Collection, Filter, Sort};
use catalog_http::{AppError, HtmlTemplate};

use super::models::Book;
use super::views::{BookDetailView, BookListItem, BookListView};
use crate::modules::authors::models::Author;
use crate::modules::crud::parse_id;
use crate::modules::genres::models::Genre;

#[derive(Clone)]
pub struct BooksState {
    pub books: Collection<Book>,
    pub authors: Collection<Author>,
    pub genres: Collection<Genre>,
}

pub fn router(state: BooksState) -> Router {
    Router::new()
        .route("/books", get(book_list))
        .route("/book/{id}", get(book_detail))
        .with_state(state)
}

async fn book_list(State(state): State<BooksState>) -> Result<HtmlTemplate<BookListView>, AppError> {
    let by_title = Sort::ascending("title");
    let by_family_name = Sort::ascending("family_name");
    let (books, authors) = tokio::try_join!(
        state.books.find_all(&by_title),
        state.authors.find_all(&by_family_name),
    )?;

    let names: HashMap<_, _> = authors
        .into_iter()
        .map(|author| (author.id, author.name()))
        .collect();

    let book_list = books
        .into_iter()
        .map(|book| BookListItem {
            url: book.url(),
            author_name: names.get(&book.author).cloned().unwrap_or_default(),
            title: book.fields.title,
        })
        .collect();

    Ok(HtmlTemplate::page(BookListView {
        title: "Book List",
        book_list,
    }))
}

async fn book_detail(
    State(state): State<BooksState>,
    Path(id): Path<String>,
) -> Result<HtmlTemplate<BookDetailView>, AppError> {
    let not_found = || AppError::not_found("Book not found");
    let id = parse_id(&id).ok_or_else(not_found)?;
    let book = state.books.find_by_id(&id).await?.ok_or_else(not_found)?;

    let tagged = Filter::any_of("id", book.genre.iter().copied());
    let (author, genres) = tokio::try_join!(
        state.authors.find_by_id(&book.author),
        state.genres.find_where(&tagged),
    )?;

    Ok(HtmlTemplate::page(BookDetailView {
        title: "Book Detail",
        book,
        author,
        genres,
    }))
}
