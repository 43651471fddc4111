//! Catalog landing page with entity counts.

use askama::Template;
use async_trait::async_trait;
use axum::{extract::State, routing::get, Router};
use catalog_db::{Collection, StoreHandle};
use catalog_http::{AppError, HtmlTemplate};
use catalog_kernel::Module;

use super::authors::models::Author;
use super::books::models::Book;
use super::genres::models::Genre;

#[derive(Clone)]
struct HomeState {
    books: Collection<Book>,
    authors: Collection<Author>,
    genres: Collection<Genre>,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexView {
    pub title: &'static str,
    pub book_count: usize,
    pub author_count: usize,
    pub genre_count: usize,
}

pub struct HomeModule {
    state: HomeState,
}

impl HomeModule {
    pub fn new(store: &StoreHandle) -> Self {
        Self {
            state: HomeState {
                books: Collection::new(store.clone()),
                authors: Collection::new(store.clone()),
                genres: Collection::new(store.clone()),
            },
        }
    }
}

#[async_trait]
impl Module for HomeModule {
    fn name(&self) -> &'static str {
        "home"
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(index))
            .with_state(self.state.clone())
    }
}

async fn index(State(state): State<HomeState>) -> Result<HtmlTemplate<IndexView>, AppError> {
    let (book_count, author_count, genre_count) = tokio::try_join!(
        state.books.count(),
        state.authors.count(),
        state.genres.count(),
    )?;

    Ok(HtmlTemplate::page(IndexView {
        title: "Local Library Home",
        book_count,
        author_count,
        genre_count,
    }))
}

pub fn create_module(store: &StoreHandle) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(HomeModule::new(store))
}
