use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use catalog_db::{Collection, DocumentId, Filter, Sort};
use catalog_http::{AppError, HtmlTemplate};

use super::forms::{self, AuthorForm};
use super::models::Author;
use super::views::{
    AuthorDeleteView, AuthorDetailView, AuthorFormValues, AuthorFormView, AuthorListView,
};
use crate::modules::books::models::Book;
use crate::modules::crud::{fetch_with_dependents, parse_id, redirect};
use crate::MOUNT_PATH;

#[derive(Clone)]
pub struct AuthorsState {
    pub authors: Collection<Author>,
    pub books: Collection<Book>,
}

pub fn router(state: AuthorsState) -> Router {
    Router::new()
        .route("/authors", get(author_list))
        .route("/author/create", get(author_create_get).post(author_create_post))
        .route("/author/{id}", get(author_detail))
        .route("/author/{id}/delete", get(author_delete_get).post(author_delete_post))
        .route("/author/{id}/update", get(author_update_get).post(author_update_post))
        .with_state(state)
}

fn list_url() -> String {
    format!("{MOUNT_PATH}/authors")
}

fn books_by(author: DocumentId) -> Filter {
    Filter::eq("author", author)
}

async fn author_list(
    State(state): State<AuthorsState>,
) -> Result<HtmlTemplate<AuthorListView>, AppError> {
    let author_list = state.authors.find_all(&Sort::ascending("family_name")).await?;

    Ok(HtmlTemplate::page(AuthorListView {
        title: "Author List",
        author_list,
    }))
}

async fn author_detail(
    State(state): State<AuthorsState>,
    Path(id): Path<String>,
) -> Result<HtmlTemplate<AuthorDetailView>, AppError> {
    let not_found = || AppError::not_found("Author not found");
    let id = parse_id(&id).ok_or_else(not_found)?;

    let (author, author_books) =
        fetch_with_dependents(state.authors.find_by_id(&id), state.books.find_where(&books_by(id)))
            .await?;
    let author = author.ok_or_else(not_found)?;

    Ok(HtmlTemplate::page(AuthorDetailView {
        title: "Author Detail",
        author,
        author_books,
    }))
}

async fn author_create_get() -> HtmlTemplate<AuthorFormView> {
    HtmlTemplate::page(AuthorFormView {
        title: "Create Author",
        author: AuthorFormValues::default(),
        errors: Vec::new(),
    })
}

async fn author_create_post(
    State(state): State<AuthorsState>,
    Form(form): Form<AuthorForm>,
) -> Result<Response, AppError> {
    let validated = forms::validate(&form);

    if !validated.is_valid() {
        return Ok(HtmlTemplate::page(AuthorFormView {
            title: "Create Author",
            author: AuthorFormValues::from(&validated.draft),
            errors: validated.errors,
        })
        .into_response());
    }

    let author = state.authors.insert(&validated.draft).await?;
    tracing::info!(author_id = %author.id, "author created");

    Ok(redirect(&author.url()))
}

async fn author_delete_get(
    State(state): State<AuthorsState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(&id) else {
        return Ok(redirect(&list_url()));
    };

    let (author, author_books) =
        fetch_with_dependents(state.authors.find_by_id(&id), state.books.find_where(&books_by(id)))
            .await?;
    let Some(author) = author else {
        return Ok(redirect(&list_url()));
    };

    Ok(HtmlTemplate::page(AuthorDeleteView {
        title: "Delete Author",
        author,
        author_books,
    })
    .into_response())
}

async fn author_delete_post(
    State(state): State<AuthorsState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(&id) else {
        return Ok(redirect(&list_url()));
    };

    // Books may have been added since the confirmation page was shown.
    let (author, author_books) =
        fetch_with_dependents(state.authors.find_by_id(&id), state.books.find_where(&books_by(id)))
            .await?;
    let Some(author) = author else {
        return Ok(redirect(&list_url()));
    };

    if !author_books.is_empty() {
        tracing::info!(
            author_id = %id,
            books = author_books.len(),
            "author delete refused"
        );
        return Ok(HtmlTemplate::page(AuthorDeleteView {
            title: "Delete Author",
            author,
            author_books,
        })
        .into_response());
    }

    state.authors.delete_by_id(&id).await?;
    tracing::info!(author_id = %id, "author deleted");

    Ok(redirect(&list_url()))
}

async fn author_update_get(
    State(state): State<AuthorsState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let author = match parse_id(&id) {
        Some(id) => state.authors.find_by_id(&id).await?,
        None => None,
    };
    let Some(author) = author else {
        return Ok(redirect(&list_url()));
    };

    Ok(HtmlTemplate::page(AuthorFormView {
        title: "Update Author",
        author: AuthorFormValues::from(&author.fields),
        errors: Vec::new(),
    })
    .into_response())
}

async fn author_update_post(
    State(state): State<AuthorsState>,
    Path(id): Path<String>,
    Form(form): Form<AuthorForm>,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(&id) else {
        return Ok(redirect(&list_url()));
    };
    let validated = forms::validate(&form);

    if !validated.is_valid() {
        return Ok(HtmlTemplate::page(AuthorFormView {
            title: "Update Author",
            author: AuthorFormValues::from(&validated.draft),
            errors: validated.errors,
        })
        .into_response());
    }

    match state.authors.replace_by_id(&id, &validated.draft).await? {
        Some(author) => {
            tracing::info!(author_id = %id, "author updated");
            Ok(redirect(&author.url()))
        }
        None => {
            tracing::warn!(author_id = %id, "author vanished before update");
            Ok(redirect(&list_url()))
        }
    }
}
