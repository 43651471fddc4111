use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use catalog_db::{Collection, DocumentId, Entity, Filter, Sort};
use catalog_http::{AppError, HtmlTemplate};

use super::forms::{self, GenreForm};
use super::models::Genre;
use super::views::{GenreDeleteView, GenreDetailView, GenreFormView, GenreListView};
use crate::modules::books::models::Book;
use crate::modules::crud::{fetch_with_dependents, parse_id, redirect};
use crate::validation::{FieldError, Validated, ValidationErrorKind};
use crate::MOUNT_PATH;

#[derive(Clone)]
pub struct GenresState {
    pub genres: Collection<Genre>,
    pub books: Collection<Book>,
}

pub fn router(state: GenresState) -> Router {
    Router::new()
        .route("/genres", get(genre_list))
        .route("/genre/create", get(genre_create_get).post(genre_create_post))
        .route("/genre/{id}", get(genre_detail))
        .route("/genre/{id}/delete", get(genre_delete_get).post(genre_delete_post))
        .route("/genre/{id}/update", get(genre_update_get).post(genre_update_post))
        .with_state(state)
}

fn list_url() -> String {
    format!("{MOUNT_PATH}/genres")
}

fn books_in(genre: DocumentId) -> Filter {
    Filter::eq("genre", genre)
}

fn form_page(title: &'static str, validated: Validated<Genre>) -> Response {
    HtmlTemplate::page(GenreFormView {
        title,
        genre: validated.draft,
        errors: validated.errors,
    })
    .into_response()
}

async fn genre_list(
    State(state): State<GenresState>,
) -> Result<HtmlTemplate<GenreListView>, AppError> {
    let genre_list = state.genres.find_all(&Sort::ascending("name")).await?;

    Ok(HtmlTemplate::page(GenreListView {
        title: "Genre List",
        genre_list,
    }))
}

async fn genre_detail(
    State(state): State<GenresState>,
    Path(id): Path<String>,
) -> Result<HtmlTemplate<GenreDetailView>, AppError> {
    let not_found = || AppError::not_found("Genre not found");
    let id = parse_id(&id).ok_or_else(not_found)?;

    let (genre, genre_books) =
        fetch_with_dependents(state.genres.find_by_id(&id), state.books.find_where(&books_in(id)))
            .await?;
    let genre = genre.ok_or_else(not_found)?;

    Ok(HtmlTemplate::page(GenreDetailView {
        title: "Genre Detail",
        genre,
        genre_books,
    }))
}

async fn genre_create_get() -> HtmlTemplate<GenreFormView> {
    HtmlTemplate::page(GenreFormView {
        title: "Create Genre",
        genre: Genre {
            name: String::new(),
        },
        errors: Vec::new(),
    })
}

async fn genre_create_post(
    State(state): State<GenresState>,
    Form(form): Form<GenreForm>,
) -> Result<Response, AppError> {
    let validated = forms::validate_create(&form);

    if !validated.is_valid() {
        return Ok(form_page("Create Genre", validated));
    }

    if let Some(existing) = state
        .genres
        .find_one_case_insensitive("name", &validated.draft.name)
        .await?
    {
        tracing::info!(genre_id = %existing.id, "duplicate genre redirected");
        return Ok(redirect(&existing.url()));
    }

    let genre = state.genres.insert(&validated.draft).await?;
    tracing::info!(genre_id = %genre.id, "genre created");

    Ok(redirect(&genre.url()))
}

async fn genre_delete_get(
    State(state): State<GenresState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(&id) else {
        return Ok(redirect(&list_url()));
    };

    let (genre, genre_books) =
        fetch_with_dependents(state.genres.find_by_id(&id), state.books.find_where(&books_in(id)))
            .await?;
    let Some(genre) = genre else {
        return Ok(redirect(&list_url()));
    };

    Ok(HtmlTemplate::page(GenreDeleteView {
        title: "Delete Genre",
        genre,
        genre_books,
    })
    .into_response())
}

async fn genre_delete_post(
    State(state): State<GenresState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(&id) else {
        return Ok(redirect(&list_url()));
    };

    // Checked again here: books may have been tagged since the confirmation page.
    let (genre, genre_books) =
        fetch_with_dependents(state.genres.find_by_id(&id), state.books.find_where(&books_in(id)))
            .await?;
    let Some(genre) = genre else {
        return Ok(redirect(&list_url()));
    };

    if !genre_books.is_empty() {
        tracing::info!(
            genre_id = %id,
            books = genre_books.len(),
            "genre delete refused"
        );
        return Ok(HtmlTemplate::page(GenreDeleteView {
            title: "Delete Genre",
            genre,
            genre_books,
        })
        .into_response());
    }

    state.genres.delete_by_id(&id).await?;
    tracing::info!(genre_id = %id, "genre deleted");

    Ok(redirect(&list_url()))
}

async fn genre_update_get(
    State(state): State<GenresState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let genre = match parse_id(&id) {
        Some(id) => state.genres.find_by_id(&id).await?,
        None => None,
    };
    let Some(genre) = genre else {
        return Ok(redirect(&list_url()));
    };

    Ok(HtmlTemplate::page(GenreFormView {
        title: "Update Genre",
        genre: genre.fields,
        errors: Vec::new(),
    })
    .into_response())
}

async fn genre_update_post(
    State(state): State<GenresState>,
    Path(id): Path<String>,
    Form(form): Form<GenreForm>,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(&id) else {
        return Ok(redirect(&list_url()));
    };
    let mut validated = forms::validate_update(&form);

    if validated.is_valid() {
        let clash = state
            .genres
            .find_one_case_insensitive("name", &validated.draft.name)
            .await?;
        if clash.is_some_and(|other| other.id != id) {
            validated.errors.push(FieldError {
                field: "name",
                kind: ValidationErrorKind::Duplicate,
                message: format!("genre '{}' already exists", validated.draft.name),
            });
        }
    }

    if !validated.is_valid() {
        return Ok(form_page("Update Genre", validated));
    }

    match state.genres.replace_by_id(&id, &validated.draft).await? {
        Some(_) => {
            tracing::info!(genre_id = %id, "genre updated");
            Ok(redirect(&Genre::url_for(&id)))
        }
        None => {
            tracing::warn!(genre_id = %id, "genre vanished before update");
            Ok(redirect(&list_url()))
        }
    }
}
