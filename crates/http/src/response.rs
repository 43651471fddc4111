//! Template response helper for server-rendered pages.

use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use crate::error::AppError;

/// Wrapper for rendering templates as HTML responses.
///
/// ```rust,ignore
/// async fn genre_list() -> HtmlTemplate<GenreListView> {
///     HtmlTemplate::page(GenreListView { title: "Genre List", genre_list })
/// }
/// ```
pub struct HtmlTemplate<T: Template> {
    template: T,
}

impl<T: Template> HtmlTemplate<T> {
    #[must_use]
    pub fn page(template: T) -> Self {
        Self { template }
    }
}

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.template.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => AppError::Render(err).into_response(),
        }
    }
}
