//! Error handling for the catalog HTTP layer

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use catalog_db::StoreError;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Request failures that end in an error page.
///
/// Form validation problems and refused deletes are not errors at this level;
/// handlers answer those by re-rendering the form.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {message}")]
    NotFound { message: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),
}

impl AppError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::NotFound { message } => message.clone(),
            _ => "An internal server error occurred".to_string(),
        }
    }
}

/// Everything needed to render an error page, kept on the response so the
/// error-detail layer can render it again with the detail visible.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub message: String,
    pub detail: String,
    pub error_id: Uuid,
    pub timestamp: OffsetDateTime,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorPage<'a> {
    status: u16,
    message: &'a str,
    error_id: String,
    timestamp: String,
    detail: Option<&'a str>,
}

impl ErrorReport {
    /// Render the error page, with or without the internal detail.
    pub fn render(&self, with_detail: bool) -> Response {
        let page = ErrorPage {
            status: self.status.as_u16(),
            message: &self.message,
            error_id: self.error_id.to_string(),
            timestamp: self.timestamp.to_string(),
            detail: with_detail.then_some(self.detail.as_str()),
        };

        let mut response = match page.render() {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(err) => {
                tracing::error!(error_id = %self.error_id, "error page rendering failed: {}", err);
                (self.status, self.message.clone()).into_response()
            }
        };
        response.extensions_mut().insert(self.clone());
        response
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let report = ErrorReport {
            status,
            message: self.public_message(),
            detail: format!("{:#}", anyhow::Error::new(self)),
            error_id: Uuid::now_v7(),
            timestamp: OffsetDateTime::now_utc(),
        };

        if status.is_server_error() {
            tracing::error!(
                error_id = %report.error_id,
                status_code = %status.as_u16(),
                detail = %report.detail,
                "Request error"
            );
        } else {
            tracing::info!(
                error_id = %report.error_id,
                status_code = %status.as_u16(),
                message = %report.message,
                "Request error"
            );
        }

        report.render(false)
    }
}

/// Response mapper that re-renders error pages with their detail when the
/// environment allows it.
pub async fn expose_error_details(State(expose): State<bool>, response: Response) -> Response {
    if !expose {
        return response;
    }

    match response.extensions().get::<ErrorReport>() {
        Some(report) => report.render(true),
        None => response,
    }
}

/// Fallback handler for unknown routes
pub async fn not_found() -> AppError {
    AppError::not_found("Not Found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_error_response_mapping() {
        let error = AppError::not_found("Author not found");
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<ErrorReport>().is_some());
    }

    #[test]
    fn test_store_error_mapping() {
        let error = AppError::from(StoreError::Closed);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_internal_detail_hidden_by_default() {
        let error = AppError::from(StoreError::Closed);
        let body = body_text(error.into_response()).await;

        assert!(body.contains("An internal server error occurred"));
        assert!(!body.contains("store is closed"));
    }

    #[tokio::test]
    async fn test_detail_exposed_when_allowed() {
        let error = AppError::from(StoreError::Closed);
        let response = expose_error_details(State(true), error.into_response()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert!(body.contains("store is closed"));
    }

    #[tokio::test]
    async fn test_non_error_responses_pass_through() {
        let response = expose_error_details(State(true), "fine".into_response()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "fine");
    }
}
