//! Application error type mapping to HTTP responses.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use agora_types::error::RenderError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// The requested page does not exist.
    NotFound,
    /// Document rendering failure.
    Render(RenderError),
    /// Template rendering failure.
    Template(askama::Error),
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        AppError::Render(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "<h1>404</h1><p>Page not found.</p>".to_string(),
            ),
            AppError::Render(err) => {
                tracing::error!(%err, "document rendering failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "<h1>500</h1><p>Something went wrong.</p>".to_string(),
                )
            }
            AppError::Template(err) => {
                tracing::error!(%err, "template rendering failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "<h1>500</h1><p>Something went wrong.</p>".to_string(),
                )
            }
        };
        (status, Html(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let response = AppError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn render_errors_map_to_500() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let response = AppError::Render(RenderError::Io(io)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
