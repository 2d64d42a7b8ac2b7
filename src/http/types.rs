use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::error::Error;

use super::render;

/// Wrapper turning domain errors into user-facing HTML responses.
/// NotFound/Forbidden render clean error pages instead of crashing.
#[derive(Debug)]
pub struct AppError(pub Error);

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(e: tower_sessions::session::Error) -> Self {
        Self(Error::Session(e.to_string()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Validation(_) | Error::DuplicateIdentity | Error::UnsupportedImageFormat => {
                StatusCode::BAD_REQUEST
            }
            Error::AuthFailure => StatusCode::UNAUTHORIZED,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::Credential | Error::Session(_) | Error::Io(_) | Error::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
            (status, render::error_page(status, "something went wrong")).into_response()
        } else {
            (status, render::error_page(status, &self.0.to_string())).into_response()
        }
    }
}
