//! HTTP error mapping for the car API.
//!
//! Every failure response carries the same wire shape: a JSON object with an
//! `errors` array holding every message for the request at once.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use carhub_core::errors::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Serialize)]
struct ErrorBody {
    errors: Vec<String>,
}

/// Wrapper turning core errors into HTTP responses.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, errors) = match self.0 {
            Error::Validation(errors) => (StatusCode::BAD_REQUEST, errors),
            Error::Conflict(message) => (StatusCode::CONFLICT, vec![message]),
            Error::NotFound(message) => (StatusCode::NOT_FOUND, vec![message]),
            // Storage and unexpected failures are logged in full and reported
            // with a generic message only.
            error => {
                tracing::error!("internal error handling request: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec!["an internal server error occurred".to_string()],
                )
            }
        };
        (status, Json(ErrorBody { errors })).into_response()
    }
}
