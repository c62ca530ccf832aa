use axum::http::StatusCode;

use crate::app::errors;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// JSON 404 for paths no route matches.
pub async fn not_found() -> axum::response::Response {
    errors::json_error(StatusCode::NOT_FOUND, "Not found")
}
