use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use superheroes_core::DomainError;
use superheroes_infra::StoreError;

pub const HERO_NOT_FOUND: &str = "Hero not found";
pub const POWER_NOT_FOUND: &str = "Power not found";
pub const INVALID_REQUEST: &str = "Invalid request";
pub const MISSING_REQUIRED_FIELDS: &str = "Missing required fields";
pub const UNKNOWN_HERO_OR_POWER: &str = "Hero or power does not exist";

/// `{"error": message}` with the given status.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

/// `400 {"errors": [..]}` for failed value validation.
pub fn validation_errors<I, S>(messages: I) -> axum::response::Response
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let errors = messages.into_iter().map(Into::into).collect::<Vec<String>>();
    (StatusCode::BAD_REQUEST, axum::Json(json!({ "errors": errors }))).into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => validation_errors([msg]),
        DomainError::InvalidId(_) => json_error(StatusCode::BAD_REQUEST, INVALID_REQUEST),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::ForeignKey(msg) => {
            tracing::info!(reason = %msg, "rejected write referencing missing row");
            validation_errors([UNKNOWN_HERO_OR_POWER])
        }
        StoreError::Constraint(msg) => {
            tracing::warn!(reason = %msg, "write rejected by column constraint");
            validation_errors(["Request violates a storage constraint"])
        }
        StoreError::Backend(msg) => {
            tracing::error!(reason = %msg, "store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}
