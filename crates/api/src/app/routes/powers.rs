use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};

use superheroes_core::PowerId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_powers))
        .route("/:id", patch(update_power))
}

pub async fn list_powers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store().list_powers().await {
        Ok(powers) => (StatusCode::OK, Json(powers)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Replace a power's description.
///
/// Order of checks: unknown id (404), missing description (400 `error`),
/// too-short description (400 `errors`). The stored row is written only
/// after all checks pass.
pub async fn update_power(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdatePowerRequest>, JsonRejection>,
) -> axum::response::Response {
    let id: PowerId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::NOT_FOUND, errors::POWER_NOT_FOUND),
    };

    let power = match services.store().get_power(id).await {
        Ok(Some(power)) => power,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, errors::POWER_NOT_FOUND),
        Err(e) => return errors::store_error_to_response(e),
    };

    let description = match body {
        Ok(Json(req)) => req.description(),
        Err(rejection) => {
            tracing::debug!(%rejection, "unreadable power update body");
            None
        }
    };
    let Some(description) = description else {
        return errors::json_error(StatusCode::BAD_REQUEST, errors::INVALID_REQUEST);
    };

    let next = match power.with_description(description) {
        Ok(next) => next,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store().update_power(&next).await {
        Ok(Some(saved)) => {
            tracing::info!(power_id = %saved.id, "power description updated");
            (StatusCode::OK, Json(saved)).into_response()
        }
        // Deleted between the lookup and the write.
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, errors::POWER_NOT_FOUND),
        Err(e) => errors::store_error_to_response(e),
    }
}
