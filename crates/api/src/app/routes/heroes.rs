use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use superheroes_core::HeroId;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_heroes))
        .route("/:id", get(get_hero))
}

pub async fn list_heroes(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store().list_heroes().await {
        Ok(heroes) => (StatusCode::OK, Json(heroes)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_hero(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    // Non-integer ids can never match a row.
    let id: HeroId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::NOT_FOUND, errors::HERO_NOT_FOUND),
    };

    match services.store().get_hero(id).await {
        Ok(Some(hero)) => (StatusCode::OK, Json(hero)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, errors::HERO_NOT_FOUND),
        Err(e) => errors::store_error_to_response(e),
    }
}
