use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use superheroes_core::{validate_strength, HeroId, NewHeroPower, PowerId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", post(create_hero_power))
}

/// Link a hero to a power at a given strength.
pub async fn create_hero_power(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateHeroPowerRequest>, JsonRejection>,
) -> axum::response::Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::debug!(%rejection, "unreadable hero_power body");
            return errors::json_error(StatusCode::BAD_REQUEST, errors::INVALID_REQUEST);
        }
    };

    let Some(fields) = req.required_fields() else {
        return errors::json_error(StatusCode::BAD_REQUEST, errors::MISSING_REQUIRED_FIELDS);
    };

    let strength = match validate_strength(&fields.strength) {
        Ok(strength) => strength,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let new = NewHeroPower::new(
        strength,
        HeroId::new(fields.hero_id),
        PowerId::new(fields.power_id),
    );

    match services.store().insert_hero_power(new).await {
        Ok(hero_power) => {
            tracing::info!(
                hero_power_id = %hero_power.id,
                hero_id = %hero_power.hero_id,
                power_id = %hero_power.power_id,
                strength = %hero_power.strength,
                "hero power created"
            );
            (StatusCode::CREATED, Json(hero_power)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
