use axum::Router;

pub mod hero_powers;
pub mod heroes;
pub mod powers;
pub mod system;

/// Router for the resource endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/heroes", heroes::router())
        .nest("/powers", powers::router())
        .nest("/hero_powers", hero_powers::router())
}
