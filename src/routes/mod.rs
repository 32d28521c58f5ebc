pub mod actors;
pub mod auth;
pub mod movies;

use axum::{routing::get, Router};

use crate::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .merge(movies::router())
        .merge(actors::router())
        .nest("/auth", auth::router())
        .with_state(state)
}

async fn welcome() -> &'static str {
    "Welcome to Ripe Tomatoes API"
}
