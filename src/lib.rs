pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use utoipa::OpenApi;

use crate::db::{Repository, UserRepository};
use crate::models::{Actor, Movie};
use crate::services::{PasswordHasher, TokenService};

/// Everything a handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub movies: Arc<dyn Repository<Movie>>,
    pub actors: Arc<dyn Repository<Actor>>,
    pub users: Arc<dyn UserRepository>,
    pub tokens: TokenService,
    pub hasher: PasswordHasher,
}

impl AppState {
    /// Uses one backend for all three tables.
    pub fn new<S>(store: Arc<S>, tokens: TokenService, hasher: PasswordHasher) -> Self
    where
        S: Repository<Movie> + Repository<Actor> + UserRepository + 'static,
    {
        Self {
            movies: store.clone(),
            actors: store.clone(),
            users: store,
            tokens,
            hasher,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::movies::list_movies,
        routes::movies::create_movie,
        routes::movies::delete_movie,
        routes::actors::list_actors,
        routes::actors::create_actor,
        routes::actors::delete_actor,
        routes::auth::signup,
        routes::auth::signin,
    ),
    components(schemas(
        models::NewMovie,
        models::MovieResponse,
        models::NewActor,
        models::ActorResponse,
        models::SignupRequest,
        models::SigninRequest,
        models::TokenResponse,
        error::ApiError,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Movies", description = "Movie catalog"),
        (name = "Actors", description = "Actor catalog"),
        (name = "Auth", description = "Signup and signin")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            utoipa::openapi::security::SecurityScheme::Http(
                utoipa::openapi::security::Http::new(
                    utoipa::openapi::security::HttpAuthScheme::Bearer,
                ),
            ),
        );
    }
}
