use axum::{
    extract::State,
    routing::{delete, get},
    Json, Router,
};

use crate::error::{ApiError, AppError};
use crate::middleware::auth::{AuthUser, LiveUser};
use crate::middleware::json::ValidJson;
use crate::middleware::path::ValidPath;
use crate::models::{Dump, Movie, MovieResponse, NewMovie};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/movies", get(list_movies).post(create_movie))
        .route("/movies/{id}", delete(delete_movie))
}

#[utoipa::path(
    get,
    path = "/movies",
    responses(
        (status = 200, description = "All movies in id order", body = Vec<MovieResponse>),
    ),
    tag = "Movies"
)]
pub(crate) async fn list_movies(
    State(state): State<AppState>,
) -> Result<Json<Vec<MovieResponse>>, AppError> {
    let movies = state.movies.list_all().await?;
    Ok(Json(Movie::dump_many(&movies)))
}

#[utoipa::path(
    post,
    path = "/movies",
    request_body = NewMovie,
    responses(
        (status = 200, description = "Movie created", body = MovieResponse),
        (status = 400, description = "Invalid input", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
    ),
    security(("bearer" = [])),
    tag = "Movies"
)]
pub(crate) async fn create_movie(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(new_movie): ValidJson<NewMovie>,
) -> Result<Json<MovieResponse>, AppError> {
    let movie = state.movies.insert(new_movie).await?;
    tracing::info!(movie_id = movie.id, user_id = auth.user_id, "movie created");
    Ok(Json(movie.dump()))
}

#[utoipa::path(
    delete,
    path = "/movies/{id}",
    params(("id" = i32, Path, description = "Movie id")),
    responses(
        (status = 200, description = "Deleted movie", body = MovieResponse),
        (status = 400, description = "Malformed id or movie not found", body = ApiError),
        (status = 401, description = "Missing or invalid token, or unknown user", body = ApiError),
    ),
    security(("bearer" = [])),
    tag = "Movies"
)]
pub(crate) async fn delete_movie(
    State(state): State<AppState>,
    LiveUser(user): LiveUser,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<MovieResponse>, AppError> {
    let movie = state.movies.get_by_id(id).await?.ok_or_else(not_found)?;

    // A concurrent delete may have removed the row since the lookup.
    if !state.movies.delete(&movie).await? {
        return Err(not_found());
    }
    tracing::info!(movie_id = movie.id, user_id = user.id, "movie deleted");

    Ok(Json(movie.dump()))
}

fn not_found() -> AppError {
    AppError::NotFound("Movie not found in the database".to_string())
}
