use axum::{
    extract::State,
    routing::{delete, get},
    Json, Router,
};

use crate::error::{ApiError, AppError};
use crate::middleware::auth::{AuthUser, LiveUser};
use crate::middleware::json::ValidJson;
use crate::middleware::path::ValidPath;
use crate::models::{Actor, ActorResponse, Dump, NewActor};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/actors", get(list_actors).post(create_actor))
        .route("/actors/{id}", delete(delete_actor))
}

#[utoipa::path(
    get,
    path = "/actors",
    responses(
        (status = 200, description = "All actors in id order", body = Vec<ActorResponse>),
    ),
    tag = "Actors"
)]
pub(crate) async fn list_actors(
    State(state): State<AppState>,
) -> Result<Json<Vec<ActorResponse>>, AppError> {
    let actors = state.actors.list_all().await?;
    Ok(Json(Actor::dump_many(&actors)))
}

#[utoipa::path(
    post,
    path = "/actors",
    request_body = NewActor,
    responses(
        (status = 200, description = "Actor created", body = ActorResponse),
        (status = 400, description = "Invalid input", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
    ),
    security(("bearer" = [])),
    tag = "Actors"
)]
pub(crate) async fn create_actor(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(new_actor): ValidJson<NewActor>,
) -> Result<Json<ActorResponse>, AppError> {
    let actor = state.actors.insert(new_actor).await?;
    tracing::info!(actor_id = actor.id, user_id = auth.user_id, "actor created");
    Ok(Json(actor.dump()))
}

#[utoipa::path(
    delete,
    path = "/actors/{id}",
    params(("id" = i32, Path, description = "Actor id")),
    responses(
        (status = 200, description = "Deleted actor", body = ActorResponse),
        (status = 400, description = "Malformed id or actor not found", body = ApiError),
        (status = 401, description = "Missing or invalid token, or unknown user", body = ApiError),
    ),
    security(("bearer" = [])),
    tag = "Actors"
)]
pub(crate) async fn delete_actor(
    State(state): State<AppState>,
    LiveUser(user): LiveUser,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<ActorResponse>, AppError> {
    let actor = state.actors.get_by_id(id).await?.ok_or_else(not_found)?;

    // A concurrent delete may have removed the row since the lookup.
    if !state.actors.delete(&actor).await? {
        return Err(not_found());
    }
    tracing::info!(actor_id = actor.id, user_id = user.id, "actor deleted");

    Ok(Json(actor.dump()))
}

fn not_found() -> AppError {
    AppError::NotFound("Actor not found in the db".to_string())
}
