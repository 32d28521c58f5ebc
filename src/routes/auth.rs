use axum::{extract::State, routing::post, Json, Router};

use crate::db::StoreError;
use crate::error::{ApiError, AppError, AuthError};
use crate::middleware::json::ValidJson;
use crate::models::{NewUser, SigninRequest, SignupRequest, TokenResponse};
use crate::services::TOKEN_TTL;
use crate::AppState;

const USERNAME_TAKEN: &str = "Username already registered";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
}

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = TokenResponse),
        (status = 400, description = "Invalid input or username taken", body = ApiError),
    ),
    tag = "Auth"
)]
pub(crate) async fn signup(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<SignupRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
    }

    let password_hash = state.hasher.hash_blocking(req.password).await?;

    // A concurrent signup can still claim the name between the check and here.
    let user = state
        .users
        .insert(NewUser {
            username: req.username,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            StoreError::Duplicate => AppError::Conflict(USERNAME_TAKEN.to_string()),
            other => other.into(),
        })?;

    let token = state.tokens.issue(user.id, TOKEN_TTL)?;
    tracing::info!(user_id = user.id, "user signed up");

    Ok(Json(TokenResponse { token }))
}

#[utoipa::path(
    post,
    path = "/auth/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 400, description = "Invalid input", body = ApiError),
        (status = 401, description = "Incorrect username and password", body = ApiError),
    ),
    tag = "Auth"
)]
pub(crate) async fn signin(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<SigninRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = state.users.find_by_username(&req.username).await?;

    let verified = match &user {
        Some(user) => {
            state
                .hasher
                .verify_blocking(req.password, user.password_hash.clone())
                .await?
        }
        None => false,
    };

    let user = match user {
        Some(user) if verified => user,
        _ => {
            tracing::warn!(username = %req.username, "rejected sign-in");
            return Err(AuthError::BadCredentials.into());
        }
    };

    let token = state.tokens.issue(user.id, TOKEN_TTL)?;
    tracing::info!(user_id = user.id, "user signed in");

    Ok(Json(TokenResponse { token }))
}
