use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::{AppError, AuthError};
use crate::models::User;
use crate::AppState;

/// Extractor for requests carrying a valid bearer token. Only the signature
/// and expiry are checked; the subject is not looked up.
#[derive(Debug)]
pub struct AuthUser {
    pub user_id: i32,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let tokens = state.tokens.clone();
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        async move {
            let header = auth_header.ok_or(AuthError::MissingToken)?;

            let token = header
                .strip_prefix("Bearer ")
                .ok_or(AuthError::MalformedHeader)?;

            let user_id = tokens.verify(token).inspect_err(|e| {
                tracing::warn!(reason = %e, "rejected bearer token");
            })?;

            Ok::<_, AppError>(AuthUser { user_id })
        }
    }
}

/// Extractor that additionally resolves the token subject to a stored user,
/// so a token whose user has since disappeared is refused.
#[derive(Debug)]
pub struct LiveUser(pub User);

impl FromRequestParts<AppState> for LiveUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser { user_id } = AuthUser::from_request_parts(parts, state).await?;

        let user = state.users.get_by_id(user_id).await?.ok_or_else(|| {
            tracing::warn!(user_id, "token subject no longer exists");
            AuthError::UnknownSubject
        })?;

        Ok(LiveUser(user))
    }
}
