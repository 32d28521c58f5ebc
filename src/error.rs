use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::StoreError;
use crate::models::ValidationError;
use crate::services::HashError;

/// Reasons a request is not authenticated. All map to 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingToken,
    #[error("Invalid Authorization header format")]
    MalformedHeader,
    #[error("Invalid or malformed token")]
    Invalid,
    #[error("Token has expired")]
    Expired,
    /// Token verified but its subject no longer resolves to a user.
    #[error("Invalid user")]
    UnknownSubject,
    /// Unknown username and wrong password share this variant.
    #[error("Incorrect username and password")]
    BadCredentials,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// Malformed request outside the body, such as a non-integer path id.
    #[error("{0}")]
    BadRequest(String),
    /// Referenced record is absent. Reported as 400, not 404.
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Hash(#[from] HashError),
    #[error("failed to issue token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Error body returned for every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    pub description: String,
    /// Field name to reason, present on validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::NotFound(_)
            | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Store(_) | AppError::Hash(_) | AppError::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Validation(err) => ApiError {
                description: "Invalid request body".to_string(),
                fields: Some(err.fields),
            },
            AppError::Store(_) | AppError::Hash(_) | AppError::Token(_) => {
                tracing::error!(error = %self, "request failed");
                ApiError {
                    description: "Internal server error".to_string(),
                    fields: None,
                }
            }
            other => ApiError {
                description: other.to_string(),
                fields: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
