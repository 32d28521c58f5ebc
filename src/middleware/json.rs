use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde_json::Value;

use crate::error::AppError;
use crate::models::{Schema, ValidationError};

/// JSON body loaded through an input [`Schema`]. Unparseable bodies and a
/// missing `Content-Type: application/json` are validation failures too.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: Schema + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ValidationError::body(rejection.body_text()))?;
        Ok(ValidJson(T::load(&raw)?))
    }
}
