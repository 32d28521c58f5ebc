use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::db::Entity;
use crate::models::schema::{Dump, Fields, Schema, StrRule, ValidationError};

pub const MIN_PASSWORD_CHARS: usize = 8;

/// Stored account. Deliberately not `Serialize`: the only way out is
/// [`UserResponse`], which has no hash field.
#[derive(Clone, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Row to insert; the password is already hashed.
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

#[derive(ToSchema)]
pub struct SignupRequest {
    pub username: String,
    /// Password (minimum 8 characters)
    pub password: String,
}

impl Schema for SignupRequest {
    fn load(raw: &Value) -> Result<Self, ValidationError> {
        let mut f = Fields::new(raw)?;
        let req = SignupRequest {
            username: f.string("username", &[StrRule::NonEmpty]),
            password: f.string("password", &[StrRule::MinChars(MIN_PASSWORD_CHARS)]),
        };
        f.finish(req)
    }
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Sign-in credentials. No length rule, so a short password is just a wrong one.
#[derive(ToSchema)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

impl Schema for SigninRequest {
    fn load(raw: &Value) -> Result<Self, ValidationError> {
        let mut f = Fields::new(raw)?;
        let req = SigninRequest {
            username: f.string("username", &[]),
            password: f.string("password", &[]),
        };
        f.finish(req)
    }
}

impl fmt::Debug for SigninRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigninRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
}

impl Dump for User {
    type Output = UserResponse;

    fn dump(&self) -> UserResponse {
        UserResponse {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

impl Entity for User {
    type Draft = NewUser;

    fn id(&self) -> i32 {
        self.id
    }

    fn from_draft(id: i32, draft: NewUser) -> Self {
        Self {
            id,
            username: draft.username,
            password_hash: draft.password_hash,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Signed bearer token, valid for one day
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> User {
        User::from_draft(
            3,
            NewUser {
                username: "tomato".into(),
                password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
            },
        )
    }

    #[test]
    fn test_dump_never_exposes_password_hash() {
        let users = vec![user(), user()];
        let dumped = serde_json::to_value(User::dump_many(&users)).unwrap();
        for entry in dumped.as_array().unwrap() {
            let keys: Vec<&str> = entry.as_object().unwrap().keys().map(String::as_str).collect();
            assert_eq!(keys, vec!["id", "username"]);
        }
        assert!(!dumped.to_string().contains("argon2"));
    }

    #[test]
    fn test_debug_hides_secrets() {
        assert!(!format!("{:?}", user()).contains("argon2"));

        let req = SignupRequest::load(&json!({"username": "u", "password": "password123"}))
            .unwrap();
        assert!(!format!("{req:?}").contains("password123"));
    }

    #[test]
    fn test_signup_requires_eight_character_password() {
        let err = SignupRequest::load(&json!({"username": "tomato", "password": "short"}))
            .unwrap_err();
        assert_eq!(err.reason("password"), Some("must be at least 8 characters"));
    }

    #[test]
    fn test_signin_accepts_short_password() {
        let req = SigninRequest::load(&json!({"username": "tomato", "password": "short"}))
            .unwrap();
        assert_eq!(req.password, "short");
    }
}
