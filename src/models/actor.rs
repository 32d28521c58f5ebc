use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::db::Entity;
use crate::models::schema::{Dump, Fields, Schema, StrRule, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Actor {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct NewActor {
    pub first_name: String,
    /// May be empty for single-name performers
    pub last_name: String,
    pub gender: String,
    pub country: String,
}

impl Schema for NewActor {
    fn load(raw: &Value) -> Result<Self, ValidationError> {
        let mut f = Fields::new(raw)?;
        let actor = NewActor {
            first_name: f.string("first_name", &[StrRule::NonEmpty]),
            last_name: f.string("last_name", &[]),
            gender: f.string("gender", &[StrRule::NonEmpty]),
            country: f.string("country", &[StrRule::NonEmpty]),
        };
        f.finish(actor)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActorResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub country: String,
}

impl Dump for Actor {
    type Output = ActorResponse;

    fn dump(&self) -> ActorResponse {
        ActorResponse {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender.clone(),
            country: self.country.clone(),
        }
    }
}

impl Entity for Actor {
    type Draft = NewActor;

    fn id(&self) -> i32 {
        self.id
    }

    fn from_draft(id: i32, draft: NewActor) -> Self {
        Self {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            gender: draft.gender,
            country: draft.country,
        }
    }
}
