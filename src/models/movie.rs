use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::db::Entity;
use crate::models::schema::{Dump, Fields, IntRule, Schema, StrRule, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub genre: String,
    /// Running time in minutes
    pub length: i32,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct NewMovie {
    pub title: String,
    pub genre: String,
    /// Running time in minutes (at least 1)
    pub length: i32,
    pub year: i32,
}

impl Schema for NewMovie {
    fn load(raw: &Value) -> Result<Self, ValidationError> {
        let mut f = Fields::new(raw)?;
        let movie = NewMovie {
            title: f.string("title", &[StrRule::NonEmpty]),
            genre: f.string("genre", &[StrRule::NonEmpty]),
            length: f.integer("length", &[IntRule::AtLeast(1)]),
            year: f.integer("year", &[]),
        };
        f.finish(movie)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MovieResponse {
    pub id: i32,
    pub title: String,
    pub genre: String,
    pub length: i32,
    pub year: i32,
}

impl Dump for Movie {
    type Output = MovieResponse;

    fn dump(&self) -> MovieResponse {
        MovieResponse {
            id: self.id,
            title: self.title.clone(),
            genre: self.genre.clone(),
            length: self.length,
            year: self.year,
        }
    }
}

impl Entity for Movie {
    type Draft = NewMovie;

    fn id(&self) -> i32 {
        self.id
    }

    fn from_draft(id: i32, draft: NewMovie) -> Self {
        Self {
            id,
            title: draft.title,
            genre: draft.genre,
            length: draft.length,
            year: draft.year,
        }
    }
}
