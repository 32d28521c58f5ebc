//! Credential and catalog stores.
//!
//! Handlers only see the [`Repository`] traits; [`MemoryStore`] and [`PgStore`]
//! implement them for every entity. Each call is a single-record operation and
//! the backend is responsible for serializing concurrent writes and handing
//! out unique ids.

pub mod memory;
pub mod postgres;
pub mod seed;

use async_trait::async_trait;

use crate::models::User;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A stored record with a store-assigned integer id.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Field values for a record that has no id yet.
    type Draft: Send + 'static;

    fn id(&self) -> i32;

    fn from_draft(id: i32, draft: Self::Draft) -> Self;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record violates a uniqueness constraint")]
    Duplicate,
    #[error("database error: {0}")]
    Backend(#[from] sqlx::Error),
}

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Stores `draft` under a fresh id and returns the stored record.
    async fn insert(&self, draft: T::Draft) -> Result<T, StoreError>;

    async fn get_by_id(&self, id: i32) -> Result<Option<T>, StoreError>;

    /// Returns whether a row was removed. Removing a record that is already
    /// gone yields `false`, not an error.
    async fn delete(&self, record: &T) -> Result<bool, StoreError>;

    /// All records in id order.
    async fn list_all(&self) -> Result<Vec<T>, StoreError>;
}

#[async_trait]
pub trait UserRepository: Repository<User> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
}
