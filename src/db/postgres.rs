use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::db::{Repository, StoreError, UserRepository};
use crate::models::{Actor, Movie, NewActor, NewMovie, NewUser, User};

/// PostgreSQL-backed store. Tables are created by the embedded migrations.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub async fn create_tables(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./src/db/migrations").run(&self.pool).await
    }

    /// Drops the tables and the migration ledger so `create_tables` starts over.
    pub async fn drop_tables(&self) -> Result<(), sqlx::Error> {
        sqlx::query("DROP TABLE IF EXISTS movies, actors, users, _sqlx_migrations")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn insert_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate,
        _ => StoreError::Backend(e),
    }
}

#[async_trait]
impl Repository<Movie> for PgStore {
    async fn insert(&self, draft: NewMovie) -> Result<Movie, StoreError> {
        sqlx::query_as::<_, Movie>(
            "INSERT INTO movies (title, genre, length, year) VALUES ($1, $2, $3, $4)
             RETURNING id, title, genre, length, year",
        )
        .bind(&draft.title)
        .bind(&draft.genre)
        .bind(draft.length)
        .bind(draft.year)
        .fetch_one(&self.pool)
        .await
        .map_err(insert_error)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Movie>, StoreError> {
        Ok(sqlx::query_as::<_, Movie>(
            "SELECT id, title, genre, length, year FROM movies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete(&self, record: &Movie) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(record.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> Result<Vec<Movie>, StoreError> {
        Ok(sqlx::query_as::<_, Movie>(
            "SELECT id, title, genre, length, year FROM movies ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl Repository<Actor> for PgStore {
    async fn insert(&self, draft: NewActor) -> Result<Actor, StoreError> {
        sqlx::query_as::<_, Actor>(
            "INSERT INTO actors (first_name, last_name, gender, country) VALUES ($1, $2, $3, $4)
             RETURNING id, first_name, last_name, gender, country",
        )
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.gender)
        .bind(&draft.country)
        .fetch_one(&self.pool)
        .await
        .map_err(insert_error)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Actor>, StoreError> {
        Ok(sqlx::query_as::<_, Actor>(
            "SELECT id, first_name, last_name, gender, country FROM actors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete(&self, record: &Actor) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM actors WHERE id = $1")
            .bind(record.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> Result<Vec<Actor>, StoreError> {
        Ok(sqlx::query_as::<_, Actor>(
            "SELECT id, first_name, last_name, gender, country FROM actors ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl Repository<User> for PgStore {
    async fn insert(&self, draft: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2)
             RETURNING id, username, password_hash",
        )
        .bind(&draft.username)
        .bind(&draft.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(insert_error)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete(&self, record: &User) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(record.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?)
    }
}
