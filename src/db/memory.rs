use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::db::{Entity, Repository, StoreError, UserRepository};
use crate::models::{Actor, Movie, NewUser, User};

/// One table: rows keyed by id plus a monotonically increasing id counter.
pub struct MemoryTable<T> {
    rows: DashMap<i32, T>,
    next_id: AtomicI32,
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicI32::new(1),
        }
    }
}

impl<T: Entity> MemoryTable<T> {
    fn insert(&self, draft: T::Draft) -> T {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = T::from_draft(id, draft);
        self.rows.insert(id, record.clone());
        record
    }

    fn get(&self, id: i32) -> Option<T> {
        self.rows.get(&id).map(|row| row.value().clone())
    }

    fn remove(&self, id: i32) -> bool {
        self.rows.remove(&id).is_some()
    }

    fn all(&self) -> Vec<T> {
        let mut records: Vec<T> = self.rows.iter().map(|row| row.value().clone()).collect();
        records.sort_by_key(|record| record.id());
        records
    }
}

/// Process-local store used when no database is configured, and by the tests.
#[derive(Default)]
pub struct MemoryStore {
    movies: MemoryTable<Movie>,
    actors: MemoryTable<Actor>,
    users: MemoryTable<User>,
    usernames: DashMap<String, i32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

macro_rules! catalog_repository {
    ($entity:ty, $table:ident) => {
        #[async_trait]
        impl Repository<$entity> for MemoryStore {
            async fn insert(
                &self,
                draft: <$entity as Entity>::Draft,
            ) -> Result<$entity, StoreError> {
                Ok(self.$table.insert(draft))
            }

            async fn get_by_id(&self, id: i32) -> Result<Option<$entity>, StoreError> {
                Ok(self.$table.get(id))
            }

            async fn delete(&self, record: &$entity) -> Result<bool, StoreError> {
                Ok(self.$table.remove(record.id))
            }

            async fn list_all(&self) -> Result<Vec<$entity>, StoreError> {
                Ok(self.$table.all())
            }
        }
    };
}

catalog_repository!(Movie, movies);
catalog_repository!(Actor, actors);

#[async_trait]
impl Repository<User> for MemoryStore {
    async fn insert(&self, draft: NewUser) -> Result<User, StoreError> {
        // The username slot stays locked until the row exists.
        match self.usernames.entry(draft.username.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate),
            Entry::Vacant(slot) => {
                let user = self.users.insert(draft);
                slot.insert(user.id);
                Ok(user)
            }
        }
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(id))
    }

    async fn delete(&self, record: &User) -> Result<bool, StoreError> {
        if !self.users.remove(record.id) {
            return Ok(false);
        }
        self.usernames.remove_if(&record.username, |_, id| *id == record.id);
        Ok(true)
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.all())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let id = self.usernames.get(username).map(|entry| *entry.value());
        Ok(id.and_then(|id| self.users.get(id)))
    }
}
