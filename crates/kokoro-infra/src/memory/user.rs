//! In-memory implementation of `UserRepository`.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use kokoro_core::auth::repository::UserRepository;
use kokoro_types::error::RepositoryError;
use kokoro_types::user::User;

/// User accounts keyed by username.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn get_user(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.get(username).map(|entry| entry.value().clone()))
    }

    async fn create_user(&self, user: &User) -> Result<(), RepositoryError> {
        match self.users.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(RepositoryError::Conflict(user.username.clone())),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(())
            }
        }
    }
}
