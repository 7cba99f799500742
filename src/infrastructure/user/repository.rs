//! In-memory user repository implementation

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserPatch, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository.
///
/// Users live in a `Vec` so listing preserves insertion order. Every
/// operation holds the lock for its whole read-modify-write.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a repository with initial users.
    ///
    /// Rejects the whole batch if two users share an id.
    pub fn with_users(users: Vec<User>) -> Result<Self, DomainError> {
        for (index, user) in users.iter().enumerate() {
            if users[..index].iter().any(|u| u.id() == user.id()) {
                return Err(DomainError::conflict(format!(
                    "User with ID '{}' already exists",
                    user.id()
                )));
            }
        }

        Ok(Self {
            users: Arc::new(RwLock::new(users)),
        })
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn position(users: &[User], id: &UserId) -> Option<usize> {
    users.iter().position(|u| u.id() == id)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.clone())
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(position(&users, id).map(|index| users[index].clone()))
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if position(&users, user.id()).is_some() {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                user.id()
            )));
        }

        users.push(user.clone());

        Ok(user)
    }

    async fn update(&self, id: &UserId, patch: &UserPatch) -> Result<u64, DomainError> {
        let mut users = self.users.write().await;

        match position(&users, id) {
            Some(index) => {
                users[index].apply(patch);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn soft_delete(&self, id: &UserId) -> Result<u64, DomainError> {
        let mut users = self.users.write().await;

        match position(&users, id) {
            Some(index) => {
                users[index].mark_deleted();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
