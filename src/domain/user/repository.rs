//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{User, UserId, UserPatch};
use crate::domain::DomainError;

/// Repository trait for user storage.
///
/// Missing ids are not errors: lookups return `None` and mutations report
/// how many records they touched (0 or 1).
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// List all users in insertion order, soft-deleted ones included
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Get a user by their ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Append a new user. Fails with a conflict if the id is taken.
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Merge a patch over an existing user, returning the affected count
    async fn update(&self, id: &UserId, patch: &UserPatch) -> Result<u64, DomainError>;

    /// Flag a user as deleted, returning the affected count
    async fn soft_delete(&self, id: &UserId) -> Result<u64, DomainError>;

    /// Check if a user ID exists
    async fn exists(&self, id: &UserId) -> Result<bool, DomainError> {
        Ok(self.get(id).await?.is_some())
    }
}
