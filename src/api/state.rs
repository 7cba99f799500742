//! Application state for shared services

use std::sync::Arc;

use crate::domain::{DomainError, User, UserRepository};
use crate::infrastructure::user::{
    CreateUserRequest, PasswordHasher, UpdateUserRequest, UserService,
};

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    /// Default for `includeDeleted` when a request does not specify it
    pub include_deleted: bool,
}

impl AppState {
    pub fn new(user_service: Arc<dyn UserServiceTrait>, include_deleted: bool) -> Self {
        Self {
            user_service,
            include_deleted,
        }
    }
}

/// Trait for user service operations, erasing the storage backend
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn list(&self, include_deleted: bool) -> Result<Vec<User>, DomainError>;
    async fn get(&self, id: &str) -> Result<Option<User>, DomainError>;
    async fn search(
        &self,
        substring: &str,
        limit: usize,
        include_deleted: bool,
    ) -> Result<Vec<User>, DomainError>;
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError>;
    async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<u64, DomainError>;
    async fn delete(&self, id: &str) -> Result<u64, DomainError>;
}

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn list(&self, include_deleted: bool) -> Result<Vec<User>, DomainError> {
        UserService::list(self, include_deleted).await
    }

    async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn search(
        &self,
        substring: &str,
        limit: usize,
        include_deleted: bool,
    ) -> Result<Vec<User>, DomainError> {
        UserService::search(self, substring, limit, include_deleted).await
    }

    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        UserService::create(self, request).await
    }

    async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<u64, DomainError> {
        UserService::update(self, id, request).await
    }

    async fn delete(&self, id: &str) -> Result<u64, DomainError> {
        UserService::delete(self, id).await
    }
}
