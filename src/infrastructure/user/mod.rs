//! User infrastructure module
//!
//! This module provides the storage backends for users (in-memory and
//! PostgreSQL), password hashing with Argon2, and the user service.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{CreateUserRequest, UpdateUserRequest, UserService};

#[cfg(test)]
pub use password::TestHasher;
