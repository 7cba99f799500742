//! Users API
//!
//! An HTTP service for user records with:
//! - CRUD over users with soft-delete
//! - Login autosuggest search
//! - In-memory or PostgreSQL storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::str::FromStr;
use std::sync::Arc;

use api::state::{AppState, UserServiceTrait};
use infrastructure::storage::{postgres, StorageType};
use infrastructure::user::{
    Argon2Hasher, CreateUserRequest, InMemoryUserRepository, PostgresUserRepository, UserService,
};
use tracing::info;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_backend = StorageType::from_str(&config.storage.backend)?;
    info!("Storage backend: {:?}", storage_backend);

    let hasher = Arc::new(Argon2Hasher::new());

    let user_service: Arc<dyn UserServiceTrait> = match storage_backend {
        StorageType::InMemory => {
            let service = UserService::new(Arc::new(InMemoryUserRepository::new()), hasher);
            seed_if_enabled(&service, config).await?;
            Arc::new(service)
        }
        StorageType::Postgres => {
            let pool = postgres::connect(&config.storage.postgres).await?;
            let repository = PostgresUserRepository::new(pool);
            repository.ensure_table().await?;

            let service = UserService::new(Arc::new(repository), hasher);
            seed_if_enabled(&service, config).await?;
            Arc::new(service)
        }
    };

    Ok(AppState::new(user_service, config.users.include_deleted))
}

async fn seed_if_enabled<R, H>(service: &UserService<R, H>, config: &AppConfig) -> anyhow::Result<()>
where
    R: domain::UserRepository,
    H: infrastructure::user::PasswordHasher,
{
    if !config.storage.seed_defaults {
        return Ok(());
    }

    let inserted = service.seed(default_users()).await?;

    if inserted > 0 {
        info!(count = inserted, "Seeded default users");
    }

    Ok(())
}

/// Users inserted into an empty store at startup
pub fn default_users() -> Vec<CreateUserRequest> {
    let seeded = |id: &str, login: &str, password: &str| CreateUserRequest {
        id: Some(id.to_string()),
        login: Some(login.to_string()),
        password: Some(password.to_string()),
        age: Some(27),
    };

    vec![
        CreateUserRequest {
            id: None,
            login: Some("abc".to_string()),
            password: Some("password".to_string()),
            age: Some(38),
        },
        seeded("777", "alex", "newPassword2"),
        seeded("111", "alexa", "newPassword3"),
        seeded("222", "alexandra", "newPassword4"),
        seeded("333", "Tom", "newPassword5"),
    ]
}
