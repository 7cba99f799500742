//! User service: the single entry point for user reads and writes

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::user::{autosuggest, User, UserId, UserPatch, UserRepository};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for creating a new user
#[derive(Debug, Clone, Default)]
pub struct CreateUserRequest {
    /// Externally supplied id (seed data); a UUID is generated when absent
    pub id: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub age: Option<u8>,
}

impl CreateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.login.is_none() && self.password.is_none() && self.age.is_none()
    }
}

/// Request for a partial user update
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub login: Option<String>,
    pub password: Option<String>,
    pub age: Option<u8>,
    pub is_deleted: Option<bool>,
}

/// User service for listing, searching and mutating users
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// List users in insertion order
    pub async fn list(&self, include_deleted: bool) -> Result<Vec<User>, DomainError> {
        let users = self.repository.list().await?;

        if include_deleted {
            return Ok(users);
        }

        Ok(users.into_iter().filter(|u| !u.is_deleted()).collect())
    }

    /// Get a user by ID. Soft-deleted users are still returned.
    pub async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        let user_id = parse_id(id)?;
        self.repository.get(&user_id).await
    }

    /// Autosuggest users by login substring
    pub async fn search(
        &self,
        substring: &str,
        limit: usize,
        include_deleted: bool,
    ) -> Result<Vec<User>, DomainError> {
        let snapshot = self.list(include_deleted).await?;
        let result = autosuggest(snapshot, substring, limit);

        debug!(substring, limit, found = result.len(), "Autosuggest finished");

        Ok(result)
    }

    /// Create a new user.
    ///
    /// Empty requests and requests without a login are rejected before the
    /// repository is touched.
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        if request.is_empty() {
            warn!("Rejected empty user creation request");
            return Err(DomainError::validation("User entity couldn't be empty"));
        }

        let Some(login) = request.login else {
            warn!("Rejected user creation request without login");
            return Err(DomainError::validation("Login is required"));
        };

        let user_id = match request.id {
            Some(id) => parse_id(&id)?,
            None => UserId::generate(),
        };

        let password_hash = request
            .password
            .as_deref()
            .map(|password| self.hasher.hash(password))
            .transpose()?;

        let user = User::new(user_id, login, password_hash, request.age);
        let user = self.repository.create(user).await?;

        info!(id = %user.id(), login = %user.login(), "User created");

        Ok(user)
    }

    /// Apply a partial update. Returns the affected count (0 when the id is unknown).
    pub async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<u64, DomainError> {
        let user_id = parse_id(id)?;

        let password_hash = request
            .password
            .as_deref()
            .map(|password| self.hasher.hash(password))
            .transpose()?;

        let patch = UserPatch {
            login: request.login,
            password_hash,
            age: request.age,
            is_deleted: request.is_deleted,
        };

        let affected = self.repository.update(&user_id, &patch).await?;

        if affected > 0 {
            info!(id = %user_id, "User updated");
        }

        Ok(affected)
    }

    /// Soft-delete a user. Returns the affected count (0 when the id is unknown).
    pub async fn delete(&self, id: &str) -> Result<u64, DomainError> {
        let user_id = parse_id(id)?;
        let affected = self.repository.soft_delete(&user_id).await?;

        if affected > 0 {
            info!(id = %user_id, "User soft-deleted");
        }

        Ok(affected)
    }

    /// Insert seed users into an empty store. Returns how many were inserted.
    pub async fn seed(&self, requests: Vec<CreateUserRequest>) -> Result<usize, DomainError> {
        if !self.repository.list().await?.is_empty() {
            info!("User store already populated, skipping seed data");
            return Ok(0);
        }

        let count = requests.len();

        for request in requests {
            self.create(request).await?;
        }

        Ok(count)
    }
}

fn parse_id(id: &str) -> Result<UserId, DomainError> {
    UserId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user::password::{Argon2Hasher, TestHasher};
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    type TestService = UserService<InMemoryUserRepository, TestHasher>;

    fn create_service() -> TestService {
        let repository = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(TestHasher);
        UserService::new(repository, hasher)
    }

    fn make_request(id: Option<&str>, login: &str, password: Option<&str>) -> CreateUserRequest {
        CreateUserRequest {
            id: id.map(String::from),
            login: Some(login.to_string()),
            password: password.map(String::from),
            age: Some(27),
        }
    }

    async fn seeded_service() -> TestService {
        let service = create_service();

        service
            .seed(vec![
                make_request(None, "abc", Some("password")),
                make_request(Some("777"), "alex", Some("newPassword2")),
                make_request(Some("111"), "alexa", Some("newPassword3")),
                make_request(Some("222"), "alexandra", Some("newPassword4")),
                make_request(Some("333"), "Tom", Some("newPassword5")),
            ])
            .await
            .unwrap();

        service
    }

    fn logins(users: &[User]) -> Vec<&str> {
        users.iter().map(User::login).collect()
    }

    #[tokio::test]
    async fn test_create_user() {
        let service = create_service();

        let request = CreateUserRequest {
            login: Some("bob".to_string()),
            age: Some(30),
            ..Default::default()
        };

        let user = service.create(request).await.unwrap();
        assert_eq!(user.login(), "bob");
        assert_eq!(user.age(), Some(30));
        assert!(user.password_hash().is_none());
        assert!(!user.is_deleted());

        let retrieved = service.get(user.id().as_str()).await.unwrap();
        assert_eq!(retrieved, Some(user));
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_ids() {
        let service = create_service();

        let a = service.create(make_request(None, "bob", None)).await.unwrap();
        let b = service.create(make_request(None, "bob", None)).await.unwrap();

        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn test_create_empty_request_rejected() {
        let service = create_service();

        let result = service.create(CreateUserRequest::default()).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert!(service.list(true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_without_login_rejected() {
        let service = create_service();

        let request = CreateUserRequest {
            age: Some(30),
            ..Default::default()
        };

        let result = service.create(request).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert!(service.list(true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(Argon2Hasher::new());
        let service = UserService::new(repository, hasher.clone());

        let user = service
            .create(make_request(None, "bob", Some("secret42")))
            .await
            .unwrap();

        let hash = user.password_hash().unwrap();
        assert_ne!(hash, "secret42");
        assert!(hasher.verify("secret42", hash));
    }

    #[tokio::test]
    async fn test_create_duplicate_id_conflict() {
        let service = seeded_service().await;

        let result = service
            .create(make_request(Some("777"), "impostor", None))
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
        assert_eq!(service.list(true).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_get_invalid_id() {
        let service = create_service();

        let result = service.get("not a valid id").await;
        assert!(matches!(result, Err(DomainError::InvalidId { .. })));
    }

    #[tokio::test]
    async fn test_search_scenarios() {
        let service = seeded_service().await;

        let result = service.search("alex", 2, true).await.unwrap();
        assert_eq!(logins(&result), vec!["alex", "alexa"]);

        let result = service.search("zzz", 10, true).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_update_age_only() {
        let service = seeded_service().await;
        let before = service.get("777").await.unwrap().unwrap();

        let affected = service
            .update(
                "777",
                UpdateUserRequest {
                    age: Some(99),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(affected, 1);

        let after = service.get("777").await.unwrap().unwrap();
        assert_eq!(after.age(), Some(99));
        assert_eq!(after.login(), before.login());
        assert_eq!(after.password_hash(), before.password_hash());
    }

    #[tokio::test]
    async fn test_update_first_inserted_user() {
        let service = seeded_service().await;
        let first = service.list(true).await.unwrap()[0].clone();

        let affected = service
            .update(
                first.id().as_str(),
                UpdateUserRequest {
                    login: Some("abcd".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(affected, 1);
        assert_eq!(service.list(true).await.unwrap()[0].login(), "abcd");
    }

    #[tokio::test]
    async fn test_update_password_is_hashed() {
        let service = seeded_service().await;

        service
            .update(
                "333",
                UpdateUserRequest {
                    password: Some("fresh1".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let user = service.get("333").await.unwrap().unwrap();
        assert!(TestHasher.verify("fresh1", user.password_hash().unwrap()));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let service = seeded_service().await;
        let before = service.list(true).await.unwrap();

        let affected = service
            .update(
                "999",
                UpdateUserRequest {
                    age: Some(50),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(affected, 0);
        assert_eq!(service.list(true).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_and_visibility() {
        let service = seeded_service().await;

        let affected = service.delete("111").await.unwrap();
        assert_eq!(affected, 1);

        // still retrievable by id and by list
        let user = service.get("111").await.unwrap().unwrap();
        assert!(user.is_deleted());
        assert_eq!(service.list(true).await.unwrap().len(), 5);

        let visible = service.list(false).await.unwrap();
        assert_eq!(visible.len(), 4);
        assert!(visible.iter().all(|u| u.id().as_str() != "111"));

        let result = service.search("alex", 10, true).await.unwrap();
        assert_eq!(logins(&result), vec!["alex", "alexa", "alexandra"]);

        let result = service.search("alex", 10, false).await.unwrap();
        assert_eq!(logins(&result), vec!["alex", "alexandra"]);
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let service = seeded_service().await;
        let before = service.list(true).await.unwrap();

        let affected = service.delete("999").await.unwrap();
        assert_eq!(affected, 0);
        assert_eq!(service.list(true).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_seed_skips_populated_store() {
        let service = seeded_service().await;

        let inserted = service
            .seed(vec![make_request(Some("444"), "late", None)])
            .await
            .unwrap();

        assert_eq!(inserted, 0);
        assert_eq!(service.list(true).await.unwrap().len(), 5);
    }
}
