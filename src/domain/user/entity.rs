//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{validate_user_id, UserValidationError};

/// User identifier - alphanumeric + hyphens, max 64 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        validate_user_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a fresh random (v4) identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Partial update for a user. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub login: Option<String>,
    pub password_hash: Option<String>,
    pub age: Option<u8>,
    pub is_deleted: Option<bool>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.login.is_none()
            && self.password_hash.is_none()
            && self.age.is_none()
            && self.is_deleted.is_none()
    }
}

/// User record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    login: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing, default)]
    password_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    age: Option<u8>,
    /// Soft-delete marker; deleted users stay in the store
    is_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, not deleted user
    pub fn new(
        id: UserId,
        login: impl Into<String>,
        password_hash: Option<String>,
        age: Option<u8>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            login: login.into(),
            password_hash,
            age,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a user from persisted state
    pub fn restore(
        id: UserId,
        login: String,
        password_hash: Option<String>,
        age: Option<u8>,
        is_deleted: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            login,
            password_hash,
            age,
            is_deleted,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn password_hash(&self) -> Option<&str> {
        self.password_hash.as_deref()
    }

    pub fn age(&self) -> Option<u8> {
        self.age
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Shallow-merge a patch over this user.
    ///
    /// Fields present in the patch overwrite, absent fields are untouched.
    pub fn apply(&mut self, patch: &UserPatch) {
        if patch.is_empty() {
            return;
        }

        if let Some(login) = &patch.login {
            self.login = login.clone();
        }

        if let Some(hash) = &patch.password_hash {
            self.password_hash = Some(hash.clone());
        }

        if let Some(age) = patch.age {
            self.age = Some(age);
        }

        if let Some(is_deleted) = patch.is_deleted {
            self.is_deleted = is_deleted;
        }

        self.touch();
    }

    /// Soft-delete the user
    pub fn mark_deleted(&mut self) {
        self.is_deleted = true;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
