//! User endpoints: CRUD plus login autosuggest

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Query};
use crate::domain::user::{
    validate_age, validate_limit, validate_login, validate_password, validate_user_id,
    UserValidationError,
};
use crate::domain::User;
use crate::infrastructure::user::{CreateUserRequest, UpdateUserRequest};

/// Create the users router
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/createUser", post(create_user))
        .route(
            "/users/{id}",
            get(get_user)
                .put(update_user)
                .patch(update_user)
                .delete(delete_user),
        )
        .route("/search", get(search_users))
}

/// Request to create a user
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserApiRequest {
    pub login: Option<String>,
    pub password: Option<String>,
    pub age: Option<i64>,
}

impl CreateUserApiRequest {
    fn validate(self) -> Result<CreateUserRequest, ApiError> {
        if let Some(login) = &self.login {
            validate_login(login).map_err(|e| field_error(e, "login"))?;
        }
        if let Some(password) = &self.password {
            validate_password(password).map_err(|e| field_error(e, "password"))?;
        }
        let age = self
            .age
            .map(validate_age)
            .transpose()
            .map_err(|e| field_error(e, "age"))?;

        Ok(CreateUserRequest {
            id: None,
            login: self.login,
            password: self.password,
            age,
        })
    }
}

/// Request to update a user. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserApiRequest {
    pub login: Option<String>,
    pub password: Option<String>,
    pub age: Option<i64>,
    pub is_deleted: Option<bool>,
}

impl UpdateUserApiRequest {
    fn validate(self) -> Result<UpdateUserRequest, ApiError> {
        if let Some(login) = &self.login {
            validate_login(login).map_err(|e| field_error(e, "login"))?;
        }
        if let Some(password) = &self.password {
            validate_password(password).map_err(|e| field_error(e, "password"))?;
        }
        let age = self
            .age
            .map(validate_age)
            .transpose()
            .map_err(|e| field_error(e, "age"))?;

        Ok(UpdateUserRequest {
            login: self.login,
            password: self.password,
            age,
            is_deleted: self.is_deleted,
        })
    }
}

/// Query parameters for `GET /users`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub include_deleted: Option<bool>,
}

/// Query parameters for `GET /search`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub login_substring: String,
    pub limit: u64,
    pub include_deleted: Option<bool>,
}

/// User as returned by the API. The password hash is never exposed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub login: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    pub is_deleted: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().as_str().to_string(),
            login: user.login().to_string(),
            age: user.age(),
            is_deleted: user.is_deleted(),
            created_at: user.created_at().to_rfc3339(),
            updated_at: user.updated_at().to_rfc3339(),
        }
    }
}

/// Result of an update or delete
#[derive(Debug, Clone, Serialize)]
pub struct MutationResponse {
    pub id: String,
    pub affected: u64,
    pub message: String,
}

fn field_error(err: UserValidationError, param: &str) -> ApiError {
    ApiError::bad_request(err.to_string()).with_param(param)
}

fn check_id(id: &str) -> Result<(), ApiError> {
    validate_user_id(id).map_err(|e| field_error(e, "id"))
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let include_deleted = params.include_deleted.unwrap_or(state.include_deleted);
    debug!(include_deleted, "Listing users");

    let users = state.user_service.list(include_deleted).await?;

    if users.is_empty() {
        return Err(ApiError::not_found("No users found"));
    }

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(id = %id, "Getting user");
    check_id(&id)?;

    let user = state
        .user_service
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User '{}' not found", id)))?;

    Ok(Json(UserResponse::from(&user)))
}

/// GET /search
pub async fn search_users(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let limit = validate_limit(params.limit).map_err(|e| field_error(e, "limit"))?;
    let include_deleted = params.include_deleted.unwrap_or(state.include_deleted);
    debug!(substring = %params.login_substring, limit, include_deleted, "Searching users");

    let users = state
        .user_service
        .search(&params.login_substring, limit, include_deleted)
        .await?;

    if users.is_empty() {
        return Err(ApiError::empty_result(format!(
            "No users match '{}'",
            params.login_substring
        )));
    }

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserApiRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    debug!(login = ?request.login, "Creating user");

    let service_request = request.validate()?;
    let user = state.user_service.create(service_request).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserApiRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    debug!(id = %id, "Updating user");
    check_id(&id)?;

    let service_request = request.validate()?;
    let affected = state.user_service.update(&id, service_request).await?;

    if affected == 0 {
        return Err(ApiError::not_found(format!("User '{}' not found", id)));
    }

    Ok(Json(MutationResponse {
        message: format!("User '{}' updated", id),
        id,
        affected,
    }))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, ApiError> {
    debug!(id = %id, "Deleting user");
    check_id(&id)?;

    let affected = state.user_service.delete(&id).await?;

    if affected == 0 {
        return Err(ApiError::not_found(format!("User '{}' not found", id)));
    }

    Ok(Json(MutationResponse {
        message: format!("User '{}' deleted", id),
        id,
        affected,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_rejects_bad_fields() {
        let request = CreateUserApiRequest {
            login: Some("bob".to_string()),
            age: Some(200),
            ..Default::default()
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.param.as_deref(), Some("age"));

        let request = CreateUserApiRequest {
            login: Some("bob".to_string()),
            password: Some("not valid!".to_string()),
            ..Default::default()
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.response.error.param.as_deref(), Some("password"));

        let request = CreateUserApiRequest {
            login: Some(String::new()),
            ..Default::default()
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.response.error.param.as_deref(), Some("login"));
    }

    #[test]
    fn test_create_request_passes_empty_payload_through() {
        // The service decides what an empty payload means
        let request = CreateUserApiRequest::default().validate().unwrap();
        assert!(request.is_empty());
    }

    #[test]
    fn test_update_request_converts_age() {
        let request = UpdateUserApiRequest {
            age: Some(99),
            is_deleted: Some(false),
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert_eq!(request.age, Some(99));
        assert_eq!(request.is_deleted, Some(false));
        assert!(request.login.is_none());
    }

    #[test]
    fn test_search_params_are_camel_case() {
        let params: SearchParams =
            serde_json::from_str(r#"{"loginSubstring":"al","limit":2,"includeDeleted":false}"#)
                .unwrap();

        assert_eq!(params.login_substring, "al");
        assert_eq!(params.limit, 2);
        assert_eq!(params.include_deleted, Some(false));
    }
}
