//! User domain
//!
//! This module provides the user record, its validation rules, the
//! repository trait shared by every storage backend, and the login
//! autosuggest search.

mod entity;
mod repository;
mod search;
mod validation;

pub use entity::{User, UserId, UserPatch};
pub use repository::UserRepository;
pub use search::autosuggest;
pub use validation::{
    validate_age, validate_limit, validate_login, validate_password, validate_user_id,
    UserValidationError, MAX_AGE, MIN_AGE,
};
