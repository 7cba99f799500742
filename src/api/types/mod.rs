//! Shared API types

pub mod error;
pub mod extract;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use extract::{Json, Query};
