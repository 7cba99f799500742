//! Storage infrastructure - backend selection and connection pooling

mod factory;
pub mod postgres;

pub use factory::StorageType;
