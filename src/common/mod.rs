//! Shared utilities that glue the different domains together.
pub mod config;
pub mod error;
pub mod ids;
pub mod log;

pub use error::{ErrorCode, HccError, HccResult, SchemaError};
