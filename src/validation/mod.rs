//! Validation of raw cases against declared ranges before inference.

pub mod domain;
pub mod service;

pub use domain::{RejectReason, Rejection};
pub use service::Validator;
