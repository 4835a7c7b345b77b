//! Encoder: categorical expansion of raw cases and reconciliation to training-time columns.

pub mod domain;
pub mod service;

pub use domain::{Column, EncodedVector, EncodingAnomaly, ReferenceColumns};
pub use service::Encoder;
