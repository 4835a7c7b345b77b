//! Inference: validate a case, encode it against the reference columns and
//! map the model's label to an outcome.

pub mod domain;
pub mod service;

pub use domain::{Outcome, Prediction, Response};
pub use service::{bootstrap, InferenceEngine};
