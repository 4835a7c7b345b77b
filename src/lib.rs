//! Survival prediction for hepatocellular carcinoma patients.
//!
//! A gradient-boosted classifier is trained once from a historical dataset;
//! afterwards each raw case is range-validated, encoded against the columns
//! seen at training time and mapped to a survival outcome.
pub mod common;
pub mod schema;
pub mod data;
pub mod encoding;
pub mod training;
pub mod evaluation;
pub mod validation;
pub mod inference;
pub mod api;

pub use common::config::AppCfg;
pub use common::error::{ErrorCode, HccError, HccResult};
pub use data::{Dataset, RawCase};
pub use inference::{bootstrap, InferenceEngine, Outcome, Prediction};
pub use validation::{RejectReason, Rejection};
