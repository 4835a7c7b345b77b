//! Evaluation of the fitted model on the held-out partition.

pub mod domain;
pub mod service;

pub use domain::{ClassMetrics, ClassificationReport};
pub use service::classification_report;
