//! Training: fixed-hyperparameter gradient boosting over encoded cases.

pub mod domain;
pub mod gbdt;
pub mod service;
pub mod split;

pub use domain::{Classifier, TrainConfig, TrainedArtifacts};
pub use gbdt::GradientBoostingClassifier;
pub use service::train_or_load;
