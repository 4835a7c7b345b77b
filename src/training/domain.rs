//! Domain types for model training.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::common::error::{HccError, HccResult};
use crate::data::domain::DatasetId;
use crate::encoding::ReferenceColumns;
use crate::evaluation::ClassificationReport;

/// Fixed hyperparameters and split settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainConfig {
    /// Share of rows held out for the evaluation report.
    pub test_size: f64,
    /// Seed of the shuffle that partitions rows.
    pub split_seed: u64,
    /// Boosting stages.
    pub n_estimators: usize,
    pub learning_rate: f64,
    /// Depth limit of each regression tree.
    pub max_depth: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            test_size: 0.33,
            split_seed: 20,
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
        }
    }
}

impl TrainConfig {
    /// Parse a JSON object; absent keys keep their defaults.
    pub fn from_json(raw: &str) -> HccResult<Self> {
        let cfg: Self = serde_json::from_str(raw)
            .map_err(|err| HccError::config(format!("train config: {err}")))?;
        cfg.check()?;
        Ok(cfg)
    }

    pub fn check(&self) -> HccResult<()> {
        if !(0.0..1.0).contains(&self.test_size) {
            return Err(HccError::config(format!(
                "test_size must lie in [0, 1), got {}",
                self.test_size
            )));
        }
        if self.n_estimators == 0 {
            return Err(HccError::config("n_estimators must be positive"));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(HccError::config(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.max_depth == 0 {
            return Err(HccError::config("max_depth must be positive"));
        }
        Ok(())
    }
}

/// A fitted binary classifier over encoded vectors.
///
/// Implementations must be deterministic: the same vector always yields the
/// same label.
pub trait Classifier: Send + Sync {
    /// Outcome labels the model can emit.
    fn classes(&self) -> &[String];
    fn predict(&self, features: &[f64]) -> &str;
}

/// Everything produced by the one-time training step.
#[derive(Clone)]
pub struct TrainedArtifacts {
    pub dataset: DatasetId,
    pub model: Arc<dyn Classifier>,
    pub reference: Arc<ReferenceColumns>,
    /// Held-out diagnostics; absent when no rows were held out.
    pub report: Option<ClassificationReport>,
}

impl std::fmt::Debug for TrainedArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainedArtifacts")
            .field("dataset", &self.dataset)
            .field("classes", &self.model.classes())
            .field("reference_columns", &self.reference.len())
            .field("report", &self.report)
            .finish()
    }
}
