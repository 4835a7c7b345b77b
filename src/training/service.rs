//! One-time training step: encode, split, fit, evaluate.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use crate::common::error::{HccError, HccResult};
use crate::common::log::elapsed_ms;
use crate::data::domain::Dataset;
use crate::encoding::Encoder;
use crate::evaluation::classification_report;
use crate::schema::Schema;

use super::domain::{Classifier, TrainConfig, TrainedArtifacts};
use super::gbdt::GradientBoostingClassifier;
use super::split::train_test_split;

/// Sorted distinct labels; exactly two are required.
pub fn outcome_classes(labels: &[String]) -> HccResult<Vec<String>> {
    let classes: Vec<String> = labels
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    match classes.len() {
        2 => Ok(classes),
        n if n < 2 => Err(HccError::training_data(format!(
            "label column needs 2 distinct values, found {n}"
        ))),
        n => Err(HccError::training_data(format!(
            "binary classifier supports 2 labels, found {n}: {}",
            classes.join(", ")
        ))),
    }
}

/// Fit the classifier once and keep the reference columns it was fit on.
///
/// Nothing is persisted between runs, so every start trains afresh.
pub fn train_or_load(dataset: &Dataset, schema: &Schema, cfg: &TrainConfig) -> HccResult<TrainedArtifacts> {
    let start = Instant::now();
    cfg.check()?;
    let classes = outcome_classes(&dataset.labels)?;

    let (vectors, reference) = Encoder::new(schema).establish_reference(&dataset.rows);
    if reference.is_empty() {
        return Err(HccError::training_data("encoding established zero reference columns"));
    }
    tracing::debug!(
        ev = "reference_established",
        dataset = %dataset.id,
        columns = reference.len(),
    );

    let split = train_test_split(dataset.len(), cfg.test_size, cfg.split_seed);
    let rows_of = |idx: &[usize]| -> Vec<Vec<f64>> {
        idx.iter()
            .map(|&i| vectors[i].as_slice().to_vec())
            .collect()
    };
    let labels_of = |idx: &[usize]| -> Vec<String> {
        idx.iter().map(|&i| dataset.labels[i].clone()).collect()
    };

    let mut model = GradientBoostingClassifier::new(cfg.n_estimators, cfg.learning_rate, cfg.max_depth);
    model.fit(&rows_of(&split.train), &labels_of(&split.train), classes.clone())?;

    let report = if split.test.is_empty() {
        tracing::warn!(ev = "evaluation_skipped", dataset = %dataset.id, "no rows held out");
        None
    } else {
        let y_true = labels_of(&split.test);
        let y_pred: Vec<String> = split
            .test
            .iter()
            .map(|&i| model.predict(vectors[i].as_slice()).to_string())
            .collect();
        let report = classification_report(&classes, &y_true, &y_pred);
        tracing::info!(
            ev = "evaluation_report",
            dataset = %dataset.id,
            accuracy = report.accuracy,
            held_out = split.test.len(),
            report = %serde_json::to_string(&report).unwrap_or_default(),
        );
        tracing::info!("held-out classification report\n{report}");
        Some(report)
    };

    tracing::info!(
        ev = "model_trained",
        dataset = %dataset.id,
        rows = dataset.len(),
        train_rows = split.train.len(),
        columns = reference.len(),
        stages = cfg.n_estimators,
        dur_ms = elapsed_ms(start) as u64,
    );

    Ok(TrainedArtifacts {
        dataset: dataset.id,
        model: Arc::new(model),
        reference: Arc::new(reference),
        report,
    })
}
