//! Metric computation over predicted and true labels.

use super::domain::{ClassMetrics, ClassificationReport};

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Build a report for `classes` (in that order) from aligned label slices.
///
/// Undefined ratios (no predictions or no support for a class) are 0.
pub fn classification_report(
    classes: &[String],
    y_true: &[String],
    y_pred: &[String],
) -> ClassificationReport {
    debug_assert_eq!(y_true.len(), y_pred.len());

    let per_class: Vec<ClassMetrics> = classes
        .iter()
        .map(|label| {
            let mut tp = 0;
            let mut predicted = 0;
            let mut actual = 0;
            for (t, p) in y_true.iter().zip(y_pred) {
                let is_true = t == label;
                let is_pred = p == label;
                tp += usize::from(is_true && is_pred);
                predicted += usize::from(is_pred);
                actual += usize::from(is_true);
            }
            let precision = ratio(tp, predicted);
            let recall = ratio(tp, actual);
            ClassMetrics {
                label: label.clone(),
                precision,
                recall,
                f1: f1(precision, recall),
                support: actual,
            }
        })
        .collect();

    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    let total: usize = per_class.iter().map(|c| c.support).sum();
    let n_classes = per_class.len().max(1) as f64;

    let mean = |pick: fn(&ClassMetrics) -> f64| per_class.iter().map(pick).sum::<f64>() / n_classes;
    let weighted = |pick: fn(&ClassMetrics) -> f64| {
        if total == 0 {
            0.0
        } else {
            per_class
                .iter()
                .map(|c| pick(c) * c.support as f64)
                .sum::<f64>()
                / total as f64
        }
    };

    let macro_avg = ClassMetrics {
        label: "macro avg".to_string(),
        precision: mean(|c| c.precision),
        recall: mean(|c| c.recall),
        f1: mean(|c| c.f1),
        support: total,
    };
    let weighted_avg = ClassMetrics {
        label: "weighted avg".to_string(),
        precision: weighted(|c| c.precision),
        recall: weighted(|c| c.recall),
        f1: weighted(|c| c.f1),
        support: total,
    };

    ClassificationReport {
        classes: per_class,
        accuracy: ratio(correct, y_true.len()),
        macro_avg,
        weighted_avg,
    }
}
