//! Gradient-boosted decision trees for binary classification.
//!
//! Binomial deviance loss:
//!
//! 1. Start from the log-odds of the positive class.
//! 2. Each stage fits a least-squares regression tree to the pseudo-residuals
//!    `y - p`, then replaces every leaf value by a single Newton step
//!    `sum(r) / sum(p * (1 - p))`.
//! 3. Raw scores move by `learning_rate * leaf`; the positive class is
//!    predicted when the final raw score is above zero.
//!
//! Missing values (`NaN`) never satisfy `x <= threshold`, so they always take
//! the right branch.

use crate::common::error::{HccError, HccResult};

use super::domain::Classifier;

#[derive(Clone, Debug)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Regression tree stored as an arena; node 0 is the root.
#[derive(Clone, Debug)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut at = 0;
        loop {
            match &self.nodes[at] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = features.get(*feature).copied().unwrap_or(f64::NAN);
                    at = if x <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], at: usize) -> usize {
            match &nodes[at] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        walk(&self.nodes, 0)
    }
}

/// Best split found for one node.
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// Grows one least-squares tree, then sets Newton-step leaf values.
struct TreeGrower<'a> {
    x: &'a [Vec<f64>],
    residuals: &'a [f64],
    hessians: &'a [f64],
    max_depth: usize,
    nodes: Vec<Node>,
}

const MIN_GAIN: f64 = 1e-12;

impl<'a> TreeGrower<'a> {
    fn grow(mut self, rows: Vec<usize>) -> RegressionTree {
        self.build(rows, 0);
        RegressionTree { nodes: self.nodes }
    }

    fn build(&mut self, rows: Vec<usize>, depth: usize) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf { value: 0.0 });

        let split = if depth < self.max_depth && rows.len() >= 2 {
            self.best_split(&rows)
        } else {
            None
        };

        match split {
            Some(split) => {
                let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
                    .into_iter()
                    .partition(|&r| self.x[r][split.feature] <= split.threshold);
                let left = self.build(left_rows, depth + 1);
                let right = self.build(right_rows, depth + 1);
                self.nodes[id] = Node::Split {
                    feature: split.feature,
                    threshold: split.threshold,
                    left,
                    right,
                };
            }
            None => {
                self.nodes[id] = Node::Leaf {
                    value: self.newton_step(&rows),
                };
            }
        }
        id
    }

    fn newton_step(&self, rows: &[usize]) -> f64 {
        let numerator: f64 = rows.iter().map(|&r| self.residuals[r]).sum();
        let denominator: f64 = rows.iter().map(|&r| self.hessians[r]).sum();
        if denominator.abs() < 1e-150 {
            0.0
        } else {
            numerator / denominator
        }
    }

    /// Scan every feature for the threshold maximising squared-error reduction.
    ///
    /// Ties keep the earliest feature and the lowest threshold.
    fn best_split(&self, rows: &[usize]) -> Option<SplitCandidate> {
        let n = rows.len() as f64;
        let total: f64 = rows.iter().map(|&r| self.residuals[r]).sum();
        let parent_score = total * total / n;
        let n_features = self.x.first().map(Vec::len).unwrap_or(0);

        let mut best: Option<SplitCandidate> = None;
        let mut ordered: Vec<(f64, f64)> = Vec::with_capacity(rows.len());
        for feature in 0..n_features {
            ordered.clear();
            let mut missing_count = 0usize;
            for &r in rows {
                let v = self.x[r][feature];
                if v.is_nan() {
                    missing_count += 1;
                } else {
                    ordered.push((v, self.residuals[r]));
                }
            }
            if ordered.len() < 2 && missing_count == 0 {
                continue;
            }
            ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            for i in 0..ordered.len() {
                left_sum += ordered[i].1;
                let left_count = i + 1;
                // Only cut between distinct values.
                if let Some(next) = ordered.get(i + 1) {
                    if next.0 == ordered[i].0 {
                        continue;
                    }
                }
                let right_count = ordered.len() - left_count + missing_count;
                if right_count == 0 {
                    continue;
                }
                // Missing rows are on the right, so their residuals stay in `total - left_sum`.
                let right_sum = total - left_sum;
                let score = left_sum * left_sum / left_count as f64
                    + right_sum * right_sum / right_count as f64;
                let gain = score - parent_score;

                if gain > MIN_GAIN && best.as_ref().map_or(true, |b| gain > b.gain) {
                    let threshold = match ordered.get(i + 1) {
                        Some(next) => ordered[i].0 / 2.0 + next.0 / 2.0,
                        // Last observed value: everything observed goes left, missing goes right.
                        None => ordered[i].0,
                    };
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        gain,
                    });
                }
            }
        }
        best
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Binary gradient-boosting classifier over string labels.
#[derive(Clone, Debug)]
pub struct GradientBoostingClassifier {
    n_estimators: usize,
    learning_rate: f64,
    max_depth: usize,
    classes: Vec<String>,
    init_score: f64,
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl GradientBoostingClassifier {
    pub fn new(n_estimators: usize, learning_rate: f64, max_depth: usize) -> Self {
        Self {
            n_estimators,
            learning_rate,
            max_depth,
            classes: Vec::new(),
            init_score: 0.0,
            trees: Vec::new(),
            n_features: 0,
        }
    }

    /// Fit on encoded rows `x` and string labels `y`.
    ///
    /// `classes` fixes the label order (sorted, exactly two); the second entry
    /// is the positive class. Labels outside `classes` are an error.
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[String], classes: Vec<String>) -> HccResult<()> {
        if x.len() != y.len() {
            return Err(HccError::training_data(format!(
                "{} feature rows but {} labels",
                x.len(),
                y.len()
            )));
        }
        if x.is_empty() {
            return Err(HccError::training_data("cannot fit with zero rows"));
        }
        if classes.len() != 2 {
            return Err(HccError::training_data(format!(
                "binary classifier needs exactly 2 classes, got {}",
                classes.len()
            )));
        }
        let n_features = x[0].len();
        if let Some(bad) = x.iter().position(|row| row.len() != n_features) {
            return Err(HccError::training_data(format!(
                "row {bad} has {} features, expected {n_features}",
                x[bad].len()
            )));
        }

        let targets: Vec<f64> = y
            .iter()
            .map(|label| match classes.iter().position(|c| c == label) {
                Some(1) => Ok(1.0),
                Some(_) => Ok(0.0),
                None => Err(HccError::training_data(format!("unknown label `{label}`"))),
            })
            .collect::<HccResult<_>>()?;

        let n = targets.len() as f64;
        let p = targets.iter().sum::<f64>() / n;
        self.init_score = if p <= 0.0 {
            -f64::from(f32::MAX).ln()
        } else if p >= 1.0 {
            f64::from(f32::MAX).ln()
        } else {
            (p / (1.0 - p)).ln()
        };

        let mut raw = vec![self.init_score; x.len()];
        let mut residuals = vec![0.0; x.len()];
        let mut hessians = vec![0.0; x.len()];
        self.trees = Vec::with_capacity(self.n_estimators);

        for _ in 0..self.n_estimators {
            for i in 0..x.len() {
                let prob = sigmoid(raw[i]);
                residuals[i] = targets[i] - prob;
                hessians[i] = prob * (1.0 - prob);
            }

            let tree = TreeGrower {
                x,
                residuals: &residuals,
                hessians: &hessians,
                max_depth: self.max_depth,
                nodes: Vec::new(),
            }
            .grow((0..x.len()).collect());

            for (score, row) in raw.iter_mut().zip(x) {
                *score += self.learning_rate * tree.predict(row);
            }
            self.trees.push(tree);
        }

        self.classes = classes;
        self.n_features = n_features;
        Ok(())
    }

    /// Raw additive score (log-odds of the positive class).
    pub fn decision_function(&self, features: &[f64]) -> f64 {
        self.trees
            .iter()
            .fold(self.init_score, |acc, tree| acc + self.learning_rate * tree.predict(features))
    }

    /// `[P(classes[0]), P(classes[1])]`.
    pub fn predict_proba(&self, features: &[f64]) -> [f64; 2] {
        let positive = sigmoid(self.decision_function(features));
        [1.0 - positive, positive]
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }
}

impl Classifier for GradientBoostingClassifier {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict(&self, features: &[f64]) -> &str {
        debug_assert_eq!(features.len(), self.n_features, "vector not aligned to reference");
        let idx = usize::from(self.decision_function(features) > 0.0);
        self.classes.get(idx).map(String::as_str).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn classes() -> Vec<String> {
        labels(&["Dies", "Lives"])
    }

    #[test]
    fn learns_a_threshold() {
        let x: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64]).collect();
        let y: Vec<String> = (0..20)
            .map(|i| if i < 10 { "Dies" } else { "Lives" }.to_string())
            .collect();
        let mut model = GradientBoostingClassifier::new(20, 0.1, 3);
        model.fit(&x, &y, classes()).unwrap();

        assert_eq!(model.trees().len(), 20);
        assert_eq!(model.predict(&[2.0]), "Dies");
        assert_eq!(model.predict(&[17.0]), "Lives");
        for (row, label) in x.iter().zip(&y) {
            assert_eq!(model.predict(row), label.as_str());
        }
        let [p0, p1] = model.predict_proba(&[19.0]);
        assert!((p0 + p1 - 1.0).abs() < 1e-12);
        assert!(p1 > 0.5);
    }

    #[test]
    fn learns_from_indicator_columns() {
        // Column 0: Gender=Male, column 1: Gender=Female, column 2: noise.
        let x = vec![
            vec![1.0, 0.0, 3.0],
            vec![0.0, 1.0, 3.0],
            vec![1.0, 0.0, 1.0],
            vec![0.0, 1.0, 1.0],
            vec![1.0, 0.0, 2.0],
            vec![0.0, 1.0, 2.0],
        ];
        let y = labels(&["Lives", "Dies", "Lives", "Dies", "Lives", "Dies"]);
        let mut model = GradientBoostingClassifier::new(10, 0.1, 1);
        model.fit(&x, &y, classes()).unwrap();
        assert_eq!(model.predict(&[1.0, 0.0, 9.0]), "Lives");
        assert_eq!(model.predict(&[0.0, 1.0, 9.0]), "Dies");
        assert!(model.trees().iter().all(|t| t.depth() <= 1));
    }

    #[test]
    fn missing_values_route_right() {
        let x = vec![vec![1.0], vec![2.0], vec![f64::NAN], vec![f64::NAN]];
        let y = labels(&["Dies", "Dies", "Lives", "Lives"]);
        let mut model = GradientBoostingClassifier::new(10, 0.3, 2);
        model.fit(&x, &y, classes()).unwrap();
        assert_eq!(model.predict(&[1.5]), "Dies");
        assert_eq!(model.predict(&[f64::NAN]), "Lives");
    }

    #[test]
    fn single_class_training_partition_still_fits() {
        let x = vec![vec![0.0], vec![1.0]];
        let y = labels(&["Lives", "Lives"]);
        let mut model = GradientBoostingClassifier::new(5, 0.1, 3);
        model.fit(&x, &y, classes()).unwrap();
        assert_eq!(model.predict(&[0.5]), "Lives");
        assert!(model.trees().iter().all(|t| t.n_leaves() == 1));
    }

    #[test]
    fn predictions_are_deterministic() {
        let x: Vec<Vec<f64>> = (0..12).map(|i| vec![(i % 4) as f64, (i % 3) as f64]).collect();
        let y: Vec<String> = (0..12)
            .map(|i| if (i % 4 + i % 3) % 2 == 0 { "Lives" } else { "Dies" }.to_string())
            .collect();
        let mut a = GradientBoostingClassifier::new(30, 0.1, 3);
        let mut b = GradientBoostingClassifier::new(30, 0.1, 3);
        a.fit(&x, &y, classes()).unwrap();
        b.fit(&x, &y, classes()).unwrap();
        for row in &x {
            let first = a.predict(row).to_string();
            assert_eq!(a.predict(row), first);
            assert_eq!(b.predict(row), first);
            assert_eq!(a.decision_function(row).to_bits(), b.decision_function(row).to_bits());
        }
    }

    #[test]
    fn split_between_extreme_values_stays_finite() {
        let x = vec![vec![-f64::MAX], vec![-f64::MAX], vec![f64::MAX], vec![f64::MAX]];
        let y = labels(&["Dies", "Dies", "Lives", "Lives"]);
        let mut model = GradientBoostingClassifier::new(10, 0.1, 1);
        model.fit(&x, &y, classes()).unwrap();

        assert!(model.trees().iter().all(|t| t.n_leaves() == 2));
        assert_eq!(model.predict(&[-f64::MAX]), "Dies");
        assert_eq!(model.predict(&[f64::MAX]), "Lives");
        assert_eq!(model.predict(&[1.0]), "Lives");
    }

    #[test]
    fn fit_rejects_bad_inputs() {
        let mut model = GradientBoostingClassifier::new(5, 0.1, 3);
        assert!(model.fit(&[], &[], classes()).is_err());
        assert!(model
            .fit(&[vec![0.0]], &labels(&["Lives"]), labels(&["Lives"]))
            .is_err());
        assert!(model
            .fit(&[vec![0.0]], &labels(&["Maybe"]), classes())
            .is_err());
        assert!(model
            .fit(&[vec![0.0], vec![0.0, 1.0]], &labels(&["Lives", "Dies"]), classes())
            .is_err());
        assert!(model.classes().is_empty());
    }
}
