//! Reproducible train / held-out partition of row indices.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row indices of each partition, in shuffled order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n_samples` with `seed` and hold out `ceil(n * test_size)` rows.
///
/// At least one row always stays in the training partition; the held-out
/// partition may be empty for tiny datasets or `test_size == 0`.
pub fn train_test_split(n_samples: usize, test_size: f64, seed: u64) -> Split {
    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let wanted = (n_samples as f64 * test_size).ceil() as usize;
    let n_test = wanted.min(n_samples.saturating_sub(1));
    let test = indices.split_off(n_samples - n_test);

    Split {
        train: indices,
        test,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn partitions_cover_every_row_once() {
        let split = train_test_split(100, 0.33, 20);
        assert_eq!(split.test.len(), 33);
        assert_eq!(split.train.len(), 67);
        let all: HashSet<usize> = split.train.iter().chain(&split.test).copied().collect();
        assert_eq!(all.len(), 100);
    }

    #[test]
    fn same_seed_same_split() {
        assert_eq!(train_test_split(50, 0.33, 20), train_test_split(50, 0.33, 20));
        assert_ne!(train_test_split(50, 0.33, 20), train_test_split(50, 0.33, 21));
    }

    #[test]
    fn held_out_size_rounds_up() {
        assert_eq!(train_test_split(10, 0.33, 1).test.len(), 4);
        assert_eq!(train_test_split(165, 0.33, 1).test.len(), 55);
    }

    #[test]
    fn tiny_datasets_keep_a_training_row() {
        let one = train_test_split(1, 0.33, 20);
        assert_eq!(one.train.len(), 1);
        assert!(one.test.is_empty());

        let two = train_test_split(2, 0.33, 20);
        assert_eq!((two.train.len(), two.test.len()), (1, 1));

        let none = train_test_split(5, 0.0, 20);
        assert_eq!(none.train.len(), 5);
        assert!(none.test.is_empty());

        let empty = train_test_split(0, 0.33, 20);
        assert!(empty.train.is_empty() && empty.test.is_empty());
    }
}
