use crate::Vector;
use crate::error::{Error, Result};
use tracing::warn;

/// Row indices of one cross-validation round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// K-fold splitter that keeps every class spread evenly over the folds.
///
/// Samples are not shuffled. Classes are numbered in order of first
/// appearance, the numbered labels are sorted and dealt round-robin over the
/// folds to decide how many samples of each class every fold receives, and
/// then the samples of each class are handed out in their original order:
/// the first allotment to fold 0, the next to fold 1, and so on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StratifiedKFold {
    n_splits: usize,
}

impl StratifiedKFold {
    pub fn new(n_splits: usize) -> Self {
        if n_splits < 2 {
            panic!("n_splits must be at least 2, got {}", n_splits);
        }
        Self { n_splits }
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    pub fn split(&self, y: &Vector) -> Result<Vec<Fold>> {
        let n_samples = y.len();
        if self.n_splits > n_samples {
            return Err(Error::InvalidParameter(format!(
                "cannot have n_splits={} greater than the number of samples {}",
                self.n_splits, n_samples
            )));
        }

        let mut classes: Vec<f64> = Vec::new();
        let encoded: Vec<usize> = y
            .iter()
            .map(|label| {
                match classes.iter().position(|c| c.total_cmp(label).is_eq()) {
                    Some(k) => k,
                    None => {
                        classes.push(*label);
                        classes.len() - 1
                    }
                }
            })
            .collect();

        let mut counts = vec![0usize; classes.len()];
        for &k in &encoded {
            counts[k] += 1;
        }

        let max_count = counts.iter().copied().max().unwrap_or(0);
        if self.n_splits > max_count {
            return Err(Error::InvalidParameter(format!(
                "n_splits={} cannot be greater than the number of members in each class",
                self.n_splits
            )));
        }
        let min_count = counts.iter().copied().min().unwrap_or(0);
        if min_count < self.n_splits {
            warn!(
                "The least populated class has only {} members, which is less than n_splits={}",
                min_count, self.n_splits
            );
        }

        let mut sorted = encoded.clone();
        sorted.sort_unstable();

        // allocation[fold][class]
        let mut allocation = vec![vec![0usize; classes.len()]; self.n_splits];
        for (i, &k) in sorted.iter().enumerate() {
            allocation[i % self.n_splits][k] += 1;
        }

        let mut test_fold = vec![0usize; n_samples];
        for k in 0..classes.len() {
            let fold_ids = (0..self.n_splits)
                .flat_map(|fold| std::iter::repeat_n(fold, allocation[fold][k]));
            let members = encoded
                .iter()
                .enumerate()
                .filter_map(|(i, &c)| (c == k).then_some(i));
            for (sample, fold) in members.zip(fold_ids) {
                test_fold[sample] = fold;
            }
        }

        Ok((0..self.n_splits)
            .map(|fold| {
                let (test, train): (Vec<usize>, Vec<usize>) =
                    (0..n_samples).partition(|&i| test_fold[i] == fold);
                Fold { train, test }
            })
            .collect())
    }
}

impl Default for StratifiedKFold {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_folds_partition_samples() {
        let y = array![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0];
        let folds = StratifiedKFold::new(2).split(&y).unwrap();

        assert_eq!(folds.len(), 2);
        let mut seen: Vec<usize> = folds.iter().flat_map(|f| f.test.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());

        for fold in &folds {
            assert_eq!(fold.train.len() + fold.test.len(), 10);
            assert!(fold.test.iter().all(|i| !fold.train.contains(i)));
        }
    }

    #[test]
    fn test_folds_are_stratified() {
        // 10 zeros, 5 ones
        let y = Vector::from_iter((0..15).map(|i| if i % 3 == 0 { 1.0 } else { 0.0 }));
        let folds = StratifiedKFold::new(5).split(&y).unwrap();

        for fold in &folds {
            let ones = fold.test.iter().filter(|&&i| y[i] == 1.0).count();
            let zeros = fold.test.len() - ones;
            assert_eq!(ones, 1);
            assert_eq!(zeros, 2);
        }
    }

    #[test]
    fn test_unshuffled_class_order() {
        let y = array![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        let folds = StratifiedKFold::new(2).split(&y).unwrap();

        assert_eq!(folds[0].test, vec![0, 1, 4, 5]);
        assert_eq!(folds[1].test, vec![2, 3, 6, 7]);
    }

    #[test]
    fn test_classes_numbered_by_first_appearance() {
        // the class seen first gets the larger share of fold 0
        let y = array![1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
        let folds = StratifiedKFold::new(2).split(&y).unwrap();

        assert_eq!(folds[0].test, vec![0, 1, 3]);
        assert_eq!(folds[1].test, vec![2, 4, 5]);
    }

    #[test]
    fn test_too_many_splits() {
        let y = array![0.0, 1.0, 0.0];
        assert!(StratifiedKFold::new(4).split(&y).is_err());
        assert!(StratifiedKFold::new(3).split(&y).is_err());
    }

    #[test]
    fn test_invalid_n_splits() {
        std::panic::catch_unwind(|| {
            StratifiedKFold::new(1);
        })
        .expect_err("Should panic on n_splits < 2");
    }
}
