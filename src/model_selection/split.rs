use crate::error::{Error, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Disjoint train/test row indices covering `0..n_samples`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl TrainTestSplit {
    pub fn new(n_samples: usize, test_size: f64, random_state: u64) -> Result<Self> {
        if test_size <= 0.0 || test_size >= 1.0 {
            return Err(Error::InvalidParameter(format!(
                "test_size must be between 0 and 1, got {test_size}"
            )));
        }

        let n_test = (n_samples as f64 * test_size).ceil() as usize;
        let n_train = n_samples.saturating_sub(n_test);
        if n_test == 0 || n_train == 0 {
            return Err(Error::EmptyData(format!(
                "with n_samples={n_samples} and test_size={test_size} one partition is empty"
            )));
        }

        let mut permutation: Vec<usize> = (0..n_samples).collect();
        let mut rng = StdRng::seed_from_u64(random_state);
        permutation.shuffle(&mut rng);

        let train = permutation.split_off(n_test);
        Ok(Self {
            train,
            test: permutation,
        })
    }
}
