use super::{Criterion, DecisionTreeClassifier};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The tunable settings of a [`DecisionTreeClassifier`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionTreeParams {
    pub criterion: Criterion,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl DecisionTreeParams {
    pub fn build(&self, random_state: u64) -> DecisionTreeClassifier {
        DecisionTreeClassifier::new()
            .criterion(self.criterion)
            .max_depth(self.max_depth)
            .min_samples_split(self.min_samples_split)
            .random_state(random_state)
    }
}

impl Default for DecisionTreeParams {
    fn default() -> Self {
        Self {
            criterion: Criterion::Gini,
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

impl fmt::Display for DecisionTreeParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let depth = match self.max_depth {
            Some(d) => d.to_string(),
            None => "None".to_string(),
        };
        write!(
            f,
            "criterion={}, max_depth={}, min_samples_split={}",
            self.criterion, depth, self.min_samples_split
        )
    }
}

/// Value lists for an exhaustive search over tree settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamGrid {
    pub criterion: Vec<Criterion>,
    pub max_depth: Vec<Option<usize>>,
    pub min_samples_split: Vec<usize>,
}

impl ParamGrid {
    /// Every combination, with `min_samples_split` varying fastest and
    /// `criterion` slowest.
    pub fn candidates(&self) -> Vec<DecisionTreeParams> {
        let mut candidates = Vec::with_capacity(self.len());
        for &criterion in &self.criterion {
            for &max_depth in &self.max_depth {
                for &min_samples_split in &self.min_samples_split {
                    candidates.push(DecisionTreeParams {
                        criterion,
                        max_depth,
                        min_samples_split,
                    });
                }
            }
        }
        candidates
    }

    pub fn len(&self) -> usize {
        self.criterion.len() * self.max_depth.len() * self.min_samples_split.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self {
            criterion: vec![Criterion::Gini, Criterion::Entropy],
            max_depth: vec![Some(3), Some(5), Some(7), Some(10), None],
            min_samples_split: vec![2, 5, 10],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_has_thirty_candidates() {
        let grid = ParamGrid::default();
        let candidates = grid.candidates();

        assert_eq!(grid.len(), 30);
        assert_eq!(candidates.len(), 30);
        assert_eq!(
            candidates[0],
            DecisionTreeParams {
                criterion: Criterion::Gini,
                max_depth: Some(3),
                min_samples_split: 2,
            }
        );
        assert_eq!(candidates[1].min_samples_split, 5);
        assert_eq!(candidates[3].max_depth, Some(5));
        assert_eq!(candidates[15].criterion, Criterion::Entropy);
        assert_eq!(candidates[29].max_depth, None);
    }

    #[test]
    fn test_params_display() {
        let params = DecisionTreeParams {
            criterion: Criterion::Entropy,
            max_depth: None,
            min_samples_split: 10,
        };
        assert_eq!(
            params.to_string(),
            "criterion=entropy, max_depth=None, min_samples_split=10"
        );
    }

    #[test]
    fn test_grid_from_json() {
        let grid: ParamGrid = serde_json::from_str(
            r#"{"criterion": ["gini"], "max_depth": [2, null], "min_samples_split": [2]}"#,
        )
        .unwrap();

        assert_eq!(grid.len(), 2);
        assert_eq!(grid.candidates()[1].max_depth, None);
    }
}
