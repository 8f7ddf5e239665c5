use super::StratifiedKFold;
use crate::error::{Error, Result};
use crate::tree::Classifier;
use crate::{Matrix, Vector};
use ndarray::Axis;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Accuracy of a freshly built classifier on each fold's held-out rows.
pub fn cross_val_score<C, F>(
    build: F,
    x: &Matrix,
    y: &Vector,
    cv: &StratifiedKFold,
) -> Result<Vec<f64>>
where
    C: Classifier,
    F: Fn() -> C,
{
    if x.nrows() != y.len() {
        return Err(Error::DimensionMismatch {
            expected: x.nrows(),
            found: y.len(),
        });
    }

    cv.split(y)?
        .iter()
        .map(|fold| {
            let mut model = build();
            model.fit(&x.select(Axis(0), &fold.train), &y.select(Axis(0), &fold.train))?;
            model.score(&x.select(Axis(0), &fold.test), &y.select(Axis(0), &fold.test))
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CandidateScore<P> {
    pub params: P,
    pub fold_scores: Vec<f64>,
    pub mean_score: f64,
    /// Population standard deviation of the fold scores.
    pub std_score: f64,
    /// 1 for the best mean; equal means share a rank.
    pub rank: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GridSearchResult<P> {
    pub best_params: P,
    pub best_score: f64,
    pub best_index: usize,
    pub candidates: Vec<CandidateScore<P>>,
}

impl<P: fmt::Display> fmt::Display for GridSearchResult<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Best parameters found: {}", self.best_params)?;
        write!(f, "Best cross-validation accuracy: {:.2}", self.best_score)
    }
}

/// Exhaustive cross-validated search over candidate parameters.
///
/// Every candidate is scored on the same folds. The best candidate is the one
/// with the highest mean accuracy, the earliest one on ties.
#[derive(Clone, Debug)]
pub struct GridSearchCv<P> {
    candidates: Vec<P>,
    cv: StratifiedKFold,
}

impl<P: Clone + fmt::Debug> GridSearchCv<P> {
    pub fn new(candidates: Vec<P>, cv: StratifiedKFold) -> Self {
        Self { candidates, cv }
    }

    pub fn n_candidates(&self) -> usize {
        self.candidates.len()
    }

    pub fn fit<C, F>(&self, x: &Matrix, y: &Vector, build: F) -> Result<GridSearchResult<P>>
    where
        C: Classifier,
        F: Fn(&P) -> C,
    {
        if self.candidates.is_empty() {
            return Err(Error::InvalidParameter(
                "grid search needs at least one candidate".to_string(),
            ));
        }

        let mut scored = Vec::with_capacity(self.candidates.len());
        for params in &self.candidates {
            let fold_scores = cross_val_score(|| build(params), x, y, &self.cv)?;
            let n = fold_scores.len() as f64;
            let mean_score = fold_scores.iter().sum::<f64>() / n;
            let std_score = (fold_scores
                .iter()
                .map(|s| (s - mean_score).powi(2))
                .sum::<f64>()
                / n)
                .sqrt();

            debug!("{:?}: mean accuracy {:.4}", params, mean_score);
            scored.push(CandidateScore {
                params: params.clone(),
                fold_scores,
                mean_score,
                std_score,
                rank: 0,
            });
        }

        let means: Vec<f64> = scored.iter().map(|c| c.mean_score).collect();
        for candidate in &mut scored {
            candidate.rank = 1 + means.iter().filter(|&&m| m > candidate.mean_score).count();
        }

        let mut best_index = 0;
        for (i, &mean) in means.iter().enumerate() {
            if mean > means[best_index] {
                best_index = i;
            }
        }

        Ok(GridSearchResult {
            best_params: scored[best_index].params.clone(),
            best_score: means[best_index],
            best_index,
            candidates: scored,
        })
    }
}
