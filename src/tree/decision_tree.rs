use super::{Classifier, Criterion};
use crate::error::{Error, Result};
use crate::{Matrix, Vector};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

#[derive(Clone, Debug)]
pub(super) struct Split {
    pub feature: usize,
    pub threshold: f64,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

#[derive(Clone, Debug)]
pub(super) struct Node {
    /// Training samples per class that reached this node.
    pub counts: Vec<usize>,
    pub impurity: f64,
    pub split: Option<Split>,
}

impl Node {
    pub fn n_samples(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Majority class index, lowest index on ties.
    pub fn majority(&self) -> usize {
        let mut best = 0;
        for (k, &c) in self.counts.iter().enumerate() {
            if c > self.counts[best] {
                best = k;
            }
        }
        best
    }

    fn depth(&self) -> usize {
        match &self.split {
            Some(split) => 1 + split.left.depth().max(split.right.depth()),
            None => 0,
        }
    }

    fn n_leaves(&self) -> usize {
        match &self.split {
            Some(split) => split.left.n_leaves() + split.right.n_leaves(),
            None => 1,
        }
    }
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    /// Position in the sorted samples where the right child starts.
    pos: usize,
    weighted_impurity: f64,
}

/// CART classification tree.
///
/// Thresholds are midpoints between consecutive distinct feature values and
/// samples with `x <= threshold` go left. At every node the features are
/// visited in an order shuffled by a generator seeded from `random_state`,
/// and among equally good splits the first one found is kept.
#[derive(Clone, Debug)]
pub struct DecisionTreeClassifier {
    max_depth: Option<usize>,
    criterion: Criterion,
    min_samples_split: usize,
    random_state: Option<u64>,
    classes: Option<Vec<f64>>,
    n_features: usize,
    root: Option<Node>,
    importances: Option<Vector>,
}

impl DecisionTreeClassifier {
    pub fn new() -> Self {
        Self {
            max_depth: None,
            criterion: Criterion::Gini,
            min_samples_split: 2,
            random_state: None,
            classes: None,
            n_features: 0,
            root: None,
            importances: None,
        }
    }

    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        if max_depth == Some(0) {
            panic!("max_depth must be at least 1");
        }
        self.max_depth = max_depth;
        self
    }

    pub fn criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    pub fn min_samples_split(mut self, min_samples_split: usize) -> Self {
        if min_samples_split < 2 {
            panic!(
                "min_samples_split must be at least 2, got {}",
                min_samples_split
            );
        }
        self.min_samples_split = min_samples_split;
        self
    }

    pub fn random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Sorted distinct labels seen during `fit`.
    pub fn classes(&self) -> Option<&[f64]> {
        self.classes.as_deref()
    }

    /// Total impurity decrease contributed by each feature, normalized to sum to one.
    pub fn feature_importances(&self) -> Option<&Vector> {
        self.importances.as_ref()
    }

    pub fn depth(&self) -> Option<usize> {
        self.root.as_ref().map(Node::depth)
    }

    pub fn n_leaves(&self) -> Option<usize> {
        self.root.as_ref().map(Node::n_leaves)
    }

    pub(super) fn root(&self) -> Result<&Node> {
        self.root.as_ref().ok_or(Error::NotFitted("DecisionTreeClassifier"))
    }

    pub(super) fn n_features(&self) -> usize {
        self.n_features
    }
}

/// Recursive CART induction over one training set.
struct Grower<'a> {
    tree: &'a DecisionTreeClassifier,
    x: &'a Matrix,
    y: &'a [usize],
    n_classes: usize,
    rng: StdRng,
    importances: Vector,
}

impl Grower<'_> {
    fn build(&mut self, samples: &mut [usize], depth: usize) -> Node {
        let mut counts = vec![0usize; self.n_classes];
        for &i in samples.iter() {
            counts[self.y[i]] += 1;
        }
        let impurity = self.tree.criterion.impurity(&counts);

        let too_deep = self.tree.max_depth.is_some_and(|max| depth >= max);
        if too_deep || samples.len() < self.tree.min_samples_split || impurity <= f64::EPSILON {
            return Node {
                counts,
                impurity,
                split: None,
            };
        }

        let Some(best) = self.find_split(samples) else {
            return Node {
                counts,
                impurity,
                split: None,
            };
        };

        let n = samples.len() as f64;
        self.importances[best.feature] += n * impurity - n * best.weighted_impurity;

        let x = self.x;
        samples.sort_by(|&a, &b| x[(a, best.feature)].total_cmp(&x[(b, best.feature)]));
        let (left, right) = samples.split_at_mut(best.pos);

        let left = self.build(left, depth + 1);
        let right = self.build(right, depth + 1);

        Node {
            counts,
            impurity,
            split: Some(Split {
                feature: best.feature,
                threshold: best.threshold,
                left: Box::new(left),
                right: Box::new(right),
            }),
        }
    }

    fn find_split(&mut self, samples: &[usize]) -> Option<BestSplit> {
        let (x, y) = (self.x, self.y);
        let criterion = self.tree.criterion;
        let n = samples.len();
        let mut features: Vec<usize> = (0..x.ncols()).collect();
        features.shuffle(&mut self.rng);

        let mut best: Option<BestSplit> = None;
        let mut order = samples.to_vec();

        for feature in features {
            order.sort_by(|&a, &b| x[(a, feature)].total_cmp(&x[(b, feature)]));

            let mut left = vec![0usize; self.n_classes];
            let mut right = vec![0usize; self.n_classes];
            for &i in &order {
                right[y[i]] += 1;
            }

            for pos in 1..n {
                let moved = order[pos - 1];
                left[y[moved]] += 1;
                right[y[moved]] -= 1;

                let lo = x[(moved, feature)];
                let hi = x[(order[pos], feature)];
                if hi <= lo {
                    continue;
                }

                let weighted = (pos as f64 * criterion.impurity(&left)
                    + (n - pos) as f64 * criterion.impurity(&right))
                    / n as f64;

                if best.as_ref().is_none_or(|b| weighted < b.weighted_impurity) {
                    let mut threshold = (lo + hi) / 2.0;
                    if threshold >= hi {
                        threshold = lo;
                    }
                    best = Some(BestSplit {
                        feature,
                        threshold,
                        pos,
                        weighted_impurity: weighted,
                    });
                }
            }
        }

        best
    }
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for DecisionTreeClassifier {
    fn fit(&mut self, x: &Matrix, y: &Vector) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(Error::DimensionMismatch {
                expected: x.nrows(),
                found: y.len(),
            });
        }
        if x.nrows() == 0 {
            return Err(Error::EmptyData("X must have at least one sample".to_string()));
        }

        let mut classes: Vec<f64> = y.to_vec();
        classes.sort_by(f64::total_cmp);
        classes.dedup();
        let encoded: Vec<usize> = y
            .iter()
            .map(|label| classes.partition_point(|c| c < label))
            .collect();

        let seed = self.random_state.unwrap_or_else(|| rand::thread_rng().r#gen());
        let mut grower = Grower {
            tree: self,
            x,
            y: &encoded,
            n_classes: classes.len(),
            rng: StdRng::seed_from_u64(seed),
            importances: Vector::zeros(x.ncols()),
        };
        let mut samples: Vec<usize> = (0..x.nrows()).collect();
        let root = grower.build(&mut samples, 0);
        let mut importances = grower.importances;

        let total = importances.sum();
        if total > 0.0 {
            importances /= total;
        }

        debug!(
            "DecisionTree({}, max_depth={:?}, min_samples_split={}): depth {}, {} leaves",
            self.criterion,
            self.max_depth,
            self.min_samples_split,
            root.depth(),
            root.n_leaves()
        );

        self.n_features = x.ncols();
        self.classes = Some(classes);
        self.root = Some(root);
        self.importances = Some(importances);
        Ok(())
    }

    fn predict(&self, x: &Matrix) -> Result<Vector> {
        let root = self.root()?;
        let classes = self
            .classes
            .as_ref()
            .ok_or(Error::NotFitted("DecisionTreeClassifier"))?;

        if x.ncols() != self.n_features {
            return Err(Error::DimensionMismatch {
                expected: self.n_features,
                found: x.ncols(),
            });
        }

        Ok(x
            .rows()
            .into_iter()
            .map(|row| {
                let mut node = root;
                while let Some(split) = &node.split {
                    node = if row[split.feature] <= split.threshold {
                        &split.left
                    } else {
                        &split.right
                    };
                }
                classes[node.majority()]
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "Decision Tree"
    }
}
