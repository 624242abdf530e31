use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ScoringError;
use crate::utils::percentile;

pub const DEFAULT_ESTIMATORS: usize = 100;
pub const DEFAULT_MAX_SAMPLES: usize = 256;
pub const DEFAULT_CONTAMINATION: f64 = 0.05;
pub const DEFAULT_RANDOM_STATE: u64 = 42;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

pub const OUTLIER: i8 = -1;
pub const INLIER: i8 = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_samples: usize,
    pub contamination: f64,
    pub random_state: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: DEFAULT_ESTIMATORS,
            max_samples: DEFAULT_MAX_SAMPLES,
            contamination: DEFAULT_CONTAMINATION,
            random_state: DEFAULT_RANDOM_STATE,
        }
    }
}

#[derive(Debug)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

#[derive(Debug)]
struct IsolationTree {
    root: Node,
}

impl IsolationTree {
    fn grow(samples: &mut [f64], max_depth: usize, rng: &mut StdRng) -> Self {
        Self {
            root: grow_node(samples, 0, max_depth, rng),
        }
    }

    fn path_length(&self, value: f64) -> f64 {
        let mut node = &self.root;
        let mut depth = 0.0;
        loop {
            match node {
                Node::Leaf { size } => return depth + average_path_length(*size),
                Node::Split {
                    threshold,
                    left,
                    right,
                } => {
                    node = if value <= *threshold { left } else { right };
                    depth += 1.0;
                }
            }
        }
    }
}

fn grow_node(samples: &mut [f64], depth: usize, max_depth: usize, rng: &mut StdRng) -> Node {
    if samples.len() < 2 || depth >= max_depth {
        return Node::Leaf {
            size: samples.len(),
        };
    }
    let (min, max) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    if max <= min {
        return Node::Leaf {
            size: samples.len(),
        };
    }

    let threshold = rng.gen_range(min..max);
    let mut split = 0;
    for i in 0..samples.len() {
        if samples[i] <= threshold {
            samples.swap(i, split);
            split += 1;
        }
    }
    let (left, right) = samples.split_at_mut(split);
    Node::Split {
        threshold,
        left: Box::new(grow_node(left, depth + 1, max_depth, rng)),
        right: Box::new(grow_node(right, depth + 1, max_depth, rng)),
    }
}

/// Average path length of an unsuccessful search in a binary search tree of
/// `n` nodes, used to normalise isolation depths.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Isolation forest over a single numeric feature.
#[derive(Debug)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    sample_size: usize,
    offset: f64,
}

impl IsolationForest {
    pub fn fit(params: ForestParams, values: &[f64]) -> Result<Self, ScoringError> {
        if values.is_empty() {
            return Err(ScoringError::ModelFit("no samples to fit".to_string()));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(ScoringError::ModelFit(format!(
                "feature value {} is not finite",
                bad
            )));
        }
        if params.n_estimators == 0 || params.max_samples == 0 {
            return Err(ScoringError::ModelFit(
                "n_estimators and max_samples must be positive".to_string(),
            ));
        }
        if !(0.0..=0.5).contains(&params.contamination) {
            return Err(ScoringError::ModelFit(format!(
                "contamination {} outside [0, 0.5]",
                params.contamination
            )));
        }

        let sample_size = params.max_samples.min(values.len());
        let max_depth = (sample_size.max(2) as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(params.random_state);

        let trees = (0..params.n_estimators)
            .map(|_| {
                let mut samples: Vec<f64> =
                    rand::seq::index::sample(&mut rng, values.len(), sample_size)
                        .into_iter()
                        .map(|index| values[index])
                        .collect();
                IsolationTree::grow(&mut samples, max_depth, &mut rng)
            })
            .collect();

        let mut forest = Self {
            trees,
            sample_size,
            offset: 0.0,
        };
        let training_scores = forest.score_samples(values);
        forest.offset = percentile(&training_scores, 100.0 * params.contamination);
        Ok(forest)
    }

    /// Fits on `values` and labels the same values: -1 outlier, 1 inlier.
    pub fn fit_predict(params: ForestParams, values: &[f64]) -> Result<Vec<i8>, ScoringError> {
        let forest = Self::fit(params, values)?;
        Ok(values.iter().map(|value| forest.predict(*value)).collect())
    }

    /// Opposite of the anomaly score: lower means more abnormal, range [-1, 0).
    pub fn score(&self, value: f64) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| tree.path_length(value)).sum();
        let mean_depth = total / self.trees.len() as f64;
        let normaliser = average_path_length(self.sample_size);
        let exponent = if normaliser > 0.0 {
            mean_depth / normaliser
        } else {
            // single-sample fit: every point sits at the root
            1.0
        };
        -(2f64.powf(-exponent))
    }

    pub fn score_samples(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|value| self.score(*value)).collect()
    }

    pub fn decision_function(&self, value: f64) -> f64 {
        self.score(value) - self.offset
    }

    pub fn predict(&self, value: f64) -> i8 {
        if self.decision_function(value) < 0.0 {
            OUTLIER
        } else {
            INLIER
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }
}
