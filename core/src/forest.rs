//! Random-forest classifier: the pipeline's fit/predict_proba capability.
//!
//! CART trees over the five claim features: gini impurity, bootstrap
//! resampling per tree, a random feature subset per split, leaf
//! probability = positive fraction of the leaf's samples. The forest
//! probability is the mean over all trees.
//!
//! Every tree draws from its own deterministic stream derived from the
//! model seed, so fitting the same data with the same parameters yields
//! the same forest. The artifact is one JSON blob at the canonical model
//! path: written once per training run, loaded read-only, never mutated.

use crate::error::{PipelineError, PipelineResult};
use crate::rng::StreamRng;
use crate::types::{Features, NUM_FEATURES};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Per-tree stream indices start here; slots below 256 belong to
/// `rng::StreamSlot`.
const TREE_STREAM_BASE: u64 = 256;

/// Features considered at each split (floor of sqrt(NUM_FEATURES)).
const SPLIT_FEATURES: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 16,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        prob: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn prob_for(&self, x: &Features) -> f64 {
        match self {
            Node::Leaf { prob } => *prob,
            Node::Split { feature, threshold, left, right } => {
                if x[*feature] <= *threshold {
                    left.prob_for(x)
                } else {
                    right.prob_for(x)
                }
            }
        }
    }
}

/// A trained forest, plus the parameters and timestamp it was built with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudModel {
    pub params: ForestParams,
    pub n_features: usize,
    pub trained_at: DateTime<Utc>,
    trees: Vec<Node>,
}

impl FraudModel {
    /// Fit a forest on the given feature matrix and 0/1 labels.
    /// `features` and `labels` must be the same length and non-empty.
    pub fn fit(features: &[Features], labels: &[u8], params: &ForestParams) -> Self {
        assert_eq!(features.len(), labels.len(), "feature/label length mismatch");
        assert!(!features.is_empty(), "cannot fit on an empty sample");
        assert!(params.n_trees > 0, "forest needs at least one tree");

        let n = features.len();
        let trees = (0..params.n_trees)
            .map(|tree_index| {
                let mut rng = StreamRng::new(params.seed, TREE_STREAM_BASE + tree_index as u64)
                    .with_name("tree");
                let sample: Vec<usize> =
                    (0..n).map(|_| rng.next_u64_below(n as u64) as usize).collect();
                build_node(features, labels, &sample, 0, params, &mut rng)
            })
            .collect();

        Self {
            params: params.clone(),
            n_features: NUM_FEATURES,
            trained_at: Utc::now(),
            trees,
        }
    }

    /// Probability of the positive (fraud) class, in [0, 1].
    pub fn predict_proba(&self, x: &Features) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| tree.prob_for(x)).sum();
        total / self.trees.len() as f64
    }

    /// Hard class prediction at the conventional 0.5 cut.
    pub fn predict(&self, x: &Features) -> u8 {
        u8::from(self.predict_proba(x) >= 0.5)
    }

    /// Persist to `path` as a single JSON blob, overwriting any previous
    /// artifact. Parent directories are created as needed.
    pub fn save(&self, path: &Path) -> PipelineResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = fs::File::create(path)?;
        serde_json::to_writer(file, self)?;
        log::info!("saved model: {}", path.display());
        Ok(())
    }

    /// Load a persisted model. `MissingFile` when no artifact exists.
    pub fn load(path: &Path) -> PipelineResult<Self> {
        if !path.exists() {
            return Err(PipelineError::MissingFile { path: path.to_path_buf() });
        }
        let file = fs::File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}

fn positive_count(labels: &[u8], indices: &[usize]) -> usize {
    indices.iter().filter(|&&i| labels[i] == 1).count()
}

fn gini(pos: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = pos as f64 / total as f64;
    2.0 * p * (1.0 - p)
}

/// Pick `SPLIT_FEATURES` distinct feature indices by partial Fisher-Yates.
fn sample_features(rng: &mut StreamRng) -> [usize; SPLIT_FEATURES] {
    let mut pool: [usize; NUM_FEATURES] = [0, 1, 2, 3, 4];
    let mut picked = [0usize; SPLIT_FEATURES];
    for (slot, out) in picked.iter_mut().enumerate() {
        let j = slot + rng.next_u64_below((NUM_FEATURES - slot) as u64) as usize;
        pool.swap(slot, j);
        *out = pool[slot];
    }
    picked
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

fn best_split_on(
    features: &[Features],
    labels: &[u8],
    indices: &[usize],
    feature: usize,
) -> Option<BestSplit> {
    let mut values: Vec<(f64, u8)> = indices
        .iter()
        .map(|&i| (features[i][feature], labels[i]))
        .collect();
    values.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let total = values.len();
    let total_pos = values.iter().filter(|(_, label)| *label == 1).count();

    let mut best: Option<BestSplit> = None;
    let mut left_pos = 0usize;
    for split_at in 1..total {
        if values[split_at - 1].1 == 1 {
            left_pos += 1;
        }
        // Only cut where the value actually changes.
        if values[split_at].0 <= values[split_at - 1].0 {
            continue;
        }
        let left_n = split_at;
        let right_n = total - split_at;
        let right_pos = total_pos - left_pos;
        let impurity = (left_n as f64 * gini(left_pos, left_n)
            + right_n as f64 * gini(right_pos, right_n))
            / total as f64;
        if best.as_ref().map_or(true, |b| impurity < b.impurity) {
            best = Some(BestSplit {
                feature,
                threshold: (values[split_at - 1].0 + values[split_at].0) / 2.0,
                impurity,
            });
        }
    }
    best
}

fn build_node(
    features: &[Features],
    labels: &[u8],
    indices: &[usize],
    depth: usize,
    params: &ForestParams,
    rng: &mut StreamRng,
) -> Node {
    let total = indices.len();
    let pos = positive_count(labels, indices);

    if pos == 0
        || pos == total
        || depth >= params.max_depth
        || total < params.min_samples_split
    {
        return Node::Leaf { prob: pos as f64 / total as f64 };
    }

    let parent_impurity = gini(pos, total);
    let candidates = sample_features(rng);
    let best = candidates
        .iter()
        .filter_map(|&feature| best_split_on(features, labels, indices, feature))
        .min_by(|a, b| a.impurity.partial_cmp(&b.impurity).unwrap_or(std::cmp::Ordering::Equal));

    let split = match best {
        Some(split) if split.impurity < parent_impurity - 1e-12 => split,
        _ => return Node::Leaf { prob: pos as f64 / total as f64 },
    };

    let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .copied()
        .partition(|&i| features[i][split.feature] <= split.threshold);

    Node::Split {
        feature: split.feature,
        threshold: split.threshold,
        left: Box::new(build_node(features, labels, &left_indices, depth + 1, params, rng)),
        right: Box::new(build_node(features, labels, &right_indices, depth + 1, params, rng)),
    }
}
