//! # Sequence Tagging
//!
//! The sequence label oracle: given one feature set per token, a tagger
//! returns one label per token together with the marginal probability of
//! every label at every position.

pub mod crf;
pub mod labels;
pub mod viterbi;

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;

pub use crf::CrfTagger;
pub use labels::Label;
pub use viterbi::ViterbiDecoder;

/// Attributes describing a single token, e.g. `word=flour` or `is_numeric`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureSet(Vec<String>);

impl FeatureSet {
    /// Creates an empty feature set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attribute. Duplicates are ignored.
    pub fn insert(&mut self, feature: impl Into<String>) {
        let feature = feature.into();
        if !self.0.contains(&feature) {
            self.0.push(feature);
        }
    }

    /// Returns `true` if the attribute is present.
    pub fn contains(&self, feature: &str) -> bool {
        self.0.iter().any(|f| f == feature)
    }

    /// Iterates over attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for feature in iter {
            set.insert(feature);
        }
        set
    }
}

/// Output of a single tagging call.
///
/// Owns the marginal matrix so that confidence queries never touch shared
/// tagger state.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagging {
    labels: Vec<Label>,
    /// `[position][label slot]`, slots ordered as `label_order`.
    marginals: Vec<Vec<f64>>,
    label_order: Vec<Label>,
}

impl Tagging {
    /// Builds a tagging result.
    ///
    /// `marginals[i][j]` is the probability that position `i` takes
    /// `label_order[j]`.
    pub fn new(labels: Vec<Label>, marginals: Vec<Vec<f64>>, label_order: Vec<Label>) -> Self {
        Self {
            labels,
            marginals,
            label_order,
        }
    }

    /// One label per token.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Marginal probability of `label` at `position`.
    ///
    /// Returns 0.0 for positions past the end or labels the model does not
    /// emit.
    pub fn marginal(&self, label: Label, position: usize) -> f64 {
        let Some(slot) = self.label_order.iter().position(|l| *l == label) else {
            return 0.0;
        };
        self.marginals
            .get(position)
            .and_then(|row| row.get(slot))
            .copied()
            .unwrap_or(0.0)
    }

    /// Marginal of each token's assigned label.
    pub fn assigned_scores(&self) -> Vec<f64> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| self.marginal(*label, i))
            .collect()
    }

    /// Marginal of `label` at every position.
    pub fn label_scores(&self, label: Label) -> Vec<f64> {
        (0..self.labels.len())
            .map(|i| self.marginal(label, i))
            .collect()
    }
}

/// A sequence labeling model.
///
/// Implementations must be safe to query from several threads at once.
pub trait SequenceTagger: Send + Sync + fmt::Debug {
    /// Labels the model can emit, in model order.
    fn labels(&self) -> &[Label];

    /// Labels a sequence of per-token feature sets.
    fn tag(&self, features: &[FeatureSet]) -> Result<Tagging>;
}

/// A tagger that can be opened from a persisted model artifact.
pub trait LoadTagger: SequenceTagger + Sized {
    /// Reads the artifact at `path`.
    fn load(path: &Path) -> Result<Self>;

    /// Builds the tagger from artifact contents already in memory.
    fn from_json(raw: &str) -> Result<Self>;
}
