//! # Linear-Chain CRF Tagger
//!
//! Feature-weighted CRF loaded from a JSON model artifact:
//!
//! ```json
//! {
//!   "version": 1,
//!   "language": "en",
//!   "labels": ["QTY", "UNIT", "NAME"],
//!   "transitions": { "QTY": { "UNIT": 0.5 } },
//!   "state_features": { "is_numeric": { "QTY": 6.0 } }
//! }
//! ```
//!
//! Emission scores are the sum of the weights of every feature present on a
//! token. Missing entries weigh 0.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{MiseError, Result};
use crate::tagger::labels::Label;
use crate::tagger::viterbi::ViterbiDecoder;
use crate::tagger::{FeatureSet, LoadTagger, SequenceTagger, Tagging};

/// Supported artifact format version.
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// On-disk representation of a CRF model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrfModelFile {
    pub version: u32,
    #[serde(default)]
    pub language: Option<String>,
    pub labels: Vec<String>,
    /// `from -> to -> weight`
    #[serde(default)]
    pub transitions: HashMap<String, HashMap<String, f64>>,
    /// `feature -> label -> weight`
    #[serde(default)]
    pub state_features: HashMap<String, HashMap<String, f64>>,
}

/// CRF tagger with dense per-label weights.
#[derive(Debug, Clone)]
pub struct CrfTagger {
    labels: Vec<Label>,
    language: Option<String>,
    /// `[from][to]`, indexed by slot in `labels`
    transitions: Vec<Vec<f64>>,
    /// Feature name to one weight per label slot
    weights: HashMap<String, Vec<f64>>,
    viterbi: ViterbiDecoder,
}

impl CrfTagger {
    /// Builds a tagger from a parsed model file.
    ///
    /// # Errors
    ///
    /// Returns `MiseError::InvalidModel` for unknown or duplicate labels,
    /// non-finite weights, or an unsupported format version.
    pub fn from_model(model: CrfModelFile) -> Result<Self> {
        if model.version != MODEL_FORMAT_VERSION {
            return Err(MiseError::InvalidModel(format!(
                "unsupported model format version {}",
                model.version
            )));
        }
        if model.labels.is_empty() {
            return Err(MiseError::InvalidModel("model declares no labels".into()));
        }

        let labels = model
            .labels
            .iter()
            .map(|l| l.parse::<Label>())
            .collect::<Result<Vec<_>>>()?;
        let mut seen = labels.clone();
        seen.sort();
        seen.dedup();
        if seen.len() != labels.len() {
            return Err(MiseError::InvalidModel("duplicate labels".into()));
        }

        let n = labels.len();
        let slot = |name: &str| -> Result<usize> {
            let label = name.parse::<Label>()?;
            labels.iter().position(|l| *l == label).ok_or_else(|| {
                MiseError::InvalidModel(format!("label {label} is not declared by the model"))
            })
        };

        let mut transitions = vec![vec![0.0; n]; n];
        for (from, row) in &model.transitions {
            let from_slot = slot(from)?;
            for (to, weight) in row {
                transitions[from_slot][slot(to)?] = finite(*weight, from)?;
            }
        }

        let mut weights = HashMap::with_capacity(model.state_features.len());
        for (feature, row) in &model.state_features {
            let mut dense = vec![0.0; n];
            for (label, weight) in row {
                dense[slot(label)?] = finite(*weight, feature)?;
            }
            weights.insert(feature.clone(), dense);
        }

        Ok(Self {
            viterbi: ViterbiDecoder::new(n),
            labels,
            language: model.language,
            transitions,
            weights,
        })
    }

    /// Language code declared by the artifact, if any.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Number of distinct state features.
    pub fn num_features(&self) -> usize {
        self.weights.len()
    }

    fn emissions(&self, features: &[FeatureSet]) -> Vec<Vec<f64>> {
        features
            .iter()
            .map(|token| {
                let mut row = vec![0.0; self.labels.len()];
                for weights in token.iter().filter_map(|f| self.weights.get(f)) {
                    for (score, w) in row.iter_mut().zip(weights) {
                        *score += w;
                    }
                }
                row
            })
            .collect()
    }
}

fn finite(weight: f64, context: &str) -> Result<f64> {
    if weight.is_finite() {
        Ok(weight)
    } else {
        Err(MiseError::InvalidModel(format!(
            "non-finite weight for {context:?}"
        )))
    }
}

impl SequenceTagger for CrfTagger {
    fn labels(&self) -> &[Label] {
        &self.labels
    }

    fn tag(&self, features: &[FeatureSet]) -> Result<Tagging> {
        let emissions = self.emissions(features);
        let path = self.viterbi.decode(&emissions, &self.transitions)?;
        let marginals = self.viterbi.marginals(&emissions, &self.transitions)?;

        let labels = path.into_iter().map(|slot| self.labels[slot]).collect();
        Ok(Tagging::new(labels, marginals, self.labels.clone()))
    }
}

impl LoadTagger for CrfTagger {
    fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MiseError::ModelNotFound {
                path: path.to_path_buf(),
            });
        }

        debug!(path = %path.display(), "reading CRF model artifact");
        let raw = fs::read_to_string(path)?;
        let tagger = Self::from_json(&raw)?;

        info!(
            path = %path.display(),
            language = tagger.language().unwrap_or("unknown"),
            labels = tagger.labels.len(),
            features = tagger.num_features(),
            "loaded CRF model"
        );
        Ok(tagger)
    }

    fn from_json(raw: &str) -> Result<Self> {
        let model: CrfModelFile = serde_json::from_str(raw)?;
        Self::from_model(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_label_model() -> CrfModelFile {
        serde_json::from_str(
            r#"{
                "version": 1,
                "language": "en",
                "labels": ["QTY", "NAME"],
                "state_features": {
                    "bias": { "NAME": 0.5 },
                    "is_numeric": { "QTY": 3.0, "NAME": -1.0 }
                }
            }"#,
        )
        .unwrap()
    }

    fn features(items: &[&[&str]]) -> Vec<FeatureSet> {
        items
            .iter()
            .map(|f| f.iter().copied().collect())
            .collect()
    }

    #[test]
    fn test_tag_picks_highest_scoring_labels() {
        let tagger = CrfTagger::from_model(two_label_model()).unwrap();
        let tagging = tagger
            .tag(&features(&[&["bias", "is_numeric"], &["bias"]]))
            .unwrap();

        assert_eq!(tagging.labels(), &[Label::Qty, Label::Name]);
    }

    #[test]
    fn test_marginals_without_transitions_are_softmax() {
        let tagger = CrfTagger::from_model(two_label_model()).unwrap();
        let tagging = tagger.tag(&features(&[&["bias"]])).unwrap();

        // emissions: QTY 0.0, NAME 0.5
        let expected_name = 0.5_f64.exp() / (1.0 + 0.5_f64.exp());
        assert!((tagging.marginal(Label::Name, 0) - expected_name).abs() < 1e-9);
        assert!((tagging.marginal(Label::Qty, 0) - (1.0 - expected_name)).abs() < 1e-9);
        assert_eq!(tagging.marginal(Label::Unit, 0), 0.0);
    }

    #[test]
    fn test_unknown_features_are_ignored() {
        let tagger = CrfTagger::from_model(two_label_model()).unwrap();
        let tagging = tagger.tag(&features(&[&["word=zzz", "is_numeric"]])).unwrap();
        assert_eq!(tagging.labels(), &[Label::Qty]);
    }

    #[test]
    fn test_empty_sequence() {
        let tagger = CrfTagger::from_model(two_label_model()).unwrap();
        let tagging = tagger.tag(&[]).unwrap();
        assert!(tagging.is_empty());
    }

    #[test]
    fn test_rejects_unknown_label() {
        let mut model = two_label_model();
        model.labels.push("B-TITLE".into());
        assert!(matches!(
            CrfTagger::from_model(model),
            Err(MiseError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_rejects_weight_for_undeclared_label() {
        let mut model = two_label_model();
        model
            .state_features
            .insert("is_unit".into(), HashMap::from([("UNIT".into(), 2.0)]));
        assert!(CrfTagger::from_model(model).is_err());
    }

    #[test]
    fn test_rejects_bad_version() {
        let mut model = two_label_model();
        model.version = 7;
        assert!(CrfTagger::from_model(model).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = CrfTagger::load(Path::new("/nonexistent/model.en.json")).unwrap_err();
        assert!(matches!(err, MiseError::ModelNotFound { .. }));
    }

    #[test]
    fn test_from_json_rejects_malformed_artifact() {
        let err = CrfTagger::from_json("{ not json").unwrap_err();
        assert!(matches!(err, MiseError::Json(_)));
    }

    #[test]
    fn test_load_bundled_model() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("models/model.en.json");
        let tagger = CrfTagger::load(&path).unwrap();
        assert_eq!(tagger.language(), Some("en"));
        assert_eq!(tagger.labels().len(), Label::NUM_LABELS);
        assert!(tagger.num_features() > 0);
    }
}
