//! # Sentence Normalization
//!
//! Turns a raw ingredient sentence into normalized tokens and the feature
//! sets the tagger consumes. Plural units are singularised before feature
//! extraction; their positions are recorded so the caller can restore the
//! plural form for tokens that end up not being units.

pub mod features;
pub mod tokenizer;

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::tagger::FeatureSet;
use crate::units;

pub use features::sentence_features;
pub use tokenizer::{Token, Tokenizer};

static NUMBER_LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d)([^\W\d_])").unwrap());
static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d)\s*[-–—]\s*(\d)").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const VULGAR_FRACTIONS: &[(char, &str)] = &[
    ('½', "1/2"),
    ('⅓', "1/3"),
    ('⅔', "2/3"),
    ('¼', "1/4"),
    ('¾', "3/4"),
    ('⅕', "1/5"),
    ('⅖', "2/5"),
    ('⅗', "3/5"),
    ('⅘', "4/5"),
    ('⅙', "1/6"),
    ('⅚', "5/6"),
    ('⅛', "1/8"),
    ('⅜', "3/8"),
    ('⅝', "5/8"),
    ('⅞', "7/8"),
];

/// Normalizes `sentence` for tokenization.
///
/// Expands vulgar fractions, separates numbers glued to words, tightens
/// numeric ranges and collapses whitespace.
pub fn clean_sentence(sentence: &str) -> String {
    let mut expanded = String::with_capacity(sentence.len() + 8);
    for c in sentence.chars() {
        match VULGAR_FRACTIONS.iter().find(|(f, _)| *f == c) {
            Some((_, replacement)) => {
                expanded.push(' ');
                expanded.push_str(replacement);
                expanded.push(' ');
            }
            None if c == '⁄' => expanded.push('/'),
            None => expanded.push(c),
        }
    }

    let separated = NUMBER_LETTER_RE.replace_all(&expanded, "$1 $2");
    let ranged = RANGE_RE.replace_all(&separated, "$1-$2");
    WHITESPACE_RE.replace_all(&ranged, " ").trim().to_string()
}

/// Normalized form of one ingredient sentence.
#[derive(Debug, Clone, Serialize)]
pub struct PreProcessor {
    /// Input sentence, unchanged.
    pub sentence: String,
    /// Sentence after [`clean_sentence`].
    pub cleaned: String,
    /// Tokens with positions in `cleaned`; text is pre-singularisation.
    pub tokens: Vec<Token>,
    /// Normalized token texts fed to feature extraction.
    pub tokenized_sentence: Vec<String>,
    /// Positions rewritten from a plural to a singular unit spelling.
    pub singularised_indices: BTreeSet<usize>,
    features: Vec<FeatureSet>,
}

impl PreProcessor {
    pub fn new(sentence: &str) -> Self {
        let cleaned = clean_sentence(sentence);
        let tokens = Tokenizer::new().tokenize(&cleaned);

        let mut singularised_indices = BTreeSet::new();
        let tokenized_sentence: Vec<String> = tokens
            .iter()
            .map(|token| match units::singularise_unit(&token.text) {
                Some(singular) => {
                    singularised_indices.insert(token.index);
                    singular.to_string()
                }
                None => token.text.clone(),
            })
            .collect();

        let features = sentence_features(&tokenized_sentence);

        Self {
            sentence: sentence.to_string(),
            cleaned,
            tokens,
            tokenized_sentence,
            singularised_indices,
            features,
        }
    }

    /// One feature set per token of `tokenized_sentence`.
    pub fn sentence_features(&self) -> &[FeatureSet] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.tokenized_sentence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokenized_sentence.is_empty()
    }
}
