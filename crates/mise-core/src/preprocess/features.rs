//! Per-token feature extraction for the CRF tagger.

use std::sync::LazyLock;

use regex::Regex;

use crate::tagger::FeatureSet;
use crate::units;

static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:[./]\d+)?(?:-\d+(?:[./]\d+)?)?$").unwrap());

/// Number words treated as quantities.
pub const NUMBER_WORDS: &[(&str, f64)] = &[
    ("one", 1.0),
    ("two", 2.0),
    ("three", 3.0),
    ("four", 4.0),
    ("five", 5.0),
    ("six", 6.0),
    ("seven", 7.0),
    ("eight", 8.0),
    ("nine", 9.0),
    ("ten", 10.0),
    ("eleven", 11.0),
    ("twelve", 12.0),
    ("dozen", 12.0),
];

pub const STOP_WORDS: &[&str] = &[
    "a", "about", "an", "and", "are", "as", "at", "be", "but", "by", "each", "for", "from", "if",
    "in", "into", "is", "it", "its", "of", "on", "or", "per", "so", "some", "such", "than",
    "that", "the", "then", "there", "these", "this", "to", "too", "very", "was", "will", "with",
];

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token.to_lowercase().as_str())
}

pub fn is_numeric(token: &str) -> bool {
    NUMERIC_RE.is_match(token) || number_word(token).is_some()
}

pub fn number_word(token: &str) -> Option<f64> {
    let lower = token.to_lowercase();
    NUMBER_WORDS
        .iter()
        .find(|(word, _)| *word == lower)
        .map(|(_, value)| *value)
}

fn is_punc(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if !c.is_alphanumeric())
}

fn suffix(token: &str, n: usize) -> Option<String> {
    let chars: Vec<char> = token.chars().collect();
    (chars.len() > n + 1 && chars.iter().all(|c| c.is_alphabetic()))
        .then(|| chars[chars.len() - n..].iter().collect::<String>().to_lowercase())
}

/// Build one feature set per token.
///
/// `tokens` are the normalized (singularised) tokens of a sentence.
pub fn sentence_features(tokens: &[String]) -> Vec<FeatureSet> {
    let mut features = Vec::with_capacity(tokens.len());
    let mut paren_depth = 0usize;
    let mut seen_comma = false;

    for (i, token) in tokens.iter().enumerate() {
        let lower = token.to_lowercase();
        let mut set = FeatureSet::new();

        if token == "(" {
            paren_depth += 1;
        }

        set.insert("bias");
        set.insert(format!("word={lower}"));
        if let Some(s) = suffix(token, 2) {
            set.insert(format!("suffix2={s}"));
        }
        if let Some(s) = suffix(token, 3) {
            set.insert(format!("suffix3={s}"));
        }
        if is_numeric(token) {
            set.insert("is_numeric");
        }
        if units::is_unit(token) {
            set.insert("is_unit");
        }
        if is_punc(token) {
            set.insert("is_punc");
        }
        if token.chars().next().is_some_and(char::is_uppercase) {
            set.insert("is_capitalised");
        }
        if is_stop_word(token) {
            set.insert("is_stop_word");
        }
        if paren_depth > 0 {
            set.insert("is_in_parens");
        }
        if seen_comma {
            set.insert("follows_comma");
        }

        match i.checked_sub(1).and_then(|p| tokens.get(p)) {
            Some(prev) => {
                set.insert(format!("prev_word={}", prev.to_lowercase()));
                if is_numeric(prev) {
                    set.insert("prev_is_numeric");
                }
                if units::is_unit(prev) {
                    set.insert("prev_is_unit");
                }
            }
            None => set.insert("is_first"),
        }

        if let Some(next) = tokens.get(i + 1) {
            set.insert(format!("next_word={}", next.to_lowercase()));
            if units::is_unit(next) {
                set.insert("next_is_unit");
            }
        }

        if token == ")" {
            paren_depth = paren_depth.saturating_sub(1);
        }
        if token == "," {
            seen_comma = true;
        }

        features.push(set);
    }

    features
}
