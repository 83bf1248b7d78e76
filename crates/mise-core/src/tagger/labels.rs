//! # Ingredient Labels
//!
//! Defines the closed label set used for sequence labeling of ingredient
//! sentence tokens. Every token receives exactly one label.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MiseError;

/// Labels assigned to tokens of an ingredient sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    /// Quantity: "2", "1/2", "1-2"
    Qty,
    /// Unit of measure: "cup", "g", "tablespoon"
    Unit,
    /// Size modifier: "large", "small"
    Size,
    /// Ingredient name
    Name,
    /// Preparation instruction: "sifted", "finely chopped"
    Prep,
    /// What the ingredient is for: "for garnish"
    Purpose,
    /// Free comment: "to taste", "optional"
    Comment,
    /// Punctuation
    Punc,
    /// Anything else
    Other,
}

impl Label {
    /// Total number of distinct labels.
    pub const NUM_LABELS: usize = 9;

    /// Get all labels in index order.
    pub fn all_labels() -> &'static [Label] {
        &[
            Label::Qty,
            Label::Unit,
            Label::Size,
            Label::Name,
            Label::Prep,
            Label::Purpose,
            Label::Comment,
            Label::Punc,
            Label::Other,
        ]
    }

    /// Get the label index.
    pub fn index(&self) -> usize {
        match self {
            Label::Qty => 0,
            Label::Unit => 1,
            Label::Size => 2,
            Label::Name => 3,
            Label::Prep => 4,
            Label::Purpose => 5,
            Label::Comment => 6,
            Label::Punc => 7,
            Label::Other => 8,
        }
    }

    /// Label as spelled in model artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Qty => "QTY",
            Label::Unit => "UNIT",
            Label::Size => "SIZE",
            Label::Name => "NAME",
            Label::Prep => "PREP",
            Label::Purpose => "PURPOSE",
            Label::Comment => "COMMENT",
            Label::Punc => "PUNC",
            Label::Other => "OTHER",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = MiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all_labels()
            .iter()
            .copied()
            .find(|label| label.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MiseError::InvalidModel(format!("unknown label {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_index_order() {
        for (i, label) in Label::all_labels().iter().enumerate() {
            assert_eq!(label.index(), i);
        }
        assert_eq!(Label::all_labels().len(), Label::NUM_LABELS);
    }

    #[test]
    fn test_label_from_str() {
        assert_eq!("NAME".parse::<Label>().unwrap(), Label::Name);
        assert_eq!("prep".parse::<Label>().unwrap(), Label::Prep);
        assert!("B-TITLE".parse::<Label>().is_err());
    }

    #[test]
    fn test_label_serde_spelling() {
        assert_eq!(serde_json::to_string(&Label::Qty).unwrap(), "\"QTY\"");
        assert_eq!(
            serde_json::from_str::<Label>("\"PURPOSE\"").unwrap(),
            Label::Purpose
        );
    }
}
