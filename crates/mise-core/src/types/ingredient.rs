use std::fmt;

use serde::{Deserialize, Serialize};

use crate::units::Unit;

/// A text field of a parsed ingredient with the model's confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientText {
    pub text: String,
    /// Mean marginal of the tokens forming `text`, in `[0.0, 1.0]`.
    pub confidence: f64,
}

impl IngredientText {
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

impl fmt::Display for IngredientText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Unit of an amount: resolved where possible, otherwise the text as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngredientUnit {
    Unit(Unit),
    Text(String),
}

impl fmt::Display for IngredientUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit(unit) => write!(f, "{unit}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// One quantity/unit pair from an ingredient sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientAmount {
    /// Quantity, or the lower bound of a range.
    pub quantity: Option<f64>,
    /// Upper bound of a range such as "1-2".
    pub quantity_max: Option<f64>,
    pub unit: Option<IngredientUnit>,
    /// Amount as text, e.g. "2 cups".
    pub text: String,
    pub confidence: f64,
}

impl IngredientAmount {
    /// Returns `true` if the amount is a range.
    #[must_use]
    pub fn is_range(&self) -> bool {
        matches!((self.quantity, self.quantity_max), (Some(lo), Some(hi)) if hi > lo)
    }
}

impl fmt::Display for IngredientAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// The primary output of the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedIngredient {
    /// Original input sentence.
    pub sentence: String,
    pub name: Option<IngredientText>,
    pub size: Option<IngredientText>,
    pub amount: Vec<IngredientAmount>,
    pub preparation: Option<IngredientText>,
    pub purpose: Option<IngredientText>,
    pub comment: Option<IngredientText>,
}

impl ParsedIngredient {
    /// Creates an empty result for `sentence`.
    #[must_use]
    pub fn new(sentence: impl Into<String>) -> Self {
        Self {
            sentence: sentence.into(),
            name: None,
            size: None,
            amount: Vec::new(),
            preparation: None,
            purpose: None,
            comment: None,
        }
    }

    /// Returns `true` if a name was extracted.
    #[must_use]
    pub fn has_name(&self) -> bool {
        self.name.is_some()
    }

    /// Returns `true` if nothing at all was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.size.is_none()
            && self.amount.is_empty()
            && self.preparation.is_none()
            && self.purpose.is_none()
            && self.comment.is_none()
    }
}

impl fmt::Display for ParsedIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParsedIngredient(")?;
        let mut sep = "";
        if let Some(ref name) = self.name {
            write!(f, "name={:?}", name.text)?;
            sep = ", ";
        }
        if !self.amount.is_empty() {
            let amounts: Vec<&str> = self.amount.iter().map(|a| a.text.as_str()).collect();
            write!(f, "{sep}amount={:?}", amounts.join(", "))?;
            sep = ", ";
        }
        if let Some(ref size) = self.size {
            write!(f, "{sep}size={:?}", size.text)?;
            sep = ", ";
        }
        if let Some(ref prep) = self.preparation {
            write!(f, "{sep}preparation={:?}", prep.text)?;
            sep = ", ";
        }
        if let Some(ref purpose) = self.purpose {
            write!(f, "{sep}purpose={:?}", purpose.text)?;
            sep = ", ";
        }
        if let Some(ref comment) = self.comment {
            write!(f, "{sep}comment={:?}", comment.text)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_parsed_ingredient_is_empty() {
        let parsed = ParsedIngredient::new("salt");
        assert_eq!(parsed.sentence, "salt");
        assert!(parsed.is_empty());
        assert!(!parsed.has_name());
    }

    #[test]
    fn amount_is_range() {
        let mut amount = IngredientAmount {
            quantity: Some(1.0),
            quantity_max: Some(2.0),
            unit: Some(IngredientUnit::Unit(Unit::Teaspoon)),
            text: "1-2 teaspoons".into(),
            confidence: 0.9,
        };
        assert!(amount.is_range());
        amount.quantity_max = Some(1.0);
        assert!(!amount.is_range());
    }

    #[test]
    fn parsed_ingredient_display() {
        let mut parsed = ParsedIngredient::new("2 cups flour, sifted");
        parsed.name = Some(IngredientText::new("flour", 0.9));
        parsed.preparation = Some(IngredientText::new("sifted", 0.8));
        parsed.amount.push(IngredientAmount {
            quantity: Some(2.0),
            quantity_max: None,
            unit: Some(IngredientUnit::Unit(Unit::Cup)),
            text: "2 cups".into(),
            confidence: 0.95,
        });

        assert_eq!(
            parsed.to_string(),
            r#"ParsedIngredient(name="flour", amount="2 cups", preparation="sifted")"#
        );
    }

    #[test]
    fn parsed_ingredient_serialization_roundtrip() {
        let mut parsed = ParsedIngredient::new("1 pint milk");
        parsed.name = Some(IngredientText::new("milk", 0.97));
        parsed.amount.push(IngredientAmount {
            quantity: Some(1.0),
            quantity_max: None,
            unit: Some(IngredientUnit::Unit(Unit::ImperialPint)),
            text: "1 pint".into(),
            confidence: 0.99,
        });

        let json = serde_json::to_string_pretty(&parsed).unwrap();
        assert!(json.contains("imperial_pint"));
        let back: ParsedIngredient = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, back);
    }
}
