//! # Result Building
//!
//! Assembles labeled tokens into a [`ParsedIngredient`]: amounts from
//! `QTY`/`UNIT` tokens and text fields from the remaining labels.

pub mod quantity;

use std::collections::BTreeSet;

use serde::Serialize;

use crate::parser::ParserOptions;
use crate::preprocess::features::is_stop_word;
use crate::tagger::Label;
use crate::types::{IngredientAmount, IngredientText, IngredientUnit, ParsedIngredient};
use crate::units::{Unit, pluralise_unit};

use quantity::{is_proper_fraction, parse_quantity, round4};

/// Tokens that attach to the previous token without a space.
const NO_SPACE_BEFORE: &[&str] = &[",", ".", ";", ":", ")", "!", "?"];
/// Tokens that attach to the following token without a space.
const NO_SPACE_AFTER: &[&str] = &["("];

/// Builds structured output from the final tokens, labels and scores.
#[derive(Debug, Clone, Serialize)]
pub struct PostProcessor {
    pub sentence: String,
    pub tokens: Vec<String>,
    pub labels: Vec<Label>,
    pub scores: Vec<f64>,
    /// Positions whose token was written as a plural unit.
    pub singularised_indices: BTreeSet<usize>,
    pub options: ParserOptions,
    parsed: ParsedIngredient,
}

/// Token positions forming one amount.
#[derive(Debug, Default)]
struct PendingAmount {
    quantity: Vec<usize>,
    unit: Vec<usize>,
}

impl PendingAmount {
    fn last(&self) -> Option<usize> {
        self.quantity.iter().chain(&self.unit).copied().max()
    }
}

impl PostProcessor {
    /// Builds the result. `tokens`, `labels` and `scores` must have equal
    /// lengths; surplus entries of longer slices are ignored.
    ///
    /// `singularised_indices` marks unit tokens written in the plural; an
    /// amount without a quantity keeps that plural.
    pub fn new(
        sentence: &str,
        tokens: Vec<String>,
        labels: Vec<Label>,
        scores: Vec<f64>,
        singularised_indices: BTreeSet<usize>,
        options: ParserOptions,
    ) -> Self {
        let mut processor = Self {
            sentence: sentence.to_string(),
            tokens,
            labels,
            scores,
            singularised_indices,
            options,
            parsed: ParsedIngredient::new(sentence),
        };
        processor.parsed = processor.build();
        processor
    }

    /// The structured result.
    pub fn parsed(&self) -> &ParsedIngredient {
        &self.parsed
    }

    pub fn into_parsed(self) -> ParsedIngredient {
        self.parsed
    }

    fn len(&self) -> usize {
        self.tokens.len().min(self.labels.len()).min(self.scores.len())
    }

    fn build(&self) -> ParsedIngredient {
        let mut parsed = ParsedIngredient::new(self.sentence.clone());
        parsed.amount = self.amounts();
        parsed.name = self.text_field(Label::Name);
        parsed.size = self.text_field(Label::Size);
        parsed.preparation = self.text_field(Label::Prep);
        parsed.purpose = self.text_field(Label::Purpose);
        parsed.comment = self.text_field(Label::Comment);
        parsed
    }

    fn amounts(&self) -> Vec<IngredientAmount> {
        let mut amounts = Vec::new();
        let mut pending: Option<PendingAmount> = None;

        for i in 0..self.len() {
            let adjacent = pending
                .as_ref()
                .and_then(PendingAmount::last)
                .is_some_and(|last| last + 1 == i);

            match self.labels[i] {
                Label::Qty => {
                    let extends_whole_number = adjacent
                        && pending
                            .as_ref()
                            .is_some_and(|p| p.unit.is_empty() && p.quantity.len() == 1)
                        && is_proper_fraction(&self.tokens[i]);
                    if extends_whole_number {
                        if let Some(p) = pending.as_mut() {
                            p.quantity.push(i);
                        }
                    } else {
                        amounts.extend(pending.take().and_then(|p| self.amount(&p)));
                        pending = Some(PendingAmount {
                            quantity: vec![i],
                            unit: Vec::new(),
                        });
                    }
                }
                Label::Unit => {
                    if adjacent {
                        if let Some(p) = pending.as_mut() {
                            p.unit.push(i);
                        }
                    } else {
                        amounts.extend(pending.take().and_then(|p| self.amount(&p)));
                        pending = Some(PendingAmount {
                            quantity: Vec::new(),
                            unit: vec![i],
                        });
                    }
                }
                _ => amounts.extend(pending.take().and_then(|p| self.amount(&p))),
            }
        }
        amounts.extend(pending.take().and_then(|p| self.amount(&p)));

        amounts
    }

    fn amount(&self, pending: &PendingAmount) -> Option<IngredientAmount> {
        let mut quantity: Option<f64> = None;
        let mut quantity_max: Option<f64> = None;
        for &i in &pending.quantity {
            if let Some((value, max)) = parse_quantity(&self.tokens[i]) {
                quantity = Some(quantity.unwrap_or(0.0) + value);
                if max.is_some() {
                    quantity_max = max;
                }
            }
        }

        let plural = match quantity_max.or(quantity) {
            Some(q) => q > 1.0,
            None => pending
                .unit
                .last()
                .is_some_and(|i| self.singularised_indices.contains(i)),
        };
        let unit_tokens: Vec<&str> = pending.unit.iter().map(|&i| self.tokens[i].as_str()).collect();
        let unit_text = unit_tokens.join(" ");
        let display_unit = match unit_tokens.split_last() {
            Some((last, rest)) if plural => {
                let mut words: Vec<String> = rest.iter().map(|s| s.to_string()).collect();
                words.push(pluralise_unit(last));
                words.join(" ")
            }
            _ => unit_text.clone(),
        };

        let unit = (!unit_text.is_empty()).then(|| {
            if self.options.string_units {
                return IngredientUnit::Text(display_unit.clone());
            }
            Unit::lookup(&unit_text, self.options.imperial_units)
                .map(IngredientUnit::Unit)
                .unwrap_or_else(|| IngredientUnit::Text(display_unit.clone()))
        });

        let quantity_text = pending
            .quantity
            .iter()
            .map(|&i| self.tokens[i].as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let text = [quantity_text.as_str(), display_unit.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            return None;
        }

        let indices: Vec<usize> = pending.quantity.iter().chain(&pending.unit).copied().collect();
        Some(IngredientAmount {
            quantity,
            quantity_max,
            unit,
            text,
            confidence: self.mean_score(&indices),
        })
    }

    /// Consecutive runs of `label`, joined with `", "`.
    fn text_field(&self, label: Label) -> Option<IngredientText> {
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for i in (0..self.len()).filter(|&i| self.labels[i] == label) {
            let extends = groups
                .last()
                .and_then(|g| g.last())
                .is_some_and(|&last| last + 1 == i);
            if extends {
                if let Some(group) = groups.last_mut() {
                    group.push(i);
                }
            } else {
                groups.push(vec![i]);
            }
        }

        if self.options.discard_isolated_stop_words {
            groups.retain(|g| !(g.len() == 1 && is_stop_word(&self.tokens[g[0]])));
        }
        if groups.is_empty() {
            return None;
        }

        let text = groups
            .iter()
            .map(|g| join_tokens(g.iter().map(|&i| self.tokens[i].as_str())))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        let kept: Vec<usize> = groups.concat();

        Some(IngredientText::new(text, self.mean_score(&kept)))
    }

    fn mean_score(&self, indices: &[usize]) -> f64 {
        if indices.is_empty() {
            return 0.0;
        }
        let total: f64 = indices.iter().map(|&i| self.scores[i]).sum();
        round4(total / indices.len() as f64)
    }
}

/// Joins tokens with spaces, without a space before closing punctuation
/// or after an opening parenthesis.
pub fn join_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    let mut glue_next = true;
    for token in tokens {
        if !glue_next && !NO_SPACE_BEFORE.contains(&token) {
            out.push(' ');
        }
        out.push_str(token);
        glue_next = NO_SPACE_AFTER.contains(&token);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(tokens: &[&str], labels: &[Label], options: ParserOptions) -> ParsedIngredient {
        build_with_plurals(tokens, labels, BTreeSet::new(), options)
    }

    fn build_with_plurals(
        tokens: &[&str],
        labels: &[Label],
        singularised: BTreeSet<usize>,
        options: ParserOptions,
    ) -> ParsedIngredient {
        let scores = vec![0.9; tokens.len()];
        PostProcessor::new(
            &tokens.join(" "),
            tokens.iter().map(|s| s.to_string()).collect(),
            labels.to_vec(),
            scores,
            singularised,
            options,
        )
        .into_parsed()
    }

    use crate::tagger::Label::{Comment, Name, Prep, Punc, Qty};

    #[test]
    fn test_simple_sentence() {
        let parsed = build(
            &["2", "cup", "flour", ",", "sifted"],
            &[Qty, Label::Unit, Name, Punc, Prep],
            ParserOptions::default(),
        );

        assert_eq!(parsed.name.as_ref().unwrap().text, "flour");
        assert_eq!(parsed.preparation.as_ref().unwrap().text, "sifted");
        assert_eq!(parsed.amount.len(), 1);
        let amount = &parsed.amount[0];
        assert_eq!(amount.quantity, Some(2.0));
        assert_eq!(amount.unit, Some(IngredientUnit::Unit(crate::units::Unit::Cup)));
        assert_eq!(amount.text, "2 cups");
        assert_eq!(amount.confidence, 0.9);
    }

    #[test]
    fn test_mixed_fraction_and_singular_unit() {
        let parsed = build(
            &["1", "1/2", "cup", "milk"],
            &[Qty, Qty, Label::Unit, Name],
            ParserOptions::default(),
        );
        let amount = &parsed.amount[0];
        assert_eq!(amount.quantity, Some(1.5));
        assert_eq!(amount.text, "1 1/2 cups");

        let parsed = build(&["1/2", "cup", "milk"], &[Qty, Label::Unit, Name], ParserOptions::default());
        assert_eq!(parsed.amount[0].text, "1/2 cup");
    }

    #[test]
    fn test_range() {
        let parsed = build(
            &["1-2", "tsp", "salt"],
            &[Qty, Label::Unit, Name],
            ParserOptions::default(),
        );
        let amount = &parsed.amount[0];
        assert_eq!(amount.quantity, Some(1.0));
        assert_eq!(amount.quantity_max, Some(2.0));
        assert!(amount.is_range());
        assert_eq!(amount.unit, Some(IngredientUnit::Unit(crate::units::Unit::Teaspoon)));
    }

    #[test]
    fn test_string_and_imperial_units() {
        let tokens = ["2", "pint", "stock"];
        let labels = [Qty, Label::Unit, Name];

        let imperial = build(&tokens, &labels, ParserOptions::new().with_imperial_units(true));
        assert_eq!(
            imperial.amount[0].unit,
            Some(IngredientUnit::Unit(crate::units::Unit::ImperialPint))
        );

        let strings = build(
            &tokens,
            &labels,
            ParserOptions::new()
                .with_string_units(true)
                .with_imperial_units(true),
        );
        assert_eq!(
            strings.amount[0].unit,
            Some(IngredientUnit::Text("pints".into()))
        );
    }

    #[test]
    fn test_unresolved_unit_is_text() {
        let parsed = build(&["3", "clove", "garlic"], &[Qty, Label::Unit, Name], ParserOptions::default());
        assert_eq!(
            parsed.amount[0].unit,
            Some(IngredientUnit::Text("cloves".into()))
        );
    }

    #[test]
    fn test_multiple_amounts() {
        let parsed = build(
            &["1", "cup", "(", "240", "ml", ")", "water"],
            &[Qty, Label::Unit, Punc, Qty, Label::Unit, Punc, Name],
            ParserOptions::default(),
        );
        assert_eq!(parsed.amount.len(), 2);
        assert_eq!(parsed.amount[1].text, "240 ml");
        assert_eq!(parsed.name.unwrap().text, "water");
    }

    #[test]
    fn test_unit_only_amount_keeps_written_plural() {
        // "2 (14 oz) cans tomatoes"
        let tokens = ["2", "(", "14", "oz", ")", "can", "tomatoes"];
        let labels = [Qty, Punc, Qty, Label::Unit, Punc, Label::Unit, Name];

        let parsed = build_with_plurals(
            &tokens,
            &labels,
            BTreeSet::from([5]),
            ParserOptions::new().with_string_units(true),
        );
        assert_eq!(parsed.amount.len(), 3);
        assert_eq!(parsed.amount[2].quantity, None);
        assert_eq!(parsed.amount[2].text, "cans");

        let singular = build(&["can", "tomatoes"], &[Label::Unit, Name], ParserOptions::default());
        assert_eq!(singular.amount[0].text, "can");
    }

    #[test]
    fn test_isolated_stop_words() {
        let tokens = ["1", "can", "of", "tomatoes"];
        let labels = [Qty, Label::Unit, Comment, Name];

        let parsed = build(&tokens, &labels, ParserOptions::default());
        assert!(parsed.comment.is_none());

        let kept = build(
            &tokens,
            &labels,
            ParserOptions::new().with_discard_isolated_stop_words(false),
        );
        assert_eq!(kept.comment.unwrap().text, "of");
    }

    #[test]
    fn test_groups_join_with_commas() {
        let parsed = build(
            &["salt", ",", "pepper", "to", "taste"],
            &[Name, Punc, Name, Comment, Comment],
            ParserOptions::default(),
        );
        assert_eq!(parsed.name.unwrap().text, "salt, pepper");
        assert_eq!(parsed.comment.unwrap().text, "to taste");
    }

    #[test]
    fn test_empty_input() {
        let parsed = build(&[], &[], ParserOptions::default());
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_join_tokens() {
        assert_eq!(join_tokens(["finely", "chopped", ",", "divided"]), "finely chopped, divided");
        assert_eq!(join_tokens(["(", "optional", ")"]), "(optional)");
    }
}
