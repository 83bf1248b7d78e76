//! # Ingredient Sentence Tokenizer
//!
//! Splits a cleaned ingredient sentence into number, word and punctuation
//! tokens for sequence labeling.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Numbers (with fractions, decimals and ranges), words (with internal
/// apostrophes or hyphens), or a single punctuation character.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:[./]\d+)?(?:-\d+(?:[./]\d+)?)?|[^\W\d_]+(?:['’-][^\W\d_]+)*|[^\w\s]")
        .unwrap()
});

/// A token extracted from a sentence with positional information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The token text content
    pub text: String,
    /// Start byte offset in the cleaned sentence
    pub start: usize,
    /// End byte offset in the cleaned sentence
    pub end: usize,
    /// Token index in the sequence
    pub index: usize,
}

/// Tokenizer for ingredient sentences.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Create a new tokenizer instance.
    pub fn new() -> Self {
        Self
    }

    /// Tokenize a cleaned sentence into a sequence of tokens.
    ///
    /// # Examples
    /// ```
    /// use mise_core::preprocess::Tokenizer;
    ///
    /// let tokens = Tokenizer::new().tokenize("2 cups flour, sifted");
    /// let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    /// assert_eq!(texts, ["2", "cups", "flour", ",", "sifted"]);
    /// ```
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        TOKEN_RE
            .find_iter(input)
            .enumerate()
            .map(|(index, m)| Token {
                text: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
                index,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        Tokenizer::new()
            .tokenize(input)
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_tokenize_basic() {
        let tokens = Tokenizer::new().tokenize("2 cups flour, sifted");

        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[1].text, "cups");
        assert_eq!(tokens[1].start, 2);
        assert_eq!(tokens[1].end, 6);
        assert_eq!(tokens[3].text, ",");
        assert_eq!(tokens[4].index, 4);
    }

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(texts("1 1/2 cups"), ["1", "1/2", "cups"]);
        assert_eq!(texts("2.5 kg"), ["2.5", "kg"]);
        assert_eq!(texts("1-2 tsp"), ["1-2", "tsp"]);
    }

    #[test]
    fn test_tokenize_hyphenated_words_and_parens() {
        assert_eq!(
            texts("1 cup all-purpose flour (optional)"),
            ["1", "cup", "all-purpose", "flour", "(", "optional", ")"]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(texts("").is_empty());
        assert!(texts("   ").is_empty());
    }
}
