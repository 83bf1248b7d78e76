//! # Parse Orchestrator
//!
//! Runs one sentence through normalization, tagging, plural restoration,
//! name recovery and result building.

pub mod config;
pub mod name_recovery;

use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{MiseError, Result};
use crate::model::ENGLISH_MODEL;
use crate::postprocess::PostProcessor;
use crate::preprocess::PreProcessor;
use crate::tagger::{Label, SequenceTagger};
use crate::types::{ParsedIngredient, ParserDebugInfo};

pub use config::ParserOptions;
pub use name_recovery::{NAME_CANDIDATE_THRESHOLD, group_consecutive, recover_name};

/// Ingredient sentence parser over a ready tagger.
#[derive(Debug, Clone)]
pub struct IngredientParser {
    tagger: Arc<dyn SequenceTagger>,
}

impl IngredientParser {
    /// Creates a parser over an already loaded tagger.
    pub fn new(tagger: Arc<dyn SequenceTagger>) -> Self {
        Self { tagger }
    }

    /// Parse an ingredient sentence.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use mise_core::model::ENGLISH_MODEL;
    /// use mise_core::{IngredientParser, ParserOptions};
    ///
    /// let tagger = ENGLISH_MODEL.ensure_ready().unwrap();
    /// let parser = IngredientParser::new(tagger);
    /// let parsed = parser.parse("2 cups flour, sifted", &ParserOptions::default()).unwrap();
    ///
    /// assert_eq!(parsed.name.unwrap().text, "flour");
    /// assert_eq!(parsed.preparation.unwrap().text, "sifted");
    /// ```
    pub fn parse(&self, sentence: &str, options: &ParserOptions) -> Result<ParsedIngredient> {
        let (_, postprocessor) = self.run(sentence, options)?;
        Ok(postprocessor.into_parsed())
    }

    /// Parse a sentence and keep every intermediate stage.
    pub fn inspect(&self, sentence: &str, options: &ParserOptions) -> Result<ParserDebugInfo> {
        let (preprocessor, postprocessor) = self.run(sentence, options)?;
        Ok(ParserDebugInfo {
            sentence: sentence.to_string(),
            preprocessor,
            postprocessor,
            tagger: Arc::clone(&self.tagger),
        })
    }

    fn run(&self, sentence: &str, options: &ParserOptions) -> Result<(PreProcessor, PostProcessor)> {
        let preprocessor = PreProcessor::new(sentence);
        let tagging = self.tagger.tag(preprocessor.sentence_features())?;

        if tagging.len() != preprocessor.len() {
            return Err(MiseError::Inference(format!(
                "tagger returned {} labels for {} tokens",
                tagging.len(),
                preprocessor.len()
            )));
        }

        let mut labels = tagging.labels().to_vec();
        let mut scores = tagging.assigned_scores();
        trace!(?labels, "tagged sentence");

        // Singularised tokens that are not units go back to their written form.
        let mut tokens = preprocessor.tokenized_sentence.clone();
        for &idx in &preprocessor.singularised_indices {
            if labels[idx] != Label::Unit {
                tokens[idx].clone_from(&preprocessor.tokens[idx].text);
            }
        }

        let recovered = !labels.is_empty() && !labels.contains(&Label::Name);
        if recovered {
            (labels, scores) = recover_name(labels, scores, &tagging.label_scores(Label::Name));
        }

        debug!(
            tokens = preprocessor.len(),
            name_recovery = recovered,
            "parsed ingredient sentence"
        );

        let postprocessor = PostProcessor::new(
            sentence,
            tokens,
            labels,
            scores,
            preprocessor.singularised_indices.clone(),
            *options,
        );
        Ok((preprocessor, postprocessor))
    }
}

/// Parse an ingredient sentence with the process-wide English model.
pub fn parse_ingredient(sentence: &str, options: &ParserOptions) -> Result<ParsedIngredient> {
    let tagger = ENGLISH_MODEL.ensure_ready()?;
    IngredientParser::new(tagger).parse(sentence, options)
}

/// Parse with the process-wide English model and return every stage.
pub fn inspect_parser(sentence: &str, options: &ParserOptions) -> Result<ParserDebugInfo> {
    let tagger = ENGLISH_MODEL.ensure_ready()?;
    IngredientParser::new(tagger).inspect(sentence, options)
}
