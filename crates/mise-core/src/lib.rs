//! # Mise Core
//!
//! Parses recipe ingredient sentences into structured data. A linear-chain
//! CRF labels each token, a name heuristic repairs sentences where the model
//! found no ingredient name, and the labels are assembled into amounts and
//! text fields.
//!
//! ## Quick Start
//!
//! ```rust
//! use mise_core::{ParserOptions, parse_ingredient};
//!
//! let parsed = parse_ingredient("2 cups flour, sifted", &ParserOptions::default()).unwrap();
//!
//! assert_eq!(parsed.name.unwrap().text, "flour");
//! assert_eq!(parsed.amount[0].text, "2 cups");
//! ```
pub mod error;
pub mod model;
pub mod parser;
pub mod postprocess;
pub mod preprocess;
pub mod tagger;
pub mod types;
pub mod units;

// Re-export primary API
pub use error::{MiseError, Result};
pub use model::{ENGLISH_MODEL, ModelManager, ModelSource, ModelStatus};
pub use parser::{IngredientParser, ParserOptions, inspect_parser, parse_ingredient};
pub use postprocess::PostProcessor;
pub use preprocess::PreProcessor;
pub use tagger::{CrfTagger, FeatureSet, Label, LoadTagger, SequenceTagger, Tagging};
pub use types::{IngredientAmount, IngredientText, IngredientUnit, ParsedIngredient, ParserDebugInfo};
pub use units::Unit;
