use std::sync::Arc;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::postprocess::PostProcessor;
use crate::preprocess::PreProcessor;
use crate::tagger::SequenceTagger;

/// Intermediate state of a single parse, for introspection.
///
/// Produced by `inspect`; never fed back into parsing.
#[derive(Debug, Clone)]
pub struct ParserDebugInfo {
    pub sentence: String,
    pub preprocessor: PreProcessor,
    pub postprocessor: PostProcessor,
    pub tagger: Arc<dyn SequenceTagger>,
}

impl Serialize for ParserDebugInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ParserDebugInfo", 4)?;
        state.serialize_field("sentence", &self.sentence)?;
        state.serialize_field("preprocessor", &self.preprocessor)?;
        state.serialize_field("postprocessor", &self.postprocessor)?;
        state.serialize_field("tagger_labels", self.tagger.labels())?;
        state.end()
    }
}
