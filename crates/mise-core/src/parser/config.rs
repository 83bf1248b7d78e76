use serde::{Deserialize, Serialize};

/// Options controlling how a tagged sentence is turned into a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Drop single-token stop-word groups from text fields.
    pub discard_isolated_stop_words: bool,
    /// Return units as written instead of resolved [`Unit`](crate::units::Unit)s.
    pub string_units: bool,
    /// Resolve fluid ounce, cup, pint, quart and gallon to imperial units.
    /// Ignored when `string_units` is set.
    pub imperial_units: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            discard_isolated_stop_words: true,
            string_units: false,
            imperial_units: false,
        }
    }
}

impl ParserOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether lone stop words are dropped from text fields.
    pub fn with_discard_isolated_stop_words(mut self, enabled: bool) -> Self {
        self.discard_isolated_stop_words = enabled;
        self
    }

    /// Set whether units are returned as written.
    pub fn with_string_units(mut self, enabled: bool) -> Self {
        self.string_units = enabled;
        self
    }

    /// Set whether US customary volumes resolve to imperial units.
    pub fn with_imperial_units(mut self, enabled: bool) -> Self {
        self.imperial_units = enabled;
        self
    }
}
