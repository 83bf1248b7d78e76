//! # Units of Measure
//!
//! Plural/singular unit spellings used by the normalizer and result
//! builder, and resolution of unit text to a [`Unit`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Plural spelling to singular spelling.
const UNIT_PLURALS: &[(&str, &str)] = &[
    ("bags", "bag"),
    ("bars", "bar"),
    ("bottles", "bottle"),
    ("boxes", "box"),
    ("bunches", "bunch"),
    ("cans", "can"),
    ("cloves", "clove"),
    ("cubes", "cube"),
    ("cups", "cup"),
    ("dashes", "dash"),
    ("drops", "drop"),
    ("fillets", "fillet"),
    ("gallons", "gallon"),
    ("grams", "gram"),
    ("handfuls", "handful"),
    ("heads", "head"),
    ("jars", "jar"),
    ("kilograms", "kilogram"),
    ("kilos", "kilo"),
    ("leaves", "leaf"),
    ("lbs", "lb"),
    ("liters", "liter"),
    ("litres", "litre"),
    ("milliliters", "milliliter"),
    ("millilitres", "millilitre"),
    ("ounces", "ounce"),
    ("packages", "package"),
    ("packets", "packet"),
    ("pieces", "piece"),
    ("pinches", "pinch"),
    ("pints", "pint"),
    ("pounds", "pound"),
    ("quarts", "quart"),
    ("sachets", "sachet"),
    ("sheets", "sheet"),
    ("slices", "slice"),
    ("sprigs", "sprig"),
    ("stalks", "stalk"),
    ("sticks", "stick"),
    ("tablespoons", "tablespoon"),
    ("tbsps", "tbsp"),
    ("teaspoons", "teaspoon"),
    ("tins", "tin"),
    ("tsps", "tsp"),
];

/// Singular spellings that are units but have no entry in [`UNIT_PLURALS`]
/// because they do not change in the plural.
const INVARIANT_UNITS: &[&str] = &[
    "c", "cl", "dl", "fl", "g", "gr", "kg", "l", "mg", "ml", "oz", "pt", "qt", "t", "tbs",
];

/// Singular form of a plural unit spelling, if `token` is one.
///
/// Matching is case-insensitive; the result is lower case.
pub fn singularise_unit(token: &str) -> Option<&'static str> {
    let lower = token.to_lowercase();
    UNIT_PLURALS
        .iter()
        .find(|(plural, _)| *plural == lower)
        .map(|(_, singular)| *singular)
}

/// Plural form of a singular unit spelling. Tokens that are not known
/// singular units are returned unchanged.
pub fn pluralise_unit(token: &str) -> String {
    let lower = token.to_lowercase();
    UNIT_PLURALS
        .iter()
        .find(|(_, singular)| *singular == lower)
        .map(|(plural, _)| (*plural).to_string())
        .unwrap_or_else(|| token.to_string())
}

/// Returns `true` if `token` is a unit spelling, singular or plural.
pub fn is_unit(token: &str) -> bool {
    let lower = token.to_lowercase();
    INVARIANT_UNITS.contains(&lower.as_str())
        || lower == "fluid"
        || UNIT_PLURALS
            .iter()
            .any(|(plural, singular)| *plural == lower || *singular == lower)
}

/// A resolved unit of measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Teaspoon,
    Tablespoon,
    FluidOunce,
    Cup,
    Pint,
    Quart,
    Gallon,
    ImperialFluidOunce,
    ImperialCup,
    ImperialPint,
    ImperialQuart,
    ImperialGallon,
    Milliliter,
    Centiliter,
    Deciliter,
    Liter,
    Milligram,
    Gram,
    Kilogram,
    Ounce,
    Pound,
}

impl Unit {
    /// Resolves singular unit text such as `"cup"`, `"tbsp"` or
    /// `"fluid ounce"`.
    ///
    /// With `imperial` set, fluid ounce, cup, pint, quart and gallon resolve
    /// to their imperial variants instead of US customary ones.
    pub fn lookup(text: &str, imperial: bool) -> Option<Self> {
        let normalized = text
            .to_lowercase()
            .replace('.', "")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let unit = match normalized.as_str() {
            "teaspoon" | "tsp" | "t" => Self::Teaspoon,
            "tablespoon" | "tbsp" | "tbs" | "tbl" => Self::Tablespoon,
            "fluid ounce" | "fl oz" | "floz" => Self::FluidOunce,
            "cup" | "c" => Self::Cup,
            "pint" | "pt" => Self::Pint,
            "quart" | "qt" => Self::Quart,
            "gallon" | "gal" => Self::Gallon,
            "milliliter" | "millilitre" | "ml" => Self::Milliliter,
            "centiliter" | "centilitre" | "cl" => Self::Centiliter,
            "deciliter" | "decilitre" | "dl" => Self::Deciliter,
            "liter" | "litre" | "l" => Self::Liter,
            "milligram" | "mg" => Self::Milligram,
            "gram" | "g" | "gr" => Self::Gram,
            "kilogram" | "kilo" | "kg" => Self::Kilogram,
            "ounce" | "oz" => Self::Ounce,
            "pound" | "lb" => Self::Pound,
            _ => return None,
        };
        Some(if imperial { unit.to_imperial() } else { unit })
    }

    /// Imperial variant of a US customary volume unit; other units are
    /// returned unchanged.
    pub fn to_imperial(self) -> Self {
        match self {
            Self::FluidOunce => Self::ImperialFluidOunce,
            Self::Cup => Self::ImperialCup,
            Self::Pint => Self::ImperialPint,
            Self::Quart => Self::ImperialQuart,
            Self::Gallon => Self::ImperialGallon,
            other => other,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Teaspoon => "teaspoon",
            Self::Tablespoon => "tablespoon",
            Self::FluidOunce => "fluid_ounce",
            Self::Cup => "cup",
            Self::Pint => "pint",
            Self::Quart => "quart",
            Self::Gallon => "gallon",
            Self::ImperialFluidOunce => "imperial_fluid_ounce",
            Self::ImperialCup => "imperial_cup",
            Self::ImperialPint => "imperial_pint",
            Self::ImperialQuart => "imperial_quart",
            Self::ImperialGallon => "imperial_gallon",
            Self::Milliliter => "milliliter",
            Self::Centiliter => "centiliter",
            Self::Deciliter => "deciliter",
            Self::Liter => "liter",
            Self::Milligram => "milligram",
            Self::Gram => "gram",
            Self::Kilogram => "kilogram",
            Self::Ounce => "ounce",
            Self::Pound => "pound",
        };
        f.write_str(name)
    }
}
