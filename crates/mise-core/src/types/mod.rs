pub mod debug;
pub mod ingredient;

pub use debug::ParserDebugInfo;
pub use ingredient::{IngredientAmount, IngredientText, IngredientUnit, ParsedIngredient};
