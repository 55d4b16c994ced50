//! Entity types held by the graph

mod category;
mod ingredient;
mod recipe;
mod recipe_ingredient;

pub use category::RecipeCategory;
pub use ingredient::Ingredient;
pub use recipe::{NewRecipe, Recipe, RecipeUpdate};
pub use recipe_ingredient::RecipeIngredient;
