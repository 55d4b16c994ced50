//! Larder Graph - The single entry point for reading and mutating recipes
//!
//! [`RecipeGraph`] composes the core stores, relationship planning and
//! validation into all-or-nothing transactions over a storage backend, and
//! publishes a [`ChangeSet`](larder_core::ChangeSet) after every commit.

mod details;
mod facade;
mod listing;
mod notify;

pub use details::{IngredientLine, IngredientUsage, RecipeDetails};
pub use facade::RecipeGraph;
pub use listing::Listing;
pub use notify::ChangeNotifier;
