//! Larder Core - Integrity-preserving object graph for recipes
//!
//! This crate provides the entity types, the per-kind entity stores, the
//! relationship index with its delete policies, and the integrity validator
//! that the graph facade composes into transactions.

pub mod change;
pub mod collation;
pub mod error;
pub mod graph;
pub mod ids;
pub mod limits;
pub mod model;
pub mod query;
pub mod relations;
pub mod state;
pub mod store;
pub mod validator;
pub mod write;

pub use change::ChangeSet;
pub use error::{DomainError, ReferenceError, Result, ValidationError};
pub use graph::RecordSet;
pub use ids::{CategoryId, EntityKind, EntityRef, IngredientId, RecipeId, RecipeIngredientId};
pub use model::{
    Ingredient, NewRecipe, Recipe, RecipeCategory, RecipeIngredient, RecipeUpdate,
};
pub use query::{NameFilter, Pagination, PaginationInfo, SearchMode, SearchQuery};
pub use relations::{RelationshipIndex, RelationshipManager};
pub use state::{GraphState, Inconsistency};
pub use store::{EntityStore, Named, Record, Scan};
pub use validator::IntegrityValidator;
pub use write::{Write, WriteBatch};
