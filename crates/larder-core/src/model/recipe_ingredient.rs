use crate::ids::{EntityKind, IngredientId, RecipeId, RecipeIngredientId};
use crate::store::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Join entity linking a recipe to one of its ingredients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: RecipeIngredientId,

    /// Owning recipe; the row is deleted with it
    pub recipe: RecipeId,

    /// Referenced ingredient; always present
    pub ingredient: IngredientId,

    /// Free-form amount, e.g. "250g" or "2 tbsp"
    pub quantity: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecipeIngredient {
    pub fn new(recipe: RecipeId, ingredient: IngredientId, quantity: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: RecipeIngredientId::new(),
            recipe,
            ingredient,
            quantity: quantity.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_quantity(&mut self, quantity: impl Into<String>) {
        self.quantity = quantity.into();
        self.updated_at = Utc::now();
    }
}

impl Record for RecipeIngredient {
    type Id = RecipeIngredientId;

    const KIND: EntityKind = EntityKind::RecipeIngredient;

    fn id(&self) -> RecipeIngredientId {
        self.id
    }
}
