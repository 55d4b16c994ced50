use crate::ids::{EntityKind, IngredientId};
use crate::store::{Named, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An ingredient, shared by any number of recipes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,

    /// Ingredient name (unique, case/diacritic-insensitive)
    pub name: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: IngredientId::new(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }
}

impl Record for Ingredient {
    type Id = IngredientId;

    const KIND: EntityKind = EntityKind::Ingredient;

    fn id(&self) -> IngredientId {
        self.id
    }
}

impl Named for Ingredient {
    fn name(&self) -> &str {
        &self.name
    }
}
