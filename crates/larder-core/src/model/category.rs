use crate::ids::{CategoryId, EntityKind};
use crate::store::{Named, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recipe category. The recipes filed under it are tracked by the
/// relationship index, not by the category itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeCategory {
    pub id: CategoryId,

    /// Category name (unique, case/diacritic-insensitive)
    pub name: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecipeCategory {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
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

impl Record for RecipeCategory {
    type Id = CategoryId;

    const KIND: EntityKind = EntityKind::Category;

    fn id(&self) -> CategoryId {
        self.id
    }
}

impl Named for RecipeCategory {
    fn name(&self) -> &str {
        &self.name
    }
}
