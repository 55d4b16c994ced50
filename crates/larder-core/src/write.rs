//! Store writes planned by one transaction

use crate::ids::{CategoryId, EntityRef, IngredientId, RecipeId, RecipeIngredientId};
use crate::model::{Ingredient, Recipe, RecipeCategory, RecipeIngredient};
use serde::{Deserialize, Serialize};

/// A single record write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "record", rename_all = "snake_case")]
pub enum Write {
    PutIngredient(Ingredient),
    DeleteIngredient(IngredientId),
    PutCategory(RecipeCategory),
    DeleteCategory(CategoryId),
    PutRecipe(Recipe),
    DeleteRecipe(RecipeId),
    PutRecipeIngredient(RecipeIngredient),
    DeleteRecipeIngredient(RecipeIngredientId),
}

impl Write {
    /// The record this write targets
    pub fn target(&self) -> EntityRef {
        match self {
            Self::PutIngredient(i) => i.id.into(),
            Self::DeleteIngredient(id) => (*id).into(),
            Self::PutCategory(c) => c.id.into(),
            Self::DeleteCategory(id) => (*id).into(),
            Self::PutRecipe(r) => r.id.into(),
            Self::DeleteRecipe(id) => (*id).into(),
            Self::PutRecipeIngredient(ri) => ri.id.into(),
            Self::DeleteRecipeIngredient(id) => (*id).into(),
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(
            self,
            Self::DeleteIngredient(_)
                | Self::DeleteCategory(_)
                | Self::DeleteRecipe(_)
                | Self::DeleteRecipeIngredient(_)
        )
    }
}

/// Ordered list of writes committed together or not at all
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteBatch {
    writes: Vec<Write>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, write: Write) {
        self.writes.push(write);
    }

    pub fn extend(&mut self, other: WriteBatch) {
        self.writes.extend(other.writes);
    }

    pub fn with(mut self, write: Write) -> Self {
        self.push(write);
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Write> {
        self.writes.iter()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

impl<'a> IntoIterator for &'a WriteBatch {
    type Item = &'a Write;
    type IntoIter = std::slice::Iter<'a, Write>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.iter()
    }
}

impl FromIterator<Write> for WriteBatch {
    fn from_iter<I: IntoIterator<Item = Write>>(iter: I) -> Self {
        Self {
            writes: iter.into_iter().collect(),
        }
    }
}
