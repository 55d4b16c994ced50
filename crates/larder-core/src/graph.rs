//! Flat record collections exchanged with storage backends

use crate::model::{Ingredient, Recipe, RecipeCategory, RecipeIngredient};
use serde::{Deserialize, Serialize};

/// Every record in the graph, grouped by kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub categories: Vec<RecipeCategory>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub recipe_ingredients: Vec<RecipeIngredient>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ingredients(mut self, ingredients: Vec<Ingredient>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_categories(mut self, categories: Vec<RecipeCategory>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_recipes(mut self, recipes: Vec<Recipe>) -> Self {
        self.recipes = recipes;
        self
    }

    pub fn with_recipe_ingredients(mut self, lines: Vec<RecipeIngredient>) -> Self {
        self.recipe_ingredients = lines;
        self
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
            + self.categories.len()
            + self.recipes.len()
            + self.recipe_ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_set_builder() {
        let records = RecordSet::new()
            .with_ingredients(vec![Ingredient::new("Salt")])
            .with_categories(vec![])
            .with_recipes(vec![Recipe::new("Pie")]);

        assert_eq!(records.len(), 2);
        assert!(!records.is_empty());
        assert!(RecordSet::new().is_empty());
    }
}
