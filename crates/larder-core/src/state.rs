//! The complete in-memory graph: four entity stores plus the relationship index

use crate::change::ChangeSet;
use crate::error::{DomainError, ReferenceError, Result};
use crate::graph::RecordSet;
use crate::ids::{CategoryId, IngredientId, RecipeId, RecipeIngredientId};
use crate::model::{Ingredient, Recipe, RecipeCategory, RecipeIngredient};
use crate::relations::{missing_reference, RelationshipIndex};
use crate::store::{EntityStore, Record};
use crate::write::{Write, WriteBatch};
use std::sync::Arc;
use thiserror::Error;

/// One consistent version of the graph
///
/// Cloning is cheap (the stores are copy-on-write), which is what lets
/// readers hold a snapshot while a writer prepares the next version.
#[derive(Debug, Clone, Default)]
pub struct GraphState {
    ingredients: EntityStore<Ingredient>,
    categories: EntityStore<RecipeCategory>,
    recipes: EntityStore<Recipe>,
    recipe_ingredients: EntityStore<RecipeIngredient>,
    index: RelationshipIndex,
}

/// A violated relationship invariant
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Inconsistency {
    #[error("recipe {recipe} references missing category {category}")]
    MissingCategory {
        recipe: RecipeId,
        category: CategoryId,
    },

    #[error("recipe ingredient {line} references missing recipe {recipe}")]
    MissingRecipe {
        line: RecipeIngredientId,
        recipe: RecipeId,
    },

    #[error("recipe ingredient {line} references missing ingredient {ingredient}")]
    MissingIngredient {
        line: RecipeIngredientId,
        ingredient: IngredientId,
    },

    #[error("relationship index disagrees with record references")]
    StaleIndex,
}

impl GraphState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from loaded records and derive the index
    pub fn from_records(records: RecordSet) -> Result<Self> {
        let ingredients = EntityStore::from_records(records.ingredients)?;
        let categories = EntityStore::from_records(records.categories)?;
        let recipes = EntityStore::from_records(records.recipes)?;
        let recipe_ingredients = EntityStore::from_records(records.recipe_ingredients)?;

        let index = derive_index(&recipes, &recipe_ingredients);

        Ok(Self {
            ingredients,
            categories,
            recipes,
            recipe_ingredients,
            index,
        })
    }

    /// Every record, for export or persistence
    pub fn to_records(&self) -> RecordSet {
        RecordSet {
            ingredients: self.ingredients.all().iter().map(|r| Ingredient::clone(&r)).collect(),
            categories: self
                .categories
                .all()
                .iter()
                .map(|r| RecipeCategory::clone(&r))
                .collect(),
            recipes: self.recipes.all().iter().map(|r| Recipe::clone(&r)).collect(),
            recipe_ingredients: self
                .recipe_ingredients
                .all()
                .iter()
                .map(|r| RecipeIngredient::clone(&r))
                .collect(),
        }
    }

    pub fn ingredients(&self) -> &EntityStore<Ingredient> {
        &self.ingredients
    }

    pub fn categories(&self) -> &EntityStore<RecipeCategory> {
        &self.categories
    }

    pub fn recipes(&self) -> &EntityStore<Recipe> {
        &self.recipes
    }

    pub fn recipe_ingredients(&self) -> &EntityStore<RecipeIngredient> {
        &self.recipe_ingredients
    }

    pub fn index(&self) -> &RelationshipIndex {
        &self.index
    }

    /// Lines of a recipe, oldest first
    pub fn lines_of(&self, recipe: RecipeId) -> Vec<Arc<RecipeIngredient>> {
        let mut lines: Vec<_> = self
            .index
            .lines_of(recipe)
            .filter_map(|id| self.recipe_ingredients.find(id).cloned())
            .collect();
        lines.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        lines
    }

    /// Recipes filed under a category
    pub fn recipes_in(&self, category: CategoryId) -> Vec<Arc<Recipe>> {
        self.index
            .recipes_in(category)
            .filter_map(|id| self.recipes.find(id).cloned())
            .collect()
    }

    /// Apply every write in order
    pub fn apply_batch(&mut self, batch: &WriteBatch) -> Result<ChangeSet> {
        let mut changes = ChangeSet::new();
        for write in batch {
            self.apply(write, &mut changes)?;
        }
        Ok(changes)
    }

    /// Apply one write, keeping the index in step and recording what changed.
    /// Writes that would break a reference are refused.
    pub fn apply(&mut self, write: &Write, changes: &mut ChangeSet) -> Result<()> {
        match write {
            Write::PutIngredient(ingredient) => {
                match self.ingredients.put(ingredient.clone()) {
                    Some(_) => changes.record_updated(ingredient.id),
                    None => changes.record_created(ingredient.id),
                }
            }
            Write::DeleteIngredient(id) => {
                if self.index.usage_count(*id) > 0 {
                    return Err(missing_reference("ingredient", id));
                }
                self.ingredients.delete(*id)?;
                changes.record_removed(*id);
            }
            Write::PutCategory(category) => match self.categories.put(category.clone()) {
                Some(_) => changes.record_updated(category.id),
                None => changes.record_created(category.id),
            },
            Write::DeleteCategory(id) => {
                if self.index.recipe_count(*id) > 0 {
                    return Err(missing_reference("category", id));
                }
                self.categories.delete(*id)?;
                changes.record_removed(*id);
            }
            Write::PutRecipe(recipe) => {
                if let Some(category) = recipe.category {
                    if !self.categories.contains(category) {
                        return Err(DomainError::not_found(RecipeCategory::KIND, category));
                    }
                }
                let previous = self.recipes.put(recipe.clone());
                let old_category = previous.as_ref().and_then(|p| p.category);
                if old_category != recipe.category {
                    self.index.file_recipe(recipe.id, old_category, recipe.category);
                    for category in [old_category, recipe.category].into_iter().flatten() {
                        changes.record_updated(category);
                    }
                }
                match previous {
                    Some(_) => changes.record_updated(recipe.id),
                    None => changes.record_created(recipe.id),
                }
            }
            Write::DeleteRecipe(id) => {
                if self.index.line_count(*id) > 0 {
                    return Err(missing_reference("recipe", id));
                }
                let recipe = self.recipes.get(*id)?;
                self.recipes.delete(*id)?;
                if let Some(category) = recipe.category {
                    self.index.file_recipe(*id, Some(category), None);
                    changes.record_updated(category);
                }
                changes.record_removed(*id);
            }
            Write::PutRecipeIngredient(line) => {
                if !self.recipes.contains(line.recipe) {
                    return Err(DomainError::not_found(Recipe::KIND, line.recipe));
                }
                if !self.ingredients.contains(line.ingredient) {
                    return Err(ReferenceError::DanglingIngredient(line.ingredient.to_string()).into());
                }
                let previous = self.recipe_ingredients.put(line.clone());
                if let Some(previous) = &previous {
                    self.index.unlink_line(previous);
                    if previous.recipe != line.recipe || previous.ingredient != line.ingredient {
                        changes.record_updated(previous.recipe);
                        changes.record_updated(previous.ingredient);
                    }
                }
                self.index.link_line(line);
                if previous.is_none() {
                    changes.record_updated(line.recipe);
                    changes.record_updated(line.ingredient);
                    changes.record_created(line.id);
                } else {
                    changes.record_updated(line.id);
                }
            }
            Write::DeleteRecipeIngredient(id) => {
                let line = self.recipe_ingredients.get(*id)?;
                self.recipe_ingredients.delete(*id)?;
                self.index.unlink_line(&line);
                changes.record_updated(line.recipe);
                changes.record_updated(line.ingredient);
                changes.record_removed(*id);
            }
        }
        Ok(())
    }

    /// Check every bidirectional and existence invariant. Empty means consistent.
    pub fn check_consistency(&self) -> Vec<Inconsistency> {
        let mut problems = Vec::new();

        for recipe in self.recipes.all().iter() {
            if let Some(category) = recipe.category {
                if !self.categories.contains(category) {
                    problems.push(Inconsistency::MissingCategory {
                        recipe: recipe.id,
                        category,
                    });
                }
            }
        }

        for line in self.recipe_ingredients.all().iter() {
            if !self.recipes.contains(line.recipe) {
                problems.push(Inconsistency::MissingRecipe {
                    line: line.id,
                    recipe: line.recipe,
                });
            }
            if !self.ingredients.contains(line.ingredient) {
                problems.push(Inconsistency::MissingIngredient {
                    line: line.id,
                    ingredient: line.ingredient,
                });
            }
        }

        if derive_index(&self.recipes, &self.recipe_ingredients) != self.index {
            problems.push(Inconsistency::StaleIndex);
        }

        problems
    }

    pub fn is_consistent(&self) -> bool {
        self.check_consistency().is_empty()
    }
}

fn derive_index(
    recipes: &EntityStore<Recipe>,
    lines: &EntityStore<RecipeIngredient>,
) -> RelationshipIndex {
    let recipes: Vec<Arc<Recipe>> = recipes.all().iter().collect();
    let lines: Vec<Arc<RecipeIngredient>> = lines.all().iter().collect();
    RelationshipIndex::rebuild(recipes.iter().map(|r| &**r), lines.iter().map(|l| &**l))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::EntityRef;

    fn seeded() -> (GraphState, RecipeCategory, Ingredient, Recipe, RecipeIngredient) {
        let category = RecipeCategory::new("Dessert");
        let ingredient = Ingredient::new("Mascarpone");
        let mut recipe = Recipe::new("Tiramisu");
        recipe.category = Some(category.id);
        let line = RecipeIngredient::new(recipe.id, ingredient.id, "250g");

        let mut state = GraphState::new();
        state
            .apply_batch(
                &[
                    Write::PutCategory(category.clone()),
                    Write::PutIngredient(ingredient.clone()),
                    Write::PutRecipe(recipe.clone()),
                    Write::PutRecipeIngredient(line.clone()),
                ]
                .into_iter()
                .collect(),
            )
            .unwrap();
        (state, category, ingredient, recipe, line)
    }

    #[test]
    fn test_apply_keeps_index_in_step() {
        let (state, category, ingredient, recipe, line) = seeded();

        assert_eq!(state.recipes_in(category.id)[0].id, recipe.id);
        assert_eq!(state.lines_of(recipe.id)[0].id, line.id);
        assert_eq!(state.index().usage_count(ingredient.id), 1);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_apply_reports_propagated_changes() {
        let (mut state, category, _, recipe, line) = seeded();

        let changes = state
            .apply_batch(
                &[Write::DeleteRecipeIngredient(line.id), Write::DeleteRecipe(recipe.id)]
                    .into_iter()
                    .collect(),
            )
            .unwrap();

        assert!(changes.removed.contains(&EntityRef::Recipe(recipe.id)));
        assert!(changes.removed.contains(&EntityRef::RecipeIngredient(line.id)));
        assert!(changes.updated.contains(&EntityRef::Category(category.id)));
        assert!(!changes.updated.contains(&EntityRef::Recipe(recipe.id)));
        assert_eq!(state.index().recipe_count(category.id), 0);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_apply_refuses_dangling_writes() {
        let (mut state, category, ingredient, recipe, _) = seeded();
        let mut changes = ChangeSet::new();

        assert!(state.apply(&Write::DeleteCategory(category.id), &mut changes).is_err());
        assert!(state.apply(&Write::DeleteRecipe(recipe.id), &mut changes).is_err());
        assert!(state.apply(&Write::DeleteIngredient(ingredient.id), &mut changes).is_err());

        let orphan = RecipeIngredient::new(recipe.id, IngredientId::new(), "1");
        let err = state
            .apply(&Write::PutRecipeIngredient(orphan), &mut changes)
            .unwrap_err();
        assert!(matches!(err, DomainError::Reference(_)));
        assert!(state.is_consistent());
    }

    #[test]
    fn test_records_roundtrip_rebuilds_index() {
        let (state, category, _, _, _) = seeded();
        let rebuilt = GraphState::from_records(state.to_records()).unwrap();

        assert_eq!(rebuilt.index(), state.index());
        assert_eq!(rebuilt.index().recipe_count(category.id), 1);
    }

    #[test]
    fn test_consistency_detects_missing_category() {
        let mut recipe = Recipe::new("Orphan");
        let category = CategoryId::new();
        recipe.category = Some(category);
        let records = RecordSet::new().with_recipes(vec![recipe.clone()]);

        let state = GraphState::from_records(records).unwrap();
        assert!(state.check_consistency().contains(&Inconsistency::MissingCategory {
            recipe: recipe.id,
            category,
        }));
    }
}
