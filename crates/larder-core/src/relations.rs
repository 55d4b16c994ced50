//! Relationship index and delete-propagation planning
//!
//! Forward references live on the dependent record (`Recipe::category`,
//! `RecipeIngredient::recipe`, `RecipeIngredient::ingredient`). The reverse
//! direction is kept here, in an explicit index that only [`GraphState`]
//! mutates while applying writes. [`RelationshipManager`] reads the index to
//! work out the full set of writes a request implies before anything is
//! written.
//!
//! Delete policies:
//!
//! | deleted    | dependents                | policy                      |
//! |------------|---------------------------|-----------------------------|
//! | Recipe     | its RecipeIngredient rows | cascade                     |
//! | Recipe     | its Category              | nullify (category persists) |
//! | Category   | its Recipes               | nullify (`category = None`) |
//! | Ingredient | RecipeIngredient rows     | cascade (row removed)       |

use crate::error::{DomainError, Result};
use crate::ids::{CategoryId, IngredientId, RecipeId, RecipeIngredientId};
use crate::model::{Recipe, RecipeIngredient};
use crate::state::GraphState;
use crate::validator::IntegrityValidator;
use crate::write::{Write, WriteBatch};
use std::collections::{BTreeMap, BTreeSet};

/// Reverse links for every one-to-many relationship in the graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipIndex {
    category_recipes: BTreeMap<CategoryId, BTreeSet<RecipeId>>,
    recipe_lines: BTreeMap<RecipeId, BTreeSet<RecipeIngredientId>>,
    ingredient_lines: BTreeMap<IngredientId, BTreeSet<RecipeIngredientId>>,
}

fn link<K: Ord, V: Ord>(map: &mut BTreeMap<K, BTreeSet<V>>, key: K, value: V) {
    map.entry(key).or_default().insert(value);
}

fn unlink<K: Ord, V: Ord>(map: &mut BTreeMap<K, BTreeSet<V>>, key: &K, value: &V) {
    if let Some(set) = map.get_mut(key) {
        set.remove(value);
        if set.is_empty() {
            map.remove(key);
        }
    }
}

fn members<'a, K: Ord, V: Ord + Copy>(
    map: &'a BTreeMap<K, BTreeSet<V>>,
    key: &K,
) -> impl Iterator<Item = V> + 'a {
    map.get(key).into_iter().flat_map(|set| set.iter().copied())
}

impl RelationshipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the index from forward references alone
    pub fn rebuild<'a>(
        recipes: impl IntoIterator<Item = &'a Recipe>,
        lines: impl IntoIterator<Item = &'a RecipeIngredient>,
    ) -> Self {
        let mut index = Self::new();
        for recipe in recipes {
            index.file_recipe(recipe.id, None, recipe.category);
        }
        for line in lines {
            index.link_line(line);
        }
        index
    }

    /// Recipes filed under `category`
    pub fn recipes_in(&self, category: CategoryId) -> impl Iterator<Item = RecipeId> + '_ {
        members(&self.category_recipes, &category)
    }

    pub fn recipe_count(&self, category: CategoryId) -> usize {
        self.category_recipes.get(&category).map_or(0, |s| s.len())
    }

    /// Ingredient lines owned by `recipe`
    pub fn lines_of(&self, recipe: RecipeId) -> impl Iterator<Item = RecipeIngredientId> + '_ {
        members(&self.recipe_lines, &recipe)
    }

    pub fn line_count(&self, recipe: RecipeId) -> usize {
        self.recipe_lines.get(&recipe).map_or(0, |s| s.len())
    }

    /// Ingredient lines referencing `ingredient`
    pub fn usages_of(
        &self,
        ingredient: IngredientId,
    ) -> impl Iterator<Item = RecipeIngredientId> + '_ {
        members(&self.ingredient_lines, &ingredient)
    }

    pub fn usage_count(&self, ingredient: IngredientId) -> usize {
        self.ingredient_lines.get(&ingredient).map_or(0, |s| s.len())
    }

    /// Move `recipe` from one category collection to another in one step
    pub(crate) fn file_recipe(
        &mut self,
        recipe: RecipeId,
        from: Option<CategoryId>,
        to: Option<CategoryId>,
    ) {
        if let Some(old) = from {
            unlink(&mut self.category_recipes, &old, &recipe);
        }
        if let Some(new) = to {
            link(&mut self.category_recipes, new, recipe);
        }
    }

    pub(crate) fn link_line(&mut self, line: &RecipeIngredient) {
        link(&mut self.recipe_lines, line.recipe, line.id);
        link(&mut self.ingredient_lines, line.ingredient, line.id);
    }

    pub(crate) fn unlink_line(&mut self, line: &RecipeIngredient) {
        unlink(&mut self.recipe_lines, &line.recipe, &line.id);
        unlink(&mut self.ingredient_lines, &line.ingredient, &line.id);
    }
}

/// Plans the side effects of a mutation as one [`WriteBatch`]
///
/// Planning never writes. The batch it returns contains the dependents'
/// writes first and the requested write last, so applying it in order never
/// leaves a dangling reference behind.
pub struct RelationshipManager;

impl RelationshipManager {
    /// Recipe deleted: cascade its lines, leave its category to the index
    pub fn plan_remove_recipe(state: &GraphState, id: RecipeId) -> Result<WriteBatch> {
        IntegrityValidator::check_exists(state.recipes(), id)?;

        let mut batch: WriteBatch = state
            .index()
            .lines_of(id)
            .map(Write::DeleteRecipeIngredient)
            .collect();
        batch.push(Write::DeleteRecipe(id));

        tracing::debug!("Planned recipe removal {} ({} writes)", id, batch.len());
        Ok(batch)
    }

    /// Category deleted: detach every recipe filed under it
    pub fn plan_remove_category(state: &GraphState, id: CategoryId) -> Result<WriteBatch> {
        IntegrityValidator::check_exists(state.categories(), id)?;

        let mut batch = WriteBatch::new();
        for recipe_id in state.index().recipes_in(id) {
            let mut recipe = Recipe::clone(&*state.recipes().get(recipe_id)?);
            recipe.category = None;
            recipe.touch();
            batch.push(Write::PutRecipe(recipe));
        }
        batch.push(Write::DeleteCategory(id));

        tracing::debug!("Planned category removal {} ({} writes)", id, batch.len());
        Ok(batch)
    }

    /// Ingredient deleted: every line using it goes too, since a line
    /// without an ingredient is not representable
    pub fn plan_remove_ingredient(state: &GraphState, id: IngredientId) -> Result<WriteBatch> {
        IntegrityValidator::check_exists(state.ingredients(), id)?;

        let mut batch: WriteBatch = state
            .index()
            .usages_of(id)
            .map(Write::DeleteRecipeIngredient)
            .collect();
        batch.push(Write::DeleteIngredient(id));

        tracing::debug!("Planned ingredient removal {} ({} writes)", id, batch.len());
        Ok(batch)
    }

    /// Reassign (or clear) a recipe's category. Empty when nothing changes.
    pub fn plan_set_category(
        state: &GraphState,
        recipe_id: RecipeId,
        category: Option<CategoryId>,
    ) -> Result<WriteBatch> {
        let recipe = state.recipes().get(recipe_id)?;
        if let Some(category) = category {
            IntegrityValidator::check_exists(state.categories(), category)?;
        }
        if recipe.category == category {
            return Ok(WriteBatch::new());
        }

        let mut recipe = Recipe::clone(&recipe);
        recipe.category = category;
        recipe.touch();
        Ok(WriteBatch::new().with(Write::PutRecipe(recipe)))
    }

    /// New line linking `recipe` to `ingredient`
    pub fn plan_attach(
        state: &GraphState,
        recipe: RecipeId,
        ingredient: IngredientId,
        quantity: &str,
    ) -> Result<(WriteBatch, RecipeIngredientId)> {
        IntegrityValidator::check_exists(state.recipes(), recipe)?;
        IntegrityValidator::check_ingredient_reference(state.ingredients(), ingredient)?;
        IntegrityValidator::check_quantity(quantity)?;

        let line = RecipeIngredient::new(recipe, ingredient, quantity.trim());
        let id = line.id;
        Ok((WriteBatch::new().with(Write::PutRecipeIngredient(line)), id))
    }

    /// Remove one line; recipe and ingredient are untouched
    pub fn plan_detach(state: &GraphState, line: RecipeIngredientId) -> Result<WriteBatch> {
        IntegrityValidator::check_exists(state.recipe_ingredients(), line)?;
        Ok(WriteBatch::new().with(Write::DeleteRecipeIngredient(line)))
    }

    /// Change the quantity on an existing line
    pub fn plan_set_quantity(
        state: &GraphState,
        line: RecipeIngredientId,
        quantity: &str,
    ) -> Result<WriteBatch> {
        let current = state.recipe_ingredients().get(line)?;
        IntegrityValidator::check_quantity(quantity)?;

        let mut line = RecipeIngredient::clone(&current);
        line.set_quantity(quantity.trim());
        Ok(WriteBatch::new().with(Write::PutRecipeIngredient(line)))
    }
}

/// Error for a delete that would leave a dangling reference behind
pub(crate) fn missing_reference(what: &str, id: impl std::fmt::Display) -> DomainError {
    DomainError::Internal(format!("{} still referenced: {}", what, id))
}
