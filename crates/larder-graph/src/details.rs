//! Read models that resolve references across entity kinds

use larder_core::{
    GraphState, Ingredient, IngredientId, Recipe, RecipeCategory, RecipeId, RecipeIngredient,
    Result,
};
use serde::Serialize;
use std::sync::Arc;

/// One ingredient line of a recipe with its ingredient resolved
#[derive(Debug, Clone, Serialize)]
pub struct IngredientLine {
    pub line: Arc<RecipeIngredient>,
    pub ingredient: Arc<Ingredient>,
}

/// A recipe together with its category and ingredient lines
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetails {
    pub recipe: Arc<Recipe>,
    pub category: Option<Arc<RecipeCategory>>,
    pub lines: Vec<IngredientLine>,
}

impl RecipeDetails {
    pub(crate) fn resolve(state: &GraphState, id: RecipeId) -> Result<Self> {
        let recipe = state.recipes().get(id)?;
        let category = match recipe.category {
            Some(category) => Some(state.categories().get(category)?),
            None => None,
        };

        let lines = state
            .lines_of(id)
            .into_iter()
            .map(|line| {
                let ingredient = state.ingredients().get(line.ingredient)?;
                Ok(IngredientLine { line, ingredient })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            recipe,
            category,
            lines,
        })
    }

    pub fn ingredient_count(&self) -> usize {
        self.lines.len()
    }
}

/// Where an ingredient is used
#[derive(Debug, Clone, Serialize)]
pub struct IngredientUsage {
    pub ingredient: Arc<Ingredient>,
    /// (recipe, line) pairs, ordered by recipe name
    pub uses: Vec<(Arc<Recipe>, Arc<RecipeIngredient>)>,
}

impl IngredientUsage {
    pub(crate) fn resolve(state: &GraphState, id: IngredientId) -> Result<Self> {
        let ingredient = state.ingredients().get(id)?;

        let mut uses = state
            .index()
            .usages_of(id)
            .map(|line_id| {
                let line = state.recipe_ingredients().get(line_id)?;
                let recipe = state.recipes().get(line.recipe)?;
                Ok((recipe, line))
            })
            .collect::<Result<Vec<_>>>()?;
        uses.sort_by(|(a, la), (b, lb)| {
            larder_core::collation::compare(&a.name, &b.name).then(la.id.cmp(&lb.id))
        });

        Ok(Self { ingredient, uses })
    }

    pub fn recipe_count(&self) -> usize {
        let mut recipes: Vec<RecipeId> = self.uses.iter().map(|(r, _)| r.id).collect();
        recipes.dedup();
        recipes.len()
    }

    pub fn is_unused(&self) -> bool {
        self.uses.is_empty()
    }
}
