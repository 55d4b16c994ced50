//! The transactional recipe graph

use crate::details::{IngredientUsage, RecipeDetails};
use crate::listing::Listing;
use crate::notify::ChangeNotifier;
use larder_core::{
    CategoryId, ChangeSet, DomainError, GraphState, Ingredient, IngredientId, IntegrityValidator,
    NameFilter, NewRecipe, Recipe, RecipeCategory, RecipeId, RecipeIngredient,
    RecipeIngredientId, RecipeUpdate, RelationshipManager, Result, Write, WriteBatch,
};
use larder_storage::{MemoryStorage, StorageBackend, StorageError};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::{broadcast, Mutex};

fn storage_error(err: StorageError) -> DomainError {
    DomainError::Storage(err.to_string())
}

/// The single entry point for reading and mutating the recipe graph
///
/// Every mutation is one transaction: it is planned and validated against
/// the current snapshot, applied to a private copy, committed to the
/// backend, and only then published. Mutations run one at a time; reads
/// never wait for them and always see a whole committed version.
pub struct RecipeGraph {
    backend: Arc<dyn StorageBackend>,
    state: RwLock<Arc<GraphState>>,
    writer: Mutex<()>,
    notifier: ChangeNotifier,
}

impl RecipeGraph {
    /// Load the graph from `backend`, refusing data that breaks a relationship
    pub async fn open(backend: Arc<dyn StorageBackend>) -> Result<Self> {
        backend.initialize().await.map_err(storage_error)?;
        let records = backend.load_records().await.map_err(storage_error)?;
        let loaded = records.len();

        let state = GraphState::from_records(records)?;
        let problems = state.check_consistency();
        if let Some(first) = problems.first() {
            for problem in &problems {
                tracing::warn!("Stored graph is inconsistent: {}", problem);
            }
            return Err(DomainError::Internal(format!(
                "stored graph is inconsistent ({} problems, first: {})",
                problems.len(),
                first
            )));
        }

        tracing::info!(
            "Opened recipe graph on {} backend ({} records)",
            backend.name(),
            loaded
        );

        Ok(Self {
            backend,
            state: RwLock::new(Arc::new(state)),
            writer: Mutex::new(()),
            notifier: ChangeNotifier::new(),
        })
    }

    /// A fresh graph over [`MemoryStorage`]
    pub async fn in_memory() -> Result<Self> {
        Self::open(Arc::new(MemoryStorage::new())).await
    }

    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    pub async fn close(&self) -> Result<()> {
        let _writer = self.writer.lock().await;
        self.backend.close().await.map_err(storage_error)
    }

    /// The latest committed version of the graph
    pub fn snapshot(&self) -> Arc<GraphState> {
        // the lock only guards a pointer swap, so a poisoned lock still holds a whole state
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&state)
    }

    /// Receive a [`ChangeSet`] after every committed mutation
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeSet> {
        self.notifier.subscribe()
    }

    /// Run one mutation. `plan` sees the current snapshot and returns the
    /// writes to make plus a value to hand back; nothing is visible to
    /// anyone until the backend has committed.
    async fn transact<T, F>(&self, label: &str, plan: F) -> Result<(T, Arc<GraphState>)>
    where
        F: FnOnce(&GraphState) -> Result<(WriteBatch, T)> + Send,
        T: Send,
    {
        let _writer = self.writer.lock().await;
        let current = self.snapshot();

        let (batch, outcome) = plan(current.as_ref()).map_err(|e| {
            tracing::debug!("Rejected {}: {}", label, e);
            e
        })?;
        if batch.is_empty() {
            tracing::debug!("Nothing to write for {}", label);
            return Ok((outcome, current));
        }

        let mut next = GraphState::clone(&current);
        let changes = next.apply_batch(&batch)?;

        if let Err(e) = self.backend.commit(&batch).await {
            tracing::warn!("Rolled back {}: {}", label, e);
            return Err(storage_error(e));
        }

        let next = Arc::new(next);
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&next);

        tracing::info!(
            "Committed {} ({} writes, {} entities affected)",
            label,
            batch.len(),
            changes.len()
        );
        self.notifier.publish(changes);

        Ok((outcome, next))
    }

    // Ingredients

    pub async fn add_ingredient(&self, name: &str) -> Result<Arc<Ingredient>> {
        let (id, state) = self
            .transact("add ingredient", |state| {
                IntegrityValidator::check_new_name(state.ingredients(), name, None)?;
                let ingredient = Ingredient::new(name.trim());
                let id = ingredient.id;
                Ok((WriteBatch::new().with(Write::PutIngredient(ingredient)), id))
            })
            .await?;
        state.ingredients().get(id)
    }

    pub async fn rename_ingredient(&self, id: IngredientId, name: &str) -> Result<Arc<Ingredient>> {
        let (_, state) = self
            .transact("rename ingredient", |state| {
                let current = state.ingredients().get(id)?;
                IntegrityValidator::check_new_name(state.ingredients(), name, Some(id))?;
                if current.name == name.trim() {
                    return Ok((WriteBatch::new(), ()));
                }
                let mut renamed = Ingredient::clone(&current);
                renamed.rename(name.trim());
                Ok((WriteBatch::new().with(Write::PutIngredient(renamed)), ()))
            })
            .await?;
        state.ingredients().get(id)
    }

    /// Remove an ingredient and every recipe line that uses it
    pub async fn remove_ingredient(&self, id: IngredientId) -> Result<Arc<Ingredient>> {
        let (removed, _) = self
            .transact("remove ingredient", |state| {
                let removed = state.ingredients().get(id)?;
                Ok((RelationshipManager::plan_remove_ingredient(state, id)?, removed))
            })
            .await?;
        Ok(removed)
    }

    // Categories

    pub async fn add_category(&self, name: &str) -> Result<Arc<RecipeCategory>> {
        let (id, state) = self
            .transact("add category", |state| {
                IntegrityValidator::check_new_name(state.categories(), name, None)?;
                let category = RecipeCategory::new(name.trim());
                let id = category.id;
                Ok((WriteBatch::new().with(Write::PutCategory(category)), id))
            })
            .await?;
        state.categories().get(id)
    }

    pub async fn rename_category(&self, id: CategoryId, name: &str) -> Result<Arc<RecipeCategory>> {
        let (_, state) = self
            .transact("rename category", |state| {
                let current = state.categories().get(id)?;
                IntegrityValidator::check_new_name(state.categories(), name, Some(id))?;
                if current.name == name.trim() {
                    return Ok((WriteBatch::new(), ()));
                }
                let mut renamed = RecipeCategory::clone(&current);
                renamed.rename(name.trim());
                Ok((WriteBatch::new().with(Write::PutCategory(renamed)), ()))
            })
            .await?;
        state.categories().get(id)
    }

    /// Remove a category. Its recipes stay, with no category.
    pub async fn remove_category(&self, id: CategoryId) -> Result<Arc<RecipeCategory>> {
        let (removed, _) = self
            .transact("remove category", |state| {
                let removed = state.categories().get(id)?;
                Ok((RelationshipManager::plan_remove_category(state, id)?, removed))
            })
            .await?;
        Ok(removed)
    }

    // Recipes

    /// Create a recipe, filed under its category and with its ingredient
    /// lines, in one transaction
    pub async fn add_recipe(&self, draft: NewRecipe) -> Result<Arc<Recipe>> {
        let (id, state) = self
            .transact("add recipe", |state| {
                let mut recipe = draft.to_recipe();
                IntegrityValidator::check_recipe(&recipe)?;
                IntegrityValidator::check_unique(state.recipes(), &recipe.name, None)?;
                if let Some(category) = draft.category {
                    IntegrityValidator::check_exists(state.categories(), category)?;
                    recipe.category = Some(category);
                }

                let id = recipe.id;
                let mut batch = WriteBatch::new().with(Write::PutRecipe(recipe));
                for (ingredient, quantity) in &draft.ingredients {
                    IntegrityValidator::check_ingredient_reference(state.ingredients(), *ingredient)?;
                    IntegrityValidator::check_quantity(quantity)?;
                    let line = RecipeIngredient::new(id, *ingredient, quantity.trim());
                    batch.push(Write::PutRecipeIngredient(line));
                }
                Ok((batch, id))
            })
            .await?;
        state.recipes().get(id)
    }

    pub async fn update_recipe(&self, id: RecipeId, update: RecipeUpdate) -> Result<Arc<Recipe>> {
        let (_, state) = self
            .transact("update recipe", |state| {
                let current = state.recipes().get(id)?;
                if update.is_empty() {
                    return Ok((WriteBatch::new(), ()));
                }
                let next = update.applied_to(&current);
                IntegrityValidator::check_recipe(&next)?;
                if update.name.is_some() {
                    IntegrityValidator::check_unique(state.recipes(), &next.name, Some(id))?;
                }
                Ok((WriteBatch::new().with(Write::PutRecipe(next)), ()))
            })
            .await?;
        state.recipes().get(id)
    }

    /// Remove a recipe together with its ingredient lines
    pub async fn remove_recipe(&self, id: RecipeId) -> Result<Arc<Recipe>> {
        let (removed, _) = self
            .transact("remove recipe", |state| {
                let removed = state.recipes().get(id)?;
                Ok((RelationshipManager::plan_remove_recipe(state, id)?, removed))
            })
            .await?;
        Ok(removed)
    }

    /// File a recipe under `category`, or under none
    pub async fn set_recipe_category(
        &self,
        id: RecipeId,
        category: Option<CategoryId>,
    ) -> Result<Arc<Recipe>> {
        let (_, state) = self
            .transact("set recipe category", |state| {
                Ok((RelationshipManager::plan_set_category(state, id, category)?, ()))
            })
            .await?;
        state.recipes().get(id)
    }

    // Recipe ingredient lines

    pub async fn attach_ingredient(
        &self,
        recipe: RecipeId,
        ingredient: IngredientId,
        quantity: &str,
    ) -> Result<Arc<RecipeIngredient>> {
        let (line, state) = self
            .transact("attach ingredient", |state| {
                RelationshipManager::plan_attach(state, recipe, ingredient, quantity)
            })
            .await?;
        state.recipe_ingredients().get(line)
    }

    /// Remove one line. The recipe and the ingredient are kept.
    pub async fn detach_ingredient(&self, line: RecipeIngredientId) -> Result<Arc<RecipeIngredient>> {
        let (removed, _) = self
            .transact("detach ingredient", |state| {
                let removed = state.recipe_ingredients().get(line)?;
                Ok((RelationshipManager::plan_detach(state, line)?, removed))
            })
            .await?;
        Ok(removed)
    }

    pub async fn set_quantity(
        &self,
        line: RecipeIngredientId,
        quantity: &str,
    ) -> Result<Arc<RecipeIngredient>> {
        let (_, state) = self
            .transact("set quantity", |state| {
                Ok((RelationshipManager::plan_set_quantity(state, line, quantity)?, ()))
            })
            .await?;
        state.recipe_ingredients().get(line)
    }

    // Reads

    pub fn ingredient(&self, id: IngredientId) -> Result<Arc<Ingredient>> {
        self.snapshot().ingredients().get(id)
    }

    pub fn category(&self, id: CategoryId) -> Result<Arc<RecipeCategory>> {
        self.snapshot().categories().get(id)
    }

    pub fn recipe(&self, id: RecipeId) -> Result<Arc<Recipe>> {
        self.snapshot().recipes().get(id)
    }

    pub fn recipe_ingredient(&self, id: RecipeIngredientId) -> Result<Arc<RecipeIngredient>> {
        self.snapshot().recipe_ingredients().get(id)
    }

    pub fn ingredients(&self, filter: &NameFilter) -> Listing<Ingredient> {
        Listing::filtered(self.snapshot().ingredients(), filter)
    }

    pub fn categories(&self, filter: &NameFilter) -> Listing<RecipeCategory> {
        Listing::filtered(self.snapshot().categories(), filter)
    }

    pub fn recipes(&self, filter: &NameFilter) -> Listing<Recipe> {
        Listing::filtered(self.snapshot().recipes(), filter)
    }

    pub fn recipes_in_category(&self, id: CategoryId) -> Result<Listing<Recipe>> {
        let state = self.snapshot();
        IntegrityValidator::check_exists(state.categories(), id)?;
        Ok(Listing::from_records(state.recipes(), state.recipes_in(id)))
    }

    /// Lines of a recipe, oldest first
    pub fn recipe_lines(&self, id: RecipeId) -> Result<Vec<Arc<RecipeIngredient>>> {
        let state = self.snapshot();
        IntegrityValidator::check_exists(state.recipes(), id)?;
        Ok(state.lines_of(id))
    }

    pub fn recipe_details(&self, id: RecipeId) -> Result<RecipeDetails> {
        RecipeDetails::resolve(&self.snapshot(), id)
    }

    pub fn ingredient_usage(&self, id: IngredientId) -> Result<IngredientUsage> {
        IngredientUsage::resolve(&self.snapshot(), id)
    }
}
