use crate::ids::{CategoryId, EntityKind, IngredientId, RecipeId};
use crate::store::{Named, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recipe. Its ingredient lines are separate `RecipeIngredient` rows owned
/// by the recipe; the category is a non-owning reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,

    /// Recipe name (unique, case/diacritic-insensitive)
    pub name: String,

    pub summary: String,

    /// Category this recipe is filed under, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,

    /// Number of servings (at least 1)
    pub serving: u32,

    /// Time estimate in minutes (at least 1)
    pub time: u32,

    pub instructions: String,

    /// Encoded picture of the dish
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<u8>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: RecipeId::new(),
            name: name.into(),
            summary: String::new(),
            category: None,
            serving: 1,
            time: 1,
            instructions: String::new(),
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Record for Recipe {
    type Id = RecipeId;

    const KIND: EntityKind = EntityKind::Recipe;

    fn id(&self) -> RecipeId {
        self.id
    }
}

impl Named for Recipe {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Data for creating a new recipe, optionally with its category and
/// ingredient lines in the same transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecipe {
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default = "default_one")]
    pub serving: u32,
    #[serde(default = "default_one")]
    pub time: u32,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub image: Option<Vec<u8>>,
    #[serde(default)]
    pub category: Option<CategoryId>,
    /// (ingredient, quantity) pairs
    #[serde(default)]
    pub ingredients: Vec<(IngredientId, String)>,
}

fn default_one() -> u32 {
    1
}

impl NewRecipe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            summary: String::new(),
            serving: 1,
            time: 1,
            instructions: String::new(),
            image: None,
            category: None,
            ingredients: Vec::new(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_serving(mut self, serving: u32) -> Self {
        self.serving = serving;
        self
    }

    pub fn with_time(mut self, minutes: u32) -> Self {
        self.time = minutes;
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_image(mut self, image: Vec<u8>) -> Self {
        self.image = Some(image);
        self
    }

    pub fn in_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_ingredient(mut self, ingredient: IngredientId, quantity: impl Into<String>) -> Self {
        self.ingredients.push((ingredient, quantity.into()));
        self
    }

    /// Materialize the recipe record (category and ingredients are linked separately)
    pub fn to_recipe(&self) -> Recipe {
        let mut recipe = Recipe::new(self.name.trim());
        recipe.summary = self.summary.clone();
        recipe.serving = self.serving;
        recipe.time = self.time;
        recipe.instructions = self.instructions.clone();
        recipe.image = self.image.clone();
        recipe
    }
}

/// Attribute changes for an existing recipe. `None` leaves a field alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub serving: Option<u32>,
    #[serde(default)]
    pub time: Option<u32>,
    #[serde(default)]
    pub instructions: Option<String>,
    /// `Some(None)` clears the image
    #[serde(default)]
    pub image: Option<Option<Vec<u8>>>,
}

impl RecipeUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn serving(mut self, serving: u32) -> Self {
        self.serving = Some(serving);
        self
    }

    pub fn time(mut self, minutes: u32) -> Self {
        self.time = Some(minutes);
        self
    }

    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn image(mut self, image: Option<Vec<u8>>) -> Self {
        self.image = Some(image);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.summary.is_none()
            && self.serving.is_none()
            && self.time.is_none()
            && self.instructions.is_none()
            && self.image.is_none()
    }

    /// The recipe as it would look after this update
    pub fn applied_to(&self, recipe: &Recipe) -> Recipe {
        let mut next = recipe.clone();
        if let Some(name) = &self.name {
            next.name = name.trim().to_string();
        }
        if let Some(summary) = &self.summary {
            next.summary = summary.clone();
        }
        if let Some(serving) = self.serving {
            next.serving = serving;
        }
        if let Some(time) = self.time {
            next.time = time;
        }
        if let Some(instructions) = &self.instructions {
            next.instructions = instructions.clone();
        }
        if let Some(image) = &self.image {
            next.image = image.clone();
        }
        next.touch();
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_recipe_builder() {
        let flour = IngredientId::new();
        let draft = NewRecipe::new("  Pie ")
            .with_serving(6)
            .with_time(45)
            .with_ingredient(flour, "300g");

        let recipe = draft.to_recipe();
        assert_eq!(recipe.name, "Pie");
        assert_eq!(recipe.serving, 6);
        assert_eq!(recipe.time, 45);
        assert!(recipe.category.is_none());
        assert_eq!(draft.ingredients, vec![(flour, "300g".to_string())]);
    }

    #[test]
    fn test_update_applies_only_given_fields() {
        let mut recipe = Recipe::new("Pie");
        recipe.image = Some(vec![1, 2, 3]);
        recipe.summary = "Flaky".into();

        let next = RecipeUpdate::new().time(90).image(None).applied_to(&recipe);
        assert_eq!(next.id, recipe.id);
        assert_eq!(next.time, 90);
        assert_eq!(next.summary, "Flaky");
        assert!(next.image.is_none());

        assert!(RecipeUpdate::new().is_empty());
    }
}
