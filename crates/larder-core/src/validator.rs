//! Constraint checks run before any mutation is applied
//!
//! The validator is stateless: every check reads the store it is handed and
//! nothing else, so it can be called from anywhere, not only from inside a
//! transaction.

use crate::collation;
use crate::error::{DomainError, ReferenceError, Result, ValidationError};
use crate::ids::IngredientId;
use crate::limits::{self, MAX_INSTRUCTIONS_LEN, MAX_QUANTITY_LEN, MAX_SUMMARY_LEN};
use crate::model::{Ingredient, Recipe};
use crate::store::{EntityStore, Named, Record};

pub struct IntegrityValidator;

impl IntegrityValidator {
    /// Name must be non-blank and within limits
    pub fn check_name(name: &str) -> std::result::Result<(), ValidationError> {
        limits::validate_name(name)
    }

    /// No other record of this kind may carry an equivalent name. The record
    /// being renamed (`excluding`) never conflicts with itself.
    pub fn check_unique<T: Named>(
        store: &EntityStore<T>,
        value: &str,
        excluding: Option<T::Id>,
    ) -> std::result::Result<(), ValidationError> {
        let clash = store
            .scan(|record: &T| {
                Some(record.id()) != excluding && collation::equivalent(record.name(), value)
            })
            .first();

        match clash {
            Some(existing) => {
                tracing::debug!(
                    "Rejected {} name '{}': taken by {}",
                    T::KIND,
                    value,
                    existing.id()
                );
                Err(ValidationError::DuplicateName {
                    kind: T::KIND,
                    value: value.trim().to_string(),
                })
            }
            None => Ok(()),
        }
    }

    /// `check_name` followed by `check_unique`
    pub fn check_new_name<T: Named>(
        store: &EntityStore<T>,
        value: &str,
        excluding: Option<T::Id>,
    ) -> std::result::Result<(), ValidationError> {
        Self::check_name(value)?;
        Self::check_unique(store, value, excluding)
    }

    pub fn check_exists<T: Record>(store: &EntityStore<T>, id: T::Id) -> Result<()> {
        if store.contains(id) {
            Ok(())
        } else {
            Err(DomainError::not_found(T::KIND, id))
        }
    }

    /// An ingredient referenced by a recipe line must exist
    pub fn check_ingredient_reference(
        store: &EntityStore<Ingredient>,
        id: IngredientId,
    ) -> std::result::Result<(), ReferenceError> {
        if store.contains(id) {
            Ok(())
        } else {
            Err(ReferenceError::DanglingIngredient(id.to_string()))
        }
    }

    /// Field-level checks for a recipe record (uniqueness is separate)
    pub fn check_recipe(recipe: &Recipe) -> std::result::Result<(), ValidationError> {
        Self::check_name(&recipe.name)?;
        limits::validate_text("summary", &recipe.summary, MAX_SUMMARY_LEN)?;
        limits::validate_text("instructions", &recipe.instructions, MAX_INSTRUCTIONS_LEN)?;
        limits::validate_minimum("serving", recipe.serving, limits::MIN_SERVING)?;
        limits::validate_minimum("time", recipe.time, limits::MIN_TIME)?;
        limits::validate_image(recipe.image.as_deref())
    }

    pub fn check_quantity(quantity: &str) -> std::result::Result<(), ValidationError> {
        limits::validate_text("quantity", quantity.trim(), MAX_QUANTITY_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::EntityKind;

    fn store_with(names: &[&str]) -> (EntityStore<Ingredient>, Vec<IngredientId>) {
        let mut store = EntityStore::new();
        let ids = names
            .iter()
            .map(|n| store.insert(Ingredient::new(*n)).unwrap())
            .collect();
        (store, ids)
    }

    #[test]
    fn test_unique_is_case_and_diacritic_insensitive() {
        let (store, _) = store_with(&["Salt", "Crème fraîche"]);

        assert!(IntegrityValidator::check_unique(&store, "Sugar", None).is_ok());
        assert_eq!(
            IntegrityValidator::check_unique(&store, "salt", None),
            Err(ValidationError::DuplicateName {
                kind: EntityKind::Ingredient,
                value: "salt".into()
            })
        );
        assert!(IntegrityValidator::check_unique(&store, "CREME FRAICHE", None).is_err());
    }

    #[test]
    fn test_unique_matches_decomposed_spelling() {
        let (store, _) = store_with(&["Crème fraîche"]);
        assert!(
            IntegrityValidator::check_unique(&store, "Cre\u{300}me frai\u{302}che", None).is_err()
        );

        let (store, _) = store_with(&["Jalapen\u{303}o"]);
        assert!(IntegrityValidator::check_unique(&store, "Jalapeño", None).is_err());
    }

    #[test]
    fn test_unique_excludes_self() {
        let (store, ids) = store_with(&["Salt", "Pepper"]);

        assert!(IntegrityValidator::check_unique(&store, "Salt", Some(ids[0])).is_ok());
        assert!(IntegrityValidator::check_unique(&store, "SALT", Some(ids[0])).is_ok());
        assert!(IntegrityValidator::check_unique(&store, "Salt", Some(ids[1])).is_err());
    }

    #[test]
    fn test_check_exists() {
        let (store, ids) = store_with(&["Salt"]);
        assert!(IntegrityValidator::check_exists(&store, ids[0]).is_ok());
        assert!(IntegrityValidator::check_exists(&store, IngredientId::new()).is_err());
        assert!(
            IntegrityValidator::check_ingredient_reference(&store, IngredientId::new()).is_err()
        );
    }

    #[test]
    fn test_check_recipe() {
        let mut recipe = Recipe::new("Pie");
        assert!(IntegrityValidator::check_recipe(&recipe).is_ok());

        recipe.serving = 0;
        assert!(matches!(
            IntegrityValidator::check_recipe(&recipe),
            Err(ValidationError::BelowMinimum { field: "serving", .. })
        ));

        recipe.serving = 2;
        recipe.name = String::new();
        assert_eq!(
            IntegrityValidator::check_recipe(&recipe),
            Err(ValidationError::EmptyName)
        );
    }
}
