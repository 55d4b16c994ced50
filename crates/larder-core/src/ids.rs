//! Entity identifiers and kinds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $variant:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Ulid);

        impl $name {
            pub fn new() -> Self {
                Self(Ulid::new())
            }

            pub fn from_string(s: &str) -> Result<Self, ulid::DecodeError> {
                Ok(Self(Ulid::from_string(s)?))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ulid::DecodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_string(s)
            }
        }

        impl From<$name> for EntityRef {
            fn from(id: $name) -> Self {
                EntityRef::$variant(id)
            }
        }
    };
}

entity_id!(
    /// Unique identifier for an ingredient
    IngredientId,
    Ingredient
);
entity_id!(
    /// Unique identifier for a recipe category
    CategoryId,
    Category
);
entity_id!(
    /// Unique identifier for a recipe
    RecipeId,
    Recipe
);
entity_id!(
    /// Unique identifier for a recipe/ingredient link
    RecipeIngredientId,
    RecipeIngredient
);

/// The four kinds of entity held by the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Ingredient,
    Category,
    Recipe,
    RecipeIngredient,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Ingredient,
        EntityKind::Category,
        EntityKind::Recipe,
        EntityKind::RecipeIngredient,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ingredient => "ingredient",
            Self::Category => "category",
            Self::Recipe => "recipe",
            Self::RecipeIngredient => "recipe ingredient",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ingredient" | "ingredients" => Ok(Self::Ingredient),
            "category" | "categories" => Ok(Self::Category),
            "recipe" | "recipes" => Ok(Self::Recipe),
            "recipe_ingredient" | "recipe-ingredient" => Ok(Self::RecipeIngredient),
            other => Err(format!("unknown entity kind: {}", other)),
        }
    }
}

/// A typed reference to any entity in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    Ingredient(IngredientId),
    Category(CategoryId),
    Recipe(RecipeId),
    RecipeIngredient(RecipeIngredientId),
}

impl EntityRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Ingredient(_) => EntityKind::Ingredient,
            Self::Category(_) => EntityKind::Category,
            Self::Recipe(_) => EntityKind::Recipe,
            Self::RecipeIngredient(_) => EntityKind::RecipeIngredient,
        }
    }

    /// The bare identifier as a string
    pub fn id_string(&self) -> String {
        match self {
            Self::Ingredient(id) => id.to_string(),
            Self::Category(id) => id.to_string(),
            Self::Recipe(id) => id.to_string(),
            Self::RecipeIngredient(id) => id.to_string(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_string_roundtrip() {
        let id = RecipeId::new();
        let parsed: RecipeId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!(RecipeId::from_string("not-a-ulid").is_err());
    }

    #[test]
    fn test_entity_ref_kind() {
        let id = CategoryId::new();
        let r = EntityRef::from(id);
        assert_eq!(r.kind(), EntityKind::Category);
        assert_eq!(r.id_string(), id.to_string());
        assert_eq!(r.to_string(), format!("category:{}", id));
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("Recipes".parse::<EntityKind>().unwrap(), EntityKind::Recipe);
        assert!("pantry".parse::<EntityKind>().is_err());
    }
}
