//! Record encoding shared by the key/value backends
//!
//! Each entity kind has its own table; records are stored as JSON keyed by
//! their id string.

use crate::error::{StorageError, StorageResult};
use larder_core::{EntityKind, RecordSet, Write};
use serde::de::DeserializeOwned;

pub const INGREDIENTS: &str = "ingredients";
pub const CATEGORIES: &str = "categories";
pub const RECIPES: &str = "recipes";
pub const RECIPE_INGREDIENTS: &str = "recipe_ingredients";

/// All tables, in load order
pub const TABLES: [&str; 4] = [INGREDIENTS, CATEGORIES, RECIPES, RECIPE_INGREDIENTS];

pub fn table_for(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Ingredient => INGREDIENTS,
        EntityKind::Category => CATEGORIES,
        EntityKind::Recipe => RECIPES,
        EntityKind::RecipeIngredient => RECIPE_INGREDIENTS,
    }
}

/// A write flattened to table/key/value. `value == None` is a delete.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedWrite {
    pub table: &'static str,
    pub key: String,
    pub value: Option<Vec<u8>>,
}

pub fn encode(write: &Write) -> StorageResult<EncodedWrite> {
    let target = write.target();
    let value = match write {
        Write::PutIngredient(r) => Some(serde_json::to_vec(r)?),
        Write::PutCategory(r) => Some(serde_json::to_vec(r)?),
        Write::PutRecipe(r) => Some(serde_json::to_vec(r)?),
        Write::PutRecipeIngredient(r) => Some(serde_json::to_vec(r)?),
        _ => None,
    };
    Ok(EncodedWrite {
        table: table_for(target.kind()),
        key: target.id_string(),
        value,
    })
}

fn decode<T: DeserializeOwned>(table: &str, key: &str, bytes: &[u8]) -> StorageResult<T> {
    serde_json::from_slice(bytes).map_err(|e| StorageError::Corrupt {
        table: table.to_string(),
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Decode one stored row into the matching collection of `records`
pub fn decode_into(
    records: &mut RecordSet,
    table: &str,
    key: &str,
    bytes: &[u8],
) -> StorageResult<()> {
    match table {
        INGREDIENTS => records.ingredients.push(decode(table, key, bytes)?),
        CATEGORIES => records.categories.push(decode(table, key, bytes)?),
        RECIPES => records.recipes.push(decode(table, key, bytes)?),
        RECIPE_INGREDIENTS => records.recipe_ingredients.push(decode(table, key, bytes)?),
        other => {
            return Err(StorageError::Corrupt {
                table: other.to_string(),
                key: key.to_string(),
                reason: "unknown table".to_string(),
            })
        }
    }
    Ok(())
}
