//! CLI command implementations

pub mod category;
pub mod completions;
pub mod config;
pub mod ingredient;
pub mod recipe;
pub mod search;

use std::str::FromStr;
use std::sync::Arc;

use larder_core::{collation, EntityStore, Named};

/// Find a record by id, or failing that by (case/diacritic-insensitive) name
pub fn resolve<T>(store: &EntityStore<T>, key: &str) -> anyhow::Result<Arc<T>>
where
    T: Named,
    T::Id: FromStr,
{
    if let Ok(id) = key.trim().parse::<T::Id>() {
        if let Some(record) = store.find(id) {
            return Ok(Arc::clone(record));
        }
    }

    store
        .scan(|record: &T| collation::equivalent(record.name(), key))
        .first()
        .ok_or_else(|| anyhow::anyhow!("{} not found: {}", T::KIND, key.trim()))
}

/// Split `NAME=QUANTITY`; a bare name means an empty quantity
pub fn split_line_arg(arg: &str) -> (&str, &str) {
    match arg.split_once('=') {
        Some((name, quantity)) => (name.trim(), quantity.trim()),
        None => (arg.trim(), ""),
    }
}
