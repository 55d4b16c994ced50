//! Generic keyed container for one entity kind
//!
//! A store is copy-on-write: cloning it, or taking a [`Scan`], is cheap and
//! the clone keeps seeing the records as they were when it was taken, no
//! matter what is written afterwards.

use crate::error::{DomainError, Result};
use crate::ids::{EntityKind, EntityRef};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::Arc;

/// An entity that can live in an [`EntityStore`]
pub trait Record: Clone + Debug + Send + Sync + 'static {
    type Id: Copy + Ord + Hash + Debug + Display + Into<EntityRef> + Send + Sync + 'static;

    const KIND: EntityKind;

    fn id(&self) -> Self::Id;
}

/// A record with a user-visible name
pub trait Named: Record {
    fn name(&self) -> &str;
}

/// Keyed container holding every instance of one entity kind
#[derive(Debug)]
pub struct EntityStore<T: Record> {
    records: Arc<BTreeMap<T::Id, Arc<T>>>,
}

impl<T: Record> Clone for EntityStore<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<T: Record> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> EntityStore<T> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(BTreeMap::new()),
        }
    }

    /// Build a store from existing records, rejecting repeated ids
    pub fn from_records(records: impl IntoIterator<Item = T>) -> Result<Self> {
        let mut store = Self::new();
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    fn records_mut(&mut self) -> &mut BTreeMap<T::Id, Arc<T>> {
        Arc::make_mut(&mut self.records)
    }

    /// Insert a new record. Ids are unique within a store.
    pub fn insert(&mut self, record: T) -> Result<T::Id> {
        let id = record.id();
        if self.records.contains_key(&id) {
            return Err(DomainError::Internal(format!(
                "duplicate {} id: {}",
                T::KIND,
                id
            )));
        }
        self.records_mut().insert(id, Arc::new(record));
        Ok(id)
    }

    /// Insert or replace a record, returning the previous version
    pub fn put(&mut self, record: T) -> Option<Arc<T>> {
        let id = record.id();
        self.records_mut().insert(id, Arc::new(record))
    }

    pub fn get(&self, id: T::Id) -> Result<Arc<T>> {
        self.find(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(T::KIND, id))
    }

    pub fn find(&self, id: T::Id) -> Option<&Arc<T>> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.records.contains_key(&id)
    }

    /// Apply `mutator` to a copy of the record and store the result
    pub fn update<F>(&mut self, id: T::Id, mutator: F) -> Result<Arc<T>>
    where
        F: FnOnce(&mut T),
    {
        let mut record = T::clone(&*self.get(id)?);
        mutator(&mut record);
        if record.id() != id {
            return Err(DomainError::Internal(format!(
                "{} id is immutable: {} -> {}",
                T::KIND,
                id,
                record.id()
            )));
        }
        let record = Arc::new(record);
        self.records_mut().insert(id, Arc::clone(&record));
        Ok(record)
    }

    /// Remove a record. Cross-kind effects are the relationship manager's job,
    /// so the removed set only ever holds `id` itself.
    pub fn delete(&mut self, id: T::Id) -> Result<BTreeSet<T::Id>> {
        if !self.records.contains_key(&id) {
            return Err(DomainError::not_found(T::KIND, id));
        }
        self.records_mut().remove(&id);
        Ok(BTreeSet::from([id]))
    }

    /// Lazily filter the records as they are right now
    pub fn scan<P>(&self, predicate: P) -> Scan<T, P>
    where
        P: Fn(&T) -> bool,
    {
        Scan {
            records: Arc::clone(&self.records),
            predicate,
        }
    }

    /// Every record, in id order
    pub fn all(&self) -> Scan<T, fn(&T) -> bool> {
        let everything: fn(&T) -> bool = |_| true;
        self.scan(everything)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A restartable, finite view over a store snapshot
pub struct Scan<T: Record, P> {
    records: Arc<BTreeMap<T::Id, Arc<T>>>,
    predicate: P,
}

impl<T, P> Scan<T, P>
where
    T: Record,
    P: Fn(&T) -> bool,
{
    /// Iterate matching records. Can be called repeatedly; each call starts over.
    pub fn iter(&self) -> impl Iterator<Item = Arc<T>> + '_ {
        self.records
            .values()
            .filter(move |record| {
                let record: &T = record;
                (self.predicate)(record)
            })
            .cloned()
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn first(&self) -> Option<Arc<T>> {
        self.iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Ingredient;

    #[test]
    fn test_insert_get_delete() {
        let mut store = EntityStore::new();
        let salt = Ingredient::new("Salt");
        let id = store.insert(salt.clone()).unwrap();

        assert_eq!(store.get(id).unwrap().name, "Salt");
        assert!(store.insert(salt).is_err());

        let removed = store.delete(id).unwrap();
        assert_eq!(removed, BTreeSet::from([id]));
        assert!(matches!(
            store.get(id),
            Err(DomainError::NotFound {
                kind: EntityKind::Ingredient,
                ..
            })
        ));
        assert!(store.delete(id).is_err());
    }

    #[test]
    fn test_update_keeps_id() {
        let mut store = EntityStore::new();
        let id = store.insert(Ingredient::new("Suger")).unwrap();

        let updated = store.update(id, |i| i.name = "Sugar".into()).unwrap();
        assert_eq!(updated.name, "Sugar");

        let err = store.update(id, |i| i.id = crate::IngredientId::new());
        assert!(matches!(err, Err(DomainError::Internal(_))));
        assert_eq!(store.get(id).unwrap().name, "Sugar");
    }

    #[test]
    fn test_scan_is_a_snapshot() {
        let mut store = EntityStore::new();
        store.insert(Ingredient::new("Flour")).unwrap();
        store.insert(Ingredient::new("Salt")).unwrap();

        let scan = store.scan(|i: &Ingredient| i.name.starts_with('S'));
        store.insert(Ingredient::new("Sugar")).unwrap();

        assert_eq!(scan.count(), 1);
        // restartable
        assert_eq!(scan.iter().count(), 1);
        assert_eq!(store.scan(|i: &Ingredient| i.name.starts_with('S')).count(), 2);
    }

    #[test]
    fn test_clone_is_isolated() {
        let mut store = EntityStore::new();
        let id = store.insert(Ingredient::new("Flour")).unwrap();
        let snapshot = store.clone();

        store.delete(id).unwrap();
        assert!(snapshot.contains(id));
        assert!(!store.contains(id));
    }
}
