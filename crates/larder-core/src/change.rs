//! Change notifications emitted after each committed transaction

use crate::ids::{EntityKind, EntityRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything one committed transaction touched, including propagated
/// changes (an owner whose reverse collection changed counts as updated).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub created: BTreeSet<EntityRef>,
    pub updated: BTreeSet<EntityRef>,
    pub removed: BTreeSet<EntityRef>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_created(&mut self, entity: impl Into<EntityRef>) {
        let entity = entity.into();
        self.removed.remove(&entity);
        self.created.insert(entity);
    }

    /// Updates to entities created or removed in the same transaction are
    /// folded into those.
    pub fn record_updated(&mut self, entity: impl Into<EntityRef>) {
        let entity = entity.into();
        if !self.created.contains(&entity) && !self.removed.contains(&entity) {
            self.updated.insert(entity);
        }
    }

    pub fn record_removed(&mut self, entity: impl Into<EntityRef>) {
        let entity = entity.into();
        self.updated.remove(&entity);
        // created and removed in one transaction nets out
        if !self.created.remove(&entity) {
            self.removed.insert(entity);
        }
    }

    /// Every entity touched, in any way
    pub fn affected(&self) -> impl Iterator<Item = &EntityRef> {
        self.created
            .iter()
            .chain(self.updated.iter())
            .chain(self.removed.iter())
    }

    pub fn kinds(&self) -> BTreeSet<EntityKind> {
        self.affected().map(|e| e.kind()).collect()
    }

    pub fn touches(&self, entity: impl Into<EntityRef>) -> bool {
        let entity = entity.into();
        self.created.contains(&entity)
            || self.updated.contains(&entity)
            || self.removed.contains(&entity)
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.created.len() + self.updated.len() + self.removed.len()
    }
}
