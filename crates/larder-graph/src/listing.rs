//! Ordered, de-duplicated query results

use larder_core::collation;
use larder_core::{EntityStore, Named, NameFilter, Pagination, PaginationInfo};
use std::sync::Arc;

/// Query result over one snapshot of a store
///
/// Ordering is by folded name, then raw name, then id. Only the ordering
/// keys are materialized up front; records are looked up as they are
/// iterated, and iteration can be restarted any number of times.
pub struct Listing<T: Named> {
    store: EntityStore<T>,
    order: Vec<T::Id>,
}

impl<T: Named> Listing<T> {
    /// Records of `store` whose names pass `filter`
    pub fn filtered(store: &EntityStore<T>, filter: &NameFilter) -> Self {
        let matching = store.scan(|record: &T| filter.matches(record.name()));
        Self::from_records(store, matching.iter())
    }

    /// A listing over the given records, which must come from `store`
    pub fn from_records(store: &EntityStore<T>, records: impl IntoIterator<Item = Arc<T>>) -> Self {
        let mut keyed: Vec<(String, Arc<T>)> = records
            .into_iter()
            .map(|record| (collation::fold(record.name()), record))
            .collect();
        keyed.sort_by(|(fa, a), (fb, b)| {
            fa.cmp(fb)
                .then_with(|| a.name().cmp(b.name()))
                .then_with(|| a.id().cmp(&b.id()))
        });

        let mut order: Vec<T::Id> = keyed.into_iter().map(|(_, record)| record.id()).collect();
        order.dedup();

        Self {
            store: store.clone(),
            order,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Arc<T>> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.store.find(*id).cloned())
    }

    /// One page of the listing plus its pagination metadata
    pub fn page(&self, pagination: &Pagination) -> (Vec<Arc<T>>, PaginationInfo) {
        let items = self
            .iter()
            .skip(pagination.offset())
            .take(pagination.page_size)
            .collect();
        let info = PaginationInfo::new(pagination.page, pagination.page_size, self.len());
        (items, info)
    }

    pub fn first(&self) -> Option<Arc<T>> {
        self.iter().next()
    }

    pub fn ids(&self) -> &[T::Id] {
        &self.order
    }

    pub fn names(&self) -> Vec<String> {
        self.iter().map(|record| record.name().to_string()).collect()
    }

    pub fn to_vec(&self) -> Vec<Arc<T>> {
        self.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
