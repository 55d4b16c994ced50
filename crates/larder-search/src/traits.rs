//! Search engine traits

use async_trait::async_trait;
use larder_core::{EntityKind, EntityRef, GraphState, Named, SearchQuery};
use serde::Serialize;

pub use crate::error::{SearchError, SearchResult as Result};

/// One searchable name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchDocument {
    pub entity: EntityRef,
    pub name: String,
}

impl SearchDocument {
    pub fn kind(&self) -> EntityKind {
        self.entity.kind()
    }
}

/// Result from search including score
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub document: SearchDocument,
    pub score: f32,
}

/// Every named record of a snapshot, as search documents
pub fn documents_from(state: &GraphState) -> Vec<SearchDocument> {
    fn named<'a, T: Named>(
        records: impl Iterator<Item = std::sync::Arc<T>> + 'a,
    ) -> impl Iterator<Item = SearchDocument> + 'a {
        records.map(|record| SearchDocument {
            entity: record.id().into(),
            name: record.name().to_string(),
        })
    }

    let (ingredients, categories, recipes) = (
        state.ingredients().all(),
        state.categories().all(),
        state.recipes().all(),
    );
    named(ingredients.iter())
        .chain(named(categories.iter()))
        .chain(named(recipes.iter()))
        .collect()
}

/// Trait for search engines
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Search documents based on query
    async fn search(&self, query: &SearchQuery, documents: &[SearchDocument])
        -> Result<Vec<SearchHit>>;
}

/// Documents of the kinds the query asks for
pub(crate) fn in_scope<'a>(
    query: &'a SearchQuery,
    documents: &'a [SearchDocument],
) -> impl Iterator<Item = &'a SearchDocument> + 'a {
    documents
        .iter()
        .filter(move |doc| query.includes_kind(doc.kind()))
}

/// Apply the query's pagination to ranked hits
pub(crate) fn paginate(query: &SearchQuery, hits: Vec<SearchHit>) -> Vec<SearchHit> {
    hits.into_iter()
        .skip(query.pagination.offset())
        .take(query.pagination.page_size)
        .collect()
}
