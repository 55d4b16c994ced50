//! Larder Search - Name search across ingredients, categories and recipes
//!
//! Engines are stateless: they search whatever documents they are handed,
//! typically built from one graph snapshot with [`documents_from`].

pub mod error;
pub mod exact;
pub mod fuzzy;
pub mod traits;

pub use error::{SearchError, SearchResult};
pub use exact::ExactSearchEngine;
pub use fuzzy::FuzzySearchEngine;
pub use traits::{documents_from, SearchDocument, SearchEngine, SearchHit};

use larder_core::SearchMode;

/// The engine that implements `mode`
pub fn engine_for(mode: SearchMode) -> Box<dyn SearchEngine> {
    match mode {
        SearchMode::Exact => Box::new(ExactSearchEngine::new()),
        SearchMode::Fuzzy => Box::new(FuzzySearchEngine::new()),
    }
}
