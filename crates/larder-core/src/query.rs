//! Query types for listing and searching the graph

use crate::collation;
use crate::ids::EntityKind;
use serde::{Deserialize, Serialize};

/// Optional case/diacritic-insensitive substring filter on names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
}

impl NameFilter {
    /// Match everything
    pub fn all() -> Self {
        Self::default()
    }

    pub fn containing(text: impl Into<String>) -> Self {
        Self {
            contains: Some(text.into()),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match &self.contains {
            Some(needle) => collation::contains(name, needle),
            None => true,
        }
    }
}

/// Search mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Folded substring matching
    #[default]
    Exact,
    /// Fuzzy matching, best score first
    Fuzzy,
}

/// Pagination options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    /// Page number (0-indexed)
    #[serde(default)]
    pub page: usize,

    /// Number of results per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    100
}

impl Pagination {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size: page_size.clamp(1, 1000),
        }
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.page_size)
    }
}

/// Cross-kind name search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Text to search for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default)]
    pub mode: SearchMode,

    /// Restrict to these kinds (empty = all named kinds)
    #[serde(default)]
    pub kinds: Vec<EntityKind>,

    #[serde(default)]
    pub pagination: Pagination,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Alias for new()
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
        self
    }

    pub fn with_pagination(mut self, page: usize, page_size: usize) -> Self {
        self.pagination = Pagination::new(page, page_size);
        self
    }

    pub fn includes_kind(&self, kind: EntityKind) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&kind)
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub current_page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PaginationInfo {
    pub fn new(current_page: usize, page_size: usize, total_count: usize) -> Self {
        let total_pages = total_count.div_ceil(page_size.max(1));
        Self {
            current_page,
            page_size,
            total_count,
            total_pages,
            has_next_page: current_page + 1 < total_pages,
            has_previous_page: current_page > 0,
        }
    }
}
