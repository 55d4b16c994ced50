//! Error types for Larder Core

use crate::ids::EntityKind;
use thiserror::Error;

/// Result type alias using Larder's DomainError
pub type Result<T> = std::result::Result<T, DomainError>;

/// Every failure a graph operation can report to its caller
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// True when the operation was refused before touching any state
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NotFound { .. } | Self::Reference(_)
        )
    }
}

/// Constraint violations detected before a mutation is applied
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{kind} named '{value}' already exists")]
    DuplicateName { kind: EntityKind, value: String },

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Name too long: {len} chars (max {max})")]
    NameTooLong { len: usize, max: usize },

    #[error("{field} too long: {len} chars (max {max})")]
    TextTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{field} must be at least {min} (got {value})")]
    BelowMinimum {
        field: &'static str,
        value: u32,
        min: u32,
    },

    #[error("Image too large: {len} bytes (max {max})")]
    ImageTooLarge { len: usize, max: usize },
}

/// Broken references between entities of different kinds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReferenceError {
    #[error("Ingredient does not exist: {0}")]
    DanglingIngredient(String),
}
