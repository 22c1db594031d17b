//! Domain-level error types.

use thiserror::Error;

/// Domain errors - failures surfaced to the page assemblers.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with key {key}")]
    NotFound { entity_type: &'static str, key: String },

    #[error("Relation `{relation}` of {entity_type} was not preloaded")]
    RelationNotLoaded {
        entity_type: &'static str,
        relation: &'static str,
    },

    #[error(transparent)]
    Repository(#[from] RepoError),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            key: key.into(),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
