//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::CategoryId;

/// Domain errors represent rejected requests against the category forest.
///
/// All of them are detected before any mutation and are recoverable by the
/// caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("field '{field}' too long: {actual} characters (max {max})")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("category code already in use: {0}")]
    DuplicateCode(String),

    #[error("parent category not found: {0}")]
    ParentNotFound(CategoryId),

    #[error("category not found: {0}")]
    NotFound(CategoryId),

    #[error("cycle detected: cannot move category {node} under {target}")]
    CycleDetected {
        node: CategoryId,
        target: CategoryId,
    },

    #[error("category {id} still has {children} child categories")]
    HasChildren { id: CategoryId, children: usize },

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Coarse classification of a [`DomainError`] for callers that map errors
/// onto responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingField,
    FieldTooLong,
    DuplicateCode,
    ParentNotFound,
    NotFound,
    CycleDetected,
    HasChildren,
    InvalidSnapshot,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::MissingField(_) => ErrorKind::MissingField,
            DomainError::FieldTooLong { .. } => ErrorKind::FieldTooLong,
            DomainError::DuplicateCode(_) => ErrorKind::DuplicateCode,
            DomainError::ParentNotFound(_) => ErrorKind::ParentNotFound,
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::CycleDetected { .. } => ErrorKind::CycleDetected,
            DomainError::HasChildren { .. } => ErrorKind::HasChildren,
            DomainError::InvalidSnapshot(_) => ErrorKind::InvalidSnapshot,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
