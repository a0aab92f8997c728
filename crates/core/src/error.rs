//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// data integrity, duplicates). Transport failures belong to the gateway.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. negative stock, zero case size).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Data coming from outside references something inconsistent
    /// (unknown item, missing field, colliding identifiers).
    #[error("data integrity: {0}")]
    DataIntegrity(String),

    /// The record is already present (e.g. a second cart line for one item).
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn data_integrity(msg: impl Into<String>) -> Self {
        Self::DataIntegrity(msg.into())
    }

    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Non-fatal kinds: the caller skips the record, notifies, and continues.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::DataIntegrity(_) | Self::Duplicate(_))
    }
}
