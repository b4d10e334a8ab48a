//! Application layer errors.
//!
//! These errors represent failures in orchestration, not garment logic.
//! Shaping and generation errors are `DomainError` from `crate::domain`.

use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A request referenced a stitch pattern the catalog does not hold.
    #[error("Stitch pattern not found: {id}")]
    PatternNotFound { id: String },

    /// Catalog access failed (lock poisoned).
    #[error("Stitch pattern catalog is unavailable")]
    CatalogLockError,

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::PatternNotFound { id } => vec![
                format!("No stitch pattern with id '{id}'"),
                "Try: knitwright patterns to see available patterns".into(),
                "Or add a pattern file to your patterns directory".into(),
            ],
            Self::CatalogLockError => vec![
                "The stitch pattern catalog is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::ValidationFailed(_) => vec!["Check the request file against the documented format".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::PatternNotFound { .. } => ErrorCategory::NotFound,
            Self::CatalogLockError => ErrorCategory::Internal,
            Self::ValidationFailed(_) => ErrorCategory::Validation,
        }
    }
}
