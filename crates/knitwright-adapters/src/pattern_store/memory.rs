//! In-memory stitch-pattern catalog with built-in patterns.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use knitwright_core::{
    application::{ApplicationError, ports::StitchPatternCatalog},
    domain::{DomainValidator as validator, StitchPattern},
    error::{KnitError, KnitResult},
};

use crate::builtin_patterns;

/// Thread-safe in-memory catalog keyed by pattern id.
#[derive(Clone, Default)]
pub struct InMemoryPatternCatalog {
    inner: Arc<RwLock<HashMap<String, StitchPattern>>>,
}

impl InMemoryPatternCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog with the built-in patterns loaded.
    pub fn with_builtin() -> KnitResult<Self> {
        let catalog = Self::new();
        catalog.extend(builtin_patterns::all_patterns()?)?;
        Ok(catalog)
    }

    /// Insert several patterns; a later pattern replaces an earlier one
    /// with the same id.
    pub fn extend(&self, patterns: impl IntoIterator<Item = StitchPattern>) -> KnitResult<()> {
        for pattern in patterns {
            self.insert(pattern)?;
        }
        Ok(())
    }

    /// Get the number of patterns.
    pub fn len(&self) -> usize {
        self.inner.read().map_or(0, |inner| inner.len())
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_error<T>(_: T) -> KnitError {
    ApplicationError::CatalogLockError.into()
}

impl StitchPatternCatalog for InMemoryPatternCatalog {
    fn get(&self, id: &str) -> KnitResult<StitchPattern> {
        let inner = self.inner.read().map_err(lock_error)?;
        inner
            .get(id)
            .cloned()
            .ok_or_else(|| ApplicationError::PatternNotFound { id: id.to_string() }.into())
    }

    fn list(&self) -> KnitResult<Vec<StitchPattern>> {
        let inner = self.inner.read().map_err(lock_error)?;
        let mut patterns: Vec<StitchPattern> = inner.values().cloned().collect();
        patterns.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(patterns)
    }

    fn insert(&self, pattern: StitchPattern) -> KnitResult<()> {
        // Validate before insertion
        validator::validate_pattern(&pattern)?;

        let mut inner = self.inner.write().map_err(lock_error)?;
        inner.insert(pattern.id.clone(), pattern);
        Ok(())
    }
}
