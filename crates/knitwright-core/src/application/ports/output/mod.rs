//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `knitwright-adapters` crate provides implementations.

use crate::domain::StitchPattern;
use crate::error::KnitResult;

/// Port for the stitch-pattern library.
///
/// Implemented by:
/// - `knitwright_adapters::pattern_store::InMemoryPatternCatalog` (built-in
///   and file-loaded patterns)
///
/// Implementations must be shareable across threads: multi-piece
/// calculations query the catalog from several workers at once.
#[cfg_attr(test, mockall::automock)]
pub trait StitchPatternCatalog: Send + Sync {
    /// Get a pattern by id.
    fn get(&self, id: &str) -> KnitResult<StitchPattern>;

    /// List all available patterns, ordered by id.
    fn list(&self) -> KnitResult<Vec<StitchPattern>>;

    /// Insert or replace a pattern.
    fn insert(&self, pattern: StitchPattern) -> KnitResult<()>;
}
