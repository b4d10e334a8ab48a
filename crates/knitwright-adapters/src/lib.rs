//! Infrastructure adapters for Knitwright.
//!
//! This crate implements the ports defined in `knitwright-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod builtin_patterns;
pub mod pattern_loader;
pub mod pattern_store;

// Re-export commonly used adapters
pub use pattern_loader::FilesystemPatternLoader;
pub use pattern_store::InMemoryPatternCatalog;
