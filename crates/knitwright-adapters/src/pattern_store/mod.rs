//! Stitch-pattern catalog implementations.

pub mod memory;

pub use memory::InMemoryPatternCatalog;
