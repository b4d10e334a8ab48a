//! Application layer for Knitwright.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (CalculationService)
//! - **DTOs**: Request and result records crossing the boundary
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! garment logic itself. All shaping rules live in `crate::domain`.

pub mod dto;
pub mod error;
pub mod ports;
pub mod services;

pub use dto::{
    ArmholeSpec, CalculationResult, Construction, PanelSpec, PatternRef, PieceRequest,
    PieceSchedule, SchedulePart,
};

pub use services::CalculationService;

// Re-export port traits (for adapter implementation)
pub use ports::StitchPatternCatalog;

pub use error::ApplicationError;
