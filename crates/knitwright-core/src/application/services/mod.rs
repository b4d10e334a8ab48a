//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "calculate a piece" or "list stitch patterns".

pub mod calculation_service;

pub use calculation_service::CalculationService;
