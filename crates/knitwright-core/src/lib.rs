//! Knitwright Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Knitwright
//! garment shaping engine, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          knitwright-cli (CLI)           │
//! │       (Implements Driving Ports)        │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │          Application Services           │
//! │          (CalculationService)           │
//! │          Orchestrates Use Cases         │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │      (Driven: StitchPatternCatalog)     │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   knitwright-adapters (Infrastructure)  │
//! │  (InMemoryPatternCatalog, TOML loader)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │  (Gauge, Schedulers, Instruction Gen)   │
//! │        No External Dependencies         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use knitwright_core::prelude::*;
//!
//! # fn run(catalog: Box<dyn StitchPatternCatalog>) {
//! let request = PieceRequest {
//!     name: "Shawl".into(),
//!     gauge: GaugeSpec { stitches_per_10: 20.0, rows_per_10: 28.0, unit: LengthUnit::Centimeters },
//!     craft: CraftType::Knitting,
//!     language: Language::EnUs,
//!     abbreviate: false,
//!     stitch_pattern: None,
//!     construction: Construction::TopDownCenterOut { wingspan: 150.0, depth: 75.0 },
//! };
//!
//! let result = CalculationService::new(catalog).calculate(&request);
//! assert!(result.success);
//! # }
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ArmholeSpec, CalculationResult, CalculationService, Construction, PanelSpec,
        PatternRef, PieceRequest, PieceSchedule, StitchPatternCatalog,
    };
    pub use crate::domain::{
        BodyMeasurements, CraftType, EasePreference, FitPreset, GarmentType, GaugeSpec,
        InstructionKind, InstructionSection, Language, LengthUnit, NecklineParams,
        NecklineStyle, StitchPattern, TemplateSet, Warning, WarningCode,
    };
    pub use crate::error::{KnitError, KnitResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
