// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Knitwright.
//!
//! This module contains pure garment-shaping logic with no I/O. Catalog
//! lookups are reached through ports defined in the application layer.
//!
//! ## Pipeline
//!
//! ```text
//! resolver -> gauge conversion -> shaping schedulers -> instruction generator
//!                                                         ^
//!                                   stitch-pattern cursor-+
//! ```
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **No logging**: Decisions are returned as values and warnings
//! - **Immutable outputs**: Schedules and instructions are plain records
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod instructions;
pub mod registry;
pub mod resolver;
pub mod shaping;
pub mod value_objects;
pub mod warning;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    BodyMeasurements, EasePreference, FinishedMeasurements, Gauge, GaugeSpec, InstructionGroup,
    InstructionSection, InstructionStep, PatternRow, PhaseLabel, ShapingEvent, ShapingPhase,
    ShapingSchedule, StitchPattern, StitchPatternContext, align_to_repeat, length_to_rows,
    length_to_stitches, round_up_to_parity,
};

pub use error::{DomainError, ErrorCategory};

pub use instructions::{
    InstructionGenerator, InstructionKind, SectionPlan, Setup, TemplateSet, Terminology,
};

pub use resolver::{ResolvedMeasurements, resolve};

pub use shaping::{
    ArmholeParams, ArmholeShaping, ArmholeStyle, NecklineParams, NecklineShaping,
    TriangleDimensions, TriangleShaping, shape_armhole, shape_neckline, shape_triangle,
};

pub use value_objects::{
    CraftType, FabricSide, FitPreset, GarmentType, Language, LengthUnit, MeasurementField,
    NecklineStyle, Placement, ShapingKind, Side, TriangleMethod,
};

pub use validation::DomainValidator;
pub use warning::{Warning, WarningCode};

#[cfg(test)]
mod tests {
    use super::*;

    fn gauge(st: f64, rows: f64) -> Gauge {
        Gauge::new(st, rows, LengthUnit::Centimeters).unwrap()
    }

    // ========================================================================
    // Pipeline Tests
    // ========================================================================

    #[test]
    fn triangle_schedule_renders_row_for_row() {
        let t = shape_triangle(
            TriangleMethod::TopDownCenterOut,
            TriangleDimensions {
                wingspan: 60.0,
                depth: 30.0,
            },
            &gauge(20.0, 28.0),
        )
        .unwrap();
        let sections = InstructionGenerator::new(CraftType::Knitting)
            .generate("Shawl", &t.schedule, None, Setup::CastOn, FabricSide::RightSide)
            .unwrap();

        let section = &sections[0];
        assert_eq!(section.setup.as_deref(), Some("Cast on 3 stitches."));
        assert_eq!(section.row_count(), t.schedule.total_rows);
        assert_eq!(section.final_stitches(), t.schedule.final_stitches);
        assert_eq!(
            section.shaping_rows().count() as u32,
            t.phase_1().unwrap().event_count()
        );
        assert!(section.steps[0].text.contains("yarn over"));
    }

    #[test]
    fn neckline_sections_end_at_shoulder_count() {
        let n = shape_neckline(
            NecklineParams {
                style: NecklineStyle::Round,
                depth: 8.0,
                width: None,
            },
            &gauge(22.0, 30.0),
            110,
        )
        .unwrap();
        let sections = InstructionGenerator::new(CraftType::Knitting)
            .generate("Front neck", &n.schedule, None, Setup::None, FabricSide::RightSide)
            .unwrap();

        assert_eq!(sections.len(), 2);
        for section in &sections {
            assert_eq!(section.final_stitches(), n.shoulder_stitches);
        }
        assert_eq!(sections[0].steps[0].stitches, (110 - n.center_stitches) / 2);
    }

    #[test]
    fn validator_checks_templates() {
        let templates = TemplateSet::new().with_override(
            CraftType::Crochet,
            InstructionKind::Decrease,
            "{shaping} ({stitches} sts)",
        );
        assert!(DomainValidator::validate_templates(&templates).is_ok());
    }

    #[test]
    fn validator_checks_patterns() {
        let pattern = StitchPattern {
            id: "p".into(),
            name: "P".into(),
            craft: CraftType::Knitting,
            repeat_width: 0,
            rows: vec![PatternRow::new("knit")],
            balance_stitches: 0,
        };
        assert!(matches!(
            DomainValidator::validate_pattern(&pattern),
            Err(DomainError::InvalidPattern(_))
        ));
    }
}
