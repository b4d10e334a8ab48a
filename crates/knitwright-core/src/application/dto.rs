//! Request and result records of the calculation use case.
//!
//! Construction parameters are a tagged union keyed by `method`; each variant
//! carries only the fields its construction needs:
//!
//! ```toml
//! name = "Shawl"
//! gauge = { stitches_per_10 = 20, rows_per_10 = 28 }
//!
//! [construction]
//! method = "top_down_center_out"
//! wingspan = 150
//! depth = 75
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{
    BodyMeasurements, CraftType, EasePreference, FinishedMeasurements, GarmentType, GaugeSpec,
    InstructionSection, Language, NecklineParams, ShapingSchedule, TriangleDimensions,
    TriangleMethod, Warning,
};
use crate::error::KnitError;

/// One garment piece to calculate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceRequest {
    pub name: String,
    pub gauge: GaugeSpec,
    #[serde(default)]
    pub craft: CraftType,
    #[serde(default)]
    pub language: Language,
    /// Rewrite the instructions with standard abbreviations.
    #[serde(default)]
    pub abbreviate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stitch_pattern: Option<PatternRef>,
    pub construction: Construction,
}

/// A stitch pattern from the catalog, placed on the piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRef {
    pub id: String,
    #[serde(default)]
    pub edge_stitches: u32,
    #[serde(default)]
    pub buffer_stitches: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Construction {
    TopDownCenterOut { wingspan: f64, depth: f64 },
    SideToSide { wingspan: f64, depth: f64 },
    BottomUp { wingspan: f64, depth: f64 },
    /// Flat body panel (front or back) sized from body measurements.
    Panel(PanelSpec),
}

impl Construction {
    /// Method and target size of a triangular construction.
    pub fn triangle(&self) -> Option<(TriangleMethod, TriangleDimensions)> {
        let (method, wingspan, depth) = match *self {
            Self::TopDownCenterOut { wingspan, depth } => {
                (TriangleMethod::TopDownCenterOut, wingspan, depth)
            }
            Self::SideToSide { wingspan, depth } => (TriangleMethod::SideToSide, wingspan, depth),
            Self::BottomUp { wingspan, depth } => (TriangleMethod::BottomUp, wingspan, depth),
            Self::Panel(_) => return None,
        };
        Some((method, TriangleDimensions { wingspan, depth }))
    }
}

/// Body panel parameters. Armhole and neckline dimensions use the
/// measurement unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    #[serde(default)]
    pub garment: GarmentType,
    pub measurements: BodyMeasurements,
    #[serde(default)]
    pub ease: EasePreference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armhole: Option<ArmholeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neckline: Option<NecklineParams>,
}

/// Armhole request. Missing dimensions default from the finished
/// measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum ArmholeSpec {
    SetIn {
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        depth: Option<f64>,
    },
    Raglan {
        #[serde(default)]
        width: Option<f64>,
        line_length: f64,
    },
}

/// One shaping schedule of a piece, labelled by the part it shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePart {
    pub name: String,
    pub schedule: ShapingSchedule,
}

/// Stitch and row totals of a piece plus the schedules that shape it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceSchedule {
    pub cast_on: u32,
    pub final_stitches: u32,
    pub total_rows: u32,
    pub parts: Vec<SchedulePart>,
    /// Recomputed dimensions of a triangle, in the gauge unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achieved: Option<TriangleDimensions>,
}

/// Outcome of one piece. A hard error leaves `success` false with the
/// message in `errors`; warnings never affect `success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub piece: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurements: Option<FinishedMeasurements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<PieceSchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<InstructionSection>>,
    #[serde(default)]
    pub warnings: Vec<Warning>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl CalculationResult {
    pub fn failure(piece: impl Into<String>, error: &KnitError) -> Self {
        Self {
            piece: piece.into(),
            success: false,
            measurements: None,
            schedule: None,
            instructions: None,
            warnings: Vec::new(),
            errors: vec![error.to_string()],
        }
    }
}
