//! Domain value objects: units, crafts, fabric sides, shaping kinds and the
//! construction enums the schedulers dispatch on.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! Numeric tables keyed by these types (ease multipliers, plausible ranges)
//! live in `registry.rs`. This file only defines the types, their string
//! representations, and their `FromStr` parsers.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── LengthUnit ───────────────────────────────────────────────────────────────

/// Unit shared by measurements, ease and gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    #[serde(alias = "cm")]
    Centimeters,
    #[serde(alias = "in")]
    Inches,
}

impl LengthUnit {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Centimeters => "cm",
            Self::Inches => "in",
        }
    }

    /// Multiply a length in this unit by this factor to get centimeters.
    pub const fn cm_factor(&self) -> f64 {
        match self {
            Self::Centimeters => 1.0,
            Self::Inches => 2.54,
        }
    }

    pub fn to_cm(&self, length: f64) -> f64 {
        length * self.cm_factor()
    }

    pub fn from_cm(&self, cm: f64) -> f64 {
        cm / self.cm_factor()
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LengthUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cm" | "centimeters" | "centimetres" => Ok(Self::Centimeters),
            "in" | "inch" | "inches" => Ok(Self::Inches),
            other => Err(DomainError::InvalidRequest(format!(
                "unknown length unit: {other}"
            ))),
        }
    }
}

// ── CraftType ────────────────────────────────────────────────────────────────

/// The craft an instruction set is written for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CraftType {
    #[default]
    Knitting,
    Crochet,
}

impl CraftType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Knitting => "knitting",
            Self::Crochet => "crochet",
        }
    }
}

impl fmt::Display for CraftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CraftType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "knitting" | "knit" => Ok(Self::Knitting),
            "crochet" => Ok(Self::Crochet),
            other => Err(DomainError::InvalidRequest(format!("unknown craft: {other}"))),
        }
    }
}

// ── Language ─────────────────────────────────────────────────────────────────

/// Terminology dialect used by the abbreviation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Language {
    #[default]
    EnUs,
    EnUk,
}

impl Language {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnUs => "en-us",
            Self::EnUk => "en-uk",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "en-us" | "us" | "en" => Ok(Self::EnUs),
            "en-uk" | "en-gb" | "uk" | "gb" => Ok(Self::EnUk),
            other => Err(DomainError::InvalidRequest(format!(
                "unknown language: {other}"
            ))),
        }
    }
}

// ── FabricSide ───────────────────────────────────────────────────────────────

/// Right side (public face) or wrong side of the fabric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FabricSide {
    #[default]
    RightSide,
    WrongSide,
}

impl FabricSide {
    pub const fn abbreviation(&self) -> &'static str {
        match self {
            Self::RightSide => "RS",
            Self::WrongSide => "WS",
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::RightSide => Self::WrongSide,
            Self::WrongSide => Self::RightSide,
        }
    }

    /// Side of row `row` (1-based) in flat work, given the side of row 1.
    pub const fn of_row(first: FabricSide, row: u32) -> Self {
        if row % 2 == 1 { first } else { first.opposite() }
    }
}

impl fmt::Display for FabricSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

// ── Side ─────────────────────────────────────────────────────────────────────

/// Which part of a piece a shaping phase belongs to.
///
/// `Both` covers the full width of the fabric. `Left` and `Right` are the two
/// halves worked separately after a split (necklines).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Both,
    Left,
    Right,
}

impl Side {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Both => "both",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── ShapingKind / Placement ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapingKind {
    BindOff,
    Decrease,
    Increase,
}

impl ShapingKind {
    /// +1 for increases, -1 for bind-offs and decreases.
    pub const fn sign(&self) -> i64 {
        match self {
            Self::Increase => 1,
            Self::BindOff | Self::Decrease => -1,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BindOff => "bind_off",
            Self::Decrease => "decrease",
            Self::Increase => "increase",
        }
    }
}

impl fmt::Display for ShapingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where on the row a shaping event is worked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// At the start of the row (bind-offs worked on consecutive rows).
    RowStart,
    /// One stitch at each end of the row.
    BothEdges,
    /// A single edge of the fabric.
    OneEdge,
    /// One stitch at each edge plus two at a centre spine.
    EdgesAndSpine,
    /// The neck edge of a split side.
    NeckEdge,
    /// A centred block, splitting the fabric into two sides.
    Center,
}

// ── Garments ─────────────────────────────────────────────────────────────────

/// Garment type, selecting the default ease multiplier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GarmentType {
    #[default]
    Sweater,
    Cardigan,
    Vest,
    Dress,
}

impl GarmentType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sweater => "sweater",
            Self::Cardigan => "cardigan",
            Self::Vest => "vest",
            Self::Dress => "dress",
        }
    }
}

impl fmt::Display for GarmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GarmentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sweater" | "pullover" | "jumper" => Ok(Self::Sweater),
            "cardigan" => Ok(Self::Cardigan),
            "vest" | "tank" => Ok(Self::Vest),
            "dress" => Ok(Self::Dress),
            other => Err(DomainError::InvalidRequest(format!(
                "unknown garment type: {other}"
            ))),
        }
    }
}

/// Measurement locations a body record may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementField {
    Chest,
    Waist,
    Hip,
    TorsoLength,
    ShoulderWidth,
    ArmLength,
    UpperArm,
    Wrist,
    Neck,
    ArmholeDepth,
}

impl MeasurementField {
    pub const ALL: [MeasurementField; 10] = [
        Self::Chest,
        Self::Waist,
        Self::Hip,
        Self::TorsoLength,
        Self::ShoulderWidth,
        Self::ArmLength,
        Self::UpperArm,
        Self::Wrist,
        Self::Neck,
        Self::ArmholeDepth,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chest => "chest",
            Self::Waist => "waist",
            Self::Hip => "hip",
            Self::TorsoLength => "torso_length",
            Self::ShoulderWidth => "shoulder_width",
            Self::ArmLength => "arm_length",
            Self::UpperArm => "upper_arm",
            Self::Wrist => "wrist",
            Self::Neck => "neck",
            Self::ArmholeDepth => "armhole_depth",
        }
    }
}

impl fmt::Display for MeasurementField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named ease presets. The value is the base ease in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitPreset {
    Negative,
    Close,
    #[default]
    Classic,
    Relaxed,
    Oversized,
}

impl FitPreset {
    pub const fn base_ease_cm(&self) -> f64 {
        match self {
            Self::Negative => -5.0,
            Self::Close => 0.0,
            Self::Classic => 5.0,
            Self::Relaxed => 10.0,
            Self::Oversized => 20.0,
        }
    }
}

// ── Construction styles ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NecklineStyle {
    #[default]
    Round,
    Scoop,
}

impl NecklineStyle {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Round => "round",
            Self::Scoop => "scoop",
        }
    }
}

impl fmt::Display for NecklineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construction method of a closed (triangular) shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriangleMethod {
    TopDownCenterOut,
    SideToSide,
    BottomUp,
}

impl TriangleMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TopDownCenterOut => "top_down_center_out",
            Self::SideToSide => "side_to_side",
            Self::BottomUp => "bottom_up",
        }
    }
}

impl fmt::Display for TriangleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriangleMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "top_down_center_out" | "top_down" => Ok(Self::TopDownCenterOut),
            "side_to_side" => Ok(Self::SideToSide),
            "bottom_up" => Ok(Self::BottomUp),
            other => Err(DomainError::InvalidRequest(format!(
                "unknown triangle construction: {other}"
            ))),
        }
    }
}
