//! Body measurements, ease preferences and the finished dimensions derived
//! from them.
//!
//! Every location is optional. An absent value stays absent all the way to
//! [`FinishedMeasurements`]; it is never silently treated as zero.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{FitPreset, LengthUnit, MeasurementField};

/// Raw body measurements, all in `unit`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyMeasurements {
    pub unit: LengthUnit,
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub hip: Option<f64>,
    pub torso_length: Option<f64>,
    pub shoulder_width: Option<f64>,
    pub arm_length: Option<f64>,
    pub upper_arm: Option<f64>,
    pub wrist: Option<f64>,
    pub neck: Option<f64>,
    pub armhole_depth: Option<f64>,
}

impl BodyMeasurements {
    pub fn new(unit: LengthUnit) -> Self {
        Self {
            unit,
            ..Self::default()
        }
    }

    pub fn with(mut self, field: MeasurementField, value: f64) -> Self {
        *self.slot_mut(field) = Some(value);
        self
    }

    pub fn get(&self, field: MeasurementField) -> Option<f64> {
        match field {
            MeasurementField::Chest => self.chest,
            MeasurementField::Waist => self.waist,
            MeasurementField::Hip => self.hip,
            MeasurementField::TorsoLength => self.torso_length,
            MeasurementField::ShoulderWidth => self.shoulder_width,
            MeasurementField::ArmLength => self.arm_length,
            MeasurementField::UpperArm => self.upper_arm,
            MeasurementField::Wrist => self.wrist,
            MeasurementField::Neck => self.neck,
            MeasurementField::ArmholeDepth => self.armhole_depth,
        }
    }

    fn slot_mut(&mut self, field: MeasurementField) -> &mut Option<f64> {
        match field {
            MeasurementField::Chest => &mut self.chest,
            MeasurementField::Waist => &mut self.waist,
            MeasurementField::Hip => &mut self.hip,
            MeasurementField::TorsoLength => &mut self.torso_length,
            MeasurementField::ShoulderWidth => &mut self.shoulder_width,
            MeasurementField::ArmLength => &mut self.arm_length,
            MeasurementField::UpperArm => &mut self.upper_arm,
            MeasurementField::Wrist => &mut self.wrist,
            MeasurementField::Neck => &mut self.neck,
            MeasurementField::ArmholeDepth => &mut self.armhole_depth,
        }
    }
}

/// Ease wishes: a base ease plus optional per-location overrides.
///
/// Explicit overrides are added verbatim. Locations without one receive
/// `base * multiplier[garment][field]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EasePreference {
    /// Base ease in the measurement unit. Falls back to `fit` when absent.
    pub base: Option<f64>,
    pub fit: FitPreset,
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub hip: Option<f64>,
    pub upper_arm: Option<f64>,
    pub wrist: Option<f64>,
    pub neck: Option<f64>,
    pub torso_length: Option<f64>,
    pub arm_length: Option<f64>,
}

impl EasePreference {
    pub fn from_fit(fit: FitPreset) -> Self {
        Self {
            fit,
            ..Self::default()
        }
    }

    pub fn with_base(mut self, base: f64) -> Self {
        self.base = Some(base);
        self
    }

    pub fn with_explicit(mut self, field: MeasurementField, ease: f64) -> Self {
        match field {
            MeasurementField::Chest => self.chest = Some(ease),
            MeasurementField::Waist => self.waist = Some(ease),
            MeasurementField::Hip => self.hip = Some(ease),
            MeasurementField::UpperArm => self.upper_arm = Some(ease),
            MeasurementField::Wrist => self.wrist = Some(ease),
            MeasurementField::Neck => self.neck = Some(ease),
            MeasurementField::TorsoLength => self.torso_length = Some(ease),
            MeasurementField::ArmLength => self.arm_length = Some(ease),
            // Structural widths/depths take no ease.
            MeasurementField::ShoulderWidth | MeasurementField::ArmholeDepth => {}
        }
        self
    }

    pub fn explicit(&self, field: MeasurementField) -> Option<f64> {
        match field {
            MeasurementField::Chest => self.chest,
            MeasurementField::Waist => self.waist,
            MeasurementField::Hip => self.hip,
            MeasurementField::UpperArm => self.upper_arm,
            MeasurementField::Wrist => self.wrist,
            MeasurementField::Neck => self.neck,
            MeasurementField::TorsoLength => self.torso_length,
            MeasurementField::ArmLength => self.arm_length,
            MeasurementField::ShoulderWidth | MeasurementField::ArmholeDepth => None,
        }
    }

    /// Base ease expressed in `unit`.
    pub fn base_in(&self, unit: LengthUnit) -> f64 {
        self.base
            .unwrap_or_else(|| unit.from_cm(self.fit.base_ease_cm()))
    }
}

/// Body plus ease. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedMeasurements {
    pub unit: LengthUnit,
    pub chest: f64,
    pub torso_length: f64,
    pub waist: Option<f64>,
    pub hip: Option<f64>,
    pub shoulder_width: Option<f64>,
    pub arm_length: Option<f64>,
    pub upper_arm: Option<f64>,
    pub wrist: Option<f64>,
    pub neck: Option<f64>,
    pub armhole_depth: Option<f64>,
}

impl FinishedMeasurements {
    pub fn get(&self, field: MeasurementField) -> Option<f64> {
        match field {
            MeasurementField::Chest => Some(self.chest),
            MeasurementField::TorsoLength => Some(self.torso_length),
            MeasurementField::Waist => self.waist,
            MeasurementField::Hip => self.hip,
            MeasurementField::ShoulderWidth => self.shoulder_width,
            MeasurementField::ArmLength => self.arm_length,
            MeasurementField::UpperArm => self.upper_arm,
            MeasurementField::Wrist => self.wrist,
            MeasurementField::Neck => self.neck,
            MeasurementField::ArmholeDepth => self.armhole_depth,
        }
    }

    /// Finished width of one flat front or back panel.
    pub fn panel_width(&self) -> f64 {
        self.chest / 2.0
    }
}
