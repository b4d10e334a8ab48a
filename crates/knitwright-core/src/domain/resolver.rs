//! Measurement/ease resolution: body measurements plus ease become finished
//! garment dimensions.

use crate::domain::{
    entities::{BodyMeasurements, EasePreference, FinishedMeasurements},
    error::DomainError,
    registry,
    value_objects::{GarmentType, MeasurementField},
    warning::{Warning, WarningCode},
};

/// Finished dimensions plus any plausibility warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMeasurements {
    pub finished: FinishedMeasurements,
    pub warnings: Vec<Warning>,
}

/// Apply `ease` to `body` for a `garment`.
///
/// Per field: `body + explicit` when an explicit ease is given, otherwise
/// `body + base * multiplier[garment][field]`. Absent fields stay absent.
///
/// # Errors
///
/// - [`DomainError::MissingMeasurement`] when chest or torso length is absent.
/// - [`DomainError::InvalidShapingInput`] when a supplied measurement is not
///   positive, or ease would make a finished dimension non-positive.
pub fn resolve(
    body: &BodyMeasurements,
    ease: &EasePreference,
    garment: GarmentType,
) -> Result<ResolvedMeasurements, DomainError> {
    let unit = body.unit;
    let base = ease.base_in(unit);

    let finish = |field: MeasurementField| -> Result<Option<f64>, DomainError> {
        let Some(raw) = body.get(field) else {
            return Ok(None);
        };
        if !(raw.is_finite() && raw > 0.0) {
            return Err(DomainError::invalid_input(format!(
                "Measurement '{field}' must be greater than 0"
            )));
        }
        let delta = ease
            .explicit(field)
            .unwrap_or_else(|| base * registry::ease_multiplier(garment, field));
        let finished = raw + delta;
        if finished <= 0.0 {
            return Err(DomainError::invalid_input(format!(
                "Ease of {delta} {unit} leaves no fabric for '{field}'"
            )));
        }
        Ok(Some(finished))
    };

    let chest = finish(MeasurementField::Chest)?.ok_or(DomainError::MissingMeasurement {
        field: MeasurementField::Chest.as_str(),
    })?;
    let torso_length =
        finish(MeasurementField::TorsoLength)?.ok_or(DomainError::MissingMeasurement {
            field: MeasurementField::TorsoLength.as_str(),
        })?;

    let finished = FinishedMeasurements {
        unit,
        chest,
        torso_length,
        waist: finish(MeasurementField::Waist)?,
        hip: finish(MeasurementField::Hip)?,
        shoulder_width: finish(MeasurementField::ShoulderWidth)?,
        arm_length: finish(MeasurementField::ArmLength)?,
        upper_arm: finish(MeasurementField::UpperArm)?,
        wrist: finish(MeasurementField::Wrist)?,
        neck: finish(MeasurementField::Neck)?,
        armhole_depth: finish(MeasurementField::ArmholeDepth)?,
    };

    let warnings = plausibility_warnings(&finished);
    Ok(ResolvedMeasurements { finished, warnings })
}

/// Advisory check of every present finished dimension against human ranges.
pub fn plausibility_warnings(finished: &FinishedMeasurements) -> Vec<Warning> {
    MeasurementField::ALL
        .into_iter()
        .filter_map(|field| {
            let value = finished.get(field)?;
            let (lo, hi) = registry::plausible_range_cm(field)?;
            let cm = finished.unit.to_cm(value);
            if cm < lo || cm > hi {
                let unit = finished.unit;
                Some(Warning::new(
                    WarningCode::ImplausibleMeasurement,
                    format!(
                        "Finished {field} of {value:.1} {unit} is outside the usual range \
                         ({:.1}-{:.1} {unit}); double-check the measurement",
                        unit.from_cm(lo),
                        unit.from_cm(hi)
                    ),
                ))
            } else {
                None
            }
        })
        .collect()
}
