//! Static numeric tables keyed by domain value objects.
//!
//! # Ease multipliers
//!
//! When a measurement has no explicit ease, the resolver applies
//! `base_ease * multiplier`. Each garment type is described exactly once by
//! its [`GarmentEaseDef`]; lookups are linear scans over a handful of rows.
//!
//! # Plausible ranges
//!
//! [`PLAUSIBLE_RANGES_CM`] bounds each finished measurement. Values outside
//! the range produce an advisory warning, never an error.
//!
//! # Adding a garment type
//!
//! 1. Add a variant to `GarmentType` in `value_objects.rs`
//! 2. Add one [`GarmentEaseDef`] entry to [`EASE_REGISTRY`]

use crate::domain::value_objects::{GarmentType, MeasurementField};

// ── Ease multipliers ─────────────────────────────────────────────────────────

/// Default ease multipliers for one garment type.
#[derive(Debug, Clone, Copy)]
pub struct GarmentEaseDef {
    pub garment: GarmentType,

    /// `(field, multiplier)` pairs. Fields not listed take no default ease.
    pub multipliers: &'static [(MeasurementField, f64)],
}

pub static EASE_REGISTRY: &[GarmentEaseDef] = &[
    GarmentEaseDef {
        garment: GarmentType::Sweater,
        multipliers: &[
            (MeasurementField::Chest, 1.0),
            (MeasurementField::Waist, 1.0),
            (MeasurementField::Hip, 1.0),
            (MeasurementField::UpperArm, 0.5),
            (MeasurementField::Wrist, 0.25),
            (MeasurementField::Neck, 0.25),
        ],
    },
    GarmentEaseDef {
        garment: GarmentType::Cardigan,
        // Worn over other layers.
        multipliers: &[
            (MeasurementField::Chest, 1.2),
            (MeasurementField::Waist, 1.2),
            (MeasurementField::Hip, 1.2),
            (MeasurementField::UpperArm, 0.6),
            (MeasurementField::Wrist, 0.3),
            (MeasurementField::Neck, 0.3),
        ],
    },
    GarmentEaseDef {
        garment: GarmentType::Vest,
        multipliers: &[
            (MeasurementField::Chest, 1.0),
            (MeasurementField::Waist, 1.0),
            (MeasurementField::Hip, 1.0),
            (MeasurementField::Neck, 0.25),
        ],
    },
    GarmentEaseDef {
        garment: GarmentType::Dress,
        multipliers: &[
            (MeasurementField::Chest, 1.0),
            (MeasurementField::Waist, 1.0),
            (MeasurementField::Hip, 1.5),
            (MeasurementField::UpperArm, 0.5),
            (MeasurementField::Wrist, 0.25),
            (MeasurementField::Neck, 0.25),
        ],
    },
];

/// Look up the registry entry for `garment`.
pub fn find_garment(garment: GarmentType) -> Option<&'static GarmentEaseDef> {
    EASE_REGISTRY.iter().find(|def| def.garment == garment)
}

/// Default ease multiplier for `field` on `garment`; 0.0 when unlisted.
pub fn ease_multiplier(garment: GarmentType, field: MeasurementField) -> f64 {
    find_garment(garment)
        .and_then(|def| def.multipliers.iter().find(|(f, _)| *f == field))
        .map_or(0.0, |(_, m)| *m)
}

// ── Plausible ranges ─────────────────────────────────────────────────────────

/// `(field, min_cm, max_cm)` for finished measurements.
pub static PLAUSIBLE_RANGES_CM: &[(MeasurementField, f64, f64)] = &[
    (MeasurementField::Chest, 50.0, 200.0),
    (MeasurementField::Waist, 40.0, 200.0),
    (MeasurementField::Hip, 50.0, 220.0),
    (MeasurementField::TorsoLength, 20.0, 120.0),
    (MeasurementField::ShoulderWidth, 20.0, 70.0),
    (MeasurementField::ArmLength, 20.0, 100.0),
    (MeasurementField::UpperArm, 15.0, 70.0),
    (MeasurementField::Wrist, 10.0, 35.0),
    (MeasurementField::Neck, 25.0, 60.0),
    (MeasurementField::ArmholeDepth, 12.0, 35.0),
];

pub fn plausible_range_cm(field: MeasurementField) -> Option<(f64, f64)> {
    PLAUSIBLE_RANGES_CM
        .iter()
        .find(|(f, _, _)| *f == field)
        .map(|(_, lo, hi)| (*lo, *hi))
}
