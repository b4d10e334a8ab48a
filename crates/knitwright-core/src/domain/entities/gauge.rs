//! Gauge and the length ⇄ stitch/row conversions built on it.
//!
//! Conversions round to the nearest integer. Callers that need a particular
//! parity (symmetric shaping, centred blocks) adjust explicitly at the call
//! site with [`round_up_to_parity`]; the converter itself never fails and
//! never second-guesses parity.

use serde::{Deserialize, Serialize};

use crate::domain::{error::DomainError, value_objects::LengthUnit};

/// Stitches and rows per 10 length units.
///
/// A `Gauge` is only constructible through [`Gauge::new`], so both values are
/// always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gauge {
    stitches_per_10: f64,
    rows_per_10: f64,
    unit: LengthUnit,
}

impl Gauge {
    pub fn new(stitches_per_10: f64, rows_per_10: f64, unit: LengthUnit) -> Result<Self, DomainError> {
        if !(stitches_per_10.is_finite() && stitches_per_10 > 0.0) {
            return Err(DomainError::InvalidGauge {
                reason: format!(
                    "stitches per 10 {unit} must be greater than 0 (got {stitches_per_10})"
                ),
            });
        }
        if !(rows_per_10.is_finite() && rows_per_10 > 0.0) {
            return Err(DomainError::InvalidGauge {
                reason: format!("rows per 10 {unit} must be greater than 0 (got {rows_per_10})"),
            });
        }
        Ok(Self {
            stitches_per_10,
            rows_per_10,
            unit,
        })
    }

    pub const fn stitches_per_10(&self) -> f64 {
        self.stitches_per_10
    }

    pub const fn rows_per_10(&self) -> f64 {
        self.rows_per_10
    }

    pub const fn unit(&self) -> LengthUnit {
        self.unit
    }

    pub fn stitches_per_unit(&self) -> f64 {
        self.stitches_per_10 / 10.0
    }

    pub fn rows_per_unit(&self) -> f64 {
        self.rows_per_10 / 10.0
    }

    /// `round(length * stitches_per_10 / 10)`, clamped at zero.
    pub fn length_to_stitches(&self, length: f64) -> u32 {
        to_count(length * self.stitches_per_unit())
    }

    /// `round(length * rows_per_10 / 10)`, clamped at zero.
    pub fn length_to_rows(&self, length: f64) -> u32 {
        to_count(length * self.rows_per_unit())
    }

    pub fn stitches_to_length(&self, stitches: u32) -> f64 {
        f64::from(stitches) / self.stitches_per_unit()
    }

    pub fn rows_to_length(&self, rows: u32) -> f64 {
        f64::from(rows) / self.rows_per_unit()
    }
}

/// Wire form of a gauge. Validated into a [`Gauge`] with `TryFrom`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaugeSpec {
    pub stitches_per_10: f64,
    pub rows_per_10: f64,
    #[serde(default)]
    pub unit: LengthUnit,
}

impl TryFrom<GaugeSpec> for Gauge {
    type Error = DomainError;

    fn try_from(spec: GaugeSpec) -> Result<Self, Self::Error> {
        Gauge::new(spec.stitches_per_10, spec.rows_per_10, spec.unit)
    }
}

impl<'de> Deserialize<'de> for Gauge {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let spec = GaugeSpec::deserialize(deserializer)?;
        Gauge::try_from(spec).map_err(serde::de::Error::custom)
    }
}

/// Free-function form of [`Gauge::length_to_stitches`].
pub fn length_to_stitches(length: f64, gauge: &Gauge) -> u32 {
    gauge.length_to_stitches(length)
}

/// Free-function form of [`Gauge::length_to_rows`].
pub fn length_to_rows(length: f64, gauge: &Gauge) -> u32 {
    gauge.length_to_rows(length)
}

/// Round `stitches` to the nearest `k * repeat + extra` (never below `extra`).
///
/// Ties round up. A `repeat` of 0 or 1 returns `stitches` unchanged.
pub fn align_to_repeat(stitches: u32, repeat: u32, extra: u32) -> u32 {
    if repeat <= 1 {
        return stitches;
    }
    let body = stitches.saturating_sub(extra);
    let lower = body / repeat * repeat;
    let upper = lower + repeat;
    let aligned = if body - lower < upper - body { lower } else { upper };
    aligned + extra
}

/// Smallest value `>= n` with the same parity as `like`.
pub const fn round_up_to_parity(n: u32, like: u32) -> u32 {
    if n % 2 == like % 2 { n } else { n + 1 }
}

fn to_count(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value.round().min(f64::from(u32::MAX)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gauge(st: f64, rows: f64) -> Gauge {
        Gauge::new(st, rows, LengthUnit::Centimeters).unwrap()
    }

    #[test]
    fn converts_with_nearest_rounding() {
        let g = gauge(20.0, 28.0);
        assert_eq!(g.length_to_stitches(10.0), 20);
        assert_eq!(g.length_to_stitches(10.3), 21); // 20.6
        assert_eq!(g.length_to_stitches(10.2), 20); // 20.4
        assert_eq!(g.length_to_rows(75.0), 210);
    }

    #[test]
    fn zero_and_negative_lengths_give_zero() {
        let g = gauge(22.0, 30.0);
        assert_eq!(g.length_to_stitches(0.0), 0);
        assert_eq!(g.length_to_rows(-4.0), 0);
    }

    #[test]
    fn rejects_non_positive_gauge() {
        assert!(matches!(
            Gauge::new(0.0, 28.0, LengthUnit::Centimeters),
            Err(DomainError::InvalidGauge { .. })
        ));
        assert!(Gauge::new(20.0, -1.0, LengthUnit::Centimeters).is_err());
        assert!(Gauge::new(f64::NAN, 20.0, LengthUnit::Centimeters).is_err());
    }

    #[test]
    fn deserialize_validates() {
        let ok: Gauge =
            serde_json::from_str(r#"{"stitches_per_10": 20, "rows_per_10": 28}"#).unwrap();
        assert_eq!(ok.unit(), LengthUnit::Centimeters);

        let bad = serde_json::from_str::<Gauge>(r#"{"stitches_per_10": 0, "rows_per_10": 28}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn inverse_conversions() {
        let g = gauge(20.0, 26.0);
        assert!((g.stitches_to_length(240) - 120.0).abs() < 1e-9);
        assert!((g.rows_to_length(26) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn aligns_to_nearest_repeat() {
        assert_eq!(align_to_repeat(101, 4, 2), 102);
        assert_eq!(align_to_repeat(99, 4, 2), 98);
        assert_eq!(align_to_repeat(100, 4, 2), 102); // tie rounds up
        assert_eq!(align_to_repeat(1, 6, 2), 2);
        assert_eq!(align_to_repeat(57, 1, 0), 57);
    }

    #[test]
    fn parity_adjustment() {
        assert_eq!(round_up_to_parity(10, 3), 11);
        assert_eq!(round_up_to_parity(11, 3), 11);
        assert_eq!(round_up_to_parity(12, 0), 12);
    }
}
