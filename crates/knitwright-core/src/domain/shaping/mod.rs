//! Shaping schedulers.
//!
//! Three sibling algorithms produce a [`ShapingSchedule`](crate::domain::entities::ShapingSchedule):
//!
//! - [`neckline`]: centre bind-off, then mirrored rapid/gradual neck-edge decreases
//! - [`armhole`]: set-in (bind-off, rapid, gradual) or raglan (one diagonal line)
//! - [`triangle`]: closed shawl shapes, three constructions
//!
//! All of them reject non-positive target dimensions with
//! [`DomainError::InvalidShapingInput`] and report proportion or deviation
//! anomalies as [`Warning`](crate::domain::Warning)s.

pub mod armhole;
pub mod neckline;
pub mod triangle;

pub use armhole::{ArmholeParams, ArmholeShaping, ArmholeStyle, shape_armhole};
pub use neckline::{NecklineParams, NecklineShaping, shape_neckline};
pub use triangle::{TriangleDimensions, TriangleShaping, shape_triangle};

use crate::domain::{error::DomainError, value_objects::FabricSide};

/// `"{what} must be greater than 0"` unless `value` is finite and positive.
pub(crate) fn require_positive(value: f64, what: &str) -> Result<(), DomainError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DomainError::invalid_input(format!("{what} must be greater than 0")))
    }
}

pub(crate) fn require_stitches(panel_stitches: u32) -> Result<(), DomainError> {
    if panel_stitches == 0 {
        return Err(DomainError::invalid_input(
            "Starting panel stitch count must be greater than 0",
        ));
    }
    Ok(())
}

/// Relative deviation of `achieved` from `target`.
pub(crate) fn deviation(target: f64, achieved: f64) -> f64 {
    ((achieved - target) / target).abs()
}

/// Rapid/gradual decrease cadence for one depth band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cadence {
    pub rapid_interval: u32,
    pub gradual_interval: u32,
    /// Share of the decreases worked at the rapid interval.
    pub rapid_ratio: f64,
}

impl Cadence {
    pub const fn new(rapid_interval: u32, gradual_interval: u32, rapid_ratio: f64) -> Self {
        Self {
            rapid_interval,
            gradual_interval,
            rapid_ratio,
        }
    }

    /// Split `count` decreases between the two phases.
    pub fn plan(&self, count: u32) -> CadencePlan {
        let rapid = ((f64::from(count) * self.rapid_ratio).round() as u32).min(count);
        CadencePlan {
            rapid,
            rapid_interval: self.rapid_interval,
            gradual: count - rapid,
            gradual_interval: self.gradual_interval,
        }
    }
}

/// Concrete decrease counts and intervals for a rapid + gradual pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CadencePlan {
    pub rapid: u32,
    pub rapid_interval: u32,
    pub gradual: u32,
    pub gradual_interval: u32,
}

impl CadencePlan {
    pub fn rows(&self) -> u32 {
        self.rapid * self.rapid_interval + self.gradual * self.gradual_interval
    }

    /// Tighten intervals, gradual first, until the plan fits in `rows`.
    ///
    /// Returns whether any interval changed. A plan with more decreases than
    /// rows stops at every-row shaping and still overruns.
    pub fn compress(&mut self, rows: u32) -> bool {
        let mut changed = false;
        while self.rows() > rows {
            if self.gradual > 0 && self.gradual_interval > self.rapid_interval {
                self.gradual_interval -= 1;
            } else if self.rapid_interval > 1 {
                self.rapid_interval -= 1;
                self.gradual_interval = self.gradual_interval.min(self.rapid_interval);
            } else {
                break;
            }
            changed = true;
        }
        changed
    }
}

/// Shaping rows on an even cadence all fall on the right side.
pub(crate) fn cadence_side(interval: u32) -> Option<FabricSide> {
    (interval % 2 == 0).then_some(FabricSide::RightSide)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_splits_by_ratio() {
        let plan = Cadence::new(2, 4, 0.5).plan(15);
        assert_eq!((plan.rapid, plan.gradual), (8, 7));
        assert_eq!(plan.rows(), 16 + 28);
    }

    #[test]
    fn compress_tightens_gradual_first() {
        let mut plan = Cadence::new(2, 4, 0.5).plan(12);
        assert!(plan.compress(30));
        assert_eq!(plan.rapid_interval, 2);
        assert_eq!(plan.gradual_interval, 3);
        assert!(plan.rows() <= 30);
    }

    #[test]
    fn compress_stops_at_every_row() {
        let mut plan = Cadence::new(2, 6, 0.4).plan(10);
        assert!(plan.compress(4));
        assert_eq!((plan.rapid_interval, plan.gradual_interval), (1, 1));
        assert_eq!(plan.rows(), 10);
    }

    #[test]
    fn compress_is_a_no_op_when_it_fits() {
        let mut plan = Cadence::new(1, 3, 0.6).plan(5);
        assert!(!plan.compress(100));
    }

    #[test]
    fn positive_check_message() {
        assert_eq!(
            require_positive(0.0, "Target depth").unwrap_err().to_string(),
            "Target depth must be greater than 0"
        );
        assert!(require_positive(f64::INFINITY, "x").is_err());
        assert!(require_positive(0.1, "x").is_ok());
    }
}
