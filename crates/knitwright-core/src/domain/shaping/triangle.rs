//! Closed-shape (triangular shawl) shaping.
//!
//! Three mutually exclusive constructions:
//!
//! | Method               | Cast on          | Phases                                   |
//! |----------------------|------------------|------------------------------------------|
//! | top-down centre-out  | 3                | +4 (edges and spine) every 2 rows        |
//! | side-to-side         | 4                | +1 one edge every 2 rows, then −1 same   |
//! | bottom-up            | ≈ wingspan × gauge | −2 (one each edge) every 2 rows to 3   |
//!
//! Targets only drive the event counts through the rounded gauge; the
//! achieved wingspan/depth are then recomputed from those counts and compared
//! against per-method tolerances.

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::{Gauge, PhaseLabel, ShapingEvent, ShapingPhase, ShapingSchedule, round_up_to_parity},
    error::DomainError,
    shaping::{deviation, require_positive},
    value_objects::{FabricSide, Placement, ShapingKind, Side, TriangleMethod},
    warning::{Warning, WarningCode},
};

/// Wingspan of a top-down centre-out triangle per unit of final stitch width.
///
/// Calibration value: the live stitches run along both lower edges, which
/// block out to roughly 0.7 of their knitted width at the top edge. Validate
/// against a blocked swatch before changing.
pub const TOP_DOWN_WINGSPAN_FACTOR: f64 = 0.7;

const TOP_DOWN_CAST_ON: u32 = 3;
const SIDE_TO_SIDE_CAST_ON: u32 = 4;
const BOTTOM_UP_FINAL: u32 = 3;
const ROWS_PER_EVENT: u32 = 2;

/// Allowed relative deviation `(wingspan, depth)` per method.
pub const fn tolerances(method: TriangleMethod) -> (f64, f64) {
    match method {
        TriangleMethod::TopDownCenterOut => (0.15, 0.10),
        TriangleMethod::SideToSide => (0.10, 0.15),
        TriangleMethod::BottomUp => (0.05, 0.10),
    }
}

/// Wingspan and depth, in the gauge unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangleDimensions {
    pub wingspan: f64,
    pub depth: f64,
}

/// Result of shaping a triangle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriangleShaping {
    pub method: TriangleMethod,
    pub cast_on: u32,
    pub schedule: ShapingSchedule,
    pub target: TriangleDimensions,
    pub achieved: TriangleDimensions,
    pub warnings: Vec<Warning>,
}

impl TriangleShaping {
    /// The increase phase (top-down, side-to-side) or the single decrease
    /// phase (bottom-up).
    pub fn phase_1(&self) -> Option<&ShapingPhase> {
        self.schedule.phase(0)
    }

    /// The decrease phase of a side-to-side triangle; `None` otherwise.
    pub fn phase_2(&self) -> Option<&ShapingPhase> {
        self.schedule.phase(1)
    }
}

/// Compute the schedule for a triangle of `target` size.
///
/// # Errors
///
/// [`DomainError::InvalidShapingInput`] when wingspan or depth is not
/// positive, or the depth is too small for a single shaping event.
pub fn shape_triangle(
    method: TriangleMethod,
    target: TriangleDimensions,
    gauge: &Gauge,
) -> Result<TriangleShaping, DomainError> {
    require_positive(target.wingspan, "Target wingspan")?;
    require_positive(target.depth, "Target depth")?;

    let (cast_on, phases) = match method {
        TriangleMethod::TopDownCenterOut => top_down(target, gauge)?,
        TriangleMethod::SideToSide => side_to_side(target, gauge)?,
        TriangleMethod::BottomUp => bottom_up(target, gauge),
    };

    let schedule = ShapingSchedule::new(cast_on, phases, 0)?;
    let achieved = achieved_dimensions(method, &schedule, gauge);
    let warnings = deviation_warnings(method, target, achieved, gauge);

    Ok(TriangleShaping {
        method,
        cast_on,
        schedule,
        target,
        achieved,
        warnings,
    })
}

fn top_down(
    target: TriangleDimensions,
    gauge: &Gauge,
) -> Result<(u32, Vec<ShapingPhase>), DomainError> {
    let depth_rows = gauge.length_to_rows(target.depth);
    let events = depth_rows / ROWS_PER_EVENT;
    if events == 0 {
        return Err(DomainError::invalid_input(format!(
            "Target depth of {} {} is shorter than one shaping interval",
            target.depth,
            gauge.unit()
        )));
    }
    let phase = ShapingPhase::new(PhaseLabel::Increase, Side::Both).push(
        ShapingEvent::new(ShapingKind::Increase, 4, Placement::EdgesAndSpine)
            .every(ROWS_PER_EVENT, events)
            .on(FabricSide::RightSide),
    );
    Ok((TOP_DOWN_CAST_ON, vec![phase]))
}

fn side_to_side(
    target: TriangleDimensions,
    gauge: &Gauge,
) -> Result<(u32, Vec<ShapingPhase>), DomainError> {
    let depth_stitches = gauge.length_to_stitches(target.depth);
    if depth_stitches <= SIDE_TO_SIDE_CAST_ON {
        return Err(DomainError::invalid_input(format!(
            "Target depth of {} {} needs more than {SIDE_TO_SIDE_CAST_ON} stitches for side-to-side construction",
            target.depth,
            gauge.unit()
        )));
    }
    let events = depth_stitches - SIDE_TO_SIDE_CAST_ON;
    let edge = |kind| {
        ShapingEvent::new(kind, 1, Placement::OneEdge)
            .every(ROWS_PER_EVENT, events)
            .on(FabricSide::RightSide)
    };
    let grow = ShapingPhase::new(PhaseLabel::Increase, Side::Both).push(edge(ShapingKind::Increase));
    let shrink =
        ShapingPhase::new(PhaseLabel::Decrease, Side::Both).push(edge(ShapingKind::Decrease));
    debug_assert_eq!(grow.total_shaping_rows(), shrink.total_shaping_rows());
    Ok((SIDE_TO_SIDE_CAST_ON, vec![grow, shrink]))
}

fn bottom_up(target: TriangleDimensions, gauge: &Gauge) -> (u32, Vec<ShapingPhase>) {
    // Odd so that pairs of decreases land exactly on 3.
    let cast_on = round_up_to_parity(gauge.length_to_stitches(target.wingspan), BOTTOM_UP_FINAL)
        .max(BOTTOM_UP_FINAL);
    let events = (cast_on - BOTTOM_UP_FINAL) / 2;
    let phase = ShapingPhase::new(PhaseLabel::Decrease, Side::Both).push(
        ShapingEvent::new(ShapingKind::Decrease, 2, Placement::BothEdges)
            .every(ROWS_PER_EVENT, events)
            .on(FabricSide::RightSide),
    );
    (cast_on, vec![phase])
}

/// Recompute wingspan and depth from the rounded event counts.
pub fn achieved_dimensions(
    method: TriangleMethod,
    schedule: &ShapingSchedule,
    gauge: &Gauge,
) -> TriangleDimensions {
    let rows = schedule.shaping_rows();
    match method {
        TriangleMethod::TopDownCenterOut => TriangleDimensions {
            wingspan: gauge.stitches_to_length(schedule.final_stitches) * TOP_DOWN_WINGSPAN_FACTOR,
            depth: gauge.rows_to_length(rows),
        },
        TriangleMethod::SideToSide => {
            let peak = schedule
                .phase(0)
                .map_or(0, |p| p.stitch_delta().max(0) as u32);
            TriangleDimensions {
                wingspan: gauge.rows_to_length(rows),
                depth: gauge.stitches_to_length(schedule.starting_stitches + peak),
            }
        }
        TriangleMethod::BottomUp => TriangleDimensions {
            wingspan: gauge.stitches_to_length(schedule.starting_stitches),
            depth: gauge.rows_to_length(rows),
        },
    }
}

fn deviation_warnings(
    method: TriangleMethod,
    target: TriangleDimensions,
    achieved: TriangleDimensions,
    gauge: &Gauge,
) -> Vec<Warning> {
    let (wingspan_tol, depth_tol) = tolerances(method);
    let unit = gauge.unit();
    [
        ("wingspan", target.wingspan, achieved.wingspan, wingspan_tol),
        ("depth", target.depth, achieved.depth, depth_tol),
    ]
    .into_iter()
    .filter_map(|(what, want, got, tol)| {
        let off = deviation(want, got);
        (off > tol).then(|| {
            Warning::new(
                WarningCode::DimensionDeviation,
                format!(
                    "Achieved {what} of {got:.1} {unit} is {:.0}% off the {want:.1} {unit} target \
                     (tolerance \u{b1}{:.0}% for {method})",
                    off * 100.0,
                    tol * 100.0
                ),
            )
        })
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::LengthUnit;

    fn gauge(st: f64, rows: f64) -> Gauge {
        Gauge::new(st, rows, LengthUnit::Centimeters).unwrap()
    }

    fn dims(wingspan: f64, depth: f64) -> TriangleDimensions {
        TriangleDimensions { wingspan, depth }
    }

    #[test]
    fn top_down_scenario() {
        let t = shape_triangle(
            TriangleMethod::TopDownCenterOut,
            dims(150.0, 75.0),
            &gauge(20.0, 28.0),
        )
        .unwrap();

        assert_eq!(t.cast_on, 3);
        let phase = t.phase_1().unwrap();
        assert_eq!(phase.stitches_per_event(), Some(4));
        assert_eq!(phase.shaping_frequency(), Some(2));
        assert_eq!(phase.event_count(), 105);
        assert!(t.phase_2().is_none());
        assert_eq!(t.schedule.final_stitches, 3 + 105 * 4);
        assert!(t.schedule.final_stitches > 3);
        assert!((127.5..=172.5).contains(&t.achieved.wingspan));
        assert!((67.5..=82.5).contains(&t.achieved.depth));
        assert!(t.warnings.is_empty());
    }

    #[test]
    fn bottom_up_scenario() {
        let t = shape_triangle(TriangleMethod::BottomUp, dims(120.0, 50.0), &gauge(20.0, 26.0))
            .unwrap();
        assert!((239..=241).contains(&t.cast_on));
        assert_eq!(t.schedule.final_stitches, 3);
        assert!((t.achieved.wingspan - 120.0).abs() / 120.0 <= 0.05);
        // The 2-row cadence makes this triangle much deeper than asked.
        assert!(t.warnings.iter().any(|w| w.message.contains("depth")));
    }

    #[test]
    fn side_to_side_is_symmetric() {
        let t = shape_triangle(TriangleMethod::SideToSide, dims(140.0, 50.0), &gauge(20.0, 28.0))
            .unwrap();
        let (grow, shrink) = (t.phase_1().unwrap(), t.phase_2().unwrap());
        assert_eq!(grow.total_shaping_rows(), shrink.total_shaping_rows());
        assert_eq!(grow.event_count(), 96);
        assert_eq!(t.schedule.final_stitches, t.cast_on);
        assert_eq!(t.cast_on, 4);
        assert!((t.achieved.depth - 50.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_positive_targets() {
        let g = gauge(20.0, 28.0);
        let err = shape_triangle(TriangleMethod::TopDownCenterOut, dims(0.0, 75.0), &g)
            .unwrap_err();
        assert_eq!(err.to_string(), "Target wingspan must be greater than 0");

        let err = shape_triangle(TriangleMethod::BottomUp, dims(120.0, -10.0), &g).unwrap_err();
        assert_eq!(err.to_string(), "Target depth must be greater than 0");
    }

    #[test]
    fn side_to_side_needs_room_to_grow() {
        let err = shape_triangle(TriangleMethod::SideToSide, dims(10.0, 1.0), &gauge(20.0, 28.0));
        assert!(matches!(err, Err(DomainError::InvalidShapingInput { .. })));
    }

    #[test]
    fn tiny_bottom_up_still_ends_on_three() {
        let t = shape_triangle(TriangleMethod::BottomUp, dims(0.5, 0.5), &gauge(20.0, 28.0))
            .unwrap();
        assert_eq!(t.cast_on, 3);
        assert_eq!(t.schedule.final_stitches, 3);
        assert!(t.phase_1().is_none());
    }
}
