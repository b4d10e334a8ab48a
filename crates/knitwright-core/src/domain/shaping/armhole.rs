//! Armhole shaping, worked identically at both edges of a panel.
//!
//! Set-in armholes bind off a base block at the start of two consecutive rows
//! and take the rest out in a rapid and a gradual decrease phase. Raglans take
//! the whole width out along one diagonal line.

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::{Gauge, PhaseLabel, ShapingEvent, ShapingPhase, ShapingSchedule},
    error::DomainError,
    shaping::{Cadence, cadence_side, require_positive, require_stitches},
    value_objects::{Placement, ShapingKind, Side},
    warning::{Warning, WarningCode},
};

/// Share of the panel width both armholes together may remove.
const MAX_WIDTH_SHARE: f64 = 0.4;
/// Share of the panel height armhole shaping may take.
const MAX_HEIGHT_SHARE: f64 = 0.6;

/// Share of the armhole width bound off at the base, by width in cm.
pub fn base_bind_off_ratio(width_cm: f64) -> f64 {
    if width_cm > 15.0 {
        1.0 / 3.0
    } else if width_cm < 10.0 {
        1.0 / 6.0
    } else {
        1.0 / 4.0
    }
}

/// Decrease cadence after the base bind-off, by armhole depth in cm.
pub fn cadence_for_depth(depth_cm: f64) -> Cadence {
    if depth_cm > 25.0 {
        Cadence::new(2, 6, 0.4)
    } else if depth_cm < 18.0 {
        Cadence::new(1, 2, 0.6)
    } else {
        Cadence::new(2, 4, 0.5)
    }
}

/// Armhole construction with its own dimensions, in the gauge unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum ArmholeParams {
    SetIn { width: f64, depth: f64 },
    Raglan { width: f64, line_length: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmholeStyle {
    SetIn,
    Raglan,
}

impl ArmholeParams {
    pub const fn style(&self) -> ArmholeStyle {
        match self {
            Self::SetIn { .. } => ArmholeStyle::SetIn,
            Self::Raglan { .. } => ArmholeStyle::Raglan,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArmholeShaping {
    pub style: ArmholeStyle,
    pub schedule: ShapingSchedule,
    /// Stitches removed at each edge.
    pub stitches_per_side: u32,
    /// Rows from the start of the armhole to the shoulder.
    pub depth_rows: u32,
    pub warnings: Vec<Warning>,
}

/// Shape both armholes of a panel of `panel_stitches`.
///
/// `panel_height`, when known, is the full height of the panel and only feeds
/// the proportion check.
///
/// # Errors
///
/// [`DomainError::InvalidShapingInput`] for non-positive dimensions, a raglan
/// line no longer than its width, or armholes wider than the panel.
pub fn shape_armhole(
    params: ArmholeParams,
    gauge: &Gauge,
    panel_stitches: u32,
    panel_height: Option<f64>,
) -> Result<ArmholeShaping, DomainError> {
    require_stitches(panel_stitches)?;
    let mut shaping = match params {
        ArmholeParams::SetIn { width, depth } => set_in(width, depth, gauge, panel_stitches)?,
        ArmholeParams::Raglan { width, line_length } => {
            raglan(width, line_length, gauge, panel_stitches)?
        }
    };
    shaping
        .warnings
        .extend(proportion_warnings(&shaping, gauge, panel_stitches, panel_height));
    Ok(shaping)
}

fn stitches_per_side(width: f64, gauge: &Gauge, panel_stitches: u32) -> Result<u32, DomainError> {
    let per_side = gauge.length_to_stitches(width);
    if per_side == 0 {
        return Err(DomainError::invalid_input(format!(
            "Armhole width of {width} {} is narrower than one stitch",
            gauge.unit()
        )));
    }
    if panel_stitches <= 2 * per_side {
        return Err(DomainError::invalid_input(format!(
            "Armholes of {per_side} sts each leave nothing of a {panel_stitches}-stitch panel"
        )));
    }
    Ok(per_side)
}

fn set_in(
    width: f64,
    depth: f64,
    gauge: &Gauge,
    panel_stitches: u32,
) -> Result<ArmholeShaping, DomainError> {
    require_positive(width, "Armhole width")?;
    require_positive(depth, "Armhole depth")?;
    let per_side = stitches_per_side(width, gauge, panel_stitches)?;
    let unit = gauge.unit();

    let base = ((f64::from(per_side) * base_bind_off_ratio(unit.to_cm(width))).round() as u32)
        .min(per_side);
    let depth_rows = gauge.length_to_rows(depth);
    // Base bind-off takes two rows, one per edge.
    let decrease_rows = depth_rows.saturating_sub(2);

    let mut warnings = Vec::new();
    let mut plan = cadence_for_depth(unit.to_cm(depth)).plan(per_side - base);
    let natural_rows = plan.rows();
    if plan.compress(decrease_rows) {
        warnings.push(Warning::new(
            WarningCode::ShapingCompressed,
            format!(
                "Armhole decreases need {natural_rows} rows but the armhole depth leaves \
                 {decrease_rows}; the decrease cadence was tightened"
            ),
        ));
    }

    let both_edges = |interval, times| {
        let event = ShapingEvent::new(ShapingKind::Decrease, 2, Placement::BothEdges)
            .every(interval, times);
        match cadence_side(interval) {
            Some(side) => event.on(side),
            None => event,
        }
    };
    let phases = vec![
        ShapingPhase::new(PhaseLabel::BindOff, Side::Both)
            .push(ShapingEvent::new(ShapingKind::BindOff, base, Placement::RowStart).every(1, 2)),
        ShapingPhase::new(PhaseLabel::Rapid, Side::Both)
            .push(both_edges(plan.rapid_interval, plan.rapid)),
        ShapingPhase::new(PhaseLabel::Gradual, Side::Both)
            .push(both_edges(plan.gradual_interval, plan.gradual)),
    ];

    Ok(ArmholeShaping {
        style: ArmholeStyle::SetIn,
        schedule: ShapingSchedule::new(panel_stitches, phases, depth_rows)?,
        stitches_per_side: per_side,
        depth_rows,
        warnings,
    })
}

fn raglan(
    width: f64,
    line_length: f64,
    gauge: &Gauge,
    panel_stitches: u32,
) -> Result<ArmholeShaping, DomainError> {
    require_positive(width, "Armhole width")?;
    require_positive(line_length, "Raglan line length")?;
    if line_length <= width {
        return Err(DomainError::invalid_input(format!(
            "Raglan line length ({line_length}) must be longer than the armhole width ({width})"
        )));
    }
    let per_side = stitches_per_side(width, gauge, panel_stitches)?;

    let vertical = (line_length * line_length - width * width).sqrt();
    let depth_rows = gauge.length_to_rows(vertical);
    if depth_rows == 0 {
        return Err(DomainError::invalid_input(
            "Raglan line is too shallow to cover a single row",
        ));
    }
    let interval = (depth_rows / per_side).max(1);

    let mut warnings = Vec::new();
    if per_side > depth_rows {
        warnings.push(Warning::new(
            WarningCode::ShapingCompressed,
            format!(
                "Raglan needs {per_side} decreases per side but the line only covers \
                 {depth_rows} rows; it will run long"
            ),
        ));
    }

    let mut event =
        ShapingEvent::new(ShapingKind::Decrease, 2, Placement::BothEdges).every(interval, per_side);
    if let Some(side) = cadence_side(interval) {
        event = event.on(side);
    }
    let phases = vec![ShapingPhase::new(PhaseLabel::Diagonal, Side::Both).push(event)];

    Ok(ArmholeShaping {
        style: ArmholeStyle::Raglan,
        schedule: ShapingSchedule::new(panel_stitches, phases, depth_rows)?,
        stitches_per_side: per_side,
        depth_rows,
        warnings,
    })
}

fn proportion_warnings(
    shaping: &ArmholeShaping,
    gauge: &Gauge,
    panel_stitches: u32,
    panel_height: Option<f64>,
) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let removed = 2 * shaping.stitches_per_side;
    if f64::from(removed) > f64::from(panel_stitches) * MAX_WIDTH_SHARE {
        warnings.push(Warning::new(
            WarningCode::ArmholeProportion,
            format!(
                "Armholes remove {removed} of {panel_stitches} sts ({:.0}%), more than {:.0}% \
                 of the panel width",
                f64::from(removed) * 100.0 / f64::from(panel_stitches),
                MAX_WIDTH_SHARE * 100.0
            ),
        ));
    }
    if let Some(height) = panel_height {
        let panel_rows = gauge.length_to_rows(height);
        let shaping_rows = shaping.schedule.shaping_rows();
        if f64::from(shaping_rows) > f64::from(panel_rows) * MAX_HEIGHT_SHARE {
            warnings.push(Warning::new(
                WarningCode::ArmholeProportion,
                format!(
                    "Armhole shaping takes {shaping_rows} of {panel_rows} rows, more than {:.0}% \
                     of the panel height",
                    MAX_HEIGHT_SHARE * 100.0
                ),
            ));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::LengthUnit;

    fn gauge() -> Gauge {
        Gauge::new(20.0, 28.0, LengthUnit::Centimeters).unwrap()
    }

    fn set_in(width: f64, depth: f64) -> ArmholeParams {
        ArmholeParams::SetIn { width, depth }
    }

    #[test]
    fn set_in_medium_armhole() {
        let a = shape_armhole(set_in(10.0, 20.0), &gauge(), 100, Some(60.0)).unwrap();
        assert_eq!(a.stitches_per_side, 20);
        let s = &a.schedule;
        assert_eq!(s.phase(0).unwrap().label, PhaseLabel::BindOff);
        assert_eq!(s.phase(0).unwrap().stitch_delta(), -10);
        assert_eq!(s.phase(1).unwrap().event_count(), 8);
        assert_eq!(s.phase(2).unwrap().event_count(), 7);
        assert_eq!(s.phase(2).unwrap().shaping_frequency(), Some(4));
        assert_eq!(s.final_stitches, 60);
        assert_eq!(s.total_rows, 56);
        assert!(a.warnings.is_empty());
    }

    #[test]
    fn wide_armhole_binds_off_a_third() {
        let a = shape_armhole(set_in(16.0, 22.0), &gauge(), 120, None).unwrap();
        // 32 sts per side, a third of it at the base
        assert_eq!(a.schedule.phase(0).unwrap().stitches_per_event(), Some(11));
    }

    #[test]
    fn shallow_armhole_uses_faster_cadence() {
        let a = shape_armhole(set_in(10.0, 16.0), &gauge(), 100, None).unwrap();
        assert_eq!(a.schedule.phase(1).unwrap().shaping_frequency(), Some(1));
    }

    #[test]
    fn flags_disproportionate_armholes() {
        let a = shape_armhole(set_in(12.0, 20.0), &gauge(), 100, Some(25.0)).unwrap();
        let codes: Vec<_> = a.warnings.iter().map(|w| w.code).collect();
        assert_eq!(
            codes.iter().filter(|c| **c == WarningCode::ArmholeProportion).count(),
            2
        );
    }

    #[test]
    fn rejects_armholes_wider_than_panel() {
        assert!(shape_armhole(set_in(25.0, 20.0), &gauge(), 100, None).is_err());
        assert!(shape_armhole(set_in(0.0, 20.0), &gauge(), 100, None).is_err());
        assert!(shape_armhole(set_in(10.0, -1.0), &gauge(), 100, None).is_err());
    }

    #[test]
    fn raglan_is_one_diagonal_line() {
        let params = ArmholeParams::Raglan {
            width: 6.0,
            line_length: 10.0,
        };
        let a = shape_armhole(params, &gauge(), 100, None).unwrap();
        // vertical 8 cm = 22 rows, 12 decreases per side -> every row
        assert_eq!(a.style, ArmholeStyle::Raglan);
        assert_eq!(a.schedule.phases.len(), 1);
        let phase = a.schedule.phase(0).unwrap();
        assert_eq!(phase.label, PhaseLabel::Diagonal);
        assert_eq!(phase.event_count(), 12);
        assert_eq!(phase.shaping_frequency(), Some(1));
        assert_eq!(a.schedule.final_stitches, 76);
    }

    #[test]
    fn raglan_line_must_exceed_width() {
        let params = ArmholeParams::Raglan {
            width: 10.0,
            line_length: 10.0,
        };
        assert!(shape_armhole(params, &gauge(), 100, None).is_err());
    }
}
