//! Round and scoop necklines.
//!
//! The neck opening is centred on the panel. A block of its stitches is bound
//! off in one row, splitting the fabric; each side then loses the rest of the
//! opening at the neck edge, first rapidly and then gradually. The cadence
//! depends on the neckline depth:
//!
//! | Depth (cm)   | Rapid every | Gradual every | Rapid share |
//! |--------------|-------------|---------------|-------------|
//! | < 6          | 1           | 3             | 0.6         |
//! | 6 to 12      | 2           | 4             | 0.5         |
//! | > 12         | 2           | 6             | 0.4         |

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::{Gauge, PhaseLabel, ShapingEvent, ShapingPhase, ShapingSchedule, round_up_to_parity},
    error::DomainError,
    shaping::{Cadence, cadence_side, require_positive, require_stitches},
    value_objects::{NecklineStyle, Placement, ShapingKind, Side},
    warning::{Warning, WarningCode},
};

/// Neck openings wider than this share of the panel are flagged.
const MAX_OPENING_RATIO: f64 = 0.6;

/// Share of the neck opening bound off in the centre.
pub const fn center_ratio(style: NecklineStyle) -> f64 {
    match style {
        NecklineStyle::Round => 1.0 / 3.0,
        NecklineStyle::Scoop => 0.4,
    }
}

/// Share of the panel taken by the neck opening when no width is given.
pub const fn default_opening_ratio(style: NecklineStyle) -> f64 {
    match style {
        NecklineStyle::Round => 0.35,
        NecklineStyle::Scoop => 0.45,
    }
}

/// Decrease cadence for a neckline `depth_cm` deep.
pub fn cadence_for_depth(depth_cm: f64) -> Cadence {
    if depth_cm < 6.0 {
        Cadence::new(1, 3, 0.6)
    } else if depth_cm > 12.0 {
        Cadence::new(2, 6, 0.4)
    } else {
        Cadence::new(2, 4, 0.5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NecklineParams {
    #[serde(default)]
    pub style: NecklineStyle,
    /// Neckline depth in the gauge unit.
    pub depth: f64,
    /// Width of the neck opening; defaults to a share of the panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NecklineShaping {
    pub style: NecklineStyle,
    pub schedule: ShapingSchedule,
    pub neck_stitches: u32,
    pub center_stitches: u32,
    pub decreases_per_side: u32,
    /// Stitches left on each side once the neckline is finished.
    pub shoulder_stitches: u32,
    pub depth_rows: u32,
    pub warnings: Vec<Warning>,
}

/// Shape a neckline on a panel of `panel_stitches`.
///
/// # Errors
///
/// [`DomainError::InvalidShapingInput`] for a non-positive depth, width or
/// panel, or a neck opening that leaves no shoulder stitches.
pub fn shape_neckline(
    params: NecklineParams,
    gauge: &Gauge,
    panel_stitches: u32,
) -> Result<NecklineShaping, DomainError> {
    require_positive(params.depth, "Neckline depth")?;
    if let Some(width) = params.width {
        require_positive(width, "Neckline width")?;
    }
    require_stitches(panel_stitches)?;

    let style = params.style;
    let raw_neck = match params.width {
        Some(width) => gauge.length_to_stitches(width),
        None => (f64::from(panel_stitches) * default_opening_ratio(style)).round() as u32,
    };
    // Same parity as the panel, so both shoulders get equal counts.
    let neck_stitches = round_up_to_parity(raw_neck.max(1), panel_stitches);
    if neck_stitches + 2 > panel_stitches {
        return Err(DomainError::invalid_input(format!(
            "A {neck_stitches}-stitch neck opening leaves no shoulder stitches on a \
             {panel_stitches}-stitch panel"
        )));
    }

    let center_stitches = round_up_to_parity(
        (f64::from(neck_stitches) * center_ratio(style)).round() as u32,
        neck_stitches,
    );
    let decreases_per_side = (neck_stitches - center_stitches) / 2;

    let mut warnings = Vec::new();
    let depth_rows = gauge.length_to_rows(params.depth);
    // The centre bind-off uses the first row.
    let side_rows = depth_rows.saturating_sub(1);
    let mut plan = cadence_for_depth(gauge.unit().to_cm(params.depth)).plan(decreases_per_side);
    let natural_rows = plan.rows();
    if plan.compress(side_rows) {
        warnings.push(Warning::new(
            WarningCode::ShapingCompressed,
            format!(
                "Neck decreases need {natural_rows} rows but the neckline depth gives {side_rows}; \
                 the decrease cadence was tightened"
            ),
        ));
    }
    if plan.rows() > side_rows {
        warnings.push(Warning::new(
            WarningCode::ShapingCompressed,
            format!(
                "Neck shaping runs {} rows past the requested depth",
                plan.rows() - side_rows
            ),
        ));
    }
    if f64::from(neck_stitches) > f64::from(panel_stitches) * MAX_OPENING_RATIO {
        warnings.push(Warning::new(
            WarningCode::NecklineProportion,
            format!(
                "Neck opening of {neck_stitches} sts takes more than {:.0}% of the \
                 {panel_stitches}-stitch panel",
                MAX_OPENING_RATIO * 100.0
            ),
        ));
    }

    let neck_edge = |interval, times| {
        let event = ShapingEvent::new(ShapingKind::Decrease, 1, Placement::NeckEdge)
            .every(interval, times);
        match cadence_side(interval) {
            Some(side) => event.on(side),
            None => event,
        }
    };

    let mut phases = vec![
        ShapingPhase::new(PhaseLabel::BindOff, Side::Both)
            .push(ShapingEvent::new(ShapingKind::BindOff, center_stitches, Placement::Center)),
    ];
    for side in [Side::Left, Side::Right] {
        phases.push(
            ShapingPhase::new(PhaseLabel::Rapid, side)
                .push(neck_edge(plan.rapid_interval, plan.rapid)),
        );
        phases.push(
            ShapingPhase::new(PhaseLabel::Gradual, side)
                .push(neck_edge(plan.gradual_interval, plan.gradual)),
        );
    }

    let schedule = ShapingSchedule::new(panel_stitches, phases, depth_rows)?;
    let shoulder_stitches = (panel_stitches - neck_stitches) / 2;
    debug_assert!(2 * shoulder_stitches < panel_stitches);

    Ok(NecklineShaping {
        style,
        schedule,
        neck_stitches,
        center_stitches,
        decreases_per_side,
        shoulder_stitches,
        depth_rows,
        warnings,
    })
}
