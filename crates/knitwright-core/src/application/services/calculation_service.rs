//! Calculation Service - main application orchestrator.
//!
//! One request becomes one [`CalculationResult`]:
//! 1. Build the gauge and resolve the stitch pattern, if any
//! 2. Shape the piece (triangle, or body panel with armholes and neckline)
//! 3. Generate row-by-row instructions
//!
//! Hard errors are folded into the result; a failing piece never affects
//! another.

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        dto::{
            ArmholeSpec, CalculationResult, Construction, PanelSpec, PatternRef, PieceRequest,
            PieceSchedule, SchedulePart,
        },
        ports::StitchPatternCatalog,
    },
    domain::{
        ArmholeParams, DomainError, DomainValidator as validator, FabricSide, Gauge,
        InstructionGenerator, InstructionSection, LengthUnit, MeasurementField, NecklineParams,
        SectionPlan, Setup, ShapingSchedule, Side, StitchPattern, StitchPatternContext,
        TemplateSet, Warning, WarningCode, align_to_repeat, resolve, shape_armhole,
        shape_neckline, shape_triangle,
    },
    error::{KnitError, KnitResult},
};

/// Main calculation service.
pub struct CalculationService {
    catalog: Box<dyn StitchPatternCatalog>,
    templates: TemplateSet,
}

impl CalculationService {
    pub fn new(catalog: Box<dyn StitchPatternCatalog>) -> Self {
        Self {
            catalog,
            templates: TemplateSet::default(),
        }
    }

    /// Replace instruction wording. Every override is checked up front so a
    /// broken template fails here instead of in the middle of a piece.
    pub fn with_templates(mut self, templates: TemplateSet) -> KnitResult<Self> {
        validator::validate_templates(&templates)?;
        self.templates = templates;
        Ok(self)
    }

    /// Calculate one piece.
    #[instrument(skip_all, fields(piece = %request.name))]
    pub fn calculate(&self, request: &PieceRequest) -> CalculationResult {
        match self.try_calculate(request) {
            Ok(result) => {
                info!(warnings = result.warnings.len(), "Piece calculated");
                result
            }
            Err(e) => {
                warn!(error = %e, "Piece calculation failed");
                CalculationResult::failure(&request.name, &e)
            }
        }
    }

    /// Calculate every piece of a garment in parallel. Results keep the
    /// order of `requests`.
    pub fn calculate_all(&self, requests: &[PieceRequest]) -> Vec<CalculationResult> {
        requests.par_iter().map(|r| self.calculate(r)).collect()
    }

    pub fn list_patterns(&self) -> KnitResult<Vec<StitchPattern>> {
        self.catalog.list()
    }

    fn try_calculate(&self, request: &PieceRequest) -> KnitResult<CalculationResult> {
        if request.name.trim().is_empty() {
            return Err(DomainError::InvalidRequest("piece name is empty".into()).into());
        }
        let gauge = Gauge::try_from(request.gauge)?;
        let pattern = request
            .stitch_pattern
            .as_ref()
            .map(|r| self.pattern(r, request))
            .transpose()?;

        let mut generator = InstructionGenerator::new(request.craft)
            .with_templates(self.templates.clone());
        if request.abbreviate {
            generator = generator.with_abbreviations(request.language);
        }

        match &request.construction {
            Construction::Panel(panel) => {
                panel_piece(request, panel, &gauge, pattern, &generator)
            }
            triangle => triangle_piece(request, triangle, &gauge, pattern, &generator),
        }
    }

    fn pattern(&self, reference: &PatternRef, request: &PieceRequest) -> KnitResult<Placed> {
        let pattern = self.catalog.get(&reference.id)?;
        validator::validate_pattern(&pattern)?;
        if pattern.craft != request.craft {
            return Err(ApplicationError::ValidationFailed(format!(
                "stitch pattern '{}' is a {} pattern but '{}' is worked in {}",
                pattern.id, pattern.craft, request.name, request.craft
            ))
            .into());
        }
        Ok(Placed {
            pattern,
            edge_stitches: reference.edge_stitches,
            buffer_stitches: reference.buffer_stitches,
        })
    }
}

/// A catalog pattern with its placement, before the stitch count is known.
struct Placed {
    pattern: StitchPattern,
    edge_stitches: u32,
    buffer_stitches: u32,
}

impl Placed {
    /// Stitches outside the full repeats.
    fn extra(&self) -> u32 {
        2 * (self.edge_stitches + self.buffer_stitches) + self.pattern.balance_stitches
    }

    fn fit(self, stitches: u32) -> StitchPatternContext {
        StitchPatternContext::fit(
            self.pattern,
            stitches,
            self.edge_stitches,
            self.buffer_stitches,
        )
    }
}

fn triangle_piece(
    request: &PieceRequest,
    construction: &Construction,
    gauge: &Gauge,
    pattern: Option<Placed>,
    generator: &InstructionGenerator,
) -> KnitResult<CalculationResult> {
    let (method, target) = construction.triangle().ok_or_else(|| KnitError::Internal {
        message: "triangle flow reached with a panel construction".into(),
    })?;
    let shaping = shape_triangle(method, target, gauge)?;
    debug!(
        method = %method,
        cast_on = shaping.cast_on,
        rows = shaping.schedule.total_rows,
        "Triangle shaped"
    );

    // The motif is sized for the widest row; narrower rows work it partially.
    let mut context = pattern.map(|p| p.fit(widest_row(&shaping.schedule)));
    let instructions = generator.generate(
        &request.name,
        &shaping.schedule,
        context.as_mut(),
        Setup::CastOn,
        FabricSide::RightSide,
    )?;

    let schedule = PieceSchedule {
        cast_on: shaping.cast_on,
        final_stitches: shaping.schedule.final_stitches,
        total_rows: shaping.schedule.total_rows,
        parts: vec![SchedulePart {
            name: method.as_str().to_string(),
            schedule: shaping.schedule,
        }],
        achieved: Some(shaping.achieved),
    };

    Ok(CalculationResult {
        piece: request.name.clone(),
        success: true,
        measurements: None,
        schedule: Some(schedule),
        instructions: Some(instructions),
        warnings: shaping.warnings,
        errors: Vec::new(),
    })
}

fn widest_row(schedule: &ShapingSchedule) -> u32 {
    let mut stitches = i64::from(schedule.starting_stitches);
    let mut widest = stitches;
    for phase in &schedule.phases {
        stitches += phase.stitch_delta();
        widest = widest.max(stitches);
    }
    u32::try_from(widest).unwrap_or(u32::MAX)
}

fn convert(value: f64, from: LengthUnit, to: LengthUnit) -> f64 {
    to.from_cm(from.to_cm(value))
}

fn panel_piece(
    request: &PieceRequest,
    panel: &PanelSpec,
    gauge: &Gauge,
    pattern: Option<Placed>,
    generator: &InstructionGenerator,
) -> KnitResult<CalculationResult> {
    let resolved = resolve(&panel.measurements, &panel.ease, panel.garment)?;
    let finished = resolved.finished;
    let mut warnings = resolved.warnings;
    let unit = finished.unit;
    let to_gauge = |value: f64| convert(value, unit, gauge.unit());

    let mut cast_on = gauge.length_to_stitches(to_gauge(finished.panel_width()));
    let mut context = pattern.map(|p| {
        cast_on = align_to_repeat(cast_on, p.pattern.repeat_width, p.extra());
        p.fit(cast_on)
    });
    if let Some(warning) = context.as_ref().and_then(|c| c.validate(cast_on)) {
        warnings.push(warning);
    }
    let torso_rows = gauge.length_to_rows(to_gauge(finished.torso_length));
    debug!(cast_on, torso_rows, "Panel sized");

    let armhole = panel
        .armhole
        .map(|spec| {
            let width = |given: Option<f64>| match given {
                Some(width) => Ok(width),
                None => default_armhole_width(finished.chest, finished.shoulder_width),
            };
            let params = match spec {
                ArmholeSpec::SetIn { width: w, depth } => {
                    let depth = depth.or(finished.armhole_depth).ok_or(
                        DomainError::MissingMeasurement {
                            field: MeasurementField::ArmholeDepth.as_str(),
                        },
                    )?;
                    ArmholeParams::SetIn {
                        width: to_gauge(width(w)?),
                        depth: to_gauge(depth),
                    }
                }
                ArmholeSpec::Raglan { width: w, line_length } => ArmholeParams::Raglan {
                    width: to_gauge(width(w)?),
                    line_length: to_gauge(line_length),
                },
            };
            shape_armhole(
                params,
                gauge,
                cast_on,
                Some(to_gauge(finished.torso_length)),
            )
        })
        .transpose()?;

    let upper_stitches = armhole
        .as_ref()
        .map_or(cast_on, |a| a.schedule.final_stitches);
    let neckline = panel
        .neckline
        .map(|n| {
            let params = NecklineParams {
                style: n.style,
                depth: to_gauge(n.depth),
                width: n.width.map(to_gauge),
            };
            shape_neckline(params, gauge, upper_stitches)
        })
        .transpose()?;

    let armhole_rows = armhole.as_ref().map_or(0, |a| a.depth_rows);
    let neck_rows = neckline.as_ref().map_or(0, |n| n.depth_rows);
    // Armhole shaping is worked across the full width, below the split.
    if armhole.is_some() && neck_rows > armhole_rows {
        return Err(DomainError::invalid_input(format!(
            "Neckline depth of {neck_rows} rows is deeper than the {armhole_rows}-row armhole"
        ))
        .into());
    }
    let top_rows = armhole_rows.max(neck_rows);
    if top_rows >= torso_rows {
        return Err(DomainError::invalid_input(format!(
            "Armhole and neckline take {top_rows} rows, leaving no body in a {torso_rows}-row panel"
        ))
        .into());
    }
    let body_rows = torso_rows - top_rows;

    let mut sections = Vec::new();
    let mut parts = Vec::new();
    let mut rows_worked = 0;

    let body = ShapingSchedule::new(cast_on, Vec::new(), body_rows)?;
    sections.push(generator.section(
        &SectionPlan {
            title: format!("{}: body", request.name),
            side: Side::Both,
            setup: Setup::CastOn,
            starting_stitches: cast_on,
            first_side: FabricSide::RightSide,
            phases: Vec::new(),
            min_rows: body_rows,
            neck_start: None,
        },
        context.as_mut(),
    )?);
    rows_worked += body_rows;
    parts.push(SchedulePart {
        name: "body".into(),
        schedule: body,
    });

    if let Some(armhole) = armhole {
        // Armhole rows below the neckline; the rest are worked with it.
        let planned = armhole_rows.saturating_sub(neck_rows);
        let section = generator.section(
            &SectionPlan {
                title: format!("{}: armholes", request.name),
                side: Side::Both,
                setup: Setup::None,
                starting_stitches: cast_on,
                first_side: FabricSide::of_row(FabricSide::RightSide, rows_worked + 1),
                phases: armhole.schedule.phases.iter().collect(),
                min_rows: planned,
            neck_start: None,
            },
            context.as_mut(),
        )?;
        if neckline.is_some() && section.row_count() > planned {
            warnings.push(Warning::new(
                WarningCode::ShapingCompressed,
                format!(
                    "Armhole shaping runs {} rows into the neckline; the neckline starts after \
                     it and the panel is that much longer",
                    section.row_count() - planned
                ),
            ));
        } else if let Some(extra) = alignment_rows(section.row_count(), &armhole.schedule) {
            warnings.push(alignment_warning("Armhole", extra));
        }
        rows_worked += section.row_count();
        sections.push(section);
        warnings.extend(armhole.warnings);
        parts.push(SchedulePart {
            name: "armholes".into(),
            schedule: armhole.schedule,
        });
    }

    let mut final_stitches = upper_stitches;
    if let Some(neckline) = neckline {
        let neck_sections = generator.generate(
            &format!("{}: neckline", request.name),
            &neckline.schedule,
            context.as_mut(),
            Setup::None,
            FabricSide::of_row(FabricSide::RightSide, rows_worked + 1),
        )?;
        if let Some(extra) = alignment_rows(worked_rows(&neck_sections), &neckline.schedule) {
            warnings.push(alignment_warning("Neckline", extra));
        }
        sections.extend(neck_sections);
        final_stitches = 2 * neckline.shoulder_stitches;
        warnings.extend(neckline.warnings);
        parts.push(SchedulePart {
            name: "neckline".into(),
            schedule: neckline.schedule,
        });
    } else if let Some(last) = sections.last() {
        final_stitches = last.final_stitches();
    }

    Ok(CalculationResult {
        piece: request.name.clone(),
        success: true,
        measurements: Some(finished),
        schedule: Some(PieceSchedule {
            cast_on,
            final_stitches,
            total_rows: worked_rows(&sections),
            parts,
            achieved: None,
        }),
        instructions: Some(sections),
        warnings,
        errors: Vec::new(),
    })
}

/// Rows from cast-on to the last row, with split sides counted once.
fn worked_rows(sections: &[InstructionSection]) -> u32 {
    sections
        .iter()
        .filter(|s| s.side != Side::Right)
        .map(InstructionSection::row_count)
        .sum()
}

/// Rows worked past the schedule's height, which only happens when plain
/// rows were added to keep shaping on its fabric side.
fn alignment_rows(worked: u32, schedule: &ShapingSchedule) -> Option<u32> {
    worked
        .checked_sub(schedule.total_rows)
        .filter(|&extra| extra > 0)
}

fn alignment_warning(what: &str, extra: u32) -> Warning {
    Warning::new(
        WarningCode::ShapingCompressed,
        format!(
            "{what} shaping needs {extra} extra row(s) to keep decreases on right side rows; \
             the panel is that much longer"
        ),
    )
}

/// Half the difference between panel width and shoulder width.
fn default_armhole_width(chest: f64, shoulder: Option<f64>) -> Result<f64, DomainError> {
    let shoulder = shoulder.ok_or(DomainError::MissingMeasurement {
        field: MeasurementField::ShoulderWidth.as_str(),
    })?;
    Ok((chest / 2.0 - shoulder) / 2.0)
}
