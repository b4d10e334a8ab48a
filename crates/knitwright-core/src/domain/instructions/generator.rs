//! Row-by-row instruction generation.
//!
//! A section is laid out as a timeline of rows first (plain or shaping), then
//! each row is rendered. The stitch-pattern cursor, when present, advances on
//! every row, shaping rows included, so the motif stays aligned with the
//! fabric.

use crate::domain::{
    entities::{
        InstructionGroup, InstructionSection, InstructionStep, ShapingEvent, ShapingPhase,
        ShapingSchedule, StitchPatternContext,
    },
    error::DomainError,
    instructions::{
        templates::{RowEnd, RowValues, Shaping, TemplateSet},
        terminology::Terminology,
    },
    value_objects::{CraftType, FabricSide, Language, Placement, ShapingKind, Side},
};

/// Line printed before row 1 of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Setup {
    #[default]
    None,
    CastOn,
    /// Pick up held stitches after a split.
    Rejoin,
}

/// Everything needed to work one section.
#[derive(Debug, Clone)]
pub struct SectionPlan<'a> {
    pub title: String,
    pub side: Side,
    pub setup: Setup,
    pub starting_stitches: u32,
    /// Fabric side of row 1.
    pub first_side: FabricSide,
    pub phases: Vec<&'a ShapingPhase>,
    /// Plain rows pad the section up to this height.
    pub min_rows: u32,
    /// Fabric side whose rows begin at the neck edge, for split sections.
    pub neck_start: Option<FabricSide>,
}

#[derive(Debug, Clone, Copy)]
enum RowAction<'a> {
    Plain,
    Shape(&'a ShapingEvent),
}

struct PatternLine {
    name: String,
    row: usize,
    instruction: String,
    edge_stitches: u32,
}

/// Renders schedules into [`InstructionSection`]s.
#[derive(Debug, Clone)]
pub struct InstructionGenerator {
    craft: CraftType,
    terminology: Option<Terminology>,
    templates: TemplateSet,
}

impl InstructionGenerator {
    pub fn new(craft: CraftType) -> Self {
        Self {
            craft,
            terminology: None,
            templates: TemplateSet::default(),
        }
    }

    /// Abbreviate the output using the dictionary for `language`.
    pub fn with_abbreviations(mut self, language: Language) -> Self {
        self.terminology = Some(Terminology::new(self.craft, language));
        self
    }

    pub fn with_templates(mut self, templates: TemplateSet) -> Self {
        self.templates = templates;
        self
    }

    pub fn craft(&self) -> CraftType {
        self.craft
    }

    /// Work every phase of `schedule`.
    ///
    /// An unsplit schedule gives one section. A split schedule gives an
    /// optional shared section, then the left side (starting with the centre
    /// bind-off row) and the right side (rejoined at the held stitches).
    pub fn generate(
        &self,
        title: &str,
        schedule: &ShapingSchedule,
        mut pattern: Option<&mut StitchPatternContext>,
        setup: Setup,
        first_side: FabricSide,
    ) -> Result<Vec<InstructionSection>, DomainError> {
        if !schedule.is_split() {
            let plan = SectionPlan {
                title: title.to_string(),
                side: Side::Both,
                setup,
                starting_stitches: schedule.starting_stitches,
                first_side,
                phases: schedule.phases.iter().collect(),
                min_rows: schedule.total_rows,
                neck_start: None,
            };
            return Ok(vec![self.section(&plan, pattern)?]);
        }

        let splits = |p: &ShapingPhase| p.events.iter().any(|e| e.placement == Placement::Center);
        let on = |side: Side| {
            schedule
                .phases
                .iter()
                .filter(move |p| p.side == side)
                .collect::<Vec<_>>()
        };
        let (center, shared): (Vec<&ShapingPhase>, Vec<&ShapingPhase>) =
            on(Side::Both).into_iter().partition(|p| splits(p));

        let mut sections = Vec::with_capacity(3);
        let mut stitches = schedule.starting_stitches;
        let mut side = first_side;
        let mut setup = setup;
        let mut used_rows = 0;

        if !shared.is_empty() {
            let plan = SectionPlan {
                title: title.to_string(),
                side: Side::Both,
                setup,
                starting_stitches: stitches,
                first_side: side,
                phases: shared,
                min_rows: 0,
                neck_start: None,
            };
            let section = self.section(&plan, pattern.as_deref_mut())?;
            stitches = section.final_stitches();
            used_rows = section.row_count();
            side = FabricSide::of_row(side, used_rows + 1);
            setup = Setup::None;
            sections.push(section);
        }

        let remaining = schedule.total_rows.saturating_sub(used_rows);
        let bound_off: u32 = center
            .iter()
            .flat_map(|p| &p.events)
            .map(|e| e.stitches * e.repeat)
            .sum();
        let center_rows: u32 = center.iter().map(|p| p.total_shaping_rows()).sum();

        // The right side resumes the motif on the row after the split.
        let mut right_pattern = pattern.as_deref().cloned();
        if let Some(ctx) = right_pattern.as_mut() {
            for _ in 0..center_rows {
                ctx.advance();
            }
        }

        // Knitting continues on the last stitches of the bind-off row and
        // rejoins the first ones; crochet works the first stitches and
        // rejoins the last ones at their outer edge.
        let (left_neck, right_neck) = match self.craft {
            CraftType::Knitting => (side, side.opposite()),
            CraftType::Crochet => (side.opposite(), side),
        };

        let mut left_phases = center;
        left_phases.extend(on(Side::Left));
        let left = SectionPlan {
            title: format!("{title}: left side"),
            side: Side::Left,
            setup,
            starting_stitches: stitches,
            first_side: side,
            phases: left_phases,
            min_rows: remaining,
            neck_start: Some(left_neck),
        };
        sections.push(self.section(&left, pattern)?);

        let right = SectionPlan {
            title: format!("{title}: right side"),
            side: Side::Right,
            setup: Setup::Rejoin,
            starting_stitches: stitches.saturating_sub(bound_off) / 2,
            first_side: FabricSide::of_row(side, center_rows + 1),
            phases: on(Side::Right),
            min_rows: remaining.saturating_sub(center_rows),
            neck_start: Some(right_neck),
        };
        sections.push(self.section(&right, right_pattern.as_mut())?);

        Ok(sections)
    }

    /// Work one section row by row.
    ///
    /// # Errors
    ///
    /// [`DomainError::TemplateMismatch`] when a configured template uses a
    /// placeholder its kind does not supply.
    pub fn section(
        &self,
        plan: &SectionPlan<'_>,
        mut pattern: Option<&mut StitchPatternContext>,
    ) -> Result<InstructionSection, DomainError> {
        let actions = timeline(&plan.phases, plan.first_side, plan.min_rows);
        let mut stitches = plan.starting_stitches;
        let mut steps = Vec::with_capacity(actions.len());

        for (index, action) in actions.into_iter().enumerate() {
            let row = index as u32 + 1;
            let side = FabricSide::of_row(plan.first_side, row);
            let line = pattern.as_deref_mut().map(|ctx| {
                let row = ctx.current_index() + 1;
                let edge_stitches = ctx.edge_stitches;
                let name = ctx.pattern().name.clone();
                PatternLine {
                    name,
                    row,
                    instruction: ctx.advance().instruction.clone(),
                    edge_stitches,
                }
            });

            let (values, is_shaping) = match action {
                RowAction::Plain => {
                    let values = match &line {
                        Some(p) => RowValues::PatternRow {
                            pattern: &p.name,
                            row: p.row,
                            instruction: &p.instruction,
                            stitches,
                            side,
                        },
                        None => RowValues::Plain { stitches, side },
                    };
                    (values, false)
                }
                RowAction::Shape(event) if event.placement == Placement::Center => {
                    let bound_off = event.stitches;
                    stitches = stitches.saturating_sub(bound_off) / 2;
                    let values = RowValues::CenterBindOff {
                        side_stitches: stitches,
                        center: bound_off,
                        side,
                    };
                    (values, true)
                }
                RowAction::Shape(event) => {
                    stitches = apply(stitches, event);
                    let shaping = Shaping {
                        kind: event.kind,
                        count: event.stitches,
                        placement: event.placement,
                        edge: if plan.neck_start == Some(side) {
                            RowEnd::Start
                        } else {
                            RowEnd::End
                        },
                    };
                    let values = match &line {
                        Some(p) if p.edge_stitches > 0 => RowValues::ShapeInEdges {
                            shaping,
                            pattern: &p.name,
                            row: p.row,
                            instruction: &p.instruction,
                            stitches,
                            side,
                        },
                        Some(p) => RowValues::ShapeInPattern {
                            shaping,
                            pattern: &p.name,
                            row: p.row,
                            stitches,
                            side,
                        },
                        None => RowValues::Shaping {
                            shaping,
                            stitches,
                            side,
                        },
                    };
                    (values, true)
                }
            };

            let is_pattern = matches!(
                values,
                RowValues::PatternRow { .. }
                    | RowValues::ShapeInEdges { .. }
                    | RowValues::ShapeInPattern { .. }
            );
            let text = self.render(&values)?;
            steps.push(InstructionStep {
                row,
                fabric_side: side,
                text,
                stitches,
                is_shaping,
                is_pattern,
            });
        }

        let setup = match plan.setup {
            Setup::None => None,
            Setup::CastOn => Some(self.render(&RowValues::CastOn {
                stitches: plan.starting_stitches,
            })?),
            Setup::Rejoin => Some(self.render(&RowValues::Rejoin {
                stitches: plan.starting_stitches,
                side: plan.first_side,
            })?),
        };

        let groups = group_steps(&steps);
        Ok(InstructionSection {
            title: plan.title.clone(),
            side: plan.side,
            setup,
            starting_stitches: plan.starting_stitches,
            steps,
            groups,
        })
    }

    fn render(&self, values: &RowValues<'_>) -> Result<String, DomainError> {
        let text = self.templates.render(self.craft, values)?;
        Ok(match &self.terminology {
            Some(terms) => terms.abbreviate(&text),
            None => text,
        })
    }
}

fn apply(stitches: u32, event: &ShapingEvent) -> u32 {
    match event.kind {
        ShapingKind::Increase => stitches + event.stitches,
        ShapingKind::Decrease | ShapingKind::BindOff => stitches.saturating_sub(event.stitches),
    }
}

/// Lay the phases out as rows. An event pinned to a fabric side that the next
/// row is not on gets one plain row first.
fn timeline<'a>(phases: &[&'a ShapingPhase], first: FabricSide, min_rows: u32) -> Vec<RowAction<'a>> {
    let mut rows = Vec::new();
    for event in phases.iter().flat_map(|p| &p.events) {
        if let Some(wanted) = event.fabric_side {
            if FabricSide::of_row(first, rows.len() as u32 + 1) != wanted {
                rows.push(RowAction::Plain);
            }
        }
        for _ in 0..event.repeat {
            rows.push(RowAction::Shape(event));
            rows.extend(std::iter::repeat_n(
                RowAction::Plain,
                event.interval.saturating_sub(1) as usize,
            ));
        }
    }
    while (rows.len() as u32) < min_rows {
        rows.push(RowAction::Plain);
    }
    rows
}

/// Collapse runs of identical non-shaping rows.
pub fn group_steps(steps: &[InstructionStep]) -> Vec<InstructionGroup> {
    let mut groups: Vec<InstructionGroup> = Vec::new();
    let mut open = false;
    for step in steps {
        if open && !step.is_shaping {
            if let Some(group) = groups.last_mut().filter(|g| g.text == step.text) {
                group.last_row = step.row;
                continue;
            }
        }
        groups.push(InstructionGroup {
            first_row: step.row,
            last_row: step.row,
            text: step.text.clone(),
            stitches: step.stitches,
        });
        open = !step.is_shaping;
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{PatternRow, PhaseLabel, StitchPattern};
    use crate::domain::instructions::templates::InstructionKind;

    fn dec_every(interval: u32, times: u32) -> ShapingPhase {
        ShapingPhase::new(PhaseLabel::Decrease, Side::Both).push(
            ShapingEvent::new(ShapingKind::Decrease, 2, Placement::BothEdges)
                .every(interval, times)
                .on(FabricSide::RightSide),
        )
    }

    fn schedule(start: u32, phases: Vec<ShapingPhase>, rows: u32) -> ShapingSchedule {
        ShapingSchedule::new(start, phases, rows).unwrap()
    }

    fn lace() -> StitchPatternContext {
        let pattern = StitchPattern::new(
            "lace",
            "Eyelet Lace",
            CraftType::Knitting,
            4,
            vec![
                PatternRow::new("knit 1, yarn over, knit 2 together, knit 1"),
                PatternRow::new("purl"),
            ],
        )
        .unwrap();
        StitchPatternContext::new(pattern, 2, 0, 5)
    }

    #[test]
    fn one_step_per_row_with_consistent_counts() {
        let s = schedule(40, vec![dec_every(2, 3)], 10);
        let generator = InstructionGenerator::new(CraftType::Knitting);
        let sections = generator.generate("Back", &s, None, Setup::CastOn, FabricSide::RightSide).unwrap();
        assert_eq!(sections.len(), 1);
        let section = &sections[0];
        assert_eq!(section.steps.len(), 10);
        assert_eq!(section.final_stitches(), s.final_stitches);
        assert_eq!(section.shaping_rows().count(), 3);
        assert_eq!(section.setup.as_deref(), Some("Cast on 40 stitches."));
        assert_eq!(section.steps[0].stitches, 38);
        assert_eq!(section.steps[0].fabric_side, FabricSide::RightSide);
    }

    #[test]
    fn plain_runs_collapse_but_shaping_rows_do_not() {
        let phases = vec![ShapingPhase::new(PhaseLabel::BindOff, Side::Both).push(
            ShapingEvent::new(ShapingKind::BindOff, 3, Placement::RowStart).every(1, 2),
        )];
        let s = schedule(30, phases, 8);
        let generator = InstructionGenerator::new(CraftType::Knitting);
        let section = &generator.generate("Piece", &s, None, Setup::None, FabricSide::RightSide).unwrap()[0];
        let labels: Vec<String> = section.groups.iter().map(ToString::to_string).collect();
        assert_eq!(labels.len(), 3);
        assert!(labels[0].starts_with("Row 1: Bind off 3"));
        assert!(labels[1].starts_with("Row 2: Bind off 3"));
        assert_eq!(labels[2], "Rows 3\u{2013}8: Work even in stockinette stitch (24 stitches).");
    }

    #[test]
    fn wrong_side_start_inserts_an_alignment_row() {
        let s = schedule(20, vec![dec_every(2, 2)], 0);
        let generator = InstructionGenerator::new(CraftType::Knitting);
        let section = &generator.generate("P", &s, None, Setup::None, FabricSide::WrongSide).unwrap()[0];
        assert!(!section.steps[0].is_shaping);
        assert!(section.steps[1].is_shaping);
        assert_eq!(section.steps[1].fabric_side, FabricSide::RightSide);
    }

    #[test]
    fn shaping_with_edge_stitches_keeps_the_motif() {
        let s = schedule(24, vec![dec_every(2, 1)], 4);
        let mut ctx = lace();
        let generator = InstructionGenerator::new(CraftType::Knitting);
        let section =
            &generator.generate("Lace", &s, Some(&mut ctx), Setup::None, FabricSide::RightSide).unwrap()[0];
        assert_eq!(
            section.steps[0].text,
            "Decrease 1 stitch at each edge in edge stitches; work Eyelet Lace Row 1 over centre \
             stitches: knit 1, yarn over, knit 2 together, knit 1 (22 stitches)."
        );
        assert!(section.steps.iter().all(|s| s.is_pattern));
        assert_eq!(section.steps[1].text, "Work Eyelet Lace Row 2: purl (22 stitches).");
        assert_eq!(section.steps[2].text, "Work Eyelet Lace Row 1: knit 1, yarn over, knit 2 together, knit 1 (22 stitches).");
    }

    #[test]
    fn shaping_without_edge_stitches_maintains_pattern() {
        let s = schedule(24, vec![dec_every(2, 1)], 2);
        let mut ctx = lace();
        ctx.edge_stitches = 0;
        let generator = InstructionGenerator::new(CraftType::Knitting);
        let section =
            &generator.generate("Lace", &s, Some(&mut ctx), Setup::None, FabricSide::RightSide).unwrap()[0];
        assert!(section.steps[0]
            .text
            .contains("maintaining Eyelet Lace pattern as established (Row 1)"));
    }

    #[test]
    fn split_schedule_gives_left_and_right_sections() {
        let neck = |side| {
            ShapingPhase::new(PhaseLabel::Rapid, side).push(
                ShapingEvent::new(ShapingKind::Decrease, 1, Placement::NeckEdge)
                    .every(2, 3)
                    .on(FabricSide::RightSide),
            )
        };
        let phases = vec![
            ShapingPhase::new(PhaseLabel::BindOff, Side::Both)
                .push(ShapingEvent::new(ShapingKind::BindOff, 10, Placement::Center)),
            neck(Side::Left),
            neck(Side::Right),
        ];
        let s = schedule(50, phases, 10);
        let generator = InstructionGenerator::new(CraftType::Knitting);
        let sections = generator.generate("Neck", &s, None, Setup::None, FabricSide::RightSide).unwrap();
        assert_eq!(sections.len(), 2);

        let (left, right) = (&sections[0], &sections[1]);
        assert_eq!(left.side, Side::Left);
        assert!(left.steps[0].text.starts_with("Knit 20 stitches, bind off the next 10"));
        assert_eq!(left.steps[0].stitches, 20);
        assert_eq!(left.final_stitches(), 17);

        assert_eq!(right.side, Side::Right);
        assert_eq!(right.starting_stitches, 20);
        assert_eq!(right.final_stitches(), 17);
        assert!(right.setup.as_deref().unwrap().contains("wrong side"));
        assert_eq!(left.shaping_rows().count(), 4);
        assert_eq!(right.shaping_rows().count(), 3);
    }

    /// Centre bind-off of 10 on 50 stitches, then one neck decrease per
    /// side every `interval` rows.
    fn split_neck(interval: u32, times: u32) -> ShapingSchedule {
        let neck = |side| {
            let event = ShapingEvent::new(ShapingKind::Decrease, 1, Placement::NeckEdge)
                .every(interval, times);
            ShapingPhase::new(PhaseLabel::Rapid, side).push(event)
        };
        let phases = vec![
            ShapingPhase::new(PhaseLabel::BindOff, Side::Both)
                .push(ShapingEvent::new(ShapingKind::BindOff, 10, Placement::Center)),
            neck(Side::Left),
            neck(Side::Right),
        ];
        schedule(50, phases, 1 + interval * times)
    }

    #[test]
    fn knitted_neck_decreases_sit_next_to_the_bind_off() {
        let s = split_neck(1, 2);
        let generator = InstructionGenerator::new(CraftType::Knitting);
        let sections = generator.generate("Neck", &s, None, Setup::None, FabricSide::RightSide).unwrap();
        let (left, right) = (&sections[0], &sections[1]);

        // Left works the last stitches of the bind-off row: the neck edge
        // starts RS rows and ends WS rows.
        assert!(left.steps[0].text.contains("continue on the last 20 stitches only"));
        assert_eq!(
            left.steps[1].text,
            "Purl to last 3 stitches, purl 2 together through back loop, purl 1 (19 stitches)."
        );
        assert_eq!(left.steps[2].text, "Knit 1, slip slip knit, knit to end (18 stitches).");

        // Right is rejoined for a WS row at the held first stitches: the
        // neck edge starts WS rows and ends RS rows.
        assert!(right.setup.as_deref().unwrap().contains("ready to work a wrong side row"));
        assert_eq!(right.steps[0].text, "Purl 1, purl 2 together, purl to end (19 stitches).");
        assert_eq!(
            right.steps[1].text,
            "Knit to last 3 stitches, knit 2 together, knit 1 (18 stitches)."
        );
    }

    #[test]
    fn crocheted_neck_decreases_follow_the_turned_rows() {
        let s = split_neck(1, 2);
        let generator = InstructionGenerator::new(CraftType::Crochet);
        let sections = generator.generate("Neck", &s, None, Setup::None, FabricSide::RightSide).unwrap();
        let (left, right) = (&sections[0], &sections[1]);

        // Left works the first stitches and turns at the neck.
        assert!(left.steps[0].text.contains("single crochet in the first 20 stitches, turn"));
        assert!(left.steps[1].text.starts_with("Chain 1, single crochet 2 together, single crochet to end"));
        assert!(left.steps[2].text.starts_with("Chain 1, single crochet to last 2 stitches"));

        // Right joins at the outer edge, so its first row ends at the neck.
        assert!(right.setup.as_deref().unwrap().contains("outer edge"));
        assert!(right.steps[0].text.starts_with("Chain 1, single crochet to last 2 stitches"));
        assert!(right.steps[1].text.starts_with("Chain 1, single crochet 2 together, single crochet to end"));
    }

    #[test]
    fn abbreviation_pass_applies_to_every_line() {
        let s = schedule(40, vec![dec_every(2, 1)], 2);
        let generator = InstructionGenerator::new(CraftType::Knitting).with_abbreviations(Language::EnUs);
        let section = &generator.generate("B", &s, None, Setup::CastOn, FabricSide::RightSide).unwrap()[0];
        assert_eq!(section.setup.as_deref(), Some("CO 40 sts."));
        assert_eq!(section.steps[0].text, "K1, ssk, k to last 3 sts, k2tog, k1 (38 sts).");
        assert_eq!(section.steps[1].text, "Work even in St st (38 sts).");
    }

    #[test]
    fn generation_is_deterministic() {
        let s = schedule(60, vec![dec_every(4, 5)], 30);
        let generator = InstructionGenerator::new(CraftType::Crochet).with_abbreviations(Language::EnUk);
        let a = generator.generate("X", &s, Some(&mut lace()), Setup::CastOn, FabricSide::RightSide).unwrap();
        let b = generator.generate("X", &s, Some(&mut lace()), Setup::CastOn, FabricSide::RightSide).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn broken_template_fails_generation() {
        let templates = TemplateSet::new().with_override(
            CraftType::Knitting,
            InstructionKind::Plain,
            "Knit {rows} rows",
        );
        let s = schedule(10, vec![], 2);
        let generator = InstructionGenerator::new(CraftType::Knitting).with_templates(templates);
        let err = generator.generate("P", &s, None, Setup::None, FabricSide::RightSide).unwrap_err();
        assert!(matches!(err, DomainError::TemplateMismatch { .. }));
    }
}
