//! Row text per instruction kind.
//!
//! Every kind has a typed value record ([`RowValues`]) and a default wording
//! per craft written as a plain `format!`, so the built-in text is checked at
//! compile time. Users may override the wording of a `(craft, kind)` pair with
//! a string using `{name}` placeholders; those are resolved against the same
//! values at render time and an unknown name is a
//! [`DomainError::TemplateMismatch`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{CraftType, FabricSide, Placement, ShapingKind},
};

/// What a row (or setup line) does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionKind {
    CastOn,
    Rejoin,
    Plain,
    BindOff,
    Decrease,
    Increase,
    CenterBindOff,
    PatternRow,
    /// Shaping worked in the edge stitches, pattern intact over the centre.
    ShapeInEdges,
    /// Shaping worked inside the pattern.
    ShapeInPattern,
}

impl InstructionKind {
    pub const ALL: [InstructionKind; 10] = [
        Self::CastOn,
        Self::Rejoin,
        Self::Plain,
        Self::BindOff,
        Self::Decrease,
        Self::Increase,
        Self::CenterBindOff,
        Self::PatternRow,
        Self::ShapeInEdges,
        Self::ShapeInPattern,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CastOn => "cast_on",
            Self::Rejoin => "rejoin",
            Self::Plain => "plain",
            Self::BindOff => "bind_off",
            Self::Decrease => "decrease",
            Self::Increase => "increase",
            Self::CenterBindOff => "center_bind_off",
            Self::PatternRow => "pattern_row",
            Self::ShapeInEdges => "shape_in_edges",
            Self::ShapeInPattern => "shape_in_pattern",
        }
    }

    /// Placeholder names a template for this kind may use.
    pub const fn placeholders(&self) -> &'static [&'static str] {
        match self {
            Self::CastOn => &["stitches", "chain"],
            Self::Rejoin => &["stitches", "side"],
            Self::Plain => &["stitches", "side"],
            Self::BindOff | Self::Decrease | Self::Increase => {
                &["count", "stitches", "side", "shaping"]
            }
            Self::CenterBindOff => &["side_stitches", "center", "stitches", "side"],
            Self::PatternRow => &["pattern", "row", "instruction", "stitches", "side"],
            Self::ShapeInEdges => &["shaping", "pattern", "row", "instruction", "stitches", "side"],
            Self::ShapeInPattern => &["shaping", "pattern", "row", "stitches", "side"],
        }
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstructionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| DomainError::InvalidRequest(format!("unknown instruction kind: {s}")))
    }
}

/// One shaping action as it appears on a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shaping {
    pub kind: ShapingKind,
    /// Stitches changed across the row.
    pub count: u32,
    pub placement: Placement,
    /// End of the row a neck-edge shaping falls on.
    pub edge: RowEnd,
}

/// Start or end of a row, in working order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowEnd {
    #[default]
    Start,
    End,
}

impl Shaping {
    /// Stitches on the needle before the row, given the count after it.
    pub fn stitches_before(&self, after: u32) -> u32 {
        match self.kind {
            ShapingKind::Increase => after.saturating_sub(self.count),
            ShapingKind::Decrease | ShapingKind::BindOff => after + self.count,
        }
    }

    /// Short description used when shaping is merged with a pattern row.
    pub fn phrase(&self) -> String {
        let n = self.count;
        let per_edge = n / 2;
        let verb = match self.kind {
            ShapingKind::BindOff => "Bind off",
            ShapingKind::Decrease => "Decrease",
            ShapingKind::Increase => "Increase",
        };
        match self.placement {
            Placement::RowStart => format!("{verb} {n} {} at the beginning of the row", plural(n)),
            Placement::BothEdges => format!("{verb} {per_edge} {} at each edge", plural(per_edge)),
            Placement::OneEdge => format!("{verb} {n} {} at the beginning of the row", plural(n)),
            Placement::NeckEdge => format!("{verb} {n} {} at the neck edge", plural(n)),
            Placement::EdgesAndSpine => {
                format!("{verb} 1 stitch at each edge and {} at the centre spine", n.saturating_sub(2))
            }
            Placement::Center => format!("{verb} the centre {n} {}", plural(n)),
        }
    }
}

fn plural(n: u32) -> &'static str {
    if n == 1 { "stitch" } else { "stitches" }
}

/// Values of one rendered line, typed per kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowValues<'a> {
    CastOn {
        stitches: u32,
    },
    Rejoin {
        stitches: u32,
        side: FabricSide,
    },
    Plain {
        stitches: u32,
        side: FabricSide,
    },
    Shaping {
        shaping: Shaping,
        stitches: u32,
        side: FabricSide,
    },
    CenterBindOff {
        side_stitches: u32,
        center: u32,
        side: FabricSide,
    },
    PatternRow {
        pattern: &'a str,
        row: usize,
        instruction: &'a str,
        stitches: u32,
        side: FabricSide,
    },
    ShapeInEdges {
        shaping: Shaping,
        pattern: &'a str,
        row: usize,
        instruction: &'a str,
        stitches: u32,
        side: FabricSide,
    },
    ShapeInPattern {
        shaping: Shaping,
        pattern: &'a str,
        row: usize,
        stitches: u32,
        side: FabricSide,
    },
}

impl RowValues<'_> {
    pub fn kind(&self) -> InstructionKind {
        match self {
            Self::CastOn { .. } => InstructionKind::CastOn,
            Self::Rejoin { .. } => InstructionKind::Rejoin,
            Self::Plain { .. } => InstructionKind::Plain,
            Self::Shaping { shaping, .. } => match shaping.kind {
                ShapingKind::BindOff => InstructionKind::BindOff,
                ShapingKind::Decrease => InstructionKind::Decrease,
                ShapingKind::Increase => InstructionKind::Increase,
            },
            Self::CenterBindOff { .. } => InstructionKind::CenterBindOff,
            Self::PatternRow { .. } => InstructionKind::PatternRow,
            Self::ShapeInEdges { .. } => InstructionKind::ShapeInEdges,
            Self::ShapeInPattern { .. } => InstructionKind::ShapeInPattern,
        }
    }

    /// Value of placeholder `name`, if this kind supplies it.
    pub fn lookup(&self, name: &str) -> Option<String> {
        match (self, name) {
            (Self::CastOn { stitches }, "stitches") => Some(stitches.to_string()),
            (Self::CastOn { stitches }, "chain") => Some((stitches + 1).to_string()),
            (Self::Rejoin { stitches, .. } | Self::Plain { stitches, .. }, "stitches") => {
                Some(stitches.to_string())
            }
            (Self::Shaping { shaping, .. }, "count") => Some(shaping.count.to_string()),
            (Self::Shaping { shaping, .. }, "shaping") => Some(shaping.phrase()),
            (Self::Shaping { stitches, .. }, "stitches") => Some(stitches.to_string()),
            (Self::CenterBindOff { side_stitches, .. }, "side_stitches" | "stitches") => {
                Some(side_stitches.to_string())
            }
            (Self::CenterBindOff { center, .. }, "center") => Some(center.to_string()),
            (
                Self::PatternRow { pattern, .. }
                | Self::ShapeInEdges { pattern, .. }
                | Self::ShapeInPattern { pattern, .. },
                "pattern",
            ) => Some((*pattern).to_string()),
            (
                Self::PatternRow { row, .. }
                | Self::ShapeInEdges { row, .. }
                | Self::ShapeInPattern { row, .. },
                "row",
            ) => Some(row.to_string()),
            (
                Self::PatternRow { instruction, .. } | Self::ShapeInEdges { instruction, .. },
                "instruction",
            ) => Some((*instruction).to_string()),
            (
                Self::PatternRow { stitches, .. }
                | Self::ShapeInEdges { stitches, .. }
                | Self::ShapeInPattern { stitches, .. },
                "stitches",
            ) => Some(stitches.to_string()),
            (
                Self::ShapeInEdges { shaping, .. } | Self::ShapeInPattern { shaping, .. },
                "shaping",
            ) => Some(shaping.phrase()),
            (_, "side") => self.fabric_side().map(|s| s.abbreviation().to_string()),
            _ => None,
        }
    }

    fn fabric_side(&self) -> Option<FabricSide> {
        match self {
            Self::CastOn { .. } => None,
            Self::Rejoin { side, .. }
            | Self::Plain { side, .. }
            | Self::Shaping { side, .. }
            | Self::CenterBindOff { side, .. }
            | Self::PatternRow { side, .. }
            | Self::ShapeInEdges { side, .. }
            | Self::ShapeInPattern { side, .. } => Some(*side),
        }
    }

    /// Built-in wording for `craft`.
    pub fn render_default(&self, craft: CraftType) -> String {
        match craft {
            CraftType::Knitting => self.knitting(),
            CraftType::Crochet => self.crochet(),
        }
    }

    fn knitting(&self) -> String {
        match *self {
            Self::CastOn { stitches } => format!("Cast on {stitches} stitches."),
            Self::Rejoin { stitches, side } => format!(
                "Rejoin yarn to the {stitches} held stitches, ready to work a {} row.",
                side_name(side)
            ),
            Self::Plain { stitches, .. } => {
                format!("Work even in stockinette stitch ({stitches} stitches).")
            }
            Self::Shaping {
                shaping,
                stitches,
                side,
            } => format!(
                "{} ({stitches} stitches).",
                knit_shaping(shaping, side, shaping.stitches_before(stitches))
            ),
            Self::CenterBindOff {
                side_stitches,
                center,
                side,
            } => {
                let (work, worked) = match side {
                    FabricSide::RightSide => ("Knit", "knit"),
                    FabricSide::WrongSide => ("Purl", "purl"),
                };
                format!(
                    "{work} {side_stitches} stitches, bind off the next {center} stitches, \
                     {worked} to end. Place the first {side_stitches} stitches on hold and \
                     continue on the last {side_stitches} stitches only."
                )
            }
            Self::PatternRow {
                pattern,
                row,
                instruction,
                stitches,
                ..
            } => format!("Work {pattern} Row {row}: {instruction} ({stitches} stitches)."),
            Self::ShapeInEdges {
                shaping,
                pattern,
                row,
                instruction,
                stitches,
                ..
            } => format!(
                "{} in edge stitches; work {pattern} Row {row} over centre stitches: \
                 {instruction} ({stitches} stitches).",
                shaping.phrase()
            ),
            Self::ShapeInPattern {
                shaping,
                pattern,
                row,
                stitches,
                ..
            } => format!(
                "{}, maintaining {pattern} pattern as established (Row {row}) \
                 ({stitches} stitches).",
                shaping.phrase()
            ),
        }
    }

    fn crochet(&self) -> String {
        match *self {
            Self::CastOn { stitches } => format!(
                "Chain {}, single crochet in second chain from hook and in each chain across, \
                 turn ({stitches} stitches).",
                stitches + 1
            ),
            Self::Rejoin { stitches, side } => format!(
                "Join yarn at the outer edge of the {stitches} unworked stitches, ready to work \
                 a {} row.",
                side_name(side)
            ),
            Self::Plain { stitches, .. } => format!(
                "Chain 1, single crochet in each stitch across, turn ({stitches} stitches)."
            ),
            Self::Shaping { shaping, stitches, side } => {
                format!(
                    "{} ({stitches} stitches).",
                    crochet_shaping(shaping, shaping.stitches_before(stitches))
                )
            }
            Self::CenterBindOff {
                side_stitches,
                center,
                ..
            } => format!(
                "Chain 1, single crochet in the first {side_stitches} stitches, turn, leaving the \
                 next {center} stitches and the last {side_stitches} stitches unworked."
            ),
            Self::PatternRow {
                pattern,
                row,
                instruction,
                stitches,
                ..
            } => format!("Work {pattern} Row {row}: {instruction} ({stitches} stitches)."),
            Self::ShapeInEdges {
                shaping,
                pattern,
                row,
                instruction,
                stitches,
                ..
            } => format!(
                "{} in edge stitches; work {pattern} Row {row} over centre stitches: \
                 {instruction} ({stitches} stitches).",
                shaping.phrase()
            ),
            Self::ShapeInPattern {
                shaping,
                pattern,
                row,
                stitches,
                ..
            } => format!(
                "{}, maintaining {pattern} pattern as established (Row {row}) \
                 ({stitches} stitches).",
                shaping.phrase()
            ),
        }
    }
}

fn side_name(side: FabricSide) -> &'static str {
    match side {
        FabricSide::RightSide => "right side",
        FabricSide::WrongSide => "wrong side",
    }
}

/// `before` is the stitch count at the start of the row.
fn knit_shaping(shaping: Shaping, side: FabricSide, before: u32) -> String {
    let rs = side == FabricSide::RightSide;
    let n = shaping.count;
    match (shaping.kind, shaping.placement) {
        (ShapingKind::BindOff, _) => {
            let work = if rs { "knit" } else { "purl" };
            format!("Bind off {n} stitches at the beginning of the row, {work} to end")
        }
        // Too few stitches for edge stitches either side of the decreases.
        (ShapingKind::Decrease, Placement::BothEdges) if before < 6 => match (before, rs) {
            (5, true) => "Slip slip knit, knit 1, knit 2 together".into(),
            (4, true) => "Slip slip knit, knit 2 together".into(),
            (_, true) => "Slip 1, knit 2 together, pass slipped stitch over".into(),
            (5, false) => "Purl 2 together, purl 1, purl 2 together through back loop".into(),
            (4, false) => "Purl 2 together, purl 2 together through back loop".into(),
            (_, false) => "Purl 3 together".into(),
        },
        (ShapingKind::Decrease, Placement::BothEdges) if rs => {
            "Knit 1, slip slip knit, knit to last 3 stitches, knit 2 together, knit 1".into()
        }
        (ShapingKind::Decrease, Placement::BothEdges) => {
            "Purl 1, purl 2 together, purl to last 3 stitches, purl 2 together through back loop, purl 1"
                .into()
        }
        (ShapingKind::Decrease, Placement::OneEdge) if rs => {
            "Knit 1, slip slip knit, knit to end".into()
        }
        (ShapingKind::Decrease, Placement::OneEdge) => {
            "Purl to last 3 stitches, purl 2 together through back loop, purl 1".into()
        }
        (ShapingKind::Decrease, Placement::NeckEdge) => match (shaping.edge, rs) {
            (RowEnd::Start, true) => "Knit 1, slip slip knit, knit to end".into(),
            (RowEnd::End, true) => "Knit to last 3 stitches, knit 2 together, knit 1".into(),
            (RowEnd::Start, false) => "Purl 1, purl 2 together, purl to end".into(),
            (RowEnd::End, false) => {
                "Purl to last 3 stitches, purl 2 together through back loop, purl 1".into()
            }
        },
        (ShapingKind::Increase, Placement::BothEdges) if rs => {
            "Knit 1, make 1 left, knit to last stitch, make 1 right, knit 1".into()
        }
        (ShapingKind::Increase, Placement::BothEdges) => {
            "Purl 1, make 1 purlwise, purl to last stitch, make 1 purlwise, purl 1".into()
        }
        (ShapingKind::Increase, Placement::OneEdge) if rs => {
            "Knit 1, make 1 left, knit to end".into()
        }
        (ShapingKind::Increase, Placement::OneEdge) => {
            "Purl to last stitch, make 1 purlwise, purl 1".into()
        }
        (ShapingKind::Increase, Placement::EdgesAndSpine) if rs => {
            "Knit 1, yarn over, knit to centre stitch, yarn over, knit 1, yarn over, \
             knit to last stitch, yarn over, knit 1"
                .into()
        }
        _ => {
            let work = if rs { "knit" } else { "purl" };
            format!("{}, {work} to end", shaping.phrase())
        }
    }
}

fn crochet_shaping(shaping: Shaping, before: u32) -> String {
    let n = shaping.count;
    match (shaping.kind, shaping.placement) {
        (ShapingKind::BindOff, _) => format!(
            "Slip stitch across the first {n} stitches, chain 1, single crochet to end, turn"
        ),
        (ShapingKind::Decrease, Placement::BothEdges) if before < 5 => match before {
            4 => "Chain 1, single crochet 2 together twice, turn".into(),
            _ => "Chain 1, single crochet 3 together, turn".into(),
        },
        (ShapingKind::Decrease, Placement::BothEdges) => {
            "Chain 1, single crochet 2 together, single crochet to last 2 stitches, \
             single crochet 2 together, turn"
                .into()
        }
        (ShapingKind::Decrease, Placement::OneEdge) => {
            "Chain 1, single crochet 2 together, single crochet to end, turn".into()
        }
        (ShapingKind::Decrease, Placement::NeckEdge) => match shaping.edge {
            RowEnd::Start => {
                "Chain 1, single crochet 2 together, single crochet to end, turn".into()
            }
            RowEnd::End => {
                "Chain 1, single crochet to last 2 stitches, single crochet 2 together, turn"
                    .into()
            }
        },
        (ShapingKind::Increase, Placement::BothEdges) => {
            "Chain 1, 2 single crochet in first stitch, single crochet to last stitch, \
             2 single crochet in last stitch, turn"
                .into()
        }
        (ShapingKind::Increase, Placement::OneEdge) => {
            "Chain 1, 2 single crochet in first stitch, single crochet to end, turn".into()
        }
        (ShapingKind::Increase, Placement::EdgesAndSpine) => {
            "Chain 1, 2 single crochet in first stitch, single crochet to centre stitch, \
             3 single crochet in centre stitch, single crochet to last stitch, \
             2 single crochet in last stitch, turn"
                .into()
        }
        _ => format!("Chain 1, {}, single crochet to end, turn", shaping.phrase().to_lowercase()),
    }
}

/// User wording per `(craft, kind)`, replacing the built-in text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSet {
    overrides: BTreeMap<(CraftType, InstructionKind), String>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(
        mut self,
        craft: CraftType,
        kind: InstructionKind,
        template: impl Into<String>,
    ) -> Self {
        self.overrides.insert((craft, kind), template.into());
        self
    }

    pub fn get(&self, craft: CraftType, kind: InstructionKind) -> Option<&str> {
        self.overrides.get(&(craft, kind)).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Check every override against the placeholders its kind supplies.
    pub fn validate(&self) -> Result<(), DomainError> {
        for ((_, kind), template) in &self.overrides {
            for name in placeholders(template) {
                if !kind.placeholders().contains(&name) {
                    return Err(DomainError::TemplateMismatch {
                        kind: kind.to_string(),
                        placeholder: name.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Text for `values`: the override for its kind if one exists, otherwise
    /// the built-in wording.
    pub fn render(&self, craft: CraftType, values: &RowValues<'_>) -> Result<String, DomainError> {
        match self.get(craft, values.kind()) {
            Some(template) => substitute(template, values),
            None => Ok(values.render_default(craft)),
        }
    }
}

/// Placeholder names in `template`, in order of appearance.
fn placeholders(template: &str) -> impl Iterator<Item = &str> {
    template.split('{').skip(1).filter_map(|part| {
        let end = part.find('}')?;
        Some(&part[..end])
    })
}

fn substitute(template: &str, values: &RowValues<'_>) -> Result<String, DomainError> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return Ok(out);
        };
        let name = &after[..end];
        let value = values.lookup(name).ok_or_else(|| DomainError::TemplateMismatch {
            kind: values.kind().to_string(),
            placeholder: name.to_string(),
        })?;
        out.push_str(&value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
