//! Generated output records.
//!
//! Produced once by the generator and never mutated afterwards. Consumers
//! may group or paginate them; they own copies, not views.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{FabricSide, Side};

/// One worked row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionStep {
    /// 1-based within its section.
    pub row: u32,
    pub fabric_side: FabricSide,
    pub text: String,
    /// Stitches on the needle after this row.
    pub stitches: u32,
    pub is_shaping: bool,
    pub is_pattern: bool,
}

/// A run of rows presented as one instruction.
///
/// Shaping rows always form a group of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionGroup {
    pub first_row: u32,
    pub last_row: u32,
    pub text: String,
    pub stitches: u32,
}

impl InstructionGroup {
    pub fn row_count(&self) -> u32 {
        self.last_row - self.first_row + 1
    }
}

impl fmt::Display for InstructionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first_row == self.last_row {
            write!(f, "Row {}: {}", self.first_row, self.text)
        } else {
            write!(f, "Rows {}\u{2013}{}: {}", self.first_row, self.last_row, self.text)
        }
    }
}

/// Instructions for one separately worked part of a piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionSection {
    pub title: String,
    pub side: Side,
    /// Setup line worked before row 1 (cast on, rejoin yarn).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<String>,
    pub starting_stitches: u32,
    pub steps: Vec<InstructionStep>,
    pub groups: Vec<InstructionGroup>,
}

impl InstructionSection {
    pub fn row_count(&self) -> u32 {
        self.steps.last().map_or(0, |s| s.row)
    }

    pub fn final_stitches(&self) -> u32 {
        self.steps.last().map_or(self.starting_stitches, |s| s.stitches)
    }

    pub fn shaping_rows(&self) -> impl Iterator<Item = &InstructionStep> {
        self.steps.iter().filter(|s| s.is_shaping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_label_uses_en_dash_for_ranges() {
        let single = InstructionGroup {
            first_row: 3,
            last_row: 3,
            text: "Knit.".into(),
            stitches: 10,
        };
        let range = InstructionGroup {
            first_row: 4,
            last_row: 9,
            text: "Work even.".into(),
            stitches: 10,
        };
        assert_eq!(single.to_string(), "Row 3: Knit.");
        assert_eq!(range.to_string(), "Rows 4\u{2013}9: Work even.");
        assert_eq!(range.row_count(), 6);
    }
}
