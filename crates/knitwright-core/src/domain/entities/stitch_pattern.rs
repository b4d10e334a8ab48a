//! Stitch-pattern definitions and the cyclic row cursor.
//!
//! A [`StitchPattern`] is catalog data: named rows of instruction text plus
//! the repeat tile size. A [`StitchPatternContext`] places that tile on a
//! piece (edge stitches, stockinette buffers, full repeats) and walks its
//! rows. The cursor is a plain index into the row array, advanced modulo the
//! repeat height, so the cycle never runs out and restarts on `reset`.

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::CraftType,
    warning::{Warning, WarningCode},
};

/// One row (or round) of a stitch pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRow {
    pub instruction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PatternRow {
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// A repeating decorative motif as stored in a pattern library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StitchPattern {
    pub id: String,
    pub name: String,
    pub craft: CraftType,
    pub repeat_width: u32,
    pub rows: Vec<PatternRow>,
    /// Extra stitches needed once per row to balance the motif.
    #[serde(default)]
    pub balance_stitches: u32,
}

impl StitchPattern {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        craft: CraftType,
        repeat_width: u32,
        rows: Vec<PatternRow>,
    ) -> Result<Self, DomainError> {
        let pattern = Self {
            id: id.into(),
            name: name.into(),
            craft,
            repeat_width,
            rows,
            balance_stitches: 0,
        };
        pattern.validate()?;
        Ok(pattern)
    }

    pub fn with_balance(mut self, stitches: u32) -> Self {
        self.balance_stitches = stitches;
        self
    }

    pub fn repeat_height(&self) -> usize {
        self.rows.len()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::InvalidPattern("pattern id is empty".into()));
        }
        if self.repeat_width == 0 {
            return Err(DomainError::InvalidPattern(format!(
                "'{}' has a repeat width of 0",
                self.id
            )));
        }
        if self.rows.is_empty() {
            return Err(DomainError::InvalidPattern(format!(
                "'{}' has no rows",
                self.id
            )));
        }
        if let Some(pos) = self.rows.iter().position(|r| r.instruction.trim().is_empty()) {
            return Err(DomainError::InvalidPattern(format!(
                "'{}' row {} has no instruction",
                self.id,
                pos + 1
            )));
        }
        Ok(())
    }
}

/// A stitch pattern placed on a piece, with its row cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StitchPatternContext {
    pattern: StitchPattern,
    /// Selvedge stitches on each side, outside the motif.
    pub edge_stitches: u32,
    /// Plain stockinette stitches between each edge and the motif.
    pub buffer_stitches: u32,
    pub full_repeats: u32,
    cursor: usize,
}

impl StitchPatternContext {
    pub fn new(
        pattern: StitchPattern,
        edge_stitches: u32,
        buffer_stitches: u32,
        full_repeats: u32,
    ) -> Self {
        Self {
            pattern,
            edge_stitches,
            buffer_stitches,
            full_repeats,
            cursor: 0,
        }
    }

    /// Place as many full repeats as fit in `stitches` after allowances.
    pub fn fit(pattern: StitchPattern, stitches: u32, edge_stitches: u32, buffer_stitches: u32) -> Self {
        let budget = stitches
            .saturating_sub(2 * (edge_stitches + buffer_stitches))
            .saturating_sub(pattern.balance_stitches);
        let full_repeats = budget / pattern.repeat_width;
        Self::new(pattern, edge_stitches, buffer_stitches, full_repeats)
    }

    pub fn pattern(&self) -> &StitchPattern {
        &self.pattern
    }

    pub fn repeat_width(&self) -> u32 {
        self.pattern.repeat_width
    }

    pub fn repeat_height(&self) -> usize {
        self.pattern.repeat_height()
    }

    /// 0-based index of the row `advance` will return next.
    pub fn current_index(&self) -> usize {
        self.cursor
    }

    /// The row at the cursor, without moving it.
    pub fn peek(&self) -> &PatternRow {
        &self.pattern.rows[self.cursor]
    }

    /// Return the row at the cursor and move to the next, wrapping.
    pub fn advance(&mut self) -> &PatternRow {
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.pattern.rows.len();
        &self.pattern.rows[index]
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Stitches the motif occupies, balance stitches included.
    pub fn motif_stitches(&self) -> u32 {
        self.pattern.repeat_width * self.full_repeats + self.pattern.balance_stitches
    }

    /// Compare the motif width against what `stitches` leaves after edge and
    /// buffer allowances. A mismatch is advisory only.
    pub fn validate(&self, stitches: u32) -> Option<Warning> {
        let allowance = 2 * (self.edge_stitches + self.buffer_stitches);
        let budget = stitches.saturating_sub(allowance);
        let needed = self.motif_stitches();
        if needed == budget {
            return None;
        }
        Some(Warning::new(
            WarningCode::RepeatMismatch,
            format!(
                "{}: {} repeat(s) of {} sts need {} sts, but {} sts leave {} after {} edge/buffer sts; \
                 adjust the stitch count or buffers",
                self.pattern.name,
                self.full_repeats,
                self.pattern.repeat_width,
                needed,
                stitches,
                budget,
                allowance
            ),
        ))
    }
}
