//! The shared event model every shaper produces.
//!
//! ```text
//! ShapingSchedule
//! ├── starting_stitches / final_stitches / total_rows
//! └── phases: Vec<ShapingPhase>          (ordered)
//!     ├── label, side (Both | Left | Right)
//!     └── events: Vec<ShapingEvent>      (same cadence within a phase)
//! ```
//!
//! Phases on [`Side::Both`] are worked across the whole fabric, one after the
//! other. Once a [`Placement::Center`] event splits the fabric, `Left` and
//! `Right` phases are worked separately over the same rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{FabricSide, Placement, ShapingKind, Side},
};

// ── ShapingEvent ─────────────────────────────────────────────────────────────

/// One discrete shaping action, possibly repeated at a fixed cadence.
///
/// `stitches` is the number of stitches changed on each shaping row, summed
/// across the row (a "decrease 1 at each end" row has `stitches == 2`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapingEvent {
    pub kind: ShapingKind,
    pub stitches: u32,
    pub placement: Placement,
    /// Fabric side the shaping rows fall on, when the cadence fixes one.
    pub fabric_side: Option<FabricSide>,
    pub repeat: u32,
    /// Rows from one shaping row to the next.
    pub interval: u32,
}

impl ShapingEvent {
    /// A single occurrence on the next row.
    pub fn new(kind: ShapingKind, stitches: u32, placement: Placement) -> Self {
        Self {
            kind,
            stitches,
            placement,
            fabric_side: None,
            repeat: 1,
            interval: 1,
        }
    }

    /// Repeat `times` times, one shaping row every `interval` rows.
    pub fn every(mut self, interval: u32, times: u32) -> Self {
        self.interval = interval;
        self.repeat = times;
        self
    }

    pub fn on(mut self, side: FabricSide) -> Self {
        self.fabric_side = Some(side);
        self
    }

    /// Signed change in stitch count over all repeats.
    pub fn stitch_delta(&self) -> i64 {
        self.kind.sign() * i64::from(self.stitches) * i64::from(self.repeat)
    }

    /// Rows consumed by this event, shaping rows included.
    pub fn rows(&self) -> u32 {
        self.repeat * self.interval
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.stitches == 0 {
            return Err(DomainError::invalid_input(
                "Shaping event must affect at least one stitch",
            ));
        }
        if self.repeat == 0 {
            return Err(DomainError::invalid_input(
                "Shaping event must occur at least once",
            ));
        }
        if self.interval == 0 {
            return Err(DomainError::invalid_input(
                "Shaping interval must be at least one row",
            ));
        }
        Ok(())
    }
}

// ── ShapingPhase ─────────────────────────────────────────────────────────────

/// Why a phase exists; used for display and for lookups in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseLabel {
    /// Initial bind-off (armhole base, neckline centre).
    BindOff,
    Rapid,
    Gradual,
    Increase,
    Decrease,
    /// Raglan line.
    Diagonal,
}

/// An ordered, homogeneous run of events sharing one cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapingPhase {
    pub label: PhaseLabel,
    pub side: Side,
    pub events: Vec<ShapingEvent>,
}

impl ShapingPhase {
    pub fn new(label: PhaseLabel, side: Side) -> Self {
        Self {
            label,
            side,
            events: Vec::new(),
        }
    }

    /// Append `event`, skipping events that would never occur.
    pub fn push(mut self, event: ShapingEvent) -> Self {
        if event.repeat > 0 && event.stitches > 0 {
            self.events.push(event);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn total_shaping_rows(&self) -> u32 {
        self.events.iter().map(ShapingEvent::rows).sum()
    }

    pub fn stitch_delta(&self) -> i64 {
        self.events.iter().map(ShapingEvent::stitch_delta).sum()
    }

    /// Number of shaping rows (sum of repeats).
    pub fn event_count(&self) -> u32 {
        self.events.iter().map(|e| e.repeat).sum()
    }

    pub fn stitches_per_event(&self) -> Option<u32> {
        self.events.first().map(|e| e.stitches)
    }

    pub fn shaping_frequency(&self) -> Option<u32> {
        self.events.first().map(|e| e.interval)
    }
}

// ── ShapingSchedule ──────────────────────────────────────────────────────────

/// Aggregate of phases plus derived totals.
///
/// Invariant: `starting_stitches + Σ phase deltas == final_stitches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapingSchedule {
    pub starting_stitches: u32,
    pub phases: Vec<ShapingPhase>,
    pub final_stitches: u32,
    /// Rows covered by the schedule, plain rows after the last shaping
    /// row included.
    pub total_rows: u32,
}

impl ShapingSchedule {
    /// Build a schedule, deriving the final count and total rows.
    ///
    /// `min_rows` extends the schedule with plain rows when the target
    /// height is taller than the shaping. Empty phases are dropped.
    pub fn new(
        starting_stitches: u32,
        phases: Vec<ShapingPhase>,
        min_rows: u32,
    ) -> Result<Self, DomainError> {
        let phases: Vec<ShapingPhase> = phases.into_iter().filter(|p| !p.is_empty()).collect();
        let delta: i64 = phases.iter().map(ShapingPhase::stitch_delta).sum();
        let final_stitches = i64::from(starting_stitches) + delta;
        if final_stitches < 0 {
            return Err(DomainError::invalid_input(format!(
                "Shaping removes {} stitches from a {starting_stitches}-stitch piece",
                -delta
            )));
        }

        let mut schedule = Self {
            starting_stitches,
            phases,
            final_stitches: final_stitches as u32,
            total_rows: 0,
        };
        schedule.total_rows = schedule.shaping_rows().max(min_rows);
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn phase(&self, index: usize) -> Option<&ShapingPhase> {
        self.phases.get(index)
    }

    /// True once a centre bind-off divides the fabric or a phase is worked on
    /// one side only.
    pub fn is_split(&self) -> bool {
        self.phases.iter().any(|p| {
            p.side != Side::Both || p.events.iter().any(|e| e.placement == Placement::Center)
        })
    }

    /// Phases worked when knitting `side`: every `Both` phase followed by the
    /// phases of that side. For an unsplit schedule, `Side::Both` returns all
    /// phases.
    pub fn flow(&self, side: Side) -> Vec<&ShapingPhase> {
        self.phases
            .iter()
            .filter(|p| p.side == Side::Both || p.side == side)
            .collect()
    }

    /// Rows holding shaping, with split sides counted once (they are worked
    /// over the same heights).
    pub fn shaping_rows(&self) -> u32 {
        let shared: u32 = self
            .phases
            .iter()
            .filter(|p| p.side == Side::Both)
            .map(ShapingPhase::total_shaping_rows)
            .sum();
        let split = [Side::Left, Side::Right]
            .into_iter()
            .map(|side| {
                self.phases
                    .iter()
                    .filter(|p| p.side == side)
                    .map(ShapingPhase::total_shaping_rows)
                    .sum::<u32>()
            })
            .max()
            .unwrap_or(0);
        shared + split
    }

    /// Stitches left on each worked section once shaping completes.
    pub fn final_stitches_by_side(&self) -> BTreeMap<Side, u32> {
        let mut out = BTreeMap::new();
        if !self.is_split() {
            out.insert(Side::Both, self.final_stitches);
            return out;
        }
        let shared: i64 = self
            .phases
            .iter()
            .filter(|p| p.side == Side::Both)
            .map(ShapingPhase::stitch_delta)
            .sum();
        let per_side = (i64::from(self.starting_stitches) + shared) / 2;
        for side in [Side::Left, Side::Right] {
            let delta: i64 = self
                .phases
                .iter()
                .filter(|p| p.side == side)
                .map(ShapingPhase::stitch_delta)
                .sum();
            out.insert(side, (per_side + delta).max(0) as u32);
        }
        out
    }

    /// Check event invariants and the stitch-sum invariant.
    pub fn validate(&self) -> Result<(), DomainError> {
        for event in self.phases.iter().flat_map(|p| &p.events) {
            event.validate()?;
        }
        let delta: i64 = self.phases.iter().map(ShapingPhase::stitch_delta).sum();
        if i64::from(self.starting_stitches) + delta != i64::from(self.final_stitches) {
            return Err(DomainError::invalid_input(format!(
                "Schedule does not balance: {} {:+} != {}",
                self.starting_stitches, delta, self.final_stitches
            )));
        }
        if self.is_split() {
            let sides = self.final_stitches_by_side();
            let sum: u32 = sides.values().sum();
            if sum != self.final_stitches {
                return Err(DomainError::invalid_input(format!(
                    "Split sides end with {sum} stitches, schedule declares {}",
                    self.final_stitches
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec_both(interval: u32, times: u32) -> ShapingEvent {
        ShapingEvent::new(ShapingKind::Decrease, 2, Placement::BothEdges).every(interval, times)
    }

    #[test]
    fn event_totals() {
        let e = dec_both(4, 5);
        assert_eq!(e.rows(), 20);
        assert_eq!(e.stitch_delta(), -10);

        let inc = ShapingEvent::new(ShapingKind::Increase, 4, Placement::EdgesAndSpine).every(2, 3);
        assert_eq!(inc.stitch_delta(), 12);
    }

    #[test]
    fn event_validation() {
        assert!(dec_both(0, 2).validate().is_err());
        assert!(dec_both(2, 0).validate().is_err());
        assert!(ShapingEvent::new(ShapingKind::BindOff, 0, Placement::RowStart)
            .validate()
            .is_err());
    }

    #[test]
    fn schedule_balances_and_pads_rows() {
        let phases = vec![
            ShapingPhase::new(PhaseLabel::BindOff, Side::Both).push(
                ShapingEvent::new(ShapingKind::BindOff, 4, Placement::RowStart).every(1, 2),
            ),
            ShapingPhase::new(PhaseLabel::Rapid, Side::Both).push(dec_both(2, 3)),
        ];
        let s = ShapingSchedule::new(100, phases, 40).unwrap();
        assert_eq!(s.final_stitches, 100 - 8 - 6);
        assert_eq!(s.shaping_rows(), 2 + 6);
        assert_eq!(s.total_rows, 40);
        assert!(!s.is_split());
    }

    #[test]
    fn empty_phases_are_dropped() {
        let phases = vec![
            ShapingPhase::new(PhaseLabel::Rapid, Side::Both).push(dec_both(2, 0)),
            ShapingPhase::new(PhaseLabel::Gradual, Side::Both).push(dec_both(4, 2)),
        ];
        let s = ShapingSchedule::new(20, phases, 0).unwrap();
        assert_eq!(s.phases.len(), 1);
        assert_eq!(s.phase(0).unwrap().label, PhaseLabel::Gradual);
    }

    #[test]
    fn rejects_overshooting_schedule() {
        let phases =
            vec![ShapingPhase::new(PhaseLabel::Decrease, Side::Both).push(dec_both(2, 10))];
        assert!(ShapingSchedule::new(10, phases, 0).is_err());
    }

    #[test]
    fn split_schedule_per_side_totals() {
        let neck = |side| {
            ShapingPhase::new(PhaseLabel::Rapid, side).push(
                ShapingEvent::new(ShapingKind::Decrease, 1, Placement::NeckEdge).every(2, 3),
            )
        };
        let phases = vec![
            ShapingPhase::new(PhaseLabel::BindOff, Side::Both)
                .push(ShapingEvent::new(ShapingKind::BindOff, 10, Placement::Center)),
            neck(Side::Left),
            neck(Side::Right),
        ];
        let s = ShapingSchedule::new(50, phases, 0).unwrap();
        let sides = s.final_stitches_by_side();
        assert_eq!(sides[&Side::Left], 17);
        assert_eq!(sides[&Side::Right], 17);
        assert_eq!(s.final_stitches, 34);
        assert_eq!(s.shaping_rows(), 1 + 6);
        assert_eq!(s.flow(Side::Left).len(), 2);
    }
}
