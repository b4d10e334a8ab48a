//! Advisory findings attached to a successful calculation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What kind of anomaly a [`Warning`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    /// A finished measurement falls outside plausible human ranges.
    ImplausibleMeasurement,
    /// Achieved wingspan/depth deviates from the target beyond tolerance.
    DimensionDeviation,
    /// Repeat width times repeat count does not fill the stitch budget.
    RepeatMismatch,
    /// Armhole removes too much width or takes too much height.
    ArmholeProportion,
    /// Neckline proportions could not be honoured exactly.
    NecklineProportion,
    /// Shaping did not fit the available rows and was compressed or overran.
    ShapingCompressed,
}

/// A non-fatal finding. Never blocks output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub code: WarningCode,
    pub message: String,
}

impl Warning {
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
