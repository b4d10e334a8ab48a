// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Every variant is a hard error: the piece being calculated is abandoned.
/// Advisory conditions are [`crate::domain::Warning`]s, never errors.
///
/// All errors are:
/// - Cloneable (results are plain records)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    /// A target dimension, panel width or gauge value handed to a shaper is
    /// not usable. The message names the offending input.
    #[error("{message}")]
    InvalidShapingInput { message: String },

    #[error("Missing required measurement: {field}")]
    MissingMeasurement { field: &'static str },

    #[error("Invalid gauge: {reason}")]
    InvalidGauge { reason: String },

    #[error("Invalid stitch pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // ========================================================================
    // Contract Violations
    // ========================================================================
    /// A row template referenced a placeholder its instruction kind does not
    /// supply.
    #[error("Template '{kind}' references unknown placeholder '{{{placeholder}}}'")]
    TemplateMismatch { kind: String, placeholder: String },
}

impl DomainError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidShapingInput {
            message: message.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidShapingInput { message } => vec![
                format!("Check the piece dimensions: {message}"),
                "All target dimensions must be positive lengths".into(),
            ],
            Self::MissingMeasurement { field } => vec![
                format!("Add a '{field}' value to the measurements"),
                "Chest circumference and torso length are always required for body panels".into(),
            ],
            Self::InvalidGauge { .. } => vec![
                "Gauge is stitches and rows per 10 units, measured over a washed swatch".into(),
                "Both values must be greater than 0".into(),
            ],
            Self::InvalidPattern(msg) => vec![
                format!("Stitch pattern definition is unusable: {msg}"),
                "A pattern needs at least one row and a repeat width of 1 or more".into(),
            ],
            Self::TemplateMismatch { kind, placeholder } => vec![
                format!("The '{kind}' template uses {{{placeholder}}}, which is not available"),
                "Remove the placeholder from your [templates] configuration".into(),
            ],
            Self::InvalidRequest(_) => vec!["See documentation for the request format".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidShapingInput { .. }
            | Self::MissingMeasurement { .. }
            | Self::InvalidGauge { .. }
            | Self::InvalidRequest(_) => ErrorCategory::Validation,
            Self::InvalidPattern(_) => ErrorCategory::Validation,
            Self::TemplateMismatch { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
