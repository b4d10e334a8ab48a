//! Error handling for the Knitwright CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Proper error chaining
//! - Exit code mapping

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use knitwright_core::error::KnitError;

pub use knitwright_core::error::ErrorCategory as CoreCategory;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input (validation failed).
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The request file does not exist.
    #[error("Request file not found: {path}")]
    RequestNotFound { path: PathBuf },

    /// The request file exists but is not a valid request.
    #[error("Could not read request '{path}': {message}")]
    RequestParse { path: PathBuf, message: String },

    /// `--piece` named a piece the request does not contain.
    #[error("No piece named '{name}' in the request")]
    PieceNotFound {
        name: String,
        available: Vec<String>,
    },

    /// The patterns directory does not exist.
    #[error("Patterns directory not found: {path}")]
    PatternsDirNotFound { path: PathBuf },

    /// At least one piece of the request could not be calculated.
    #[error("{failed} of {total} piece(s) could not be calculated")]
    CalculationFailed { failed: usize, total: usize },

    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Core errors ────────────────────────────────────────────────────────
    /// An error propagated from `knitwright-core`.
    #[error("{0}")]
    Core(#[from] KnitError),

    // ── System errors ──────────────────────────────────────────────────────
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {message}"),
                "Use --help for usage information".into(),
            ],

            Self::RequestNotFound { path } => vec![
                format!("No file at '{}'", path.display()),
                "Request files end in .toml or .json".into(),
                "See the demos/ directory for complete requests".into(),
            ],

            Self::RequestParse { .. } => vec![
                "Every piece needs `name`, `gauge` and a `construction` with a `method`".into(),
                "Methods: top_down_center_out, side_to_side, bottom_up, panel".into(),
                "A garment file lists its pieces under `pieces`".into(),
            ],

            Self::PieceNotFound { available, .. } => {
                let mut suggestions = vec!["Pieces in this request:".to_string()];
                suggestions.extend(available.iter().map(|name| format!("  • {name}")));
                suggestions
            }

            Self::PatternsDirNotFound { path } => vec![
                format!("Create the directory: mkdir -p {}", path.display()),
                "Or fix patterns.local_path in your configuration".into(),
            ],

            Self::CalculationFailed { .. } => vec![
                "The errors of each failed piece are listed above".into(),
                "Pieces that succeeded were still printed".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {message}"),
                format!(
                    "Check your config file at {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "Use 'knitwright init --force' to write a fresh default config".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {message}"),
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::UserError,
            Self::RequestNotFound { .. } => ErrorCategory::NotFound,
            Self::RequestParse { .. } => ErrorCategory::UserError,
            Self::PieceNotFound { .. } => ErrorCategory::NotFound,
            Self::PatternsDirNotFound { .. } => ErrorCategory::NotFound,
            Self::CalculationFailed { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(), // ℹ
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {self}\n"));

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// Internal/system error.
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Extension trait to convert foreign error types into [`CliError`] at
/// call-sites with a descriptive context message.
pub trait IntoCli<T> {
    /// Convert to `CliResult` attaching a human-readable context message.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knitwright_core::application::ApplicationError;
    use knitwright_core::domain::DomainError;
    use std::io;

    // ── suggestions ───────────────────────────────────────────────────────

    #[test]
    fn piece_not_found_lists_available_pieces() {
        let err = CliError::PieceNotFound {
            name: "Sleeve".into(),
            available: vec!["Back".into(), "Front".into()],
        };
        let suggestions = err.suggestions();
        assert!(suggestions.iter().any(|s| s.contains("Back")));
        assert!(suggestions.iter().any(|s| s.contains("Front")));
    }

    #[test]
    fn request_parse_mentions_methods() {
        let err = CliError::RequestParse {
            path: PathBuf::from("x.toml"),
            message: "missing field `gauge`".into(),
        };
        assert!(err.suggestions().iter().any(|s| s.contains("side_to_side")));
    }

    #[test]
    fn core_suggestions_pass_through() {
        let core = KnitError::from(DomainError::MissingMeasurement { field: "chest" });
        let expected = core.suggestions();
        assert_eq!(CliError::Core(core).suggestions(), expected);
    }

    // ── exit codes ────────────────────────────────────────────────────────

    #[test]
    fn exit_code_user_error() {
        assert_eq!(
            CliError::InvalidInput {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            2
        );
        assert_eq!(
            CliError::CalculationFailed {
                failed: 1,
                total: 3
            }
            .exit_code(),
            2
        );
    }

    #[test]
    fn exit_code_not_found() {
        assert_eq!(
            CliError::RequestNotFound {
                path: PathBuf::from("nope.toml")
            }
            .exit_code(),
            3
        );
        let missing = KnitError::from(ApplicationError::PatternNotFound { id: "x".into() });
        assert_eq!(CliError::Core(missing).exit_code(), 3);
    }

    #[test]
    fn exit_code_configuration() {
        assert_eq!(
            CliError::ConfigError {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            4
        );
    }

    #[test]
    fn exit_code_internal() {
        assert_eq!(
            CliError::IoError {
                message: "x".into(),
                source: io::Error::other("e"),
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn invalid_gauge_is_a_user_error() {
        let core = KnitError::from(DomainError::InvalidGauge {
            reason: "stitches per 10 must be positive".into(),
        });
        assert_eq!(CliError::Core(core).category(), ErrorCategory::UserError);
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn format_plain_contains_error_header() {
        let err = CliError::PatternsDirNotFound {
            path: PathBuf::from("/tmp/x"),
        };
        let s = err.format_plain(false);
        assert!(s.contains("Error:"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
    }

    #[test]
    fn format_plain_verbose_shows_cause() {
        let err = CliError::IoError {
            message: "reading request".into(),
            source: io::Error::other("disk on fire"),
        };
        let s = err.format_plain(true);
        assert!(s.contains("Caused by: disk on fire"));
        assert!(!s.contains("--verbose"));
    }

    // ── IntoCli ───────────────────────────────────────────────────────────

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli: CliResult<()> = result.with_cli_context(|| "reading request");
        assert!(matches!(cli, Err(CliError::IoError { message, .. }) if message == "reading request"));
    }
}
