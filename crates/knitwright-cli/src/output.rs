//! Output management and formatting.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use knitwright_core::application::{CalculationResult, PieceSchedule};
use knitwright_core::domain::{InstructionSection, Warning};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    ///
    /// An explicit `--output-format` wins over `output.format`; `auto`
    /// resolves to Human on a TTY and Plain otherwise.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = match args.output_format {
            OutputFormat::Auto => OutputFormat::from_config(&config.output.format),
            explicit => explicit,
        };
        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Machine-readable payload. Written even in quiet mode.
    pub fn data(&self, payload: &str) -> io::Result<()> {
        self.term.write_line(payload)
    }

    /// Serialise `value` as pretty JSON via [`Self::data`].
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> io::Result<()> {
        let payload = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.data(&payload)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Error indicator: `✗ <msg>`.  *Not* suppressed in quiet mode.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2717} {msg}") // ✗
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    // ── Calculation results ───────────────────────────────────────────────

    /// Print every piece of a calculation. JSON mode emits one array.
    pub fn results(&self, results: &[CalculationResult], every_row: bool) -> io::Result<()> {
        if self.resolved_format == OutputFormat::Json {
            return self.json(results);
        }
        for (i, result) in results.iter().enumerate() {
            if i > 0 {
                self.print("")?;
            }
            self.piece(result, every_row)?;
        }
        Ok(())
    }

    fn piece(&self, result: &CalculationResult, every_row: bool) -> io::Result<()> {
        if !result.success {
            self.error(&format!("{}: could not be calculated", result.piece))?;
            for message in &result.errors {
                self.error(&format!("  {message}"))?;
            }
            return Ok(());
        }

        self.header(&format!("\u{2500}\u{2500} {} \u{2500}\u{2500}", result.piece))?;
        if let Some(schedule) = &result.schedule {
            self.print(&summary_line(schedule))?;
        }
        for warning in &result.warnings {
            self.warning(&warning_line(warning))?;
        }
        for section in result.instructions.iter().flatten() {
            self.section(section, every_row)?;
        }
        Ok(())
    }

    fn section(&self, section: &InstructionSection, every_row: bool) -> io::Result<()> {
        self.print("")?;
        let title = if self.supports_color() {
            section.title.bold().to_string()
        } else {
            section.title.clone()
        };
        self.print(&title)?;
        if let Some(setup) = &section.setup {
            self.print(&format!("  {setup}"))?;
        }
        if every_row {
            for step in &section.steps {
                self.print(&format!(
                    "  Row {} ({}): {} [{} sts]",
                    step.row, step.fabric_side, step.text, step.stitches
                ))?;
            }
        } else {
            for group in &section.groups {
                self.print(&format!("  {group} [{} sts]", group.stitches))?;
            }
        }
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

fn summary_line(schedule: &PieceSchedule) -> String {
    let mut line = format!(
        "Cast on {} stitches, work {} rows, end with {} stitches.",
        schedule.cast_on, schedule.total_rows, schedule.final_stitches
    );
    if let Some(achieved) = schedule.achieved {
        line.push_str(&format!(
            " Finished size {:.1} wide by {:.1} deep.",
            achieved.wingspan, achieved.depth
        ));
    }
    line
}

fn warning_line(warning: &Warning) -> String {
    format!("[{}] {}", serde_code(warning), warning.message)
}

/// Snake-case name of the warning code, as it appears in JSON output.
fn serde_code(warning: &Warning) -> String {
    serde_json::to_value(warning.code)
        .ok()
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_else(|| format!("{:?}", warning.code))
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use knitwright_core::domain::{TriangleDimensions, WarningCode};

    use crate::config::AppConfig;

    fn make_manager(quiet: bool, format: OutputFormat) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color: false,
            config: None,
            output_format: format,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn explicit_format_is_kept() {
        assert_eq!(make_manager(false, OutputFormat::Json).format(), OutputFormat::Json);
        assert_eq!(make_manager(false, OutputFormat::Human).format(), OutputFormat::Human);
    }

    #[test]
    fn config_format_applies_when_flag_is_auto() {
        let mut config = AppConfig::default();
        config.output.format = "json".into();
        let args = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: false,
            config: None,
            output_format: OutputFormat::Auto,
        };
        assert_eq!(OutputManager::new(&args, &config).format(), OutputFormat::Json);
    }

    #[test]
    fn only_human_output_is_colored() {
        assert!(make_manager(false, OutputFormat::Human).supports_color());
        assert!(!make_manager(false, OutputFormat::Plain).supports_color());
    }

    #[test]
    fn quiet_mode_writes_are_ok() {
        let out = make_manager(true, OutputFormat::Plain);
        assert!(out.print("hello").is_ok());
        assert!(out.error("something went wrong").is_ok());
    }

    #[test]
    fn summary_mentions_counts_and_achieved_size() {
        let schedule = PieceSchedule {
            cast_on: 5,
            final_stitches: 301,
            total_rows: 150,
            parts: Vec::new(),
            achieved: Some(TriangleDimensions {
                wingspan: 150.5,
                depth: 74.96,
            }),
        };
        let line = summary_line(&schedule);
        assert!(line.starts_with("Cast on 5 stitches, work 150 rows, end with 301 stitches."));
        assert!(line.contains("150.5 wide by 75.0 deep"));
    }

    #[test]
    fn warnings_show_their_code() {
        let warning = Warning::new(WarningCode::RepeatMismatch, "3 stitches left over");
        assert_eq!(warning_line(&warning), "[repeat_mismatch] 3 stitches left over");
    }
}
