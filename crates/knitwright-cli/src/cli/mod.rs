//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "knitwright",
    bin_name = "knitwright",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f9f6} Garment shaping and row-by-row instructions",
    long_about = "Knitwright turns gauge and target measurements into stitch counts, \
                  shaping schedules and written row-by-row instructions for \
                  knitting and crochet.",
    after_help = "EXAMPLES:\n\
        \x20 knitwright calculate demos/top-down-shawl.toml\n\
        \x20 knitwright calculate demos/sweater.toml --abbreviate --language en-uk\n\
        \x20 knitwright patterns --craft crochet\n\
        \x20 knitwright completions bash > /usr/share/bash-completion/completions/knitwright",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Calculate one piece or a whole garment from a request file.
    #[command(
        visible_alias = "calc",
        about = "Calculate shaping and instructions from a request file",
        after_help = "EXAMPLES:\n\
            \x20 knitwright calculate shawl.toml\n\
            \x20 knitwright calculate sweater.json --piece Front\n\
            \x20 knitwright calculate sweater.toml --abbreviate --output-format json"
    )]
    Calculate(CalculateArgs),

    /// List available stitch patterns.
    #[command(
        visible_alias = "ls",
        about = "List available stitch patterns",
        after_help = "EXAMPLES:\n\
            \x20 knitwright patterns\n\
            \x20 knitwright patterns --craft crochet\n\
            \x20 knitwright patterns --patterns-dir ./my-patterns --format csv"
    )]
    Patterns(PatternsArgs),

    /// Initialise a Knitwright configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 knitwright init           # platform config directory\n\
            \x20 knitwright init --local   # .knitwright.toml in CWD\n\
            \x20 knitwright init --force   # overwrite an existing file"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 knitwright completions bash > ~/.local/share/bash-completion/completions/knitwright\n\
            \x20 knitwright completions zsh  > ~/.zfunc/_knitwright\n\
            \x20 knitwright completions fish > ~/.config/fish/completions/knitwright.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Knitwright configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 knitwright config get defaults.craft\n\
            \x20 knitwright config list\n\
            \x20 knitwright config path"
    )]
    Config(ConfigCommands),
}

// ── calculate ─────────────────────────────────────────────────────────────────

/// Arguments for `knitwright calculate`.
#[derive(Debug, Args)]
pub struct CalculateArgs {
    /// Request file: a single piece, or a garment with a `pieces` list.
    #[arg(value_name = "FILE", help = "Request file (.toml or .json)")]
    pub request: PathBuf,

    /// Only calculate the piece with this name.
    #[arg(
        short = 'p',
        long = "piece",
        value_name = "NAME",
        help = "Only calculate the named piece"
    )]
    pub piece: Option<String>,

    /// Rewrite instructions with standard abbreviations.
    #[arg(short = 'a', long = "abbreviate", help = "Use standard abbreviations")]
    pub abbreviate: bool,

    /// Terminology dialect, overriding the request and config.
    #[arg(
        short = 'l',
        long = "language",
        value_enum,
        value_name = "LANGUAGE",
        help = "Terminology dialect"
    )]
    pub language: Option<LanguageArg>,

    /// Directory of user stitch-pattern files.
    #[arg(
        long = "patterns-dir",
        value_name = "DIR",
        help = "Load extra stitch patterns from this directory"
    )]
    pub patterns_dir: Option<PathBuf>,

    /// Print every row instead of collapsed groups.
    #[arg(long = "rows", help = "Print every row instead of grouped instructions")]
    pub rows: bool,
}

// ── patterns ──────────────────────────────────────────────────────────────────

/// Arguments for `knitwright patterns`.
#[derive(Debug, Args)]
pub struct PatternsArgs {
    /// Filter by craft.
    #[arg(long = "craft", value_enum, help = "Filter by craft")]
    pub craft: Option<CraftArg>,

    /// Directory of user stitch-pattern files.
    #[arg(
        long = "patterns-dir",
        value_name = "DIR",
        help = "Load extra stitch patterns from this directory"
    )]
    pub patterns_dir: Option<PathBuf>,

    /// Listing format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Listing format"
    )]
    pub format: ListFormat,
}

/// Output format for the `patterns` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One id per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `knitwright init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.knitwright.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `knitwright completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `knitwright config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.craft`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Crafts accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum CraftArg {
    /// Also accepted as `knit`.
    #[value(alias = "knit")]
    Knitting,
    Crochet,
}

impl From<CraftArg> for knitwright_core::domain::CraftType {
    fn from(arg: CraftArg) -> Self {
        match arg {
            CraftArg::Knitting => Self::Knitting,
            CraftArg::Crochet => Self::Crochet,
        }
    }
}

/// Terminology dialects accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    #[value(name = "en-us", alias = "us")]
    EnUs,
    #[value(name = "en-uk", alias = "uk")]
    EnUk,
}

impl From<LanguageArg> for knitwright_core::domain::Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::EnUs => Self::EnUs,
            LanguageArg::EnUk => Self::EnUk,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use knitwright_core::domain::{CraftType, Language};

    #[test]
    fn parse_calculate_command() {
        let cli = Cli::parse_from([
            "knitwright",
            "calculate",
            "shawl.toml",
            "--abbreviate",
            "--language",
            "en-uk",
        ]);
        let Commands::Calculate(args) = cli.command else {
            panic!("expected Calculate command");
        };
        assert!(args.abbreviate);
        assert_eq!(args.language.map(Language::from), Some(Language::EnUk));
        assert_eq!(args.request, PathBuf::from("shawl.toml"));
    }

    #[test]
    fn calc_alias_and_piece_filter() {
        let cli = Cli::parse_from(["knitwright", "calc", "g.json", "-p", "Front"]);
        let Commands::Calculate(args) = cli.command else {
            panic!("expected Calculate command");
        };
        assert_eq!(args.piece.as_deref(), Some("Front"));
    }

    #[test]
    fn knit_alias_for_craft() {
        let cli = Cli::parse_from(["knitwright", "patterns", "--craft", "knit"]);
        let Commands::Patterns(args) = cli.command else {
            panic!("expected Patterns command");
        };
        assert_eq!(args.craft.map(CraftType::from), Some(CraftType::Knitting));
        assert_eq!(args.format, ListFormat::Table);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["knitwright", "--quiet", "--verbose", "patterns"]);
        assert!(result.is_err());
    }

    #[test]
    fn calculate_requires_a_file() {
        assert!(Cli::try_parse_from(["knitwright", "calculate"]).is_err());
    }
}
