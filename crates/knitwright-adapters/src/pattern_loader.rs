//! Filesystem-based stitch-pattern loader.
//!
//! Discovers pattern files under a directory tree and converts them into
//! domain [`StitchPattern`]s ready for the catalog.
//!
//! # Directory layout expected
//!
//! ```text
//! patterns/
//! ├── moss.toml
//! ├── lace/
//! │   ├── old-shale.toml
//! │   └── cat-paw.json
//! └── notes.md              ← ignored
//! ```
//!
//! # Pattern file format
//!
//! ```toml
//! id            = "moss"            # optional; defaults to the file stem
//! name          = "Moss Stitch"
//! craft         = "knitting"        # knitting | crochet
//! repeat_width  = 2
//! balance_stitches = 1              # optional
//!
//! # Rows are plain strings or tables with a note.
//! rows = [
//!     "knit 1, purl 1 to last stitch, knit 1",
//!     { instruction = "purl 1, knit 1 to last stitch, purl 1", note = "WS" },
//! ]
//! ```
//!
//! JSON files use the same fields.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use knitwright_core::domain::{
    CraftType, DomainError, DomainValidator as validator, PatternRow, StitchPattern,
};

/// Why a single pattern file was rejected.
#[derive(Debug, Error)]
pub enum PatternFileError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("unsupported pattern file '{path}'")]
    Unsupported { path: PathBuf },

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// On-disk form of a pattern.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternManifest {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub craft: CraftType,
    pub repeat_width: u32,
    #[serde(default)]
    pub balance_stitches: u32,
    pub rows: Vec<RowEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RowEntry {
    Text(String),
    Full {
        instruction: String,
        #[serde(default)]
        note: Option<String>,
    },
}

impl From<RowEntry> for PatternRow {
    fn from(entry: RowEntry) -> Self {
        match entry {
            RowEntry::Text(instruction) => PatternRow::new(instruction),
            RowEntry::Full { instruction, note } => PatternRow {
                instruction,
                note,
            },
        }
    }
}

impl PatternManifest {
    /// Build the domain pattern; `fallback_id` names it when the file does
    /// not.
    pub fn into_pattern(self, fallback_id: &str) -> Result<StitchPattern, DomainError> {
        let id = self.id.unwrap_or_else(|| fallback_id.to_string());
        let rows = self.rows.into_iter().map(PatternRow::from).collect();
        let pattern = StitchPattern::new(id, self.name, self.craft, self.repeat_width, rows)?
            .with_balance(self.balance_stitches);
        validator::validate_pattern(&pattern)?;
        Ok(pattern)
    }
}

/// Loads stitch patterns from `*.toml` and `*.json` files.
///
/// ```no_run
/// use knitwright_adapters::FilesystemPatternLoader;
///
/// let loader = FilesystemPatternLoader::new("./patterns");
/// let patterns = loader.load_all()?;
/// println!("Loaded {} patterns", patterns.len());
/// # Ok::<(), knitwright_core::domain::DomainError>(())
/// ```
pub struct FilesystemPatternLoader {
    patterns_dir: PathBuf,
}

impl FilesystemPatternLoader {
    /// Create a loader pointed at `patterns_dir`.
    ///
    /// The directory does not need to exist yet; [`Self::load_all`] will
    /// return an error if it is missing when called.
    pub fn new(patterns_dir: impl Into<PathBuf>) -> Self {
        Self {
            patterns_dir: patterns_dir.into(),
        }
    }

    pub fn patterns_dir(&self) -> &Path {
        &self.patterns_dir
    }

    /// Load every valid pattern found under the directory, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPattern`] if the directory does not
    /// exist. Individual files that are unreadable or malformed are
    /// **skipped with a `WARN` log** rather than failing the whole batch.
    #[instrument(skip(self), fields(dir = %self.patterns_dir.display()))]
    pub fn load_all(&self) -> Result<Vec<StitchPattern>, DomainError> {
        if !self.patterns_dir.is_dir() {
            return Err(DomainError::InvalidPattern(format!(
                "patterns directory not found: {}",
                self.patterns_dir.display()
            )));
        }

        let mut patterns: Vec<StitchPattern> = Vec::new();
        for entry in WalkDir::new(&self.patterns_dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file() || format_of(path).is_none() {
                continue;
            }

            match load_file(path) {
                Ok(pattern) => {
                    if let Some(existing) = patterns.iter().position(|p| p.id == pattern.id) {
                        warn!(
                            id = %pattern.id,
                            file = %path.display(),
                            "duplicate pattern id, later file wins"
                        );
                        patterns.remove(existing);
                    }
                    debug!(id = %pattern.id, "loaded pattern");
                    patterns.push(pattern);
                }
                Err(e) => {
                    // One bad file must not block the others.
                    warn!(
                        file = %path.display(),
                        error = %e,
                        "skipping pattern file due to load error"
                    );
                }
            }
        }

        patterns.sort_by(|a, b| a.id.cmp(&b.id));
        debug!(count = patterns.len(), "finished loading patterns");
        Ok(patterns)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

fn format_of(path: &Path) -> Option<Format> {
    match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
        "toml" => Some(Format::Toml),
        "json" => Some(Format::Json),
        _ => None,
    }
}

/// Load one pattern file.
///
/// # Errors
///
/// [`PatternFileError`] when the file cannot be read, does not parse, has an
/// unknown extension, or describes an invalid pattern.
pub fn load_file(path: &Path) -> Result<StitchPattern, PatternFileError> {
    let format = format_of(path).ok_or_else(|| PatternFileError::Unsupported {
        path: path.to_path_buf(),
    })?;
    let raw = fs::read_to_string(path).map_err(|source| PatternFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_error = |message: String| PatternFileError::Parse {
        path: path.to_path_buf(),
        message,
    };
    let manifest: PatternManifest = match format {
        Format::Toml => toml::from_str(&raw).map_err(|e| parse_error(e.to_string()))?,
        Format::Json => serde_json::from_str(&raw).map_err(|e| parse_error(e.to_string()))?,
    };

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    Ok(manifest.into_pattern(stem)?)
}
