//! Command handlers, one module per subcommand.

use std::path::Path;

use tracing::debug;

use knitwright_adapters::{FilesystemPatternLoader, InMemoryPatternCatalog};
use knitwright_core::error::KnitError;

use crate::error::{CliError, CliResult};

pub mod calculate;
pub mod completions;
pub mod config;
pub mod init;
pub mod patterns;

/// Built-in patterns plus those found under `dir`, if given.
pub(crate) fn pattern_catalog(dir: Option<&Path>) -> CliResult<InMemoryPatternCatalog> {
    let catalog = InMemoryPatternCatalog::with_builtin()?;
    if let Some(dir) = dir {
        if !dir.is_dir() {
            return Err(CliError::PatternsDirNotFound {
                path: dir.to_path_buf(),
            });
        }
        let loaded = FilesystemPatternLoader::new(dir)
            .load_all()
            .map_err(KnitError::from)?;
        debug!(count = loaded.len(), dir = %dir.display(), "loaded user patterns");
        catalog.extend(loaded)?;
    }
    Ok(catalog)
}
