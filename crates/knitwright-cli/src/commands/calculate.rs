//! `knitwright calculate`: run a request file through the calculation
//! service and print the instructions.

use tracing::{info, instrument};

use knitwright_core::application::{CalculationService, PieceRequest};

use crate::{
    cli::CalculateArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(request = %args.request.display()))]
pub fn execute(args: CalculateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let mut requests = crate::request::load_requests(&args.request, &config.defaults)?;
    if let Some(name) = &args.piece {
        requests = select_piece(requests, name)?;
    }
    apply_overrides(&mut requests, &args);

    let patterns_dir = args
        .patterns_dir
        .as_deref()
        .or(config.patterns.local_path.as_deref());
    let catalog = super::pattern_catalog(patterns_dir)?;
    // Wording overrides come from the config file, so a broken one is a
    // configuration problem.
    let service = CalculationService::new(Box::new(catalog))
        .with_templates(config.template_set()?)
        .map_err(|e| CliError::ConfigError {
            message: format!("[templates] {e}"),
            source: Some(Box::new(e)),
        })?;

    let results = service.calculate_all(&requests);
    output.results(&results, args.rows)?;

    let failed = results.iter().filter(|r| !r.success).count();
    info!(pieces = results.len(), failed, "calculation finished");
    if failed > 0 {
        return Err(CliError::CalculationFailed {
            failed,
            total: results.len(),
        });
    }
    Ok(())
}

fn select_piece(requests: Vec<PieceRequest>, name: &str) -> CliResult<Vec<PieceRequest>> {
    let available: Vec<String> = requests.iter().map(|r| r.name.clone()).collect();
    let selected: Vec<_> = requests.into_iter().filter(|r| r.name == name).collect();
    if selected.is_empty() {
        return Err(CliError::PieceNotFound {
            name: name.to_string(),
            available,
        });
    }
    Ok(selected)
}

/// Command-line flags win over the request file.
fn apply_overrides(requests: &mut [PieceRequest], args: &CalculateArgs) {
    for request in requests {
        if args.abbreviate {
            request.abbreviate = true;
        }
        if let Some(language) = args.language {
            request.language = language.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::LanguageArg;
    use knitwright_core::application::Construction;
    use knitwright_core::domain::{GaugeSpec, Language, LengthUnit};
    use std::path::PathBuf;

    fn piece(name: &str) -> PieceRequest {
        PieceRequest {
            name: name.into(),
            gauge: GaugeSpec {
                stitches_per_10: 20.0,
                rows_per_10: 28.0,
                unit: LengthUnit::Centimeters,
            },
            craft: Default::default(),
            language: Language::EnUs,
            abbreviate: false,
            stitch_pattern: None,
            construction: Construction::BottomUp {
                wingspan: 100.0,
                depth: 40.0,
            },
        }
    }

    fn args() -> CalculateArgs {
        CalculateArgs {
            request: PathBuf::from("r.toml"),
            piece: None,
            abbreviate: true,
            language: Some(LanguageArg::EnUk),
            patterns_dir: None,
            rows: false,
        }
    }

    #[test]
    fn flags_override_every_piece() {
        let mut requests = vec![piece("Back"), piece("Front")];
        apply_overrides(&mut requests, &args());
        assert!(requests.iter().all(|r| r.abbreviate && r.language == Language::EnUk));
    }

    #[test]
    fn select_piece_keeps_the_named_one() {
        let selected = select_piece(vec![piece("Back"), piece("Front")], "Front").unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "Front");
    }

    #[test]
    fn unknown_piece_lists_the_others() {
        match select_piece(vec![piece("Back")], "Sleeve") {
            Err(CliError::PieceNotFound { available, .. }) => assert_eq!(available, vec!["Back"]),
            other => panic!("expected PieceNotFound, got {other:?}"),
        }
    }
}
