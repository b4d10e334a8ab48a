//! `knitwright patterns`: list the stitch-pattern library.

use knitwright_core::application::CalculationService;
use knitwright_core::domain::{CraftType, StitchPattern};

use crate::{
    cli::{ListFormat, OutputFormat, PatternsArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: PatternsArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let patterns_dir = args
        .patterns_dir
        .as_deref()
        .or(config.patterns.local_path.as_deref());
    let service = CalculationService::new(Box::new(super::pattern_catalog(patterns_dir)?));
    let patterns = filter_by_craft(service.list_patterns()?, args.craft.map(CraftType::from));

    // The global `--output-format json` implies a JSON listing.
    let format = if output.format() == OutputFormat::Json {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => {
            output.header("Available Stitch Patterns:")?;
            for pattern in &patterns {
                output.print(&table_row(pattern))?;
            }
        }
        ListFormat::Json => output.json(&patterns)?,
        ListFormat::List => {
            for pattern in &patterns {
                output.data(&pattern.id)?;
            }
        }
        ListFormat::Csv => {
            output.data("id,name,craft,repeat_width,balance_stitches,repeat_height")?;
            for pattern in &patterns {
                output.data(&csv_row(pattern))?;
            }
        }
    }

    Ok(())
}

fn filter_by_craft(patterns: Vec<StitchPattern>, craft: Option<CraftType>) -> Vec<StitchPattern> {
    match craft {
        Some(craft) => patterns.into_iter().filter(|p| p.craft == craft).collect(),
        None => patterns,
    }
}

fn table_row(pattern: &StitchPattern) -> String {
    format!(
        "  {:<18} {:<18} {:<9} multiple of {} + {}, {}-row repeat",
        pattern.id,
        pattern.name,
        pattern.craft,
        pattern.repeat_width,
        pattern.balance_stitches,
        pattern.repeat_height()
    )
}

fn csv_row(pattern: &StitchPattern) -> String {
    let name = if pattern.name.contains(',') {
        format!("\"{}\"", pattern.name.replace('"', "\"\""))
    } else {
        pattern.name.clone()
    };
    format!(
        "{},{},{},{},{},{}",
        pattern.id,
        name,
        pattern.craft,
        pattern.repeat_width,
        pattern.balance_stitches,
        pattern.repeat_height()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use knitwright_core::domain::PatternRow;

    fn pattern(id: &str, name: &str, craft: CraftType) -> StitchPattern {
        StitchPattern::new(id, name, craft, 3, vec![PatternRow::new("knit across")]).unwrap()
    }

    #[test]
    fn craft_filter() {
        let all = vec![
            pattern("a", "A", CraftType::Knitting),
            pattern("b", "B", CraftType::Crochet),
        ];
        let crochet = filter_by_craft(all.clone(), Some(CraftType::Crochet));
        assert_eq!(crochet.len(), 1);
        assert_eq!(crochet[0].id, "b");
        assert_eq!(filter_by_craft(all, None).len(), 2);
    }

    #[test]
    fn csv_quotes_names_with_commas() {
        let row = csv_row(&pattern("odd", "Knit, then purl", CraftType::Knitting));
        assert_eq!(row, "odd,\"Knit, then purl\",knitting,3,0,1");
    }

    #[test]
    fn table_row_describes_the_repeat() {
        let row = table_row(&pattern("moss", "Moss", CraftType::Knitting));
        assert!(row.contains("multiple of 3 + 0, 1-row repeat"));
    }
}
