//! Reading calculation requests from disk.
//!
//! A request file holds either one piece or a garment:
//!
//! ```toml
//! [[pieces]]
//! name = "Back"
//! gauge = { stitches_per_10 = 22, rows_per_10 = 30 }
//! construction = { method = "panel", measurements = { chest = 92, torso_length = 60 } }
//! ```
//!
//! Fields a piece leaves out (`craft`, `language`, `abbreviate`, the gauge
//! and measurement units) are filled from the `[defaults]` configuration
//! before the piece is deserialised.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use knitwright_core::application::PieceRequest;

use crate::config::Defaults;
use crate::error::{CliError, CliResult, IntoCli};

/// Load every piece of the request at `path`.
///
/// `.json` files are read as JSON, everything else as TOML.
pub fn load_requests(path: &Path, defaults: &Defaults) -> CliResult<Vec<PieceRequest>> {
    if !path.is_file() {
        return Err(CliError::RequestNotFound {
            path: path.to_path_buf(),
        });
    }
    let raw = fs::read_to_string(path)
        .with_cli_context(|| format!("Failed to read request '{}'", path.display()))?;
    let parse_error = |message: String| CliError::RequestParse {
        path: path.to_path_buf(),
        message,
    };

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let document: Value = if is_json {
        serde_json::from_str(&raw).map_err(|e| parse_error(e.to_string()))?
    } else {
        toml::from_str(&raw).map_err(|e| parse_error(e.to_string()))?
    };

    let pieces = match document {
        Value::Object(mut root) => match root.remove("pieces") {
            Some(Value::Array(pieces)) => pieces,
            Some(_) => return Err(parse_error("`pieces` must be a list".into())),
            None => vec![Value::Object(root)],
        },
        _ => return Err(parse_error("expected a table at the top level".into())),
    };
    if pieces.is_empty() {
        return Err(CliError::InvalidInput {
            message: format!("'{}' lists no pieces", path.display()),
            source: None,
        });
    }

    let requests = pieces
        .into_iter()
        .enumerate()
        .map(|(i, mut piece)| {
            apply_defaults(&mut piece, defaults);
            serde_json::from_value::<PieceRequest>(piece)
                .map_err(|e| parse_error(format!("piece {}: {e}", i + 1)))
        })
        .collect::<CliResult<Vec<_>>>()?;
    debug!(count = requests.len(), file = %path.display(), "loaded request");
    Ok(requests)
}

/// Fill fields the piece leaves out from the configured defaults.
fn apply_defaults(piece: &mut Value, defaults: &Defaults) {
    let Some(fields) = piece.as_object_mut() else {
        return;
    };
    insert_missing(fields, "craft", defaults.craft.as_str().into());
    insert_missing(fields, "language", defaults.language.as_str().into());
    insert_missing(fields, "abbreviate", defaults.abbreviate.into());

    let unit = Value::from(defaults.unit.as_str());
    if let Some(gauge) = fields.get_mut("gauge").and_then(Value::as_object_mut) {
        insert_missing(gauge, "unit", unit.clone());
    }
    if let Some(measurements) = fields
        .get_mut("construction")
        .and_then(|c| c.get_mut("measurements"))
        .and_then(Value::as_object_mut)
    {
        insert_missing(measurements, "unit", unit);
    }
}

fn insert_missing(map: &mut Map<String, Value>, key: &str, value: Value) {
    map.entry(key).or_insert(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use knitwright_core::application::Construction;
    use knitwright_core::domain::{CraftType, Language, LengthUnit};
    use tempfile::TempDir;

    const SHAWL: &str = r#"
name = "Shawl"
gauge = { stitches_per_10 = 20, rows_per_10 = 28 }

[construction]
method = "top_down_center_out"
wingspan = 150
depth = 75
"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn single_piece_toml() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "shawl.toml", SHAWL);
        let requests = load_requests(&path, &Defaults::default()).unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name, "Shawl");
        assert!(requests[0].construction.triangle().is_some());
    }

    #[test]
    fn defaults_fill_missing_fields_only() {
        let temp = TempDir::new().unwrap();
        let path = write(
            &temp,
            "garment.json",
            r#"{ "pieces": [
                { "name": "Back", "gauge": { "stitches_per_10": 18, "rows_per_10": 24 },
                  "construction": { "method": "panel",
                                    "measurements": { "chest": 36, "torso_length": 24 } } },
                { "name": "Wrap", "craft": "knitting", "language": "en-us",
                  "gauge": { "stitches_per_10": 18, "rows_per_10": 24, "unit": "cm" },
                  "construction": { "method": "bottom_up", "wingspan": 100, "depth": 40 } }
            ] }"#,
        );
        let defaults = Defaults {
            craft: CraftType::Crochet,
            language: Language::EnUk,
            abbreviate: true,
            unit: LengthUnit::Inches,
        };

        let requests = load_requests(&path, &defaults).unwrap();
        let (back, wrap) = (&requests[0], &requests[1]);
        assert_eq!(back.craft, CraftType::Crochet);
        assert_eq!(back.language, Language::EnUk);
        assert!(back.abbreviate);
        assert_eq!(back.gauge.unit, LengthUnit::Inches);
        let Construction::Panel(panel) = &back.construction else {
            panic!("expected a panel");
        };
        assert_eq!(panel.measurements.unit, LengthUnit::Inches);

        assert_eq!(wrap.craft, CraftType::Knitting);
        assert_eq!(wrap.language, Language::EnUs);
        assert_eq!(wrap.gauge.unit, LengthUnit::Centimeters);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_requests(Path::new("/no/such/request.toml"), &Defaults::default());
        assert!(matches!(err, Err(CliError::RequestNotFound { .. })));
    }

    #[test]
    fn bad_piece_names_its_position() {
        let temp = TempDir::new().unwrap();
        let path = write(
            &temp,
            "broken.toml",
            "[[pieces]]\nname = \"A\"\ngauge = { stitches_per_10 = 20, rows_per_10 = 28 }\n\
             construction = { method = \"spiral\" }\n",
        );
        match load_requests(&path, &Defaults::default()) {
            Err(CliError::RequestParse { message, .. }) => assert!(message.starts_with("piece 1")),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn empty_garment_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "empty.json", r#"{ "pieces": [] }"#);
        assert!(matches!(
            load_requests(&path, &Defaults::default()),
            Err(CliError::InvalidInput { .. })
        ));
    }
}
