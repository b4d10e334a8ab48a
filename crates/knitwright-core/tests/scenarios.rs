//! End-to-end calculations through the public service API.

use std::collections::HashMap;
use std::sync::RwLock;

use knitwright_core::{
    application::ApplicationError,
    domain::{FabricSide, MeasurementField, PatternRow, Side},
    prelude::*,
};

/// Minimal catalog for driving the service without the adapters crate.
#[derive(Default)]
struct MapCatalog {
    patterns: RwLock<HashMap<String, StitchPattern>>,
}

impl StitchPatternCatalog for MapCatalog {
    fn get(&self, id: &str) -> KnitResult<StitchPattern> {
        let patterns = self
            .patterns
            .read()
            .map_err(|_| ApplicationError::CatalogLockError)?;
        patterns
            .get(id)
            .cloned()
            .ok_or_else(|| ApplicationError::PatternNotFound { id: id.into() }.into())
    }

    fn list(&self) -> KnitResult<Vec<StitchPattern>> {
        let patterns = self
            .patterns
            .read()
            .map_err(|_| ApplicationError::CatalogLockError)?;
        Ok(patterns.values().cloned().collect())
    }

    fn insert(&self, pattern: StitchPattern) -> KnitResult<()> {
        self.patterns
            .write()
            .map_err(|_| ApplicationError::CatalogLockError)?
            .insert(pattern.id.clone(), pattern);
        Ok(())
    }
}

fn service() -> CalculationService {
    let catalog = MapCatalog::default();
    catalog
        .insert(
            StitchPattern::new(
                "seed",
                "Seed Stitch",
                CraftType::Knitting,
                2,
                vec![
                    PatternRow::new("knit 1, purl 1 across"),
                    PatternRow::new("purl 1, knit 1 across"),
                ],
            )
            .unwrap(),
        )
        .unwrap();
    CalculationService::new(Box::new(catalog))
}

fn gauge(stitches: f64, rows: f64) -> GaugeSpec {
    GaugeSpec {
        stitches_per_10: stitches,
        rows_per_10: rows,
        unit: LengthUnit::Centimeters,
    }
}

fn piece(name: &str, gauge: GaugeSpec, construction: Construction) -> PieceRequest {
    PieceRequest {
        name: name.into(),
        gauge,
        craft: CraftType::Knitting,
        language: Language::EnUs,
        abbreviate: false,
        stitch_pattern: None,
        construction,
    }
}

#[test]
fn top_down_shawl_scenario() {
    let request = piece(
        "Shawl",
        gauge(20.0, 28.0),
        Construction::TopDownCenterOut {
            wingspan: 150.0,
            depth: 75.0,
        },
    );
    let result = service().calculate(&request);
    assert!(result.success, "errors: {:?}", result.errors);

    let schedule = result.schedule.unwrap();
    assert_eq!(schedule.cast_on, 3);
    assert!(schedule.final_stitches > 3);

    let phases = &schedule.parts[0].schedule.phases;
    assert_eq!(phases.len(), 1);
    assert_eq!(phases[0].stitches_per_event(), Some(4));
    assert_eq!(phases[0].shaping_frequency(), Some(2));

    let achieved = schedule.achieved.unwrap();
    assert!((127.5..=172.5).contains(&achieved.wingspan), "{achieved:?}");
    assert!((67.5..=82.5).contains(&achieved.depth), "{achieved:?}");
}

#[test]
fn bottom_up_shawl_scenario() {
    let request = piece(
        "Shawl",
        gauge(20.0, 26.0),
        Construction::BottomUp {
            wingspan: 120.0,
            depth: 50.0,
        },
    );
    let result = service().calculate(&request);
    assert!(result.success, "errors: {:?}", result.errors);

    let schedule = result.schedule.unwrap();
    assert!((239..=241).contains(&schedule.cast_on), "{}", schedule.cast_on);
    assert_eq!(schedule.final_stitches, 3);
    let wingspan = schedule.achieved.unwrap().wingspan;
    assert!((wingspan - 120.0).abs() <= 6.0, "{wingspan}");
}

#[test]
fn small_bottom_up_shawl_finishes_with_a_workable_row() {
    let request = piece(
        "Swatch",
        gauge(20.0, 28.0),
        Construction::BottomUp {
            wingspan: 10.0,
            depth: 5.0,
        },
    );
    let result = service().calculate(&request);
    assert!(result.success, "errors: {:?}", result.errors);
    assert_eq!(result.schedule.unwrap().final_stitches, 3);

    let sections = result.instructions.unwrap();
    let steps = &sections[0].steps;
    let last = steps.iter().rev().find(|s| s.is_shaping).unwrap();
    let before = steps
        .iter()
        .take_while(|s| s.row < last.row)
        .last()
        .map_or(sections[0].starting_stitches, |s| s.stitches);
    assert_eq!(before, 5);
    let expected = match last.fabric_side {
        FabricSide::RightSide => "Slip slip knit, knit 1, knit 2 together (3 stitches).",
        FabricSide::WrongSide => {
            "Purl 2 together, purl 1, purl 2 together through back loop (3 stitches)."
        }
    };
    assert_eq!(last.text, expected);
}

#[test]
fn invalid_inputs_are_reported_not_thrown() {
    let service = service();
    let cases = [
        (
            gauge(20.0, 28.0),
            0.0,
            75.0,
            "Target wingspan must be greater than 0",
        ),
        (
            gauge(20.0, 28.0),
            150.0,
            -10.0,
            "Target depth must be greater than 0",
        ),
        (gauge(0.0, 28.0), 150.0, 75.0, "Invalid gauge"),
    ];
    for (g, wingspan, depth, message) in cases {
        let request = piece(
            "Shawl",
            g,
            Construction::SideToSide { wingspan, depth },
        );
        let result = service.calculate(&request);
        assert!(!result.success);
        assert!(result.schedule.is_none());
        assert!(
            result.errors[0].starts_with(message),
            "{:?} does not start with {message}",
            result.errors
        );
    }
}

#[test]
fn garment_pieces_are_independent() {
    let measurements = BodyMeasurements::new(LengthUnit::Centimeters)
        .with(MeasurementField::Chest, 100.0)
        .with(MeasurementField::TorsoLength, 62.0)
        .with(MeasurementField::ShoulderWidth, 40.0)
        .with(MeasurementField::ArmholeDepth, 21.0);
    let back = piece(
        "Back",
        gauge(18.0, 24.0),
        Construction::Panel(PanelSpec {
            garment: GarmentType::Sweater,
            measurements: measurements.clone(),
            ease: EasePreference::from_fit(FitPreset::Classic),
            armhole: Some(ArmholeSpec::SetIn {
                width: None,
                depth: None,
            }),
            neckline: None,
        }),
    );
    let mut front = back.clone();
    front.name = "Front".into();
    if let Construction::Panel(panel) = &mut front.construction {
        panel.neckline = Some(NecklineParams {
            style: NecklineStyle::Scoop,
            depth: 8.0,
            width: None,
        });
    }
    let broken = piece(
        "Sleeve",
        gauge(18.0, 24.0),
        Construction::BottomUp {
            wingspan: -1.0,
            depth: 10.0,
        },
    );

    let results = service().calculate_all(&[back, front, broken]);
    let outcome: Vec<_> = results.iter().map(|r| (r.piece.as_str(), r.success)).collect();
    assert_eq!(
        outcome,
        vec![("Back", true), ("Front", true), ("Sleeve", false)]
    );

    // Back and front share the cast-on and armholes; only the front splits.
    let back_schedule = results[0].schedule.as_ref().unwrap();
    let front_schedule = results[1].schedule.as_ref().unwrap();
    assert_eq!(back_schedule.cast_on, front_schedule.cast_on);
    assert_eq!(back_schedule.total_rows, front_schedule.total_rows);
    let front_sides: Vec<Side> = results[1]
        .instructions
        .as_ref()
        .unwrap()
        .iter()
        .map(|s| s.side)
        .collect();
    assert_eq!(front_sides, vec![Side::Both, Side::Both, Side::Left, Side::Right]);
}

#[test]
fn seed_stitch_panel_in_inches_with_abbreviations() {
    let measurements = BodyMeasurements::new(LengthUnit::Inches)
        .with(MeasurementField::Chest, 36.0)
        .with(MeasurementField::TorsoLength, 22.0);
    let mut request = piece(
        "Vest back",
        GaugeSpec {
            stitches_per_10: 50.0,
            rows_per_10: 70.0,
            unit: LengthUnit::Inches,
        },
        Construction::Panel(PanelSpec {
            garment: GarmentType::Vest,
            measurements,
            ease: EasePreference::from_fit(FitPreset::Close),
            armhole: None,
            neckline: None,
        }),
    );
    request.abbreviate = true;
    request.stitch_pattern = Some(PatternRef {
        id: "seed".into(),
        edge_stitches: 1,
        buffer_stitches: 0,
    });

    let result = service().calculate(&request);
    assert!(result.success, "errors: {:?}", result.errors);

    // 18 in at 5 sts/in is 90 sts: already 2k + 2.
    let schedule = result.schedule.unwrap();
    assert_eq!(schedule.cast_on, 90);
    assert_eq!(schedule.total_rows, 154);

    let section = &result.instructions.unwrap()[0];
    assert_eq!(section.setup.as_deref(), Some("CO 90 sts."));
    assert_eq!(section.groups.len(), section.steps.len());
    assert!(section.steps[0].text.contains("k1, p1 across"));
}

#[test]
fn results_serialize_for_consumers() {
    let request = piece(
        "Shawl",
        gauge(20.0, 28.0),
        Construction::SideToSide {
            wingspan: 80.0,
            depth: 40.0,
        },
    );
    let result = service().calculate(&request);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["success"], true);
    assert!(json["instructions"][0]["steps"].is_array());
    assert!(json.get("measurements").is_none());
}
