/// Integration tests for chart rendering
///
/// Draws every chart type to PNG files under the system temp folder, using
/// the series styling of the shipped compare.toml:
///
///   - frequency chart with a reference (curves + difference panel)
///   - frequency chart without a reference (curves only)
///   - longitudinal profile chart (reversed km axis, difference panel)
///   - location map
///   - the profile flow end to end, without dry run
///
/// Run with: cargo test --test render_charts

use hydra_compare::analysis::groupings::LocationGroup;
use hydra_compare::config::{CompareConfig, load_config};
use hydra_compare::flows::frequency::compare_location;
use hydra_compare::flows::profile::{ProfileRequest, compare_profile, run_profile_flow};
use hydra_compare::ingest::viewer::read_viewer_export;
use hydra_compare::model::{LocationType, Series};
use hydra_compare::render::frequency::render_frequency_chart;
use hydra_compare::render::profile::{render_location_map, render_profile_chart};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const EXPORT: &str = "Locatie (-) , Serie , Waterstand (m+NAP) , X (m) , Y (m)
RIJN_km0010 , Defintf , 1.00 , 190000.0 , 430000.0
RIJN_km0020 , Defintf , 1.20 , 191000.0 , 431000.0
RIJN_km0030 , Defintf , 1.90 , 192000.0 , 432000.0
RIJN_km0010 , B2035_OnMt , 0.90 , 190000.0 , 430000.0
RIJN_km0020 , B2035_OnMt , 1.25 , 191000.0 , 431000.0
RIJN_km0030 , B2035_OnMt , 2.00 , 192000.0 , 432000.0
";

/// Output folder removed again when the test ends.
struct OutputDir(PathBuf);

impl OutputDir {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "hydra_compare_render_{}_{}",
            name,
            std::process::id()
        ));
        if dir.exists() {
            fs::remove_dir_all(&dir).unwrap();
        }
        fs::create_dir_all(&dir).unwrap();
        OutputDir(dir)
    }

    fn join(&self, file_name: &str) -> PathBuf {
        self.0.join(file_name)
    }
}

impl Drop for OutputDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn shipped_config() -> CompareConfig {
    load_config(Path::new(env!("CARGO_MANIFEST_DIR")).join("compare.toml"))
        .expect("compare.toml should load")
}

fn assert_png(path: &Path) {
    let bytes = fs::read(path).unwrap();
    assert!(bytes.starts_with(b"\x89PNG"), "{} is not a PNG", path.display());
}

fn location_group(series: &[Series]) -> LocationGroup {
    let computations: BTreeMap<String, Series> = series
        .iter()
        .map(|s| (s.name.clone(), s.clone()))
        .collect();
    LocationGroup {
        location: "036-01_0050_MA_km0160".to_string(),
        location_type: LocationType::Oever,
        parameter: "WS".to_string(),
        computations,
    }
}

fn curve(name: &str, offset: f64) -> Series {
    Series::from_pairs(
        name,
        &[
            (10.0, 3.0 + offset),
            (100.0, 3.5 + offset),
            (1.0e3, 4.0 + offset),
            (1.0e4, 4.5 + offset),
            (1.0e5, 5.0 + offset),
        ],
    )
}

#[test]
fn test_frequency_chart_with_reference() {
    let out = OutputDir::new("frequency");
    let config = shipped_config();
    let group = location_group(&[
        curve("2023-totaal-met", 0.0),
        curve("2017-totaal-zon", 0.1),
        curve("2017-fysica-zon", -0.2),
    ]);
    let comparison = compare_location(group, &config.frequency);
    assert!(comparison.has_reference());
    assert_eq!(comparison.deltas.len(), 2);

    let path = out.join("TT_Rijn_036-01_0050_MA_km0160_WS.png");
    render_frequency_chart(&path, &comparison, &config, "Rijn", "Waterstand (m+NAP)").unwrap();
    assert_png(&path);
}

#[test]
fn test_frequency_chart_without_reference() {
    let out = OutputDir::new("frequency_no_reference");
    let config = shipped_config();
    let group = location_group(&[curve("2017-totaal-zon", 0.0), curve("onbekend-type", 0.3)]);
    let comparison = compare_location(group, &config.frequency);
    assert!(!comparison.has_reference());
    assert!(comparison.deltas.is_empty());

    let path = out.join("TT_Rijn_no_reference_WS.png");
    render_frequency_chart(&path, &comparison, &config, "Rijn", "Waterstand (m+NAP)").unwrap();
    assert_png(&path);
}

#[test]
fn test_profile_chart_and_location_map() {
    let out = OutputDir::new("profile");
    let config = shipped_config();
    let table_path = out.join("B2035_OnMt_WS.csv");
    fs::write(&table_path, EXPORT).unwrap();

    let parameter = config.parameter("WS").unwrap();
    let export = read_viewer_export(&table_path, parameter, &config.profile).unwrap();
    let comparison = compare_profile("B2035_OnMt_WS", &export.table, &config.profile).unwrap();
    assert_eq!(comparison.deltas[0].keys(), vec![10.0, 20.0, 30.0]);

    let chart = out.join("LP_B2035_OnMt_WS.png");
    render_profile_chart(&chart, &comparison, parameter, "B2035_OnMt_WS").unwrap();
    assert_png(&chart);

    let map = out.join("LP_B2035_OnMt_WS_kaart.png");
    render_location_map(&map, &export.table, "B2035_OnMt_WS").unwrap();
    assert_png(&map);
}

#[test]
fn test_profile_flow_writes_images() {
    let out = OutputDir::new("profile_flow");
    let table_path = out.join("B2035_OnMt_WS.csv");
    fs::write(&table_path, EXPORT).unwrap();
    let charts = out.join("charts");

    let request = ProfileRequest {
        tables: vec![table_path],
        parameter: None,
        output_dir: Some(charts.clone()),
        map: true,
        dry_run: false,
    };
    let report = run_profile_flow(&shipped_config(), &request).unwrap();

    assert!(!report.dry_run);
    assert_eq!(report.rendered.len(), 2);
    for path in &report.rendered {
        assert!(path.starts_with(&charts));
        assert_png(path);
    }
}
