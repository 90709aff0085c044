/// Integration tests for the frequency comparison flow
///
/// These tests build a small computation tree under the system temp folder:
///
/// ```text
/// HydraNL_Beoordelen_BOR_Rijn_as/
///   as_0001_BI2023-totaal-met_WS/uitvoer/hfreq.txt    reference
///   as_0001_BI2017-totaal-zon_WS/uitvoer/hfreq.txt
///   as_0001_BI2017-fysica-zon_WS/uitvoer/hfreq.txt    one column → skipped
///   as_0002_BI2017-totaal-zon_WS/uitvoer/hfreq.txt    no reference
///   as_0003_BI2017-totaal-zon_WS/                     no results → skipped
///   run_all.bat
/// ```
///
/// and run the flow in dry-run mode, so no images are written.
///
/// Run with: cargo test --test frequency_flow

use hydra_compare::config::CompareConfig;
use hydra_compare::flows::FlowError;
use hydra_compare::flows::frequency::{FrequencyRequest, run_frequency_flow};
use hydra_compare::model::LocationType;

use std::fs;
use std::path::{Path, PathBuf};

const REFERENCE_HFREQ: &str = "Waterstand Frequentie
3.00 1.0E-01
3.50 1.0E-02
4.00 1.0E-03
4.50 1.0E-04
";

const CANDIDATE_HFREQ: &str = "Waterstand Frequentie
3.10 1.0E-01
3.60 1.0E-02
4.10 1.0E-03
4.60 1.0E-04
";

const ONE_COLUMN_HFREQ: &str = "Waterstand
3.10
3.60
";

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Removes a test's temp folder when the test ends, pass or fail.
struct Cleanup(PathBuf);

impl Drop for Cleanup {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

/// Fresh input root for one test.
fn input_root(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!(
        "hydra_compare_frequency_{}_{}",
        name,
        std::process::id()
    ));
    if root.exists() {
        fs::remove_dir_all(&root).unwrap();
    }

    let as_dir = root.join("HydraNL_Beoordelen_BOR_Rijn_as");
    write(
        &as_dir.join("as_0001_BI2023-totaal-met_WS/uitvoer/hfreq.txt"),
        REFERENCE_HFREQ,
    );
    write(
        &as_dir.join("as_0001_BI2017-totaal-zon_WS/uitvoer/hfreq.txt"),
        CANDIDATE_HFREQ,
    );
    write(
        &as_dir.join("as_0001_BI2017-fysica-zon_WS/uitvoer/hfreq.txt"),
        ONE_COLUMN_HFREQ,
    );
    write(
        &as_dir.join("as_0002_BI2017-totaal-zon_WS/uitvoer/hfreq.txt"),
        CANDIDATE_HFREQ,
    );
    fs::create_dir_all(as_dir.join("as_0003_BI2017-totaal-zon_WS")).unwrap();
    write(&as_dir.join("run_all.bat"), "@echo off\n");

    root
}

fn config(root: &Path) -> CompareConfig {
    let doc = format!(
        r##"
[companies.HKV]
input_root = '{}'
output_dir = '{}'

[[parameters]]
key = "WS"
column = "Waterstand (m+NAP)"
name = "waterstand"
unit = "m+NAP"
diff_unit = "m"

[[series]]
token = "2023-totaal-met"
label = "BOI2023 totaal (met)"
color = "#ff0000"
order = 5

[[series]]
token = "2017-totaal-zon"
label = "WBI2017 totaal (zonder)"
color = "#add8e6"
order = 4
"##,
        root.display(),
        root.join("Visualisaties").display()
    );
    CompareConfig::from_toml_str(&doc).expect("test configuration should parse")
}

fn dry_run(root: &Path) -> FrequencyRequest {
    let mut request = FrequencyRequest::new("HKV", "Rijn");
    request.output_dir = Some(root.join("out"));
    request.dry_run = true;
    request
}

#[test]
fn test_frequency_flow_dry_run_reports_everything() {
    let root = input_root("full");
    let _cleanup = Cleanup(root.clone());
    let config = config(&root);

    let report = run_frequency_flow(&config, &dry_run(&root)).unwrap();

    assert!(report.dry_run);
    assert_eq!(report.loaded.len(), 3, "reference, candidate and the second location");
    assert!(report.loaded.iter().all(|l| l.points == 4));

    // oever folder missing, one-column file, folder without results
    assert_eq!(report.skipped.len(), 3, "skipped: {:?}", report.skipped);
    assert!(report.has_skips());
    assert!(!report.is_empty_batch());
    assert!(
        report
            .skipped
            .iter()
            .any(|s| s.path.ends_with("as_0001_BI2017-fysica-zon_WS/uitvoer/hfreq.txt"))
    );
    assert!(
        report
            .skipped
            .iter()
            .any(|s| s.path.ends_with("HydraNL_Beoordelen_BOR_Rijn_oever"))
    );

    assert_eq!(report.groups_without_reference.len(), 1);
    assert!(report.groups_without_reference[0].group.starts_with("as_0002"));

    let out = root.join("out");
    assert_eq!(
        report.rendered,
        vec![
            out.join("TT_Rijn_as_0001_WS.png"),
            out.join("TT_Rijn_as_0002_WS.png"),
        ]
    );
    assert!(!out.exists(), "a dry run writes nothing");
}

#[test]
fn test_frequency_flow_location_type_selection() {
    let root = input_root("as_only");
    let _cleanup = Cleanup(root.clone());
    let config = config(&root);

    let mut request = dry_run(&root);
    request.location_types = Some(vec![LocationType::As]);
    let report = run_frequency_flow(&config, &request).unwrap();

    assert_eq!(report.skipped.len(), 2, "only the as folder is walked");
    assert_eq!(report.rendered.len(), 2);
}

#[test]
fn test_frequency_flow_simulation_type_filter() {
    let root = input_root("filter");
    let _cleanup = Cleanup(root.clone());
    let config = config(&root);

    let mut request = dry_run(&root);
    request.location_types = Some(vec![LocationType::As]);
    request.filter.simulation_types = Some(vec![
        "2023-totaal-met_WS".to_string(),
        "2017-totaal-zon".to_string(),
    ]);
    request.filter.locations = Some(vec!["as_0001".to_string()]);
    let report = run_frequency_flow(&config, &request).unwrap();

    assert_eq!(report.loaded.len(), 2);
    assert!(report.skipped.is_empty());
    assert!(report.groups_without_reference.is_empty());
    assert_eq!(report.rendered.len(), 1);
}

#[test]
fn test_frequency_flow_no_matching_inputs() {
    let root = input_root("empty");
    let _cleanup = Cleanup(root.clone());
    let config = config(&root);

    let mut request = dry_run(&root);
    request.location_types = Some(vec![LocationType::As]);
    request.filter.locations = Some(vec!["as_9999".to_string()]);
    let report = run_frequency_flow(&config, &request).unwrap();

    assert!(report.is_empty_batch());
    assert!(!report.has_skips());
    assert!(report.rendered.is_empty());
}

#[test]
fn test_frequency_flow_unknown_company() {
    let root = input_root("company");
    let _cleanup = Cleanup(root.clone());
    let config = config(&root);

    let mut request = dry_run(&root);
    request.company = "ACME".to_string();
    let err = run_frequency_flow(&config, &request).unwrap_err();

    assert!(matches!(err, FlowError::Config(_)));
    assert!(err.to_string().contains("ACME"));
}
