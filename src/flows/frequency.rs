/// Frequency-curve comparison flow.
///
/// ```text
/// discover computation folders (company input root, water system, filters)
///   → read every hfreq file              (failures → report.skipped)
///   → group by (location, parameter)
///   → per group: resolve reference, interpolated deltas
///   → one TT_{ws}_{location}_{parameter}.png per group
/// ```

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use super::FlowError;
use crate::analysis::delta::interpolated_delta;
use crate::analysis::groupings::{LocationGroup, group_by_location};
use crate::analysis::reference::{ReferenceError, resolve_reference};
use crate::config::{CompareConfig, FrequencySettings};
use crate::ingest::discovery::{ComputationFilter, DiscoveredComputation, discover_computations};
use crate::ingest::hfreq::read_hfreq_file;
use crate::model::{ComputationId, DeltaSeries, LocationType, Series};
use crate::render;
use crate::report::{BatchReport, Flow};

/// What to compare and where to put the charts.
#[derive(Debug, Clone)]
pub struct FrequencyRequest {
    /// Key into `[companies]` selecting the input root and output folder.
    pub company: String,
    pub water_system: String,
    /// `None` uses `[frequency] location_types`.
    pub location_types: Option<Vec<LocationType>>,
    pub filter: ComputationFilter,
    /// Overrides the company's output folder.
    pub output_dir: Option<PathBuf>,
    /// Load and compare, but write no images.
    pub dry_run: bool,
}

impl FrequencyRequest {
    pub fn new(company: impl Into<String>, water_system: impl Into<String>) -> Self {
        FrequencyRequest {
            company: company.into(),
            water_system: water_system.into(),
            location_types: None,
            filter: ComputationFilter::default(),
            output_dir: None,
            dry_run: false,
        }
    }
}

/// One location group with its reference and deltas.
#[derive(Debug, Clone)]
pub struct LocationComparison {
    pub group: LocationGroup,
    /// Name of the reference series, or why there is none.
    pub reference: Result<String, ReferenceError>,
    /// One delta per non-reference series, in group order. Empty without a reference.
    pub deltas: Vec<DeltaSeries>,
}

impl LocationComparison {
    pub fn has_reference(&self) -> bool {
        self.reference.is_ok()
    }
}

/// Resolves the reference of a group and interpolates every other series onto it.
pub fn compare_location(group: LocationGroup, settings: &FrequencySettings) -> LocationComparison {
    let resolved = resolve_reference(
        &group.label(),
        group.series(),
        &settings.reference,
        settings.reference_policy,
    )
    .cloned();

    match resolved {
        Ok(reference) => {
            let deltas = group
                .series()
                .filter(|s| s.name != reference.name)
                .map(|s| interpolated_delta(&reference, s))
                .collect();
            LocationComparison {
                group,
                reference: Ok(reference.name),
                deltas,
            }
        }
        Err(e) => LocationComparison {
            group,
            reference: Err(e),
            deltas: Vec::new(),
        },
    }
}

/// Runs the whole frequency flow for one water system.
///
/// Fails only on configuration problems (unknown company) and on output
/// errors; unreadable computations and groups without a reference are
/// recorded in the returned report.
pub fn run_frequency_flow(
    config: &CompareConfig,
    request: &FrequencyRequest,
) -> Result<BatchReport, FlowError> {
    let company = config.company(&request.company)?;
    let output_dir = request
        .output_dir
        .clone()
        .unwrap_or_else(|| company.output_dir.clone());
    let location_types = request
        .location_types
        .as_deref()
        .unwrap_or(&config.frequency.location_types);

    info!(
        company = %request.company,
        water_system = %request.water_system,
        input_root = %company.input_root.display(),
        "discovering computations"
    );

    let mut report = BatchReport::new(Flow::Frequency, request.dry_run);

    let discovery = discover_computations(
        config,
        &company.input_root,
        &request.water_system,
        location_types,
        &request.filter,
    );
    report.skipped.extend(discovery.skipped);

    let loaded = load_computations(discovery.computations, &mut report);
    if loaded.is_empty() {
        if report.is_empty_batch() {
            warn!(water_system = %request.water_system, "no computations match the filters");
        } else {
            warn!(skipped = report.skipped.len(), "no computation could be read");
        }
        return Ok(report);
    }

    warn_unstyled(config, &loaded);
    let groups = group_by_location(loaded);
    info!(groups = groups.len(), "comparing locations");

    if !request.dry_run {
        fs::create_dir_all(&output_dir).map_err(|source| FlowError::OutputDir {
            path: output_dir.clone(),
            source,
        })?;
    }

    for group in groups.into_values() {
        let comparison = compare_location(group, &config.frequency);
        let group = &comparison.group;

        if let Err(e) = &comparison.reference {
            warn!(group = %group.label(), error = %e, "no difference panel for this location");
            report.record_unreferenced(&group.label(), e.to_string());
        }

        let path = render::frequency_chart_path(
            &output_dir,
            &request.water_system,
            &group.location,
            &group.parameter,
        );

        if !request.dry_run {
            let axis_label = config
                .parameter(&group.parameter)
                .map(|p| p.axis_label().to_string())
                .unwrap_or_else(|| group.parameter.clone());
            render::frequency::render_frequency_chart(
                &path,
                &comparison,
                config,
                &request.water_system,
                &axis_label,
            )?;
            info!(path = %path.display(), "wrote frequency chart");
        }
        report.record_rendered(path);
    }

    Ok(report)
}

fn load_computations(
    computations: Vec<DiscoveredComputation>,
    report: &mut BatchReport,
) -> Vec<(ComputationId, Series)> {
    let mut loaded = Vec::with_capacity(computations.len());

    for computation in computations {
        match read_hfreq_file(&computation.result_file) {
            Ok(curve) => {
                let series = curve.to_series(computation.id.simulation_type.clone());
                report.record_loaded(
                    &computation.result_file,
                    &computation.id.settings_token(),
                    series.len(),
                );
                loaded.push((computation.id, series));
            }
            Err(e) => {
                warn!(error = %e, "skipping unreadable result file");
                report.record_skipped(e.path(), e.to_string());
            }
        }
    }

    loaded
}

fn warn_unstyled(config: &CompareConfig, loaded: &[(ComputationId, Series)]) {
    let unstyled: BTreeSet<&str> = loaded
        .iter()
        .map(|(id, _)| id.simulation_type.as_str())
        .filter(|t| !config.is_styled(t))
        .collect();
    for simulation_type in unstyled {
        warn!(simulation_type, "no [[series]] entry, drawing in grey at the end of the legend");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::reference::ReferencePolicy;
    use std::collections::BTreeMap;

    fn settings(policy: ReferencePolicy) -> FrequencySettings {
        let mut config = CompareConfig::from_toml_str("").unwrap();
        config.frequency.reference_policy = policy;
        config.frequency
    }

    fn group(series: &[Series]) -> LocationGroup {
        let computations: BTreeMap<String, Series> = series
            .iter()
            .map(|s| (s.name.clone(), s.clone()))
            .collect();
        LocationGroup {
            location: "as_0001".to_string(),
            location_type: LocationType::As,
            parameter: "WS".to_string(),
            computations,
        }
    }

    #[test]
    fn test_compare_location_interpolates_against_reference() {
        let reference = Series::from_pairs("2023-totaal-met", &[(10.0, 1.0), (100.0, 2.0)]);
        let candidate = Series::from_pairs("2017-totaal-zon", &[(10.0, 1.5), (100.0, 2.5)]);

        let comparison = compare_location(
            group(&[reference, candidate]),
            &settings(ReferencePolicy::FirstMatch),
        );

        assert_eq!(comparison.reference.as_deref(), Ok("2023-totaal-met"));
        assert_eq!(comparison.deltas.len(), 1);
        assert_eq!(comparison.deltas[0].name, "2017-totaal-zon");
        assert_eq!(comparison.deltas[0].values(), vec![0.5, 0.5]);
    }

    #[test]
    fn test_compare_location_without_reference_keeps_curves() {
        let a = Series::from_pairs("2017-totaal-zon", &[(10.0, 1.0)]);
        let b = Series::from_pairs("2017-fysica-zon", &[(10.0, 1.1)]);

        let comparison = compare_location(group(&[a, b]), &settings(ReferencePolicy::FirstMatch));

        assert!(!comparison.has_reference());
        assert!(comparison.deltas.is_empty());
        assert_eq!(comparison.group.computations.len(), 2);
    }

    #[test]
    fn test_compare_location_unique_policy_rejects_ambiguity() {
        let a = Series::from_pairs("2023-totaal-met", &[(10.0, 1.0)]);
        let b = Series::from_pairs("2023-totaal-met-herberekend", &[(10.0, 1.1)]);

        let comparison = compare_location(group(&[a, b]), &settings(ReferencePolicy::Unique));

        assert!(matches!(
            comparison.reference,
            Err(ReferenceError::Ambiguous { .. })
        ));
    }

    #[test]
    fn test_unknown_company_fails_before_reading() {
        let config = CompareConfig::from_toml_str("").unwrap();
        let request = FrequencyRequest::new("Nobody", "Rijn");
        let err = run_frequency_flow(&config, &request).unwrap_err();
        assert!(matches!(err, FlowError::Config(_)));
    }
}
