/// Longitudinal-profile comparison flow.
///
/// Every viewer export is one comparison group: its series are joined on
/// river-km against the reference series (`Defintf` by default) and drawn
/// as `LP_{stem}.png`, optionally with a location map `LP_{stem}_kaart.png`.
///
/// Unlike the frequency flow a missing reference is fatal: a profile
/// without its baseline has no meaningful difference panel.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::FlowError;
use crate::analysis::delta::joined_delta;
use crate::analysis::groupings::profile_series;
use crate::analysis::reference::{ReferenceError, resolve_reference};
use crate::config::{CompareConfig, Parameter, ProfileSettings};
use crate::ingest::viewer::read_viewer_export;
use crate::model::{DeltaSeries, ProfileTable, Series};
use crate::render;
use crate::report::{BatchReport, Flow};

#[derive(Debug, Clone, Default)]
pub struct ProfileRequest {
    pub tables: Vec<PathBuf>,
    /// Parameter key; `None` derives it from each table's file name.
    pub parameter: Option<String>,
    /// `None` writes next to each table.
    pub output_dir: Option<PathBuf>,
    /// Also draw the location map when the table has coordinates.
    pub map: bool,
    pub dry_run: bool,
}

/// One table's series with its reference and joined deltas.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileComparison {
    /// In order of first appearance in the table.
    pub series: Vec<Series>,
    pub reference: String,
    /// One per non-reference series, same order as `series`.
    pub deltas: Vec<DeltaSeries>,
}

/// Splits a table into series and joins every series against the reference.
pub fn compare_profile(
    table_label: &str,
    table: &ProfileTable,
    settings: &ProfileSettings,
) -> Result<ProfileComparison, ReferenceError> {
    let series = profile_series(table);
    let reference = resolve_reference(
        table_label,
        &series,
        &settings.reference,
        settings.reference_policy,
    )?;

    let deltas = series
        .iter()
        .filter(|s| s.name != reference.name)
        .map(|s| joined_delta(reference, s))
        .collect();
    let reference = reference.name.clone();

    Ok(ProfileComparison {
        series,
        reference,
        deltas,
    })
}

/// Selects the parameter of a table: the explicit key, or the first
/// configured key contained in the file name.
pub fn parameter_for_table<'a>(
    config: &'a CompareConfig,
    table: &Path,
    explicit: Option<&str>,
) -> Result<&'a Parameter, FlowError> {
    match explicit {
        Some(key) => config
            .parameter(key)
            .ok_or_else(|| FlowError::UnknownParameter(key.to_string())),
        None => {
            let file_name = table
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            config
                .parameter_for_file_name(&file_name)
                .ok_or_else(|| FlowError::ParameterNotInFileName(table.to_path_buf()))
        }
    }
}

/// Runs the profile flow over all requested tables.
pub fn run_profile_flow(
    config: &CompareConfig,
    request: &ProfileRequest,
) -> Result<BatchReport, FlowError> {
    let mut report = BatchReport::new(Flow::Profile, request.dry_run);

    for table_path in &request.tables {
        let parameter = parameter_for_table(config, table_path, request.parameter.as_deref())?;

        let export = match read_viewer_export(table_path, parameter, &config.profile) {
            Ok(export) => export,
            Err(e) => {
                warn!(error = %e, "skipping unreadable viewer export");
                report.record_skipped(e.path(), e.to_string());
                continue;
            }
        };
        for dropped in &export.dropped {
            report.record_skipped(table_path, format!("line {}: {}", dropped.line, dropped.reason));
        }
        if export.table.rows.is_empty() {
            warn!(path = %table_path.display(), "no usable rows");
            report.record_skipped(table_path, "no usable rows");
            continue;
        }

        let label = table_path.display().to_string();
        let comparison = compare_profile(&label, &export.table, &config.profile)?;
        for series in &comparison.series {
            report.record_loaded(table_path, &series.name, series.len());
        }
        info!(
            table = %label,
            parameter = %parameter.key,
            series = comparison.series.len(),
            reference = %comparison.reference,
            "compared profile"
        );

        let output_dir = match &request.output_dir {
            Some(dir) => dir.clone(),
            None => table_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };
        if !request.dry_run && !output_dir.as_os_str().is_empty() {
            fs::create_dir_all(&output_dir).map_err(|source| FlowError::OutputDir {
                path: output_dir.clone(),
                source,
            })?;
        }

        let title = render::table_stem(table_path);
        let chart_path = render::profile_chart_path(&output_dir, table_path);
        if !request.dry_run {
            render::profile::render_profile_chart(&chart_path, &comparison, parameter, &title)?;
            info!(path = %chart_path.display(), "wrote profile chart");
        }
        report.record_rendered(chart_path);

        if request.map {
            if export.table.has_coordinates() {
                let map_path = render::location_map_path(&output_dir, table_path);
                if !request.dry_run {
                    render::profile::render_location_map(&map_path, &export.table, &title)?;
                    info!(path = %map_path.display(), "wrote location map");
                }
                report.record_rendered(map_path);
            } else {
                warn!(table = %label, "no coordinates, skipping location map");
            }
        }
    }

    Ok(report)
}
