/// Viewer export parser
///
/// Parses the comma separated tables exported by the viewer for
/// longitudinal profiles. The viewer pads separators with an irregular
/// amount of whitespace (`RIJN_km0010 , Defintf , 1.00`), so every field and
/// header is trimmed.
///
/// Columns used (names configurable in `[profile]`):
/// - location label: the river-kilometer is the integer after `km`
/// - series label
/// - one value column per parameter (`Waterstand (m+NAP)`, `HBN (m+NAP)`, ...)
/// - optional planar coordinates (`X (m)`, `Y (m)`)
///
/// Rows without a km marker or with a non-numeric value are dropped with a
/// warning; a missing required column fails the whole table.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use csv::{ReaderBuilder, StringRecord, Trim};
use regex::Regex;
use tracing::{debug, warn};

use super::IngestError;
use crate::config::{Parameter, ProfileSettings};
use crate::model::{ProfileRow, ProfileTable};

/// A parsed table plus the rows that had to be dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerExport {
    pub table: ProfileTable,
    pub dropped: Vec<DroppedRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DroppedRow {
    /// 1-based line number in the file, header included.
    pub line: usize,
    pub reason: String,
}

fn km_pattern() -> &'static Regex {
    static KM: OnceLock<Regex> = OnceLock::new();
    KM.get_or_init(|| Regex::new(r"km(\d+)").expect("km pattern is valid"))
}

/// River-kilometer encoded in a location label (`RIJN_km0160` → 160.0).
pub fn extract_km(location: &str) -> Option<f64> {
    km_pattern()
        .captures(location)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Reads a viewer export and keeps the column of `parameter`.
pub fn read_viewer_export(
    path: &Path,
    parameter: &Parameter,
    settings: &ProfileSettings,
) -> Result<ViewerExport, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_viewer_export(file, path, parameter, settings)
}

/// Parses a viewer export from any reader. `path` is only used in messages.
pub fn parse_viewer_export<R: Read>(
    reader: R,
    path: &Path,
    parameter: &Parameter,
    settings: &ProfileSettings,
) -> Result<ViewerExport, IngestError> {
    let csv_error = |source: csv::Error| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(csv_error)?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let required = |name: &str| {
        column(name).ok_or_else(|| IngestError::MissingColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        })
    };

    let location_idx = required(settings.location_column.as_str())?;
    let series_idx = required(settings.series_column.as_str())?;
    let value_idx = required(parameter.column.as_str())?;
    let coordinate_idx = column(settings.x_column.as_str()).zip(column(settings.y_column.as_str()));

    let mut rows = Vec::new();
    let mut dropped = Vec::new();

    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        let line = idx + 2;

        match parse_row(&record, location_idx, series_idx, value_idx, coordinate_idx) {
            Ok(row) => rows.push(row),
            Err(reason) => {
                warn!(path = %path.display(), line, %reason, "dropping viewer row");
                dropped.push(DroppedRow { line, reason });
            }
        }
    }

    debug!(
        path = %path.display(),
        rows = rows.len(),
        dropped = dropped.len(),
        parameter = %parameter.key,
        "read viewer export"
    );

    Ok(ViewerExport {
        table: ProfileTable {
            parameter: parameter.key.clone(),
            rows,
        },
        dropped,
    })
}

fn parse_row(
    record: &StringRecord,
    location_idx: usize,
    series_idx: usize,
    value_idx: usize,
    coordinate_idx: Option<(usize, usize)>,
) -> Result<ProfileRow, String> {
    let field = |i: usize| record.get(i).unwrap_or("");

    let location = field(location_idx);
    let km = extract_km(location)
        .ok_or_else(|| format!("location '{}' has no km marker", location))?;

    let raw_value = field(value_idx);
    let value = raw_value
        .parse::<f64>()
        .map_err(|_| format!("value '{}' is not a number", raw_value))?;

    // Coordinates are optional: unparsable cells simply leave them out.
    let coordinates = coordinate_idx.and_then(|(xi, yi)| {
        let x = field(xi).parse::<f64>().ok()?;
        let y = field(yi).parse::<f64>().ok()?;
        Some((x, y))
    });

    Ok(ProfileRow {
        location: location.to_string(),
        km,
        series: field(series_idx).to_string(),
        value,
        coordinates,
    })
}
