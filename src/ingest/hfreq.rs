/// HydraNL/Riskeer frequency line parser
///
/// Parses the `hfreq.txt` files written to the `uitvoer` folder of every
/// computation. Format: whitespace-delimited text.
///
/// - First line: header (skipped, whatever it contains)
/// - Remaining lines: two or more numeric columns
///   - column 0: water level (m+NAP, or the unit of the computed parameter)
///   - column 1: exceedance frequency (per year)
///
/// Blank lines and lines starting with `#` are ignored. A single data row
/// is a valid one-point curve.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::IngestError;
use crate::model::FrequencyCurve;

/// Reads and parses one hfreq file.
pub fn read_hfreq_file(path: &Path) -> Result<FrequencyCurve, IngestError> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let curve = parse_hfreq(&text, path)?;
    debug!(path = %path.display(), points = curve.len(), "read frequency line");
    Ok(curve)
}

/// Parses hfreq text. `path` is only used in error messages.
pub fn parse_hfreq(text: &str, path: &Path) -> Result<FrequencyCurve, IngestError> {
    let mut water_level = Vec::new();
    let mut frequency = Vec::new();
    let mut columns: Option<usize> = None;

    for (idx, line) in text.lines().enumerate().skip(1) {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        match columns {
            None => {
                if fields.len() < 2 {
                    return Err(IngestError::TooFewColumns {
                        path: path.to_path_buf(),
                        found: fields.len(),
                    });
                }
                columns = Some(fields.len());
            }
            Some(expected) if expected != fields.len() => {
                return Err(IngestError::RaggedRow {
                    path: path.to_path_buf(),
                    line: line_no,
                    expected,
                    found: fields.len(),
                });
            }
            Some(_) => {}
        }

        let mut values = Vec::with_capacity(fields.len());
        for token in &fields {
            let value = token
                .parse::<f64>()
                .map_err(|_| IngestError::InvalidNumber {
                    path: path.to_path_buf(),
                    line: line_no,
                    token: token.to_string(),
                })?;
            values.push(value);
        }

        let f = values[1];
        if !(f > 0.0) || !f.is_finite() {
            return Err(IngestError::NonPositiveFrequency {
                path: path.to_path_buf(),
                line: line_no,
                value: f,
            });
        }

        water_level.push(values[0]);
        frequency.push(f);
    }

    if water_level.is_empty() {
        return Err(IngestError::NoData {
            path: path.to_path_buf(),
        });
    }

    Ok(FrequencyCurve {
        frequency,
        water_level,
    })
}
