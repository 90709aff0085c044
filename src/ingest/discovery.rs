/// Computation directory discovery
///
/// HydraNL computations are stored one directory per computation under a
/// folder per water system and location type:
///
/// ```text
/// {input_root}/HydraNL_Beoordelen_{prefix}_{water_system}_{location_type}/
///     036-01_0050_MA_km0160_BI2023-totaal-met_WS/
///         uitvoer/hfreq.txt
///     036-01_0050_MA_km0160_BI2017-fysica-zon_WS/
///         uitvoer/hfreq.txt
///     run_all.bat
/// ```
///
/// The directory name is `{location}{marker}{simulation_type}_{parameter}`.
/// It is parsed once into a `ComputationId`; everything downstream works on
/// that instead of re-splitting the name.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::CompareConfig;
use crate::model::{ComputationId, LocationType};
use crate::report::SkippedInput;

/// Parses a computation directory name.
///
/// The location is everything before the first `marker`, the settings token
/// everything after the last one. The settings token splits at its last `_`
/// into simulation type and parameter. Returns `None` for names that do not
/// follow the convention.
pub fn parse_computation_dir(
    name: &str,
    marker: &str,
    location_type: LocationType,
) -> Option<ComputationId> {
    let (location, _) = name.split_once(marker)?;
    let (_, settings) = name.rsplit_once(marker)?;
    let (simulation_type, parameter) = settings.rsplit_once('_')?;

    if location.is_empty() || simulation_type.is_empty() || parameter.is_empty() {
        return None;
    }

    Some(ComputationId {
        location: location.to_string(),
        simulation_type: simulation_type.to_string(),
        parameter: parameter.to_string(),
        location_type,
    })
}

/// Which computations to include. `None` means "no restriction".
#[derive(Debug, Clone, Default)]
pub struct ComputationFilter {
    /// Entries match either the full settings token (`2017-totaal-zon_WS`)
    /// or the bare simulation type (`2017-totaal-zon`).
    pub simulation_types: Option<Vec<String>>,
    pub locations: Option<Vec<String>>,
    pub parameter: Option<String>,
}

impl ComputationFilter {
    pub fn matches(&self, id: &ComputationId) -> bool {
        if let Some(locations) = &self.locations {
            if !locations.iter().any(|l| l == &id.location) {
                return false;
            }
        }
        if let Some(parameter) = &self.parameter {
            if parameter != &id.parameter {
                return false;
            }
        }
        if let Some(types) = &self.simulation_types {
            let token = id.settings_token();
            if !types
                .iter()
                .any(|t| t == &token || t == &id.simulation_type)
            {
                return false;
            }
        }
        true
    }
}

/// A computation directory that passed the filter, with its result file.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredComputation {
    pub id: ComputationId,
    pub dir: PathBuf,
    pub result_file: PathBuf,
}

/// Everything found under the input root.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub computations: Vec<DiscoveredComputation>,
    pub skipped: Vec<SkippedInput>,
}

/// Walks the location type folders of `water_system` and collects the
/// computations accepted by `filter`.
///
/// A missing location type folder or a computation without result file is
/// recorded as skipped; it never aborts the walk.
pub fn discover_computations(
    config: &CompareConfig,
    input_root: &Path,
    water_system: &str,
    location_types: &[LocationType],
    filter: &ComputationFilter,
) -> Discovery {
    let mut discovery = Discovery::default();
    let marker = &config.frequency.settings_marker;

    for &location_type in location_types {
        let type_dir = config.location_type_dir(input_root, water_system, location_type);

        let entries = match sorted_entries(&type_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %type_dir.display(), error = %e, "cannot read location type folder");
                discovery.skipped.push(SkippedInput {
                    path: type_dir.clone(),
                    reason: format!("cannot read folder: {}", e),
                });
                continue;
            }
        };

        for entry in entries {
            let Some(name) = entry.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.ends_with(".bat") || !entry.is_dir() {
                continue;
            }

            let Some(id) = parse_computation_dir(name, marker, location_type) else {
                debug!(dir = %entry.display(), "not a computation folder");
                continue;
            };
            if !filter.matches(&id) {
                continue;
            }

            match find_result_file(config, &entry) {
                Ok(result_file) => discovery.computations.push(DiscoveredComputation {
                    id,
                    dir: entry,
                    result_file,
                }),
                Err(reason) => {
                    warn!(dir = %entry.display(), %reason, "skipping computation");
                    discovery.skipped.push(SkippedInput {
                        path: entry,
                        reason,
                    });
                }
            }
        }
    }

    discovery
}

/// First result file (by name) in the computation's results folder.
fn find_result_file(config: &CompareConfig, computation_dir: &Path) -> Result<PathBuf, String> {
    let results_dir = computation_dir.join(&config.frequency.results_dir);
    let extension = config.frequency.results_extension.as_str();

    let candidates: Vec<PathBuf> = sorted_entries(&results_dir)
        .map_err(|e| format!("cannot read {}: {}", results_dir.display(), e))?
        .into_iter()
        .filter(|p| p.is_file())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(extension))
        .collect();

    match candidates.as_slice() {
        [] => Err(format!(
            "no .{} result file in {}",
            extension,
            results_dir.display()
        )),
        [only] => Ok(only.clone()),
        [first, ..] => {
            warn!(
                dir = %results_dir.display(),
                count = candidates.len(),
                using = %first.display(),
                "several result files, using the first by name"
            );
            Ok(first.clone())
        }
    }
}

fn sorted_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}
