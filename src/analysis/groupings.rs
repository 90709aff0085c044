/// Grouping of loaded results into comparison groups.
///
/// `group_by_location` takes the flat list of loaded computations produced
/// by the ingest layer and organizes them per location and parameter, so
/// that each group can be compared against its own reference and drawn as
/// one chart. `profile_series` does the same for a viewer export table,
/// where the whole table is one group and the series label is the key.

use std::collections::BTreeMap;

use tracing::warn;

use crate::model::{ComputationId, LocationType, ProfileTable, Series, SeriesPoint};

// ---------------------------------------------------------------------------
// Frequency curves
// ---------------------------------------------------------------------------

/// All computations of one location for one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationGroup {
    pub location: String,
    pub location_type: LocationType,
    pub parameter: String,
    /// Keyed by simulation type; each series is named after its simulation type.
    pub computations: BTreeMap<String, Series>,
}

impl LocationGroup {
    /// Series in name order.
    pub fn series(&self) -> impl Iterator<Item = &Series> {
        self.computations.values()
    }

    /// Human-readable group key used in logs and reports.
    pub fn label(&self) -> String {
        format!("{} ({}, {})", self.location, self.location_type, self.parameter)
    }
}

/// Groups loaded computations by `(location, parameter)`.
///
/// The map is ordered by location, so charts are produced in a stable
/// order. If the same simulation type shows up twice for a location (for
/// instance under both the axis and the bank folder) the last one wins and
/// a warning is logged.
pub fn group_by_location(
    computations: Vec<(ComputationId, Series)>,
) -> BTreeMap<(String, String), LocationGroup> {
    let mut grouped: BTreeMap<(String, String), LocationGroup> = BTreeMap::new();

    for (id, series) in computations {
        let key = (id.location.clone(), id.parameter.clone());

        let group = grouped.entry(key).or_insert_with(|| LocationGroup {
            location: id.location.clone(),
            location_type: id.location_type,
            parameter: id.parameter.clone(),
            computations: BTreeMap::new(),
        });

        let named = Series::new(id.simulation_type.clone(), series.points);
        if group
            .computations
            .insert(id.simulation_type.clone(), named)
            .is_some()
        {
            warn!(
                location = %id.location,
                simulation_type = %id.simulation_type,
                "duplicate computation, keeping the last one read"
            );
        }
    }

    grouped
}

// ---------------------------------------------------------------------------
// Longitudinal profiles
// ---------------------------------------------------------------------------

/// One series per distinct label, in order of first appearance.
///
/// Points are `(km, value)` in table order.
pub fn profile_series(table: &ProfileTable) -> Vec<Series> {
    table
        .series_names()
        .into_iter()
        .map(|name| {
            let points = table
                .rows
                .iter()
                .filter(|r| r.series == name)
                .map(|r| SeriesPoint::new(r.km, r.value))
                .collect();
            Series::new(name, points)
        })
        .collect()
}
