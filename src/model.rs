/// Core data types for the hydraulic result comparison tool.
///
/// This module defines the shared domain model imported by all other modules:
/// series of (independent, dependent) pairs, the raw frequency curve read
/// from an hfreq file, the parsed identity of a computation directory and
/// the rows of a viewer export table. It contains no I/O.

use std::fmt;

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

/// One (independent variable, dependent variable) pair.
///
/// `x` is a return period in years for frequency curves and a
/// river-kilometer for longitudinal profiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: f64,
}

impl SeriesPoint {
    pub fn new(x: f64, y: f64) -> Self {
        SeriesPoint { x, y }
    }
}

/// A named computation result. Points keep the order in which they were read.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn new(name: impl Into<String>, points: Vec<SeriesPoint>) -> Self {
        Series {
            name: name.into(),
            points,
        }
    }

    /// Builds a series from `(x, y)` tuples.
    pub fn from_pairs(name: impl Into<String>, pairs: &[(f64, f64)]) -> Self {
        Series::new(
            name,
            pairs.iter().map(|&(x, y)| SeriesPoint::new(x, y)).collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Copy of the points sorted by ascending `x`. The series itself is left untouched.
    pub fn sorted_points(&self) -> Vec<SeriesPoint> {
        let mut points = self.points.clone();
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        points
    }

    /// The first point as read, before any sorting.
    pub fn first(&self) -> Option<SeriesPoint> {
        self.points.first().copied()
    }
}

/// Difference of one candidate series against the reference of its group.
///
/// Never persisted; recomputed every time a chart is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaSeries {
    pub name: String,
    pub reference: String,
    pub points: Vec<SeriesPoint>,
}

impl DeltaSeries {
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    pub fn keys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Frequency curves
// ---------------------------------------------------------------------------

/// Contents of one hfreq result file.
///
/// `frequency[i]` (column 1 of the file, per year) belongs to
/// `water_level[i]` (column 0). Both arrays always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyCurve {
    pub frequency: Vec<f64>,
    pub water_level: Vec<f64>,
}

impl FrequencyCurve {
    /// Return periods in years, `1 / frequency` elementwise.
    pub fn return_periods(&self) -> Vec<f64> {
        self.frequency.iter().map(|f| 1.0 / f).collect()
    }

    pub fn len(&self) -> usize {
        self.water_level.len()
    }

    pub fn is_empty(&self) -> bool {
        self.water_level.is_empty()
    }

    /// Converts to a series keyed by return period, in file order.
    pub fn to_series(&self, name: impl Into<String>) -> Series {
        let points = self
            .return_periods()
            .into_iter()
            .zip(self.water_level.iter().copied())
            .map(|(t, h)| SeriesPoint::new(t, h))
            .collect();
        Series::new(name, points)
    }
}

// ---------------------------------------------------------------------------
// Computation directories
// ---------------------------------------------------------------------------

/// Where along the water system a location lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocationType {
    /// River axis.
    As,
    /// River bank.
    Oever,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::As => "as",
            LocationType::Oever => "oever",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "as" => Some(LocationType::As),
            "oever" => Some(LocationType::Oever),
            _ => None,
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Structured form of a computation directory name such as
/// `036-01_0050_MA_km0160_BI2023-totaal-met_WS`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComputationId {
    /// Location identifier, the part before the settings marker.
    pub location: String,
    /// Simulation type, e.g. `2023-totaal-met`.
    pub simulation_type: String,
    /// Parameter key, e.g. `WS` or `HBN`.
    pub parameter: String,
    pub location_type: LocationType,
}

impl ComputationId {
    /// The settings token as written after the marker: `{simulation_type}_{parameter}`.
    pub fn settings_token(&self) -> String {
        format!("{}_{}", self.simulation_type, self.parameter)
    }
}

/// Whether a simulation type is a "totaal" run rather than a single-factor
/// variant: `2017-totaal-zon` → true, `2017-fysica-zon` → false.
pub fn is_total_simulation(simulation_type: &str) -> bool {
    simulation_variant(simulation_type)
        .map(|v| v.starts_with("totaal"))
        .unwrap_or(false)
}

/// Second `-`-separated field of a simulation type (`2017-fysica-zon` → `fysica`).
pub fn simulation_variant(simulation_type: &str) -> Option<&str> {
    simulation_type.split('-').nth(1)
}

// ---------------------------------------------------------------------------
// Longitudinal profiles
// ---------------------------------------------------------------------------

/// One row of a viewer export table for the selected parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRow {
    pub location: String,
    pub km: f64,
    pub series: String,
    pub value: f64,
    /// Planar coordinates, when the export carries them.
    pub coordinates: Option<(f64, f64)>,
}

/// A parsed viewer export table, restricted to one parameter column.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileTable {
    pub parameter: String,
    pub rows: Vec<ProfileRow>,
}

impl ProfileTable {
    /// Distinct series labels in order of first appearance.
    pub fn series_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for row in &self.rows {
            if !names.iter().any(|n| n == &row.series) {
                names.push(row.series.clone());
            }
        }
        names
    }

    pub fn has_coordinates(&self) -> bool {
        self.rows.iter().any(|r| r.coordinates.is_some())
    }
}
