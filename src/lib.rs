/// hydra_compare: comparative visualization of hydraulic computation results.
///
/// Two batch flows:
/// - frequency curves (water level vs return period) of HydraNL computations,
///   differenced per location against a reference simulation type by
///   interpolation on the reference grid
/// - longitudinal profiles (value vs river-km) from viewer exports,
///   differenced against a reference series by an exact join on km
///
/// # Module structure
///
/// ```text
/// hydra_compare
/// ├── model       — shared data types (Series, DeltaSeries, FrequencyCurve, ComputationId, …)
/// ├── config      — company paths, parameters and series styling (compare.toml)
/// ├── logging     — tracing subscriber setup for the binaries
/// ├── report      — BatchReport: loaded / skipped inputs, rendered charts
/// ├── ingest
/// │   ├── discovery — computation folder walk + directory name parsing
/// │   ├── hfreq     — hfreq.txt frequency line parser
/// │   ├── viewer    — viewer export CSV parser (km extraction)
/// │   └── fixtures (test only) — representative input file contents
/// ├── analysis
/// │   ├── groupings — organizes loaded series into per-location / per-table groups
/// │   ├── reference — reference series selection (ReferencePolicy)
/// │   ├── delta     — interpolated and exact-join differences
/// │   └── axis      — axis range policy
/// ├── flows
/// │   ├── frequency — discovery → load → group → delta → TT_*.png
/// │   └── profile   — load → delta → LP_*.png (+ location map)
/// └── render
///     ├── frequency — two-panel frequency chart
///     └── profile   — two-panel profile chart, location map
/// ```

/// Public modules
pub mod analysis;
pub mod config;
pub mod flows;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod render;
pub mod report;
