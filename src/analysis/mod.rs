/// Comparison analysis for the frequency-line and longitudinal-profile flows.
///
/// Submodules:
/// - `groupings` — organizes loaded results into per-location / per-table groups.
/// - `reference` — picks the baseline series of a group.
/// - `delta`     — difference curves against the baseline.
/// - `axis`      — chart range policy.

pub mod axis;
pub mod delta;
pub mod groupings;
pub mod reference;
