/// Difference curves against a reference series.
///
/// Two variants, one per independent-variable kind:
///
/// - `interpolated_delta` (frequency curves): the candidate is linearly
///   interpolated onto the reference's return periods, clamped to its first
///   and last value outside its own range. Delta = candidate − reference.
/// - `joined_delta` (longitudinal profiles): inner join on exact equality of
///   the river-kilometer. Delta = reference − candidate.
///
/// Both are pure; neither input is modified.

use crate::model::{DeltaSeries, Series, SeriesPoint};

/// Piecewise-linear interpolation of `(xp, fp)` at `x`.
///
/// `xp` must be ascending and the same length as `fp`. Values left of
/// `xp[0]` take `fp[0]`, values right of the last knot take the last `fp`.
/// Returns `None` when there are no knots.
pub fn interpolate(xp: &[f64], fp: &[f64], x: f64) -> Option<f64> {
    let n = xp.len().min(fp.len());
    if n == 0 {
        return None;
    }
    if x <= xp[0] {
        return Some(fp[0]);
    }
    if x >= xp[n - 1] {
        return Some(fp[n - 1]);
    }

    // Last knot at or left of x; x < xp[n - 1] guarantees j + 1 < n.
    let j = xp[..n].partition_point(|&v| v <= x) - 1;
    let (x0, x1) = (xp[j], xp[j + 1]);
    let (y0, y1) = (fp[j], fp[j + 1]);
    Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
}

/// Candidate minus reference at every reference return period.
///
/// Both series are sorted by ascending x first; the result follows the
/// sorted reference grid. Empty when either series is empty.
pub fn interpolated_delta(reference: &Series, candidate: &Series) -> DeltaSeries {
    let reference_points = reference.sorted_points();
    let candidate_points = candidate.sorted_points();

    let xp: Vec<f64> = candidate_points.iter().map(|p| p.x).collect();
    let fp: Vec<f64> = candidate_points.iter().map(|p| p.y).collect();

    let points = reference_points
        .iter()
        .filter_map(|r| interpolate(&xp, &fp, r.x).map(|y| SeriesPoint::new(r.x, y - r.y)))
        .collect();

    DeltaSeries {
        name: candidate.name.clone(),
        reference: reference.name.clone(),
        points,
    }
}

/// Reference minus candidate at every x present in both series.
///
/// Points in only one series are dropped. A key occurring more than once
/// yields every pairing, in reference order then candidate order.
pub fn joined_delta(reference: &Series, candidate: &Series) -> DeltaSeries {
    let mut points = Vec::new();
    for r in &reference.points {
        for c in candidate.points.iter().filter(|c| c.x == r.x) {
            points.push(SeriesPoint::new(r.x, r.y - c.y));
        }
    }

    DeltaSeries {
        name: candidate.name.clone(),
        reference: reference.name.clone(),
        points,
    }
}
