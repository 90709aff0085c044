/// Axis ranges for the comparison charts.
///
/// The frequency chart's vertical range is driven by the tail of the curves:
/// the highest water level at or beyond the threshold return period, padded
/// by a tenth of the span down to the lowest first point of any curve.

use crate::model::{DeltaSeries, Series};

/// Horizontal extent of the frequency charts, in years.
pub const RETURN_PERIOD_AXIS: (f64, f64) = (10.0, 1.0e6);

/// Padding applied above the tail maximum, as a fraction of the span.
const TAIL_PADDING: f64 = 0.1;

/// Padding applied on both sides of a plain data range.
const DATA_PADDING: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YRange {
    pub lower: f64,
    pub upper: f64,
}

impl YRange {
    /// Widens a degenerate range so that a chart can still be built.
    fn non_degenerate(self) -> Self {
        if self.upper > self.lower {
            self
        } else {
            YRange {
                lower: self.lower - 0.5,
                upper: self.upper + 0.5,
            }
        }
    }
}

/// Vertical range of a frequency chart.
///
/// `lower` is the minimum over all series of their first point (file
/// order); `upper` is the maximum level at return periods ≥ `threshold`
/// plus 10 % of `upper − lower`. `None` when no point reaches the
/// threshold; callers then fall back to `data_range`.
pub fn frequency_y_range<'a, I>(series: I, threshold: f64) -> Option<YRange>
where
    I: IntoIterator<Item = &'a Series>,
{
    let mut lower = f64::INFINITY;
    let mut tail_max = f64::NEG_INFINITY;

    for s in series {
        if let Some(first) = s.first() {
            lower = lower.min(first.y);
        }
        for p in s.points.iter().filter(|p| p.x >= threshold) {
            tail_max = tail_max.max(p.y);
        }
    }

    if !tail_max.is_finite() || !lower.is_finite() {
        return None;
    }

    Some(
        YRange {
            lower,
            upper: tail_max + TAIL_PADDING * (tail_max - lower),
        }
        .non_degenerate(),
    )
}

/// Min/max of all dependent values, padded by 5 % on each side.
pub fn data_range<'a, I>(series: I) -> Option<YRange>
where
    I: IntoIterator<Item = &'a Series>,
{
    bounds(series.into_iter().flat_map(|s| s.points.iter().map(|p| p.y)))
}

/// Range of the difference panel; always includes zero.
pub fn delta_range(deltas: &[DeltaSeries]) -> YRange {
    let values = deltas
        .iter()
        .flat_map(|d| d.points.iter().map(|p| p.y))
        .chain(std::iter::once(0.0));
    bounds(values).unwrap_or(YRange {
        lower: -0.5,
        upper: 0.5,
    })
}

/// Min/max of the independent values.
pub fn x_extent<'a, I>(series: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = &'a Series>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for p in series.into_iter().flat_map(|s| s.points.iter()) {
        min = min.min(p.x);
        max = max.max(p.x);
    }
    (min.is_finite() && max.is_finite()).then_some((min, max))
}

fn bounds<I: Iterator<Item = f64>>(values: I) -> Option<YRange> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() {
        return None;
    }
    let pad = DATA_PADDING * (max - min);
    Some(
        YRange {
            lower: min - pad,
            upper: max + pad,
        }
        .non_degenerate(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SeriesPoint;

    #[test]
    fn test_upper_bound_from_tail_with_padding() {
        let a = Series::from_pairs("a", &[(10.0, 1.0), (1.0e4, 3.0), (1.0e5, 4.0)]);
        let b = Series::from_pairs("b", &[(10.0, 2.0), (2.0e5, 5.0)]);

        let range = frequency_y_range([&a, &b], 1.0e5).unwrap();
        assert_eq!(range.lower, 1.0);
        assert!((range.upper - (5.0 + 0.1 * 4.0)).abs() < 1e-12);
    }

    #[test]
    fn test_lower_bound_uses_first_point_in_file_order() {
        // first point is not the minimum of the curve
        let a = Series::from_pairs("a", &[(1.0e5, 4.0), (10.0, 1.0), (2.0e5, 6.0)]);
        let range = frequency_y_range([&a], 1.0e5).unwrap();
        assert_eq!(range.lower, 4.0);
        assert!((range.upper - (6.0 + 0.1 * 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_range_is_widened() {
        // tail maximum equals the lowest first point
        let a = Series::from_pairs("a", &[(1.0e5, 4.0), (10.0, 1.0)]);
        let range = frequency_y_range([&a], 1.0e5).unwrap();
        assert_eq!(range, YRange { lower: 3.5, upper: 4.5 });

        let flat = Series::from_pairs("flat", &[(10.0, 2.0), (100.0, 2.0)]);
        let range = data_range([&flat]).unwrap();
        assert_eq!(range, YRange { lower: 1.5, upper: 2.5 });
    }

    #[test]
    fn test_no_tail_points_gives_none() {
        let a = Series::from_pairs("a", &[(10.0, 1.0), (1.0e3, 2.0)]);
        assert!(frequency_y_range([&a], 1.0e5).is_none());

        let fallback = data_range([&a]).unwrap();
        assert!(fallback.lower < 1.0 && fallback.upper > 2.0);
    }

    #[test]
    fn test_delta_range_includes_zero() {
        let delta = DeltaSeries {
            name: "c".to_string(),
            reference: "r".to_string(),
            points: vec![SeriesPoint::new(10.0, 0.2), SeriesPoint::new(100.0, 0.4)],
        };
        let range = delta_range(&[delta]);
        assert!(range.lower <= 0.0);
        assert!(range.upper >= 0.4);
    }

    #[test]
    fn test_delta_range_of_nothing() {
        let range = delta_range(&[]);
        assert!(range.lower < 0.0 && range.upper > 0.0);
    }

    #[test]
    fn test_x_extent() {
        let a = Series::from_pairs("a", &[(12.0, 1.0), (3.0, 2.0)]);
        let b = Series::from_pairs("b", &[(40.0, 1.0)]);
        assert_eq!(x_extent([&a, &b]), Some((3.0, 40.0)));
        let empty = Series::new("e", Vec::new());
        assert_eq!(x_extent([&empty]), None);
    }
}
