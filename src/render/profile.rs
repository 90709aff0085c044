/// Longitudinal profile chart and location map.
///
/// The profile is drawn against river-km with the highest km on the left.
/// plotters ranges must be increasing, so the chart is built on `-km` and
/// the tick labels are negated back.

use std::error::Error;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::{CAPTION_FONT, LABEL_FONT, RenderError, TITLE_FONT};
use crate::analysis::axis::{YRange, data_range, delta_range, x_extent};
use crate::config::Parameter;
use crate::flows::profile::ProfileComparison;
use crate::model::ProfileTable;

pub const PROFILE_CHART_SIZE: (u32, u32) = (1350, 900);
pub const MAP_CHART_SIZE: (u32, u32) = (1100, 1100);

const KM_DESC: &str = "Rivierkilometer (km)";
const DIFFERENCE_CAPTION: &str = "Verschil (BOI - serie)";

/// Draws the profile chart of one table to a PNG at `path`.
pub fn render_profile_chart(
    path: &Path,
    comparison: &ProfileComparison,
    parameter: &Parameter,
    title: &str,
) -> Result<(), RenderError> {
    let root = BitMapBackend::new(path, PROFILE_CHART_SIZE).into_drawing_area();
    draw_profile_chart(root, comparison, parameter, title)
        .map_err(|e| RenderError::drawing(path, e))
}

/// Draws the planar locations of a table, labelled with their km, to a PNG at `path`.
pub fn render_location_map(
    path: &Path,
    table: &ProfileTable,
    title: &str,
) -> Result<(), RenderError> {
    let root = BitMapBackend::new(path, MAP_CHART_SIZE).into_drawing_area();
    draw_location_map(root, table, title).map_err(|e| RenderError::drawing(path, e))
}

/// Color of the n-th series: the reference is always black.
fn series_color(index: usize, is_reference: bool) -> RGBAColor {
    if is_reference {
        BLACK.to_rgba()
    } else {
        Palette99::pick(index).to_rgba()
    }
}

fn mirrored(points: impl Iterator<Item = (f64, f64)>) -> Vec<(f64, f64)> {
    let mut mirrored: Vec<(f64, f64)> = points.map(|(km, v)| (-km, v)).collect();
    mirrored.sort_by(|a, b| a.0.total_cmp(&b.0));
    mirrored
}

fn km_axis(comparison: &ProfileComparison) -> (f64, f64) {
    let (lo, hi) = x_extent(&comparison.series).unwrap_or((0.0, 1.0));
    let pad = ((hi - lo) * 0.02).max(0.5);
    (-(hi + pad), -(lo - pad))
}

fn draw_profile_chart<DB>(
    root: DrawingArea<DB, Shift>,
    comparison: &ProfileComparison,
    parameter: &Parameter,
    title: &str,
) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let body = root.titled(title, TITLE_FONT)?;
    let (_, height) = body.dim_in_pixel();
    let (top, bottom) = body.split_vertically(height * 3 / 5);

    let (x_lo, x_hi) = km_axis(comparison);
    let y_range = data_range(&comparison.series).unwrap_or(YRange {
        lower: 0.0,
        upper: 1.0,
    });

    let mut chart = ChartBuilder::on(&top)
        .margin(15)
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d(x_lo..x_hi, y_range.lower..y_range.upper)?;

    chart
        .configure_mesh()
        .x_desc(KM_DESC)
        .y_desc(parameter.profile_label())
        .x_label_formatter(&|v| format!("{:.0}", -v))
        .label_style(LABEL_FONT)
        .draw()?;

    for (index, series) in comparison.series.iter().enumerate() {
        let color = series_color(index, series.name == comparison.reference);
        let points = mirrored(series.points.iter().map(|p| (p.x, p.y)));
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)).point_size(3))?
            .label(series.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.3))
        .label_font(LABEL_FONT)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    let range = delta_range(&comparison.deltas);
    let mut diff = ChartBuilder::on(&bottom)
        .caption(DIFFERENCE_CAPTION, CAPTION_FONT)
        .margin(15)
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d(x_lo..x_hi, range.lower..range.upper)?;

    diff.configure_mesh()
        .x_desc(KM_DESC)
        .y_desc(parameter.profile_diff_label())
        .x_label_formatter(&|v| format!("{:.0}", -v))
        .label_style(LABEL_FONT)
        .draw()?;

    diff.draw_series(LineSeries::new(
        vec![(x_lo, 0.0), (x_hi, 0.0)],
        BLACK.stroke_width(1),
    ))?;

    for delta in &comparison.deltas {
        let index = comparison
            .series
            .iter()
            .position(|s| s.name == delta.name)
            .unwrap_or(0);
        let color = series_color(index, false);
        let points = mirrored(delta.points.iter().map(|p| (p.x, p.y)));
        diff.draw_series(LineSeries::new(points, color.stroke_width(2)).point_size(3))?
            .label(delta.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], color.stroke_width(2)));
    }

    if !comparison.deltas.is_empty() {
        diff.configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK.mix(0.3))
            .label_font(LABEL_FONT)
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

fn draw_location_map<DB>(
    root: DrawingArea<DB, Shift>,
    table: &ProfileTable,
    title: &str,
) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    // One marker per location label; every series repeats the same points.
    let mut locations: Vec<(f64, f64, f64)> = Vec::new();
    let mut seen: Vec<&str> = Vec::new();
    for row in &table.rows {
        if let Some((x, y)) = row.coordinates {
            if !seen.contains(&row.location.as_str()) {
                seen.push(&row.location);
                locations.push((x, y, row.km));
            }
        }
    }

    let (mut x_lo, mut x_hi, mut y_lo, mut y_hi) = locations.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(xl, xh, yl, yh), &(x, y, _)| (xl.min(x), xh.max(x), yl.min(y), yh.max(y)),
    );
    if !x_lo.is_finite() {
        (x_lo, x_hi, y_lo, y_hi) = (0.0, 1.0, 0.0, 1.0);
    }
    // Equal padding on both axes keeps the map roughly to scale.
    let pad = ((x_hi - x_lo).max(y_hi - y_lo) * 0.05).max(100.0);

    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Locaties {}", title), TITLE_FONT)
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 90)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d((x_lo - pad)..(x_hi + pad), (y_lo - pad)..(y_hi + pad))?;

    chart
        .configure_mesh()
        .x_desc("X (m)")
        .y_desc("Y (m)")
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .label_style(LABEL_FONT)
        .draw()?;

    chart.draw_series(
        locations
            .iter()
            .map(|&(x, y, _)| Circle::new((x, y), 4, BLUE.filled())),
    )?;
    chart.draw_series(locations.iter().map(|&(x, y, km)| {
        Text::new(format!("{:.0}", km), (x, y), LABEL_FONT.into_font().color(&BLACK))
    }))?;

    root.present()?;
    Ok(())
}
