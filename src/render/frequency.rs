/// Frequency chart: water level against return period.
///
/// Layout (1800×1350):
///
/// ```text
/// ┌───────────────────────────────────────────┐
/// │ Location: {id} ({type}) - {water system}  │
/// │  curves, log x 10 … 1e6, legend           │  3/5
/// ├───────────────────────────────────────────┤
/// │  Verschil t.o.v. BOI, zero line           │  2/5
/// └───────────────────────────────────────────┘
/// ```
///
/// Without a reference only the top panel is drawn, at full height.

use std::error::Error;
use std::path::Path;

use plotters::coord::{CoordTranslate, Shift};
use plotters::prelude::*;

use super::{CAPTION_FONT, LABEL_FONT, RenderError, TITLE_FONT, rgb};
use crate::analysis::axis::{
    RETURN_PERIOD_AXIS, YRange, data_range, delta_range, frequency_y_range,
};
use crate::config::CompareConfig;
use crate::flows::frequency::LocationComparison;
use crate::model::{SeriesPoint, is_total_simulation};

pub const FREQUENCY_CHART_SIZE: (u32, u32) = (1800, 1350);

const RETURN_PERIOD_DESC: &str = "Terugkeertijd (jaar)";
const DIFFERENCE_CAPTION: &str = "Verschil t.o.v. BOI";

/// Marker spacing and radius of the dotted variant curves, in pixels.
const DOT_SPACING: i32 = 8;
const DOT_RADIUS: i32 = 2;

/// Draws one location's chart to a PNG at `path`.
pub fn render_frequency_chart(
    path: &Path,
    comparison: &LocationComparison,
    config: &CompareConfig,
    water_system: &str,
    axis_label: &str,
) -> Result<(), RenderError> {
    let root = BitMapBackend::new(path, FREQUENCY_CHART_SIZE).into_drawing_area();
    draw_frequency_chart(root, comparison, config, water_system, axis_label)
        .map_err(|e| RenderError::drawing(path, e))
}

/// One curve as it will be drawn.
struct Curve {
    label: String,
    color: RGBColor,
    order: u32,
    /// Solid line for "totaal" runs, dotted line otherwise.
    total: bool,
    points: Vec<(f64, f64)>,
}

/// Points inside the return period window; plotters cannot place points
/// outside a log axis range.
fn in_window(points: &[SeriesPoint]) -> Vec<(f64, f64)> {
    let (lo, hi) = RETURN_PERIOD_AXIS;
    let mut visible: Vec<(f64, f64)> = points
        .iter()
        .filter(|p| p.x >= lo && p.x <= hi && p.y.is_finite())
        .map(|p| (p.x, p.y))
        .collect();
    visible.sort_by(|a, b| a.0.total_cmp(&b.0));
    visible
}

fn draw_frequency_chart<DB>(
    root: DrawingArea<DB, Shift>,
    comparison: &LocationComparison,
    config: &CompareConfig,
    water_system: &str,
    axis_label: &str,
) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let group = &comparison.group;
    root.fill(&WHITE)?;

    let title = format!(
        "Location: {} ({}) - {}",
        group.location, group.location_type, water_system
    );
    let body = root.titled(&title, TITLE_FONT)?;

    let (top, bottom) = if comparison.has_reference() {
        let (_, height) = body.dim_in_pixel();
        let (top, bottom) = body.split_vertically(height * 3 / 5);
        (top, Some(bottom))
    } else {
        (body, None)
    };

    let mut curves: Vec<Curve> = group
        .series()
        .map(|s| {
            let style = config.style_for(&s.name);
            Curve {
                label: style.label,
                color: rgb(style.color),
                order: style.order,
                total: is_total_simulation(&s.name),
                points: in_window(&s.points),
            }
        })
        .collect();
    curves.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.label.cmp(&b.label)));

    let y_range = frequency_y_range(group.series(), config.frequency.upper_range_threshold_years)
        .or_else(|| data_range(group.series()))
        .unwrap_or(YRange {
            lower: 0.0,
            upper: 1.0,
        });
    let (x_lo, x_hi) = RETURN_PERIOD_AXIS;

    let mut chart = ChartBuilder::on(&top)
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 90)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d((x_lo..x_hi).log_scale(), y_range.lower..y_range.upper)?;

    chart
        .configure_mesh()
        .x_desc(RETURN_PERIOD_DESC)
        .y_desc(axis_label)
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&|v| format!("{:.2}", v))
        .label_style(LABEL_FONT)
        .draw()?;

    for curve in &curves {
        draw_curve(&mut chart, curve)?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.3))
        .label_font(LABEL_FONT)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    if let Some(bottom) = bottom {
        draw_difference_panel(&bottom, comparison, config, axis_label)?;
    }

    root.present()?;
    Ok(())
}

fn draw_curve<'a, DB, CT>(chart: &mut ChartContext<'a, DB, CT>, curve: &Curve) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    CT: CoordTranslate<From = (f64, f64)>,
{
    let color = curve.color;
    if curve.total {
        chart
            .draw_series(LineSeries::new(
                curve.points.iter().copied(),
                color.stroke_width(1),
            ))?
            .label(curve.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], color.stroke_width(1)));
    } else {
        chart
            .draw_series(DottedLineSeries::new(
                curve.points.iter().copied(),
                0,
                DOT_SPACING,
                move |c| Circle::new(c, DOT_RADIUS, color.filled()),
            ))?
            .label(curve.label.as_str())
            .legend(move |(x, y)| {
                EmptyElement::at((x, y))
                    + Circle::new((0, 0), DOT_RADIUS, color.filled())
                    + Circle::new((12, 0), DOT_RADIUS, color.filled())
                    + Circle::new((24, 0), DOT_RADIUS, color.filled())
            });
    }
    Ok(())
}

fn draw_difference_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    comparison: &LocationComparison,
    config: &CompareConfig,
    axis_label: &str,
) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let range = delta_range(&comparison.deltas);
    let (x_lo, x_hi) = RETURN_PERIOD_AXIS;

    let mut chart = ChartBuilder::on(area)
        .caption(DIFFERENCE_CAPTION, CAPTION_FONT)
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 90)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d((x_lo..x_hi).log_scale(), range.lower..range.upper)?;

    chart
        .configure_mesh()
        .x_desc(RETURN_PERIOD_DESC)
        .y_desc(format!("Δ{}", axis_label))
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&|v| format!("{:.2}", v))
        .label_style(LABEL_FONT)
        .draw()?;

    chart.draw_series(LineSeries::new(
        vec![(x_lo, 0.0), (x_hi, 0.0)],
        RED.stroke_width(1),
    ))?;

    let mut deltas: Vec<Curve> = comparison
        .deltas
        .iter()
        .map(|d| {
            let style = config.style_for(&d.name);
            Curve {
                label: style.label,
                color: rgb(style.color),
                order: style.order,
                total: is_total_simulation(&d.name),
                points: in_window(&d.points),
            }
        })
        .collect();
    deltas.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.label.cmp(&b.label)));

    for delta in &deltas {
        draw_curve(&mut chart, delta)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_window_drops_points_outside_axis_and_sorts() {
        let points = vec![
            SeriesPoint::new(1.0e3, 4.0),
            SeriesPoint::new(5.0, 3.0),
            SeriesPoint::new(10.0, 3.2),
            SeriesPoint::new(2.0e6, 5.1),
        ];
        assert_eq!(in_window(&points), vec![(10.0, 3.2), (1.0e3, 4.0)]);
    }
}
