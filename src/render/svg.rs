//! SVG output through plotters.

use crate::render::{Chart, RenderError, Renderer};
use crate::types::marker::{LabelPlacement, Marker};
use chrono::{DateTime, TimeDelta, Utc};
use log::info;
use ordered_float::OrderedFloat;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error;
use std::ops::Range;
use std::path::{Path, PathBuf};

const DEFAULT_SIZE: (u32, u32) = (1200, 700);
const FOOTER_HEIGHT: u32 = 36;
const DASH_COUNT: i64 = 80;
const LABEL_LINE_HEIGHT: i32 = 14;
const LABEL_CHAR_WIDTH: i32 = 7;
const MARKER_LABEL_GAP: i32 = 10;
const REFERENCE_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Writes each chart to `<output_dir>/<file_stem>.svg`.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    output_dir: PathBuf,
    size: (u32, u32),
}

impl SvgRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            size: DEFAULT_SIZE,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn output_path(&self, chart: &Chart) -> PathBuf {
        self.output_dir.join(format!("{}.svg", chart.file_stem))
    }
}

impl Renderer for SvgRenderer {
    fn render(&self, chart: &Chart) -> Result<PathBuf, RenderError> {
        if chart.value_bounds().is_none() {
            return Err(RenderError::EmptyChart(chart.title.clone()));
        }
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| RenderError::OutputDirCreation(self.output_dir.clone(), e))?;

        let path = self.output_path(chart);
        let root = SVGBackend::new(&path, self.size).into_drawing_area();
        draw_chart(root, chart).map_err(|e| RenderError::Draw(e.to_string()))?;

        info!("Wrote '{}' to {}", chart.title, path.display());
        Ok(path)
    }
}

fn x_range(chart: &Chart) -> Option<Range<DateTime<Utc>>> {
    let (start, end) = chart.time_bounds()?;
    if end <= start {
        return Some(start - TimeDelta::hours(1)..start + TimeDelta::hours(1));
    }
    Some(start..end)
}

/// Value range covering the line and the reference lines, padded so marker labels fit.
fn y_range(chart: &Chart) -> Option<Range<f64>> {
    let values: Vec<OrderedFloat<f64>> = chart
        .points
        .iter()
        .filter_map(|(_, v)| *v)
        .chain(chart.reference_lines.iter().map(|r| r.value))
        .filter(|v| v.is_finite())
        .map(OrderedFloat)
        .collect();
    let lo = values.iter().min()?.into_inner();
    let hi = values.iter().max()?.into_inner();

    let span = hi - lo;
    let share = if chart.markers.is_empty() { 0.05 } else { 0.15 };
    let pad = if span > 0.0 { span * share } else { 1.0 };
    Some(lo - pad..hi + pad)
}

fn draw_chart<DB>(root: DrawingArea<DB, Shift>, chart: &Chart) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let (_, height) = root.dim_in_pixel();
    let (plot_area, footer_area) = root.split_vertically(height.saturating_sub(FOOTER_HEIGHT));

    let x_range = x_range(chart).ok_or("chart has no points")?;
    let y_range = y_range(chart).ok_or("chart has no values")?;
    let (start, end) = (x_range.start, x_range.end);

    let mut cc = ChartBuilder::on(&plot_area)
        .caption(&chart.title, ("sans-serif", 28))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(x_range, y_range)?;

    let x_format = chart.x_label_format;
    cc.configure_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .x_labels(8)
        .x_label_formatter(&|t: &DateTime<Utc>| t.format(x_format).to_string())
        .light_line_style(&BLACK.mix(0.05))
        .draw()?;

    let color = RGBColor(chart.line_color.0, chart.line_color.1, chart.line_color.2);
    let line_style = color.stroke_width(chart.line_width);
    for (i, segment) in chart.segments().into_iter().enumerate() {
        let anno = cc.draw_series(LineSeries::new(segment, line_style))?;
        if i == 0 {
            anno.label(chart.series_label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
        }
    }

    let reference_style = REFERENCE_COLOR.mix(0.7).stroke_width(2);
    let total_secs = (end - start).num_seconds();
    let dash_edge = |k: i64| start + TimeDelta::seconds(total_secs * k / DASH_COUNT);
    for line in &chart.reference_lines {
        cc.draw_series((0..DASH_COUNT).step_by(2).map(|k| {
            PathElement::new(
                vec![(dash_edge(k), line.value), (dash_edge(k + 1), line.value)],
                reference_style,
            )
        }))?
        .label(line.label.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], reference_style));
    }

    // Red dots with yellow label boxes offset above or below each marked sample.
    if !chart.markers.is_empty() {
        let dot_style = RED.mix(0.8).filled();
        cc.draw_series(chart.markers.iter().map(|m| {
            EmptyElement::at((m.timestamp, m.value)) + Circle::new((0, 0), 4, dot_style)
        }))?;

        let font = ("sans-serif", 12)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        let box_style = YELLOW.mix(0.7).filled();
        for marker in &chart.markers {
            let anchor = (marker.timestamp, marker.value);
            let (half_width, half_height, center_y) = label_box(marker);
            cc.draw_series(std::iter::once(
                EmptyElement::at(anchor)
                    + Rectangle::new(
                        [
                            (-half_width, center_y - half_height),
                            (half_width, center_y + half_height),
                        ],
                        box_style,
                    ),
            ))?;

            let line_count = marker.label.lines().count() as i32;
            let first_line_y = center_y - (line_count - 1) * LABEL_LINE_HEIGHT / 2;
            for (i, line) in marker.label.lines().enumerate() {
                cc.draw_series(std::iter::once(
                    EmptyElement::at(anchor)
                        + Text::new(
                            line.to_string(),
                            (0, first_line_y + i as i32 * LABEL_LINE_HEIGHT),
                            font.clone(),
                        ),
                ))?;
            }
        }
    }

    cc.configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK.mix(0.3))
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    footer_area.draw(&Text::new(
        chart.footer.as_str(),
        (20, 10),
        ("sans-serif", 15).into_font().color(&BLACK),
    ))?;

    root.present()?;
    Ok(())
}

/// Half width, half height and vertical centre offset of a marker's label box,
/// in pixels relative to the marked point.
fn label_box(marker: &Marker) -> (i32, i32, i32) {
    let line_count = marker.label.lines().count() as i32;
    let widest = marker
        .label
        .lines()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0) as i32;
    let half_width = (widest * LABEL_CHAR_WIDTH) / 2 + 5;
    let half_height = (line_count * LABEL_LINE_HEIGHT) / 2 + 3;
    let center_y = match marker.placement {
        LabelPlacement::Above => -(MARKER_LABEL_GAP + half_height),
        LabelPlacement::Below => MARKER_LABEL_GAP + half_height,
    };
    (half_width, half_height, center_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::chart::{point_chart, trend_chart};
    use crate::series::builder::build_time_series;
    use crate::series::markers::annotate_markers;
    use crate::series::payload::HourlyPayload;
    use crate::series::smoothing::smooth_trend;
    use crate::types::daily_series::DailySeries;
    use crate::types::variable::{UnitSystem, WeatherVariable};
    use chrono::{NaiveDate, TimeZone};

    fn hourly(values: Vec<Option<f64>>) -> crate::types::time_series::TimeSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().timestamp();
        let end = start + values.len() as i64 * 3600;
        build_time_series(HourlyPayload::new(start, end, 3600, values)).unwrap()
    }

    #[test]
    fn test_point_chart_svg() {
        let dir = tempfile::tempdir().unwrap();
        let mut values: Vec<Option<f64>> = (0..72).map(|i| Some(20.0 + (i % 24) as f64)).collect();
        values[30] = None;
        let series = hourly(values);
        let markers = annotate_markers(&series, "°F");
        let chart = point_chart(
            WeatherVariable::Temperature,
            UnitSystem::Imperial,
            "Chattanooga",
            "TN",
            &series,
            markers,
        );

        let path = SvgRenderer::new(dir.path().join("plots")).render(&chart).unwrap();
        assert_eq!(
            path.file_name().unwrap(),
            "temperature-plot-2024-01-01-2024-01-03.svg"
        );
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Hourly Temperature Data for Chattanooga, TN"));
        assert!(svg.contains("Data period: 2024-01-01 00:00 to 2024-01-03 23:00"));
    }

    #[test]
    fn test_trend_chart_svg() {
        let dir = tempfile::tempdir().unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let daily =
            DailySeries::from_values(start, (0..30).map(|i| Some(i as f64)).collect()).unwrap();
        let trend = smooth_trend(&daily).unwrap();
        let chart = trend_chart(
            WeatherVariable::DewPoint,
            UnitSystem::Metric,
            "Boise",
            "ID",
            &trend,
        );

        let path = SvgRenderer::new(dir.path()).render(&chart).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Dew Point Trend for Boise ID"));
        assert!(svg.contains("Freezing Point (0°C)"));
    }

    #[test]
    fn test_single_point_is_drawable() {
        let dir = tempfile::tempdir().unwrap();
        let series = hourly(vec![Some(1.0)]);
        let chart = point_chart(
            WeatherVariable::Precipitation,
            UnitSystem::Imperial,
            "A",
            "B",
            &series,
            vec![],
        );
        assert!(SvgRenderer::new(dir.path()).render(&chart).is_ok());
    }

    #[test]
    fn test_all_absent_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let chart = point_chart(
            WeatherVariable::Temperature,
            UnitSystem::Imperial,
            "A",
            "B",
            &hourly(vec![None; 5]),
            vec![],
        );
        let err = SvgRenderer::new(dir.path()).render(&chart).unwrap_err();
        assert!(matches!(err, RenderError::EmptyChart(_)));
    }

    #[test]
    fn test_label_boxes_sit_on_opposite_sides() {
        let series = hourly((0..10).map(|i| Some(i as f64)).collect());
        let mut markers = annotate_markers(&series, "°F");
        markers[1].placement = LabelPlacement::Below;
        let (_, half_height, above) = label_box(&markers[0]);
        let (_, _, below) = label_box(&markers[1]);
        assert_eq!(half_height, LABEL_LINE_HEIGHT + 3);
        assert!(above < 0 && below > 0);
        assert_eq!(above, -below);
    }

    #[test]
    fn test_y_range_includes_reference_line() {
        let series = hourly(vec![Some(50.0), Some(60.0)]);
        let chart = point_chart(
            WeatherVariable::Temperature,
            UnitSystem::Imperial,
            "A",
            "B",
            &series,
            vec![],
        );
        let range = y_range(&chart).unwrap();
        assert!(range.start < 32.0);
        assert!(range.end > 60.0);
    }
}
