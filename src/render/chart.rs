use crate::render::{Chart, LineColor};
use crate::types::daily_series::TrendSeries;
use crate::types::marker::Marker;
use crate::types::time_series::TimeSeries;
use crate::types::variable::{PlotMode, UnitSystem, WeatherVariable};
use chrono::{DateTime, NaiveTime, Utc};

const POINT_FOOTER_FORMAT: &str = "%Y-%m-%d %H:%M";
const TREND_FOOTER_FORMAT: &str = "%Y-%m-%d";
const FILE_DATE_FORMAT: &str = "%Y-%m-%d";

fn line_color(variable: WeatherVariable) -> LineColor {
    match variable {
        WeatherVariable::Temperature => LineColor::RED,
        WeatherVariable::Precipitation | WeatherVariable::DewPoint => LineColor::BLUE,
    }
}

fn file_stem(
    variable: WeatherVariable,
    mode: PlotMode,
    first: Option<DateTime<Utc>>,
    last: Option<DateTime<Utc>>,
) -> String {
    let date = |t: Option<DateTime<Utc>>| {
        t.map(|t| t.format(FILE_DATE_FORMAT).to_string())
            .unwrap_or_else(|| "empty".to_string())
    };
    format!(
        "{}-{}-{}-{}",
        variable.slug(),
        mode.slug(),
        date(first),
        date(last)
    )
}

fn footer(first: Option<DateTime<Utc>>, last: Option<DateTime<Utc>>, format: &str) -> String {
    match (first, last) {
        (Some(first), Some(last)) => format!(
            "Data period: {} to {}",
            first.format(format),
            last.format(format)
        ),
        _ => "Data period: none".to_string(),
    }
}

/// The hourly series with its annotated markers.
pub fn point_chart(
    variable: WeatherVariable,
    units: UnitSystem,
    city: &str,
    state: &str,
    series: &TimeSeries,
    markers: Vec<Marker>,
) -> Chart {
    let first = series.first_timestamp();
    let last = series.last_timestamp();
    Chart {
        title: format!(
            "Hourly {} Data for {}, {}",
            variable.display_name(),
            city,
            state
        ),
        x_label: "Date".to_string(),
        y_label: variable.axis_label(units),
        series_label: variable.display_name().to_string(),
        points: series.iter().map(|s| (s.timestamp, s.value)).collect(),
        line_color: line_color(variable),
        line_width: 2,
        markers,
        reference_lines: variable.reference_lines(units),
        footer: footer(first, last, POINT_FOOTER_FORMAT),
        x_label_format: "%m-%d %H:%M",
        file_stem: file_stem(variable, PlotMode::Point, first, last),
    }
}

/// The smoothed daily trend. Each point sits at midnight UTC of its day.
pub fn trend_chart(
    variable: WeatherVariable,
    units: UnitSystem,
    city: &str,
    state: &str,
    trend: &TrendSeries,
) -> Chart {
    let points: Vec<(DateTime<Utc>, Option<f64>)> = trend
        .points()
        .iter()
        .map(|p| (p.date.and_time(NaiveTime::MIN).and_utc(), Some(p.value)))
        .collect();
    let first = points.first().map(|p| p.0);
    let last = points.last().map(|p| p.0);
    Chart {
        title: format!("{} Trend for {} {}", variable.display_name(), city, state),
        x_label: "Date".to_string(),
        y_label: variable.axis_label(units),
        series_label: format!("{} Trend", variable.display_name()),
        points,
        line_color: line_color(variable),
        line_width: 3,
        markers: Vec::new(),
        reference_lines: variable.reference_lines(units),
        footer: footer(first, last, TREND_FOOTER_FORMAT),
        x_label_format: "%Y-%m-%d",
        file_stem: file_stem(variable, PlotMode::Trend, first, last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::builder::build_time_series;
    use crate::series::markers::annotate_markers;
    use crate::series::payload::HourlyPayload;
    use crate::series::smoothing::smooth_trend;
    use crate::types::daily_series::DailySeries;
    use chrono::{NaiveDate, TimeZone};

    fn hourly(n: usize) -> TimeSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().timestamp();
        let values = (0..n).map(|i| Some(i as f64)).collect();
        build_time_series(HourlyPayload::new(start, start + n as i64 * 3600, 3600, values))
            .unwrap()
    }

    #[test]
    fn test_point_chart() {
        let series = hourly(48);
        let markers = annotate_markers(&series, "°F");
        let chart = point_chart(
            WeatherVariable::Temperature,
            UnitSystem::Imperial,
            "Chattanooga",
            "TN",
            &series,
            markers,
        );

        assert_eq!(chart.title, "Hourly Temperature Data for Chattanooga, TN");
        assert_eq!(chart.y_label, "Temperature (°F)");
        assert_eq!(chart.points.len(), 48);
        assert_eq!(chart.markers.len(), 8);
        assert_eq!(chart.reference_lines[0].label, "Freezing Point (32°F)");
        assert_eq!(
            chart.footer,
            "Data period: 2024-01-01 00:00 to 2024-01-02 23:00"
        );
        assert_eq!(chart.file_stem, "temperature-plot-2024-01-01-2024-01-02");
    }

    #[test]
    fn test_trend_chart() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let daily = DailySeries::from_values(start, vec![Some(0.1); 20]).unwrap();
        let trend = smooth_trend(&daily).unwrap();
        let chart = trend_chart(
            WeatherVariable::Precipitation,
            UnitSystem::Imperial,
            "Denver",
            "CO",
            &trend,
        );

        assert_eq!(chart.title, "Precipitation Trend for Denver CO");
        assert_eq!(chart.series_label, "Precipitation Trend");
        assert_eq!(chart.line_width, 3);
        assert!(chart.reference_lines.is_empty());
        assert_eq!(chart.footer, "Data period: 2024-03-01 to 2024-03-20");
        assert_eq!(chart.file_stem, "precipitation-trend-2024-03-01-2024-03-20");
        assert_eq!(
            chart.points[0].0,
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }
}
