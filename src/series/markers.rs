use crate::types::marker::{LabelPlacement, Marker};
use crate::types::time_series::TimeSeries;

/// Format of the time line in a marker label.
pub const MARKER_TIME_FORMAT: &str = "%m-%d %H:%M";

/// Distance in samples between two annotated points.
///
/// Up to two days of hourly data every 6th sample is labelled, up to a week every
/// 12th, beyond that one label per day.
pub fn marker_stride(sample_count: usize) -> usize {
    match sample_count {
        0..=48 => 6,
        49..=168 => 12,
        _ => 24,
    }
}

/// Picks the samples to label on a point plot.
///
/// Indices `0, stride, 2 * stride, ...` are selected; those without a value are
/// skipped. `unit` is appended to the value, e.g. `"°F"` or `" in"`.
///
/// # Examples
///
/// ```
/// use weather_trends::{annotate_markers, build_time_series, HourlyPayload, LabelPlacement};
///
/// let values = (0..48).map(|i| Some(i as f64)).collect();
/// let series = build_time_series(HourlyPayload::new(0, 48 * 3600, 3600, values)).unwrap();
/// let markers = annotate_markers(&series, "°F");
///
/// assert_eq!(markers.len(), 8);
/// assert_eq!(markers[1].index, 6);
/// assert_eq!(markers[1].label, "6.0°F\n01-01 06:00");
/// assert_eq!(markers[1].placement, LabelPlacement::Above);
/// ```
pub fn annotate_markers(series: &TimeSeries, unit: &str) -> Vec<Marker> {
    let stride = marker_stride(series.len());
    series
        .iter()
        .enumerate()
        .step_by(stride)
        .filter_map(|(index, sample)| {
            let value = sample.value?;
            Some(Marker {
                index,
                timestamp: sample.timestamp,
                value,
                label: format!(
                    "{:.1}{}\n{}",
                    value,
                    unit,
                    sample.timestamp.format(MARKER_TIME_FORMAT)
                ),
                placement: LabelPlacement::for_index(index),
            })
        })
        .collect()
}
