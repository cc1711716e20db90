use crate::series::error::SeriesError;
use crate::series::payload::HourlyPayload;
use crate::types::time_series::{Sample, TimeSeries};
use chrono::{DateTime, FixedOffset, TimeDelta};

/// Expands a payload into timestamped samples.
///
/// Timestamps run `start, start + interval, ...` up to but excluding `end`, and are
/// zipped positionally with `values`. The value count has to match the timestamp
/// count exactly.
///
/// # Errors
///
/// * [`SeriesError::InvalidInterval`] if the interval is zero or negative.
/// * [`SeriesError::LengthMismatch`] if `values` does not line up with the time range.
/// * [`SeriesError::Malformed`] if a timestamp or the UTC offset is out of range.
///
/// # Examples
///
/// ```
/// use weather_trends::{build_time_series, HourlyPayload};
///
/// let payload = HourlyPayload::new(0, 3 * 3600, 3600, vec![Some(1.0), None, Some(3.0)]);
/// let series = build_time_series(payload).unwrap();
/// assert_eq!(series.len(), 3);
/// assert_eq!(series.samples()[2].timestamp.timestamp(), 7200);
/// ```
pub fn build_time_series(payload: HourlyPayload) -> Result<TimeSeries, SeriesError> {
    let HourlyPayload {
        start,
        end,
        interval,
        utc_offset_seconds,
        values,
    } = payload;

    if interval <= 0 {
        return Err(SeriesError::InvalidInterval(interval));
    }

    let expected = timestamp_count(start, end, interval).ok_or_else(|| {
        SeriesError::Malformed(format!("time range {start}..{end} overflows"))
    })?;
    if values.len() != expected {
        return Err(SeriesError::LengthMismatch {
            expected,
            found: values.len(),
        });
    }

    let offset = FixedOffset::east_opt(utc_offset_seconds).ok_or_else(|| {
        SeriesError::Malformed(format!("UTC offset of {utc_offset_seconds} seconds"))
    })?;
    let first = DateTime::from_timestamp(start, 0)
        .ok_or_else(|| SeriesError::Malformed(format!("start time {start}")))?;
    let step = TimeDelta::seconds(interval);

    let mut samples = Vec::with_capacity(values.len());
    let mut timestamp = first;
    for value in values {
        samples.push(Sample { timestamp, value });
        timestamp = timestamp
            .checked_add_signed(step)
            .ok_or_else(|| SeriesError::Malformed(format!("timestamp after {timestamp}")))?;
    }

    Ok(TimeSeries::new(samples, step, offset))
}

/// Number of timestamps in the half-open range `[start, end)`, or `None` if the span
/// does not fit in an `i64`.
fn timestamp_count(start: i64, end: i64, interval: i64) -> Option<usize> {
    if end <= start {
        return Some(0);
    }
    let span = end.checked_sub(start)?;
    usize::try_from(span / interval + i64::from(span % interval != 0)).ok()
}
