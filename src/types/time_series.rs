//! The hourly series produced from one archive response.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta, Utc};

/// One observation. `value` is `None` when the archive had no data for that hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
}

impl Sample {
    /// Calendar day of this sample in the given offset.
    pub fn local_date(&self, offset: FixedOffset) -> NaiveDate {
        self.timestamp.with_timezone(&offset).date_naive()
    }
}

/// An ordered, evenly spaced series of samples.
///
/// Timestamps are strictly increasing and exactly `interval` apart; a missing
/// observation keeps its timestamp and carries `None`. Instances are created by
/// [`crate::build_time_series`], which enforces these invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    samples: Vec<Sample>,
    interval: TimeDelta,
    offset: FixedOffset,
}

impl TimeSeries {
    pub(crate) fn new(samples: Vec<Sample>, interval: TimeDelta, offset: FixedOffset) -> Self {
        Self {
            samples,
            interval,
            offset,
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn interval(&self) -> TimeDelta {
        self.interval
    }

    /// UTC offset the archive reported for the location. Calendar-day grouping uses it.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.samples.first().map(|s| s.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.samples.last().map(|s| s.timestamp)
    }

    /// Number of samples that carry a value.
    pub fn present_count(&self) -> usize {
        self.samples.iter().filter(|s| s.value.is_some()).count()
    }
}
