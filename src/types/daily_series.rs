use chrono::{Days, NaiveDate};

/// Mean of one calendar day. `mean` is `None` when no hourly sample of that day had a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyMean {
    pub date: NaiveDate,
    pub mean: Option<f64>,
}

/// One entry per calendar day, consecutive and without gaps in the date sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DailySeries {
    days: Vec<DailyMean>,
}

impl DailySeries {
    /// Builds a series of consecutive days starting at `start`, one per value.
    ///
    /// Returns `None` if the dates would run past the end of the calendar.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use weather_trends::DailySeries;
    ///
    /// let start = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
    /// let series = DailySeries::from_values(start, vec![Some(1.0), None, Some(3.0)]).unwrap();
    /// assert_eq!(series.len(), 3);
    /// assert_eq!(series.days()[2].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    /// ```
    pub fn from_values(start: NaiveDate, values: Vec<Option<f64>>) -> Option<Self> {
        let days = values
            .into_iter()
            .enumerate()
            .map(|(i, mean)| {
                start
                    .checked_add_days(Days::new(i as u64))
                    .map(|date| DailyMean { date, mean })
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self { days })
    }

    pub(crate) fn from_days(days: Vec<DailyMean>) -> Self {
        Self { days }
    }

    pub fn days(&self) -> &[DailyMean] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn means(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.days.iter().map(|d| d.mean)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Smoothed daily values, aligned one-to-one with the [`DailySeries`] they came from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrendSeries {
    points: Vec<TrendPoint>,
}

impl TrendSeries {
    pub(crate) fn new(points: Vec<TrendPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[TrendPoint] {
        &self.points
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
