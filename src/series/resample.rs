use crate::series::error::SeriesError;
use crate::types::daily_series::{DailyMean, DailySeries};
use crate::types::time_series::TimeSeries;
use chrono::Datelike;
use log::debug;
use polars::prelude::*;
use std::collections::HashMap;

/// Aggregates an hourly series into one arithmetic mean per calendar day.
///
/// Days are taken in the series' own UTC offset. Absent samples are left out of the
/// mean; a day without any present sample is kept with a `None` mean so that the
/// output stays one entry per day from the first to the last sample.
pub fn resample_daily(series: &TimeSeries) -> Result<DailySeries, SeriesError> {
    let offset = series.offset();
    let (first_day, last_day) = match (series.samples().first(), series.samples().last()) {
        (Some(first), Some(last)) => (first.local_date(offset), last.local_date(offset)),
        _ => return Ok(DailySeries::default()),
    };

    let day_keys: Vec<i32> = series
        .iter()
        .map(|s| s.local_date(offset).num_days_from_ce())
        .collect();
    let values: Vec<Option<f64>> = series.iter().map(|s| s.value).collect();

    let frame = df!(
        "day" => day_keys,
        "value" => values
    )?;

    let daily = frame
        .lazy()
        .group_by([col("day")])
        .agg([col("value").mean().alias("mean")])
        .collect()?;

    let day_column = daily.column("day")?.i32()?;
    let mean_column = daily.column("mean")?.f64()?;
    let means: HashMap<i32, Option<f64>> = day_column
        .into_iter()
        .zip(mean_column.into_iter())
        .filter_map(|(day, mean)| day.map(|d| (d, mean)))
        .collect();

    let mut days = Vec::with_capacity(means.len());
    let mut date = first_day;
    while date <= last_day {
        let mean = means.get(&date.num_days_from_ce()).copied().flatten();
        days.push(DailyMean { date, mean });
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    debug!(
        "Resampled {} hourly samples into {} days",
        series.len(),
        days.len()
    );
    Ok(DailySeries::from_days(days))
}
