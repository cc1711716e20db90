//! Savitzky–Golay smoothing of daily means into a trend line.
//!
//! Each output point is the value of a least-squares polynomial fitted to a window of
//! consecutive days. Near the ends the first or last full window is reused and the
//! polynomial is evaluated off-centre, so the output has the same length as the input.

use crate::series::error::SeriesError;
use crate::types::daily_series::{DailySeries, TrendPoint, TrendSeries};
use log::debug;

/// Number of consecutive days each trend point is fitted over.
pub const TREND_WINDOW: usize = 14;
/// Degree of the fitted polynomial.
pub const TREND_POLY_ORDER: usize = 3;

/// A Savitzky–Golay filter with a fixed window length and polynomial degree.
///
/// Output `i` is the fitted polynomial evaluated at sample `i` itself. For an even
/// window that sample sits half a step before the window centre (`[i - 7, i + 6]` for
/// 14), where scipy's `savgol_filter` would evaluate at the centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavitzkyGolay {
    window: usize,
    order: usize,
}

impl Default for SavitzkyGolay {
    fn default() -> Self {
        Self {
            window: TREND_WINDOW,
            order: TREND_POLY_ORDER,
        }
    }
}

impl SavitzkyGolay {
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidFilter`] unless `window > order`.
    pub fn new(window: usize, order: usize) -> Result<Self, SeriesError> {
        if window <= order {
            return Err(SeriesError::InvalidFilter { window, order });
        }
        Ok(Self { window, order })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Smooths a dense series. The output has the same length as `values`.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::InsufficientData`] if `values` is shorter than the window.
    pub fn smooth(&self, values: &[f64]) -> Result<Vec<f64>, SeriesError> {
        let n = values.len();
        if n < self.window {
            return Err(SeriesError::InsufficientData {
                required: self.window,
                actual: n,
            });
        }

        let weights = self.weights()?;
        let half = self.window / 2;
        let smoothed: Vec<f64> = (0..n)
            .map(|i| {
                let start = i.saturating_sub(half).min(n - self.window);
                let window = &values[start..start + self.window];
                weights[i - start]
                    .iter()
                    .zip(window)
                    .map(|(w, v)| w * v)
                    .sum::<f64>()
            })
            .collect();
        Ok(smoothed)
    }

    /// Convolution weights for every evaluation position inside the window.
    ///
    /// `weights()[p][k]` is the contribution of window sample `k` to the fitted value at
    /// window position `p`.
    fn weights(&self) -> Result<Vec<Vec<f64>>, SeriesError> {
        let terms = self.order + 1;
        let center = (self.window - 1) as f64 / 2.0;
        let xs: Vec<f64> = (0..self.window).map(|k| k as f64 - center).collect();

        let mut gram = vec![vec![0.0; terms]; terms];
        for (r, row) in gram.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = xs.iter().map(|x| x.powi((r + c) as i32)).sum();
            }
        }

        xs.iter()
            .map(|&x_eval| {
                let basis: Vec<f64> = (0..terms).map(|j| x_eval.powi(j as i32)).collect();
                let coefficients = solve(&gram, &basis).ok_or(SeriesError::InvalidFilter {
                    window: self.window,
                    order: self.order,
                })?;
                Ok(xs
                    .iter()
                    .map(|&x| {
                        coefficients
                            .iter()
                            .enumerate()
                            .map(|(j, c)| c * x.powi(j as i32))
                            .sum::<f64>()
                    })
                    .collect())
            })
            .collect()
    }
}

/// Smooths daily means with the default 14-day cubic filter.
///
/// Absent means are filled first: linearly between the nearest present neighbours,
/// and with the nearest present value before the first or after the last one.
///
/// # Errors
///
/// Returns [`SeriesError::InsufficientData`] if the series has fewer days than the
/// window, or no present mean at all.
pub fn smooth_trend(daily: &DailySeries) -> Result<TrendSeries, SeriesError> {
    smooth_trend_with(daily, &SavitzkyGolay::default())
}

/// Same as [`smooth_trend`] with an explicit filter.
pub fn smooth_trend_with(
    daily: &DailySeries,
    filter: &SavitzkyGolay,
) -> Result<TrendSeries, SeriesError> {
    if daily.len() < filter.window() {
        return Err(SeriesError::InsufficientData {
            required: filter.window(),
            actual: daily.len(),
        });
    }

    let means: Vec<Option<f64>> = daily.means().collect();
    let dense = interpolate_gaps(&means).ok_or(SeriesError::InsufficientData {
        required: filter.window(),
        actual: 0,
    })?;
    let filled = means.iter().filter(|m| m.is_none()).count();
    if filled > 0 {
        debug!("Interpolated {} of {} daily means before smoothing", filled, means.len());
    }

    let smoothed = filter.smooth(&dense)?;
    let points = daily
        .days()
        .iter()
        .zip(smoothed)
        .map(|(day, value)| TrendPoint {
            date: day.date,
            value,
        })
        .collect();
    Ok(TrendSeries::new(points))
}

/// Fills `None` entries by linear interpolation; edges repeat the nearest value.
/// Returns `None` if no entry is present.
fn interpolate_gaps(values: &[Option<f64>]) -> Option<Vec<f64>> {
    let known: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();
    let &(first_index, first_value) = known.first()?;
    let &(last_index, last_value) = known.last()?;

    let mut filled = vec![0.0; values.len()];
    for slot in filled.iter_mut().take(first_index + 1) {
        *slot = first_value;
    }
    for pair in known.windows(2) {
        let (a, va) = pair[0];
        let (b, vb) = pair[1];
        let span = (b - a) as f64;
        for (i, slot) in filled.iter_mut().enumerate().take(b + 1).skip(a) {
            *slot = va + (vb - va) * (i - a) as f64 / span;
        }
    }
    for slot in filled.iter_mut().skip(last_index) {
        *slot = last_value;
    }
    Some(filled)
}

/// Solves `matrix * x = rhs` by Gaussian elimination with partial pivoting.
fn solve(matrix: &[Vec<f64>], rhs: &[f64]) -> Option<Vec<f64>> {
    let n = rhs.len();
    let mut a: Vec<Vec<f64>> = matrix
        .iter()
        .zip(rhs)
        .map(|(row, &b)| {
            let mut augmented = row.clone();
            augmented.push(b);
            augmented
        })
        .collect();

    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < f64::EPSILON {
            return None;
        }
        a.swap(col, pivot);
        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..=n {
                let delta = factor * a[col][k];
                a[row][k] -= delta;
            }
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (a[row][n] - tail) / a[row][row];
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn daily(values: Vec<Option<f64>>) -> DailySeries {
        DailySeries::from_values(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), values).unwrap()
    }

    #[test]
    fn test_constant_series_is_unchanged() {
        let trend = smooth_trend(&daily(vec![Some(41.5); 30])).unwrap();
        assert_eq!(trend.len(), 30);
        assert!(trend.values().all(|v| (v - 41.5).abs() < 1e-9));
    }

    #[test]
    fn test_output_aligned_with_input_dates() {
        let input = daily((0..20).map(|i| Some(i as f64)).collect());
        let trend = smooth_trend(&input).unwrap();
        for (day, point) in input.days().iter().zip(trend.points()) {
            assert_eq!(day.date, point.date);
        }
    }

    #[test]
    fn test_cubic_is_reproduced_exactly() {
        let cubic = |x: f64| 0.01 * x.powi(3) - 0.5 * x.powi(2) + 2.0 * x - 7.0;
        let values: Vec<f64> = (0..25).map(|i| cubic(i as f64)).collect();
        let smoothed = SavitzkyGolay::default().smooth(&values).unwrap();
        for (expected, actual) in values.iter().zip(&smoothed) {
            assert!((expected - actual).abs() < 1e-6, "{expected} != {actual}");
        }
    }

    #[test]
    fn test_window_sized_input_is_accepted() {
        let trend = smooth_trend(&daily(vec![Some(1.0); TREND_WINDOW])).unwrap();
        assert_eq!(trend.len(), TREND_WINDOW);
    }

    #[test]
    fn test_short_series_is_rejected() {
        let err = smooth_trend(&daily(vec![Some(1.0); 13])).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::InsufficientData {
                required: 14,
                actual: 13
            }
        ));
    }

    #[test]
    fn test_all_absent_is_rejected() {
        let err = smooth_trend(&daily(vec![None; 20])).unwrap_err();
        assert!(matches!(err, SeriesError::InsufficientData { actual: 0, .. }));
    }

    #[test]
    fn test_noise_is_reduced() {
        let values: Vec<f64> = (0..60)
            .map(|i| 50.0 + if i % 2 == 0 { 3.0 } else { -3.0 })
            .collect();
        let smoothed = SavitzkyGolay::default().smooth(&values).unwrap();
        // Interior points see a balanced window of seven highs and seven lows.
        for v in &smoothed[7..53] {
            assert!((v - 50.0).abs() < 0.5);
        }
    }

    #[test]
    fn test_even_window_evaluates_at_sample() {
        // A ramp is fitted exactly, so any half-step shift would show up as 0.5.
        let values: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let smoothed = SavitzkyGolay::default().smooth(&values).unwrap();
        for (i, v) in smoothed.iter().enumerate() {
            assert!((v - i as f64).abs() < 1e-9, "sample {i} smoothed to {v}");
        }
    }

    #[test]
    fn test_interpolate_gaps() {
        let filled = interpolate_gaps(&[None, Some(2.0), None, None, Some(8.0), None]).unwrap();
        assert_eq!(filled, vec![2.0, 2.0, 4.0, 6.0, 8.0, 8.0]);
        assert!(interpolate_gaps(&[None, None]).is_none());
        assert_eq!(interpolate_gaps(&[Some(1.5)]).unwrap(), vec![1.5]);
    }

    #[test]
    fn test_gaps_are_filled_before_smoothing() {
        let mut values: Vec<Option<f64>> = (0..20).map(|i| Some(i as f64 * 2.0)).collect();
        values[5] = None;
        values[6] = None;
        let trend = smooth_trend(&daily(values)).unwrap();
        // A line with interpolated holes is still a line.
        for (i, v) in trend.values().enumerate() {
            assert!((v - i as f64 * 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_invalid_filter() {
        assert!(SavitzkyGolay::new(3, 3).is_err());
        let filter = SavitzkyGolay::new(5, 2).unwrap();
        assert_eq!(filter.window(), 5);
        assert_eq!(filter.smooth(&[1.0; 5]).unwrap().len(), 5);
    }

    #[test]
    fn test_solve() {
        let matrix = vec![vec![2.0, 1.0], vec![1.0, 3.0]];
        let x = solve(&matrix, &[3.0, 5.0]).unwrap();
        assert!((x[0] - 0.8).abs() < 1e-12);
        assert!((x[1] - 1.4).abs() < 1e-12);
        assert!(solve(&[vec![1.0, 2.0], vec![2.0, 4.0]], &[1.0, 2.0]).is_none());
    }
}
