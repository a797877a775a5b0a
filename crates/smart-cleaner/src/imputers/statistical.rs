//! Statistical imputation methods.
//!
//! Provides mean, median and mode fills for a single column.

use crate::utils::{display_value, is_numeric_dtype, nan_as_null};
use polars::prelude::*;

/// Outcome of imputing one column.
#[derive(Debug)]
pub enum Imputation {
    /// Missing markers were replaced by `fill_value`.
    Filled { series: Series, fill_value: String },
    /// Mean/median requested on a non-numeric column.
    NotNumeric,
    /// The column has no non-missing value to derive a fill from.
    NoValues,
}

/// Statistical imputation methods for filling missing values.
///
/// Null and NaN are both missing: neither feeds a statistic and both are
/// replaced by the fill.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill a numeric column with the mean of its non-missing values.
    pub fn apply_numeric_mean(series: &Series) -> PolarsResult<Imputation> {
        if !is_numeric_dtype(series.dtype()) {
            return Ok(Imputation::NotNumeric);
        }
        let series = nan_as_null(series)?;
        match series.mean() {
            Some(mean_val) => Self::fill_with_value(&series, mean_val),
            None => Ok(Imputation::NoValues),
        }
    }

    /// Fill a numeric column with the median of its non-missing values.
    pub fn apply_numeric_median(series: &Series) -> PolarsResult<Imputation> {
        if !is_numeric_dtype(series.dtype()) {
            return Ok(Imputation::NotNumeric);
        }
        let series = nan_as_null(series)?;
        match series.median() {
            Some(median_val) => Self::fill_with_value(&series, median_val),
            None => Ok(Imputation::NoValues),
        }
    }

    /// Fill any column with its most frequent non-missing value, keeping the
    /// column dtype. Ties go to the smallest value in sort order.
    pub fn apply_mode_imputation(series: &Series) -> PolarsResult<Imputation> {
        let series = nan_as_null(series)?;
        let Some((sorted, idx)) = mode_position(&series)? else {
            return Ok(Imputation::NoValues);
        };

        let fill_value = display_value(&sorted.get(idx)?);
        let filler = sorted.new_from_index(idx, series.len());
        let filled = series.zip_with(&series.is_not_null(), &filler)?;

        Ok(Imputation::Filled {
            series: filled,
            fill_value,
        })
    }

    /// Fill the nulls of a NaN-free numeric column; the result is Float64.
    fn fill_with_value(series: &Series, fill_value: f64) -> PolarsResult<Imputation> {
        let filled = series
            .cast(&DataType::Float64)?
            .f64()?
            .fill_null_with_values(fill_value)?
            .into_series();

        Ok(Imputation::Filled {
            series: filled,
            fill_value: fill_value.to_string(),
        })
    }
}

/// Sorted non-missing values and the index of the first element of the
/// longest run of equal values. Scanning runs in ascending order and only
/// replacing on a strictly longer run makes the smallest tied value win.
fn mode_position(series: &Series) -> PolarsResult<Option<(Series, usize)>> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok(None);
    }
    let sorted = non_null.sort(SortOptions::default())?;
    let n = sorted.len();

    let mut best: Option<(usize, usize)> = None;
    let mut run_start = 0;
    for i in 1..=n {
        let run_ended = i == n || sorted.get(i)? != sorted.get(run_start)?;
        if run_ended {
            let count = i - run_start;
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((run_start, count));
            }
            run_start = i;
        }
    }

    Ok(best.map(|(idx, _)| (sorted, idx)))
}

/// Most frequent non-missing value as text, ties broken by sort order.
pub fn mode_value(series: &Series) -> PolarsResult<Option<String>> {
    match mode_position(series)? {
        Some((sorted, idx)) => Ok(Some(display_value(&sorted.get(idx)?))),
        None => Ok(None),
    }
}
