//! Shared utilities for the cleaner and the visualizer.
//!
//! This module contains the table presence checks, numeric helpers and
//! text-token helpers used across modules so that every component applies
//! the same rules.

use crate::error::{CleanerError, Result};
use polars::prelude::*;

// =============================================================================
// Table Validation
// =============================================================================

/// Whether a table is present and has at least one row and one column.
///
/// Checked explicitly; a table is never "truthy" or "falsy" by itself.
#[inline]
pub fn is_usable_table(df: Option<&DataFrame>) -> bool {
    matches!(df, Some(df) if df.width() > 0 && df.height() > 0)
}

/// Return the table if it is usable, or an `InvalidInput` error naming the
/// operation that rejected it.
pub fn require_table<'a>(df: Option<&'a DataFrame>, operation: &str) -> Result<&'a DataFrame> {
    match df {
        None => Err(CleanerError::invalid_input(format!(
            "{operation}: no table provided"
        ))),
        Some(df) if df.width() == 0 => Err(CleanerError::invalid_input(format!(
            "{operation}: table has no columns"
        ))),
        Some(df) if df.height() == 0 => Err(CleanerError::invalid_input(format!(
            "{operation}: table has no rows"
        ))),
        Some(df) => Ok(df),
    }
}

/// Check that every requested column exists, in request order.
pub fn require_columns(df: &DataFrame, columns: &[&str]) -> Result<()> {
    for name in columns {
        if df.column(name).is_err() {
            return Err(CleanerError::ColumnNotFound((*name).to_string()));
        }
    }
    Ok(())
}

/// Names of all columns, in table order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    is_integer_dtype(dtype) || matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Check if a DataType is an integer type.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Render a cell for display; text is shown without quotes.
pub fn display_value(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

// =============================================================================
// Numeric Utilities
// =============================================================================

/// The series with float NaN turned into null. The dtype is kept.
pub fn nan_as_null(series: &Series) -> PolarsResult<Series> {
    let cleaned = match series.dtype() {
        DataType::Float32 => {
            let ca = series.f32()?;
            ca.set(&ca.is_nan(), None)?.into_series()
        }
        DataType::Float64 => {
            let ca = series.f64()?;
            ca.set(&ca.is_nan(), None)?.into_series()
        }
        _ => series.clone(),
    };
    Ok(cleaned)
}

/// Nulls plus float NaN.
pub fn missing_count(series: &Series) -> PolarsResult<usize> {
    Ok(nan_as_null(series)?.null_count())
}

/// Non-missing values of a numeric series as `f64`, in row order.
///
/// NaN is treated as missing.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<f64>> {
    let casted = series.cast(&DataType::Float64)?;
    let values = casted
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect();
    Ok(values)
}

/// Sort values ascending. NaN never reaches here (see [`numeric_values`]).
pub fn sort_values(values: &mut [f64]) {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
}

/// Quantile of sorted values with linear interpolation between closest ranks.
pub fn quantile_sorted(values: &[f64], quantile: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let pos = quantile.clamp(0.0, 1.0) * (values.len() as f64 - 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return values[lower];
    }
    let weight = pos - lower as f64;
    values[lower] + (values[upper] - values[lower]) * weight
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() as f64 - 1.0);
    Some(variance.sqrt())
}

/// First and third quartiles of sorted values.
pub fn quartiles(sorted: &[f64]) -> (f64, f64) {
    (quantile_sorted(sorted, 0.25), quantile_sorted(sorted, 0.75))
}

// =============================================================================
// Boolean Token Utilities
// =============================================================================

/// Common boolean true representations.
pub const BOOLEAN_TRUE_VALUES: [&str; 6] = ["true", "yes", "t", "y", "on", "enabled"];

/// Common boolean false representations.
pub const BOOLEAN_FALSE_VALUES: [&str; 6] = ["false", "no", "f", "n", "off", "disabled"];

/// Parse a boolean token, case-insensitively.
pub fn parse_boolean_token(s: &str) -> Option<bool> {
    let lower = s.trim().to_ascii_lowercase();
    if BOOLEAN_TRUE_VALUES.contains(&lower.as_str()) {
        Some(true)
    } else if BOOLEAN_FALSE_VALUES.contains(&lower.as_str()) {
        Some(false)
    } else {
        None
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_usable_table() {
        let df = df!["a" => [1, 2]].unwrap();
        assert!(is_usable_table(Some(&df)));
        assert!(!is_usable_table(None));
        assert!(!is_usable_table(Some(&DataFrame::empty())));

        let no_rows = df.head(Some(0));
        assert!(!is_usable_table(Some(&no_rows)));
    }

    #[test]
    fn test_require_table_messages() {
        let err = require_table(None, "get_summary").unwrap_err();
        assert!(matches!(err, CleanerError::InvalidInput(_)));
        assert!(err.to_string().contains("get_summary"));

        let empty = DataFrame::empty();
        let err = require_table(Some(&empty), "remove_duplicates").unwrap_err();
        assert!(err.to_string().contains("no columns"));
    }

    #[test]
    fn test_require_columns() {
        let df = df!["a" => [1], "b" => ["x"]].unwrap();
        assert!(require_columns(&df, &["a", "b"]).is_ok());
        assert!(matches!(
            require_columns(&df, &["a", "zzz"]).unwrap_err(),
            CleanerError::ColumnNotFound(name) if name == "zzz"
        ));
    }

    #[test]
    fn test_numeric_dtypes() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float32));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
        assert!(is_integer_dtype(&DataType::UInt16));
        assert!(!is_integer_dtype(&DataType::Float64));
    }

    #[test]
    fn test_numeric_values_skips_nulls_and_nan() {
        let series = Series::new("v".into(), &[Some(1.0), None, Some(f64::NAN), Some(4.0)]);
        assert_eq!(numeric_values(&series).unwrap(), vec![1.0, 4.0]);
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let series = Series::new("v".into(), &[Some(1.0f32), None, Some(f32::NAN), Some(4.0)]);
        let cleaned = nan_as_null(&series).unwrap();

        assert_eq!(cleaned.dtype(), &DataType::Float32);
        assert_eq!(cleaned.null_count(), 2);
        assert_eq!(missing_count(&series).unwrap(), 2);

        let ints = Series::new("i".into(), &[Some(1i64), None]);
        assert_eq!(missing_count(&ints).unwrap(), 1);
    }

    #[test]
    fn test_quantile_sorted_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0, 100.0];
        assert_eq!(quantile_sorted(&values, 0.25), 2.0);
        assert_eq!(quantile_sorted(&values, 0.5), 3.0);
        assert_eq!(quantile_sorted(&values, 0.75), 4.0);

        let even = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&even, 0.5), 2.5);
        assert_eq!(quantile_sorted(&even, 0.25), 1.75);
    }

    #[test]
    fn test_sample_std() {
        // Mean 3, squared deviations sum to 10, / 4 = 2.5
        let std = sample_std(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!((std - 2.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(sample_std(&[5.0]), None);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&AnyValue::String("pear")), "pear");
        assert_eq!(display_value(&AnyValue::Int64(3)), "3");
        assert_eq!(display_value(&AnyValue::Boolean(true)), "true");
    }

    #[test]
    fn test_parse_boolean_token() {
        assert_eq!(parse_boolean_token("TRUE"), Some(true));
        assert_eq!(parse_boolean_token(" no "), Some(false));
        assert_eq!(parse_boolean_token("Y"), Some(true));
        assert_eq!(parse_boolean_token("maybe"), None);
        assert_eq!(parse_boolean_token("1"), None);
    }
}
