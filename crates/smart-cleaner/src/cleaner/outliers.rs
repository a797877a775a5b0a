//! IQR-based outlier capping.
//!
//! Values outside `[Q1 - k*IQR, Q3 + k*IQR]` are clamped to the nearest
//! bound. Integer and Float32 columns are clamped on their own representation,
//! with the fences rounded inward, so the column dtype never changes and no
//! capped value falls outside the fences.

use crate::utils::{is_integer_dtype, is_numeric_dtype, numeric_values, quartiles, sort_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Fences computed from a column's quartiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBounds {
    /// Bounds for sorted, NaN-free values. `None` for an empty slice.
    pub fn from_sorted(sorted: &[f64], multiplier: f64) -> Option<Self> {
        if sorted.is_empty() {
            return None;
        }
        let (q1, q3) = quartiles(sorted);
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            iqr,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// What capping did to one column.
#[derive(Debug)]
pub(crate) enum CapOutcome {
    Capped {
        series: Series,
        bounds: OutlierBounds,
        capped: usize,
    },
    NotNumeric,
    NoValues,
    ZeroSpread(OutlierBounds),
    /// Bounds collapsed after rounding inward to the column's representation.
    EmptyRange(OutlierBounds),
}

pub(crate) fn cap_series(series: &Series, multiplier: f64) -> PolarsResult<CapOutcome> {
    let dtype = series.dtype().clone();
    if !is_numeric_dtype(&dtype) {
        return Ok(CapOutcome::NotNumeric);
    }

    let mut values = numeric_values(series)?;
    sort_values(&mut values);
    let Some(bounds) = OutlierBounds::from_sorted(&values, multiplier) else {
        return Ok(CapOutcome::NoValues);
    };
    if bounds.iqr == 0.0 {
        return Ok(CapOutcome::ZeroSpread(bounds));
    }

    let capped = values.iter().filter(|v| !bounds.contains(**v)).count();

    let series = if is_integer_dtype(&dtype) {
        let (lower, upper) = integer_bounds(&bounds);
        if lower > upper {
            return Ok(CapOutcome::EmptyRange(bounds));
        }
        let as_i64 = series.strict_cast(&DataType::Int64)?;
        let clamped = as_i64
            .i64()?
            .apply(|v| v.map(|val| val.clamp(lower, upper)))
            .into_series();
        clamped.strict_cast(&dtype)?
    } else if dtype == DataType::Float32 {
        let (lower, upper) = float32_bounds(&bounds);
        if lower > upper {
            return Ok(CapOutcome::EmptyRange(bounds));
        }
        series
            .f32()?
            .apply(|v| v.map(|val| val.clamp(lower, upper)))
            .into_series()
    } else {
        let (lower, upper) = (bounds.lower, bounds.upper);
        let as_f64 = series.cast(&DataType::Float64)?;
        let clamped = as_f64
            .f64()?
            .apply(|v| v.map(|val| val.clamp(lower, upper)))
            .into_series();
        clamped
    };

    Ok(CapOutcome::Capped {
        series,
        bounds,
        capped,
    })
}

/// Round the fences inward to integers and keep them inside the `i64` range.
fn integer_bounds(bounds: &OutlierBounds) -> (i64, i64) {
    let min = i64::MIN as f64;
    let max = i64::MAX as f64;
    let lower = bounds.lower.ceil().clamp(min, max) as i64;
    let upper = bounds.upper.floor().clamp(min, max) as i64;
    (lower, upper)
}

/// Round the fences inward to the nearest representable `f32`.
fn float32_bounds(bounds: &OutlierBounds) -> (f32, f32) {
    let mut lower = bounds.lower as f32;
    if f64::from(lower) < bounds.lower {
        lower = lower.next_up();
    }
    let mut upper = bounds.upper as f32;
    if f64::from(upper) > bounds.upper {
        upper = upper.next_down();
    }
    (lower, upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_values(series: &Series) -> Vec<Option<f64>> {
        series.f64().unwrap().into_iter().collect()
    }

    #[test]
    fn test_bounds_from_sorted() {
        let bounds = OutlierBounds::from_sorted(&[1.0, 2.0, 3.0, 4.0, 100.0], 1.5).unwrap();
        assert_eq!(bounds.q1, 2.0);
        assert_eq!(bounds.q3, 4.0);
        assert_eq!(bounds.iqr, 2.0);
        assert_eq!(bounds.lower, -1.0);
        assert_eq!(bounds.upper, 7.0);
        assert!(OutlierBounds::from_sorted(&[], 1.5).is_none());
    }

    #[test]
    fn test_caps_float_column() {
        let series = Series::new("v".into(), &[1.0, 2.0, 3.0, 4.0, 100.0]);
        let CapOutcome::Capped { series, capped, .. } = cap_series(&series, 1.5).unwrap() else {
            panic!("expected capping");
        };

        assert_eq!(capped, 1);
        assert_eq!(
            f64_values(&series),
            vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(7.0)]
        );
    }

    #[test]
    fn test_integer_column_keeps_dtype() {
        let series = Series::new("v".into(), &[Some(1i32), Some(2), None, Some(3), Some(4), Some(100)]);
        let CapOutcome::Capped { series, .. } = cap_series(&series, 1.5).unwrap() else {
            panic!("expected capping");
        };

        assert_eq!(series.dtype(), &DataType::Int32);
        let values: Vec<Option<i32>> = series.i32().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1), Some(2), None, Some(3), Some(4), Some(7)]);
    }

    #[test]
    fn test_integer_bounds_round_inward() {
        let bounds = OutlierBounds {
            q1: 1.25,
            q3: 2.5,
            iqr: 1.25,
            lower: -0.625,
            upper: 4.375,
        };
        assert_eq!(integer_bounds(&bounds), (0, 4));

        let huge = OutlierBounds {
            q1: 0.0,
            q3: 1e300,
            iqr: 1e300,
            lower: -1.5e300,
            upper: 2.5e300,
        };
        assert_eq!(integer_bounds(&huge), (i64::MIN, i64::MAX));
    }

    #[test]
    fn test_float32_capping_stays_within_fences() {
        let series = Series::new("v".into(), &[0.1f32, 0.2, 0.3, 0.7, 0.9, 1.3, 55.5, -40.3]);
        let CapOutcome::Capped { series, bounds, capped } = cap_series(&series, 1.5).unwrap() else {
            panic!("expected capping");
        };

        assert_eq!(capped, 2);
        assert_eq!(series.dtype(), &DataType::Float32);
        for value in series.f32().unwrap().into_iter().flatten() {
            assert!(
                bounds.contains(f64::from(value)),
                "{} outside [{}, {}]",
                value,
                bounds.lower,
                bounds.upper
            );
        }
    }

    #[test]
    fn test_float32_bounds_round_inward() {
        let bounds = OutlierBounds {
            q1: 0.0,
            q3: 0.0,
            iqr: 0.0,
            lower: -1.0624999487772584,
            upper: 0.1,
        };
        let (lower, upper) = float32_bounds(&bounds);

        assert!(f64::from(lower) >= bounds.lower);
        assert!(f64::from(lower.next_down()) < bounds.lower);
        assert!(f64::from(upper) <= bounds.upper);
        assert!(f64::from(upper.next_up()) > bounds.upper);
    }

    #[test]
    fn test_constant_column_is_untouched() {
        let series = Series::new("v".into(), &[5.0, 5.0, 5.0, 5.0]);
        assert!(matches!(
            cap_series(&series, 1.5).unwrap(),
            CapOutcome::ZeroSpread(_)
        ));
    }

    #[test]
    fn test_non_numeric_and_empty() {
        let text = Series::new("t".into(), &["a", "b"]);
        assert!(matches!(cap_series(&text, 1.5).unwrap(), CapOutcome::NotNumeric));

        let empty = Series::new("e".into(), &[None::<f64>, None]);
        assert!(matches!(cap_series(&empty, 1.5).unwrap(), CapOutcome::NoValues));
    }

    #[test]
    fn test_nulls_survive_capping() {
        let series = Series::new("v".into(), &[Some(1.0), None, Some(2.0), Some(3.0), Some(4.0), Some(-50.0)]);
        let CapOutcome::Capped { series, bounds, .. } = cap_series(&series, 1.5).unwrap() else {
            panic!("expected capping");
        };

        assert_eq!(series.null_count(), 1);
        let values = f64_values(&series);
        assert_eq!(values[1], None);
        assert_eq!(values[5], Some(bounds.lower));
    }
}
