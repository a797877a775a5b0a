//! Chart statistics: histogram bins, kernel density, box summary, value counts.

use super::charts::{BoxSummary, CategoryCount, DensityPoint, HistogramBin, RenderError};
use crate::cleaner::OutlierBounds;
use crate::utils::{display_value, quantile_sorted, sample_std};
use polars::prelude::*;

/// Fence multiplier for box-plot whiskers.
pub const WHISKER_IQR_MULTIPLIER: f64 = 1.5;

/// Label of the bucket collecting categories beyond `top_n`.
pub const OTHER_BUCKET: &str = "Other";

/// Equal-width bins over sorted values. A constant column yields one bin.
pub fn build_histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.first().copied().unwrap_or(0.0);
    let max = values.last().copied().unwrap_or(min);
    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: values.len(),
        }];
    }

    let bin_count = bins.max(1);
    let width = (max - min) / bin_count as f64;
    let mut counts = vec![0usize; bin_count];

    for value in values {
        let mut index = ((value - min) / width) as usize;
        if index >= bin_count {
            index = bin_count - 1;
        }
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| HistogramBin {
            start: min + idx as f64 * width,
            end: min + (idx as f64 + 1.0) * width,
            count,
        })
        .collect()
}

/// Silverman's rule of thumb: `0.9 * min(std, IQR / 1.34) * n^(-1/5)`.
///
/// Falls back to the standard deviation when the IQR is zero.
pub fn silverman_bandwidth(sorted: &[f64]) -> Result<f64, RenderError> {
    let std = sample_std(sorted).ok_or_else(|| {
        RenderError::DegenerateData("density needs at least two values".to_string())
    })?;
    let iqr = quantile_sorted(sorted, 0.75) - quantile_sorted(sorted, 0.25);
    let spread = if iqr > 0.0 { std.min(iqr / 1.34) } else { std };
    let bandwidth = 0.9 * spread * (sorted.len() as f64).powf(-0.2);

    if !bandwidth.is_finite() || bandwidth <= 0.0 {
        return Err(RenderError::DegenerateData(format!(
            "bandwidth {} is not positive",
            bandwidth
        )));
    }
    Ok(bandwidth)
}

/// Gaussian kernel density evaluated on `points` evenly spaced positions
/// from `min - 3h` to `max + 3h`.
pub fn gaussian_kde(sorted: &[f64], points: usize) -> Result<Vec<DensityPoint>, RenderError> {
    let bandwidth = silverman_bandwidth(sorted)?;
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Err(RenderError::DegenerateData("no values".to_string()));
    };

    let points = points.max(2);
    let start = min - 3.0 * bandwidth;
    let step = (max - min + 6.0 * bandwidth) / (points - 1) as f64;
    let norm = 1.0 / (sorted.len() as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    let curve = (0..points)
        .map(|i| {
            let x = start + i as f64 * step;
            let density = sorted
                .iter()
                .map(|v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm;
            DensityPoint { x, density }
        })
        .collect();
    Ok(curve)
}

/// Box summary and outliers for sorted, non-empty values.
pub fn box_summary(sorted: &[f64]) -> Option<(BoxSummary, Vec<f64>)> {
    let bounds = OutlierBounds::from_sorted(sorted, WHISKER_IQR_MULTIPLIER)?;
    let inside = || sorted.iter().copied().filter(|v| bounds.contains(*v));

    let summary = BoxSummary {
        min: *sorted.first()?,
        q1: bounds.q1,
        median: quantile_sorted(sorted, 0.5),
        q3: bounds.q3,
        max: *sorted.last()?,
        lower_whisker: inside().next()?,
        upper_whisker: inside().last()?,
    };
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| !bounds.contains(*v))
        .collect();

    Some((summary, outliers))
}

/// Frequencies of non-missing values, most frequent first, ties by value in
/// the column's natural order. Beyond `top_n` distinct values the remainder
/// is summed into a trailing [`OTHER_BUCKET`] entry.
///
/// Returns the entries and the number of distinct values.
pub fn value_counts(series: &Series, top_n: usize) -> PolarsResult<(Vec<CategoryCount>, usize)> {
    let sorted = series.drop_nulls().sort(SortOptions::default())?;
    let n = sorted.len();

    let mut counts: Vec<CategoryCount> = Vec::new();
    let mut run_start = 0;
    for i in 1..=n {
        if i == n || sorted.get(i)? != sorted.get(run_start)? {
            counts.push(CategoryCount::new(
                display_value(&sorted.get(run_start)?),
                i - run_start,
            ));
            run_start = i;
        }
    }
    // Stable: equal counts stay in ascending value order
    counts.sort_by(|a, b| b.count.cmp(&a.count));

    let distinct = counts.len();
    if distinct > top_n {
        let other: usize = counts[top_n..].iter().map(|entry| entry.count).sum();
        counts.truncate(top_n);
        counts.push(CategoryCount::other(other));
    }

    Ok((counts, distinct))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(value: &str, count: usize) -> CategoryCount {
        CategoryCount::new(value, count)
    }

    #[test]
    fn test_histogram_bins() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0];
        let bins = build_histogram(&values, 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 5);
        // Max lands in the last bin
        assert_eq!(bins[3].count, 2);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[3].end, 4.0);
    }

    #[test]
    fn test_histogram_constant_and_empty() {
        let bins = build_histogram(&[2.0, 2.0, 2.0], 10);
        assert_eq!(
            bins,
            vec![HistogramBin {
                start: 2.0,
                end: 2.0,
                count: 3
            }]
        );
        assert!(build_histogram(&[], 10).is_empty());
    }

    #[test]
    fn test_bandwidth_requires_spread() {
        assert!(matches!(
            silverman_bandwidth(&[1.0]),
            Err(RenderError::DegenerateData(_))
        ));
        assert!(matches!(
            silverman_bandwidth(&[3.0, 3.0, 3.0]),
            Err(RenderError::DegenerateData(_))
        ));
        assert!(silverman_bandwidth(&[1.0, 2.0, 3.0, 4.0]).unwrap() > 0.0);
    }

    #[test]
    fn test_kde_integrates_to_one() {
        let values = [1.0, 2.0, 2.5, 3.0, 7.0];
        let curve = gaussian_kde(&values, 400).unwrap();
        assert_eq!(curve.len(), 400);

        let step = curve[1].x - curve[0].x;
        let area: f64 = curve.iter().map(|p| p.density * step).sum();
        assert!((area - 1.0).abs() < 0.02, "area was {area}");
        assert!(curve.iter().all(|p| p.density >= 0.0));
    }

    #[test]
    fn test_box_summary_whiskers_and_outliers() {
        let (summary, outliers) = box_summary(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(summary.q1, 2.0);
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.q3, 4.0);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 100.0);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 4.0);
        assert_eq!(outliers, vec![100.0]);
        assert!(box_summary(&[]).is_none());
    }

    #[test]
    fn test_value_counts_order() {
        let series = Series::new(
            "c".into(),
            &[Some("b"), Some("a"), None, Some("c"), Some("b"), Some("a"), Some("d")],
        );
        let (entries, distinct) = value_counts(&series, 20).unwrap();
        assert_eq!(distinct, 4);
        assert_eq!(
            entries,
            vec![entry("a", 2), entry("b", 2), entry("c", 1), entry("d", 1)]
        );
    }

    #[test]
    fn test_value_counts_other_bucket() {
        let series = Series::new("c".into(), &["x", "x", "x", "y", "y", "z", "w"]);
        let (entries, distinct) = value_counts(&series, 2).unwrap();
        assert_eq!(distinct, 4);
        assert_eq!(
            entries,
            vec![entry("x", 3), entry("y", 2), CategoryCount::other(2)]
        );
    }

    #[test]
    fn test_real_other_category_stays_apart_from_bucket() {
        let series = Series::new("c".into(), &["x", "x", "x", "Other", "Other", "z", "w"]);
        let (entries, _) = value_counts(&series, 2).unwrap();

        assert_eq!(
            entries,
            vec![entry("x", 3), entry(OTHER_BUCKET, 2), CategoryCount::other(2)]
        );
        assert!(!entries[1].is_other);
        assert!(entries[2].is_other);
    }

    #[test]
    fn test_value_counts_numeric_natural_order() {
        let series = Series::new("n".into(), &[10i64, 9, 10, 9, 100]);
        let (entries, _) = value_counts(&series, 5).unwrap();
        assert_eq!(
            entries,
            vec![entry("9", 2), entry("10", 2), entry("100", 1)]
        );
    }
}
