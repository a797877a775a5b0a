//! Chart data for quality inspection.
//!
//! Every entry point returns `Option<Chart>`: `None` means there is nothing
//! to plot or that no render succeeded. Errors are logged and never returned.
//!
//! Rendering is attempted twice. The enhanced render applies the theme,
//! titles and (for distributions) a kernel density curve. If any part of it
//! fails, a plain render without styling or density is attempted instead.

pub mod charts;
pub mod stats;
pub mod text;

pub use charts::{
    BoxChart, BoxSummary, CategoryCount, Chart, ChartStyle, CountChart, Decoration, DensityPoint,
    DistributionChart, HistogramBin, MissingHeatmap, RenderError, RenderMode, Rgb,
};

use crate::config::VisualizerConfig;
use crate::types::MissingValueCount;
use crate::utils::{is_numeric_dtype, is_usable_table, nan_as_null, numeric_values, sort_values};
use polars::prelude::*;
use tracing::{debug, warn};

/// Builds chart data from a table.
#[derive(Debug, Clone, Default)]
pub struct Visualizer {
    config: VisualizerConfig,
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: VisualizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    /// Missing/present map of every cell plus per-column missing counts.
    ///
    /// `None` for an absent or empty table, or one without missing values.
    pub fn missing_value_heatmap<'a>(&self, df: impl Into<Option<&'a DataFrame>>) -> Option<Chart> {
        let df = usable(df.into())?;
        // NaN is shown as missing
        let normalized = df
            .get_columns()
            .iter()
            .map(|col| nan_as_null(col.as_materialized_series()))
            .collect::<PolarsResult<Vec<Series>>>();
        let normalized = match normalized {
            Ok(columns) => columns,
            Err(e) => {
                warn!("missing_value_heatmap: failed to read columns: {}", e);
                return None;
            }
        };

        let mut missing_counts: Vec<MissingValueCount> = normalized
            .iter()
            .filter(|col| col.null_count() > 0)
            .map(|col| MissingValueCount {
                column: col.name().to_string(),
                count: col.null_count(),
            })
            .collect();
        if missing_counts.is_empty() {
            debug!("No missing values; heatmap skipped");
            return None;
        }
        missing_counts.sort_by_key(|entry| entry.count);

        let masks: Vec<Vec<bool>> = normalized
            .iter()
            .map(|col| {
                col.is_null()
                    .into_iter()
                    .map(|value| value.unwrap_or(false))
                    .collect()
            })
            .collect();
        let cells: Vec<Vec<bool>> = (0..df.height())
            .map(|row| masks.iter().map(|mask| mask[row]).collect())
            .collect();
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let build = |decoration: Decoration| {
            Chart::Heatmap(MissingHeatmap {
                columns: columns.clone(),
                cells: cells.clone(),
                missing_counts: missing_counts.clone(),
                decoration,
            })
        };

        render_with_fallback(
            "missing_value_heatmap",
            || {
                let style = ChartStyle::from_theme(&self.config.theme)?;
                Ok(build(Decoration::enhanced(
                    style,
                    "Missing Values per Column",
                    Some("Columns".to_string()),
                    Some("Rows".to_string()),
                )))
            },
            || Ok(build(Decoration::plain())),
        )
    }

    /// Histogram with a kernel density curve for a numeric column.
    pub fn distribution_plot<'a>(
        &self,
        df: impl Into<Option<&'a DataFrame>>,
        column: &str,
    ) -> Option<Chart> {
        let series = numeric_column(usable(df.into())?, column)?;

        let sorted = || -> Result<Vec<f64>, RenderError> {
            let mut values = numeric_values(&series)?;
            sort_values(&mut values);
            Ok(values)
        };
        let bins = self.config.histogram_bins;

        render_with_fallback(
            "distribution_plot",
            || {
                let style = ChartStyle::from_theme(&self.config.theme)?;
                let values = sorted()?;
                let density = stats::gaussian_kde(&values, self.config.kde_points)?;
                Ok(Chart::Distribution(DistributionChart {
                    column: column.to_string(),
                    count: values.len(),
                    bins: stats::build_histogram(&values, bins),
                    density: Some(density),
                    decoration: Decoration::enhanced(
                        style,
                        format!("Distribution of {}", column),
                        Some(column.to_string()),
                        Some("Count".to_string()),
                    ),
                }))
            },
            || {
                let values = sorted()?;
                Ok(Chart::Distribution(DistributionChart {
                    column: column.to_string(),
                    count: values.len(),
                    bins: stats::build_histogram(&values, bins),
                    density: None,
                    decoration: Decoration::plain(),
                }))
            },
        )
    }

    /// Five-number summary, whiskers and outliers for a numeric column.
    pub fn box_plot<'a>(&self, df: impl Into<Option<&'a DataFrame>>, column: &str) -> Option<Chart> {
        let series = numeric_column(usable(df.into())?, column)?;

        let build = |decoration: Decoration| -> Result<Chart, RenderError> {
            let mut values = numeric_values(&series)?;
            sort_values(&mut values);
            let (summary, outliers) = stats::box_summary(&values)
                .ok_or_else(|| RenderError::DegenerateData("no values".to_string()))?;
            Ok(Chart::Box(BoxChart {
                column: column.to_string(),
                summary,
                outliers,
                decoration,
            }))
        };

        render_with_fallback(
            "box_plot",
            || {
                let style = ChartStyle::from_theme(&self.config.theme)?;
                build(Decoration::enhanced(
                    style,
                    format!("Box Plot of {}", column),
                    Some(column.to_string()),
                    None,
                ))
            },
            || build(Decoration::plain()),
        )
    }

    /// Value frequencies of any column, with an `Other` bucket beyond
    /// `top_n` distinct values.
    pub fn count_plot<'a>(&self, df: impl Into<Option<&'a DataFrame>>, column: &str) -> Option<Chart> {
        let series = existing_column(usable(df.into())?, column)?;
        if series.null_count() == series.len() {
            debug!("Column {} has no non-missing values; count plot skipped", column);
            return None;
        }
        let top_n = self.config.top_n;

        let build = |decorate: &dyn Fn(usize) -> Decoration| -> Result<Chart, RenderError> {
            let (entries, distinct) = stats::value_counts(&series, top_n)?;
            Ok(Chart::Count(CountChart {
                column: column.to_string(),
                distinct,
                entries,
                decoration: decorate(distinct),
            }))
        };

        render_with_fallback(
            "count_plot",
            || {
                let style = ChartStyle::from_theme(&self.config.theme)?;
                build(&|distinct| {
                    Decoration::enhanced(
                        style,
                        format!("Top {} Categories in {}", top_n.min(distinct), column),
                        Some("Count".to_string()),
                        Some(column.to_string()),
                    )
                })
            },
            || build(&|_| Decoration::plain()),
        )
    }
}

fn usable(df: Option<&DataFrame>) -> Option<&DataFrame> {
    if is_usable_table(df) {
        df
    } else {
        debug!("Visualizer received an absent or empty table");
        None
    }
}

fn existing_column(df: &DataFrame, column: &str) -> Option<Series> {
    match df.column(column) {
        Ok(col) => Some(col.as_materialized_series().clone()),
        Err(_) => {
            debug!("Column {} not found; chart skipped", column);
            None
        }
    }
}

/// The column, if it exists, is numeric and has a non-missing value.
fn numeric_column(df: &DataFrame, column: &str) -> Option<Series> {
    let series = existing_column(df, column)?;
    if !is_numeric_dtype(series.dtype()) {
        debug!("Column {} is not numeric; chart skipped", column);
        return None;
    }
    match numeric_values(&series) {
        Ok(values) if values.is_empty() => {
            debug!("Column {} has no non-missing values; chart skipped", column);
            None
        }
        Ok(_) => Some(series),
        Err(e) => {
            debug!("Column {} could not be read as numbers: {}", column, e);
            None
        }
    }
}

/// Try `enhanced`, then `plain`; log failures and give up with `None`.
fn render_with_fallback(
    chart: &str,
    enhanced: impl FnOnce() -> Result<Chart, RenderError>,
    plain: impl FnOnce() -> Result<Chart, RenderError>,
) -> Option<Chart> {
    match enhanced() {
        Ok(rendered) => return Some(rendered),
        Err(e) => warn!("{}: enhanced render failed, using plain render: {}", chart, e),
    }
    match plain() {
        Ok(rendered) => Some(rendered),
        Err(e) => {
            warn!("{}: plain render failed: {}", chart, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;

    fn frame() -> DataFrame {
        df![
            "v" => [Some(1.0), Some(2.0), None, Some(3.0), Some(4.0), Some(100.0)],
            "c" => [Some("a"), Some("b"), Some("a"), None, Some("a"), Some("c")],
            "e" => [None::<f64>, None, None, None, None, None],
        ]
        .unwrap()
    }

    fn broken_theme() -> Visualizer {
        let theme = Theme {
            primary_color: "nope".to_string(),
            ..Theme::default()
        };
        Visualizer::with_config(VisualizerConfig::builder().theme(theme).build().unwrap())
    }

    #[test]
    fn test_absent_and_empty_tables() {
        let viz = Visualizer::new();
        assert!(viz.missing_value_heatmap(None::<&DataFrame>).is_none());
        assert!(viz.distribution_plot(&DataFrame::empty(), "v").is_none());
        assert!(viz.box_plot(None::<&DataFrame>, "v").is_none());
        assert!(viz.count_plot(&frame().head(Some(0)), "c").is_none());
    }

    #[test]
    fn test_heatmap() {
        let chart = Visualizer::new().missing_value_heatmap(&frame()).unwrap();
        let Chart::Heatmap(heatmap) = chart else {
            panic!("expected heatmap");
        };

        assert_eq!(heatmap.columns, vec!["v", "c", "e"]);
        assert_eq!(heatmap.cells.len(), 6);
        assert_eq!(heatmap.cells[2], vec![true, false, true]);
        let counts: Vec<(&str, usize)> = heatmap
            .missing_counts
            .iter()
            .map(|entry| (entry.column.as_str(), entry.count))
            .collect();
        assert_eq!(counts, vec![("v", 1), ("c", 1), ("e", 6)]);
        assert_eq!(heatmap.decoration.mode, RenderMode::Enhanced);
    }

    #[test]
    fn test_heatmap_marks_nan_as_missing() {
        let df = df!["v" => [1.0, f64::NAN, 3.0]].unwrap();
        let Some(Chart::Heatmap(heatmap)) = Visualizer::new().missing_value_heatmap(&df) else {
            panic!("expected heatmap");
        };

        assert_eq!(heatmap.missing_counts[0].count, 1);
        assert_eq!(heatmap.cells, vec![vec![false], vec![true], vec![false]]);
    }

    #[test]
    fn test_heatmap_none_without_missing() {
        let df = df!["a" => [1, 2]].unwrap();
        assert!(Visualizer::new().missing_value_heatmap(&df).is_none());
    }

    #[test]
    fn test_distribution_preconditions() {
        let viz = Visualizer::new();
        assert!(viz.distribution_plot(&frame(), "missing").is_none());
        assert!(viz.distribution_plot(&frame(), "c").is_none());
        assert!(viz.distribution_plot(&frame(), "e").is_none());
    }

    #[test]
    fn test_nan_only_column_has_no_numeric_charts() {
        let df = df!["n" => [f64::NAN, f64::NAN, f64::NAN]].unwrap();
        let viz = Visualizer::new();

        assert!(viz.distribution_plot(&df, "n").is_none());
        assert!(viz.box_plot(&df, "n").is_none());
    }

    #[test]
    fn test_distribution_enhanced() {
        let chart = Visualizer::new().distribution_plot(&frame(), "v").unwrap();
        let Chart::Distribution(dist) = chart else {
            panic!("expected distribution");
        };

        assert_eq!(dist.count, 5);
        assert_eq!(dist.bins.len(), 24);
        assert_eq!(dist.bins.iter().map(|b| b.count).sum::<usize>(), 5);
        assert_eq!(dist.density.as_ref().map(Vec::len), Some(100));
        assert_eq!(dist.decoration.title.as_deref(), Some("Distribution of v"));
    }

    #[test]
    fn test_distribution_falls_back_on_constant_column() {
        let df = df!["k" => [5.0, 5.0, 5.0]].unwrap();
        let chart = Visualizer::new().distribution_plot(&df, "k").unwrap();
        let Chart::Distribution(dist) = chart else {
            panic!("expected distribution");
        };

        assert_eq!(dist.decoration.mode, RenderMode::Plain);
        assert!(dist.density.is_none());
        assert_eq!(dist.bins.len(), 1);
    }

    #[test]
    fn test_invalid_theme_falls_back_to_plain() {
        let viz = broken_theme();
        let chart = viz.box_plot(&frame(), "v").unwrap();
        assert_eq!(chart.mode(), RenderMode::Plain);
        assert!(chart.decoration().style.is_none());

        let chart = viz.count_plot(&frame(), "c").unwrap();
        assert_eq!(chart.mode(), RenderMode::Plain);
    }

    #[test]
    fn test_box_plot() {
        let chart = Visualizer::new().box_plot(&frame(), "v").unwrap();
        let Chart::Box(chart) = chart else {
            panic!("expected box plot");
        };
        assert_eq!(chart.summary.upper_whisker, 4.0);
        assert_eq!(chart.outliers, vec![100.0]);
        assert_eq!(chart.decoration.title.as_deref(), Some("Box Plot of v"));
    }

    #[test]
    fn test_count_plot() {
        let config = VisualizerConfig::builder().top_n(1).build().unwrap();
        let chart = Visualizer::with_config(config)
            .count_plot(&frame(), "c")
            .unwrap();
        let Chart::Count(chart) = chart else {
            panic!("expected count plot");
        };

        assert_eq!(chart.distinct, 3);
        let entries: Vec<(&str, usize)> = chart
            .entries
            .iter()
            .map(|entry| (entry.value.as_str(), entry.count))
            .collect();
        assert_eq!(entries, vec![("a", 3), ("Other", 2)]);
        assert_eq!(
            chart.decoration.title.as_deref(),
            Some("Top 1 Categories in c")
        );
        assert!(Visualizer::new().count_plot(&frame(), "e").is_none());
    }
}
