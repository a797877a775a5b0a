//! Data cleaning module.
//!
//! This module provides functionality for:
//! - Computing a quality report (structure, statistics, missing values, duplicates)
//! - Removing duplicate rows
//! - Dropping or imputing missing values
//! - Capping outliers with the IQR rule
//! - Best-fit type conversion
//!
//! Every operation validates the table first and returns a new table; the
//! caller's table is never modified.

mod converters;
mod duplicates;
mod outliers;
mod summary;

pub use outliers::OutlierBounds;

use crate::config::CleanerConfig;
use crate::error::{Result, ResultExt};
use crate::imputers::{Imputation, StatisticalImputer};
use crate::types::{MissingStrategy, SummaryReport};
use crate::utils::{
    column_names, is_numeric_dtype, missing_count, nan_as_null, require_columns, require_table,
};
use converters::Conversion;
use outliers::CapOutcome;
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Stateless cleaning engine over a single table.
#[derive(Debug, Clone, Default)]
pub struct DataCleaner {
    config: CleanerConfig,
}

impl DataCleaner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cleaner with a custom configuration.
    pub fn with_config(config: CleanerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Compute the quality report for a table.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the table is absent or empty.
    pub fn get_summary<'a>(&self, df: impl Into<Option<&'a DataFrame>>) -> Result<SummaryReport> {
        let df = require_table(df.into(), "get_summary")?;
        let report = summary::build_summary(df).context("Failed to compute summary")?;
        debug!(
            "Summary computed: {} rows, {} columns, {} missing, {} duplicates",
            report.shape.0,
            report.shape.1,
            report.total_missing(),
            report.duplicate_count
        );
        Ok(report)
    }

    /// Remove rows equal to an earlier row, keeping first occurrences in
    /// their original order.
    pub fn remove_duplicates<'a>(&self, df: impl Into<Option<&'a DataFrame>>) -> Result<DataFrame> {
        let df = require_table(df.into(), "remove_duplicates")?;
        let deduped = duplicates::drop_duplicate_rows(df).context("Failed to remove duplicates")?;

        info!("Removed {} duplicate rows", df.height() - deduped.height());
        Ok(deduped)
    }

    /// Drop or fill missing values in `columns` (all columns when `None`).
    ///
    /// Columns without missing values are left alone. A column that cannot be
    /// filled (non-numeric column for mean/median, no non-missing value) is
    /// skipped with a warning.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an absent or empty table, `ColumnNotFound` if any
    /// requested column does not exist. Nothing is changed on error.
    pub fn handle_missing_values<'a>(
        &self,
        df: impl Into<Option<&'a DataFrame>>,
        strategy: MissingStrategy,
        columns: Option<&[&str]>,
    ) -> Result<DataFrame> {
        let df = require_table(df.into(), "handle_missing_values")?;
        let explicit = columns.is_some();
        let targets = resolve_targets(df, columns)?;

        let impute: fn(&Series) -> PolarsResult<Imputation> = match strategy {
            MissingStrategy::Drop => return drop_missing_rows(df, &targets),
            MissingStrategy::Mean => StatisticalImputer::apply_numeric_mean,
            MissingStrategy::Median => StatisticalImputer::apply_numeric_median,
            MissingStrategy::Mode => StatisticalImputer::apply_mode_imputation,
        };

        let mut out = df.clone();
        for name in &targets {
            let series = df.column(name)?.as_materialized_series();
            let missing = missing_count(series)
                .context(format!("Failed to count missing values in '{}'", name))?;
            if missing == 0 {
                debug!("No missing values in column {}. Skipping.", name);
                continue;
            }

            match impute(series) {
                Ok(Imputation::Filled { series, fill_value }) => {
                    info!(
                        "Filling {} missing values in {} with {}={}",
                        missing, name, strategy, fill_value
                    );
                    out.replace(name, series)
                        .context(format!("Failed to replace column '{}'", name))?;
                }
                Ok(Imputation::NotNumeric) if explicit => {
                    warn!(
                        "Column {} is not numeric, cannot apply {}. Skipping.",
                        name, strategy
                    );
                }
                Ok(Imputation::NotNumeric) => {
                    debug!("Column {} is not numeric, {} not applied", name, strategy);
                }
                Ok(Imputation::NoValues) => {
                    warn!("Column {} has no non-missing values. Skipping.", name);
                }
                Err(e) => {
                    warn!("Failed to handle missing values for column {}: {}", name, e);
                }
            }
        }

        Ok(out)
    }

    /// Cap values outside the IQR fences of each numeric column in `columns`
    /// (all numeric columns when `None`).
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an absent or empty table, `ColumnNotFound` if any
    /// requested column does not exist.
    pub fn handle_outliers<'a>(
        &self,
        df: impl Into<Option<&'a DataFrame>>,
        columns: Option<&[&str]>,
    ) -> Result<DataFrame> {
        let df = require_table(df.into(), "handle_outliers")?;
        let targets: Vec<String> = match columns {
            Some(requested) => {
                require_columns(df, requested)?;
                requested.iter().map(|name| (*name).to_string()).collect()
            }
            None => df
                .get_columns()
                .iter()
                .filter(|col| is_numeric_dtype(col.dtype()))
                .map(|col| col.name().to_string())
                .collect(),
        };

        let multiplier = self.config.iqr_multiplier;
        let mut out = df.clone();
        for name in &targets {
            let series = df.column(name)?.as_materialized_series();
            match outliers::cap_series(series, multiplier) {
                Ok(CapOutcome::Capped {
                    series,
                    bounds,
                    capped,
                }) => {
                    info!(
                        "Capping {} values in {} to [{}, {}] using IQR method (Q1={}, Q3={}, IQR={})",
                        capped, name, bounds.lower, bounds.upper, bounds.q1, bounds.q3, bounds.iqr
                    );
                    out.replace(name, series)
                        .context(format!("Failed to replace column '{}'", name))?;
                }
                Ok(CapOutcome::NotNumeric) => {
                    warn!("Column {} is not numeric. Skipping outlier handling.", name);
                }
                Ok(CapOutcome::NoValues) => {
                    debug!(
                        "Column {} has no non-null values. Skipping outlier handling.",
                        name
                    );
                }
                Ok(CapOutcome::ZeroSpread(bounds)) => {
                    debug!("Column {} has zero IQR (Q1=Q3={}). Unchanged.", name, bounds.q1);
                }
                Ok(CapOutcome::EmptyRange(bounds)) => {
                    warn!(
                        "Column {}: no {} value lies within [{}, {}]. Skipping.",
                        name,
                        series.dtype(),
                        bounds.lower,
                        bounds.upper
                    );
                }
                Err(e) => {
                    warn!("Failed to handle outliers for column {}: {}", name, e);
                }
            }
        }

        Ok(out)
    }

    /// Convert each column to its best-fitting type.
    pub fn convert_data_types<'a>(&self, df: impl Into<Option<&'a DataFrame>>) -> Result<DataFrame> {
        let df = require_table(df.into(), "convert_data_types")?;

        let mut out = df.clone();
        let mut converted = 0usize;
        for col in df.get_columns() {
            let name = col.name().as_str();
            match converters::best_fit(col.as_materialized_series()) {
                Ok(Conversion::Converted { series, rule }) => {
                    debug!(
                        "Converted {} from {} to {} ({})",
                        name,
                        col.dtype(),
                        series.dtype(),
                        rule
                    );
                    out.replace(name, series)
                        .context(format!("Failed to replace column '{}'", name))?;
                    converted += 1;
                }
                Ok(Conversion::Unchanged) => {}
                Err(e) => warn!("Failed converting column {}: {}", name, e),
            }
        }

        let dtypes: Vec<String> = out
            .get_columns()
            .iter()
            .map(|col| format!("{}: {}", col.name(), col.dtype()))
            .collect();
        info!(
            "convert_data_types applied to {} columns; inferred dtypes: {}",
            converted,
            dtypes.join(", ")
        );
        Ok(out)
    }
}

/// Requested columns after an existence check, or every column.
fn resolve_targets(df: &DataFrame, columns: Option<&[&str]>) -> Result<Vec<String>> {
    match columns {
        Some(requested) => {
            require_columns(df, requested)?;
            Ok(requested.iter().map(|name| (*name).to_string()).collect())
        }
        None => Ok(column_names(df)),
    }
}

/// Keep rows with a value in every target column.
fn drop_missing_rows(df: &DataFrame, targets: &[String]) -> Result<DataFrame> {
    let mut keep = BooleanChunked::full("keep".into(), true, df.height());
    for name in targets {
        let present = nan_as_null(df.column(name)?.as_materialized_series())?.is_not_null();
        keep = &keep & &present;
    }

    let out = df.filter(&keep).context("Failed to drop rows")?;
    info!(
        "Dropped {} rows with missing values in {} columns",
        df.height() - out.height(),
        targets.len()
    );
    Ok(out)
}
