//! Quality report construction.

use super::duplicates::count_duplicates;
use crate::types::{ColumnInfo, MissingValueCount, NumericDescription, SemanticType, SummaryReport};
use crate::utils::{mean, missing_count, numeric_values, quantile_sorted, sample_std, sort_values};
use polars::prelude::*;
use std::fmt::Write as _;

pub(crate) fn build_summary(df: &DataFrame) -> PolarsResult<SummaryReport> {
    let columns = column_infos(df);
    let description = describe_numeric(df)?;
    let missing_values = df
        .get_columns()
        .iter()
        .map(|col| {
            Ok(MissingValueCount {
                column: col.name().to_string(),
                count: missing_count(col.as_materialized_series())?,
            })
        })
        .collect::<PolarsResult<Vec<_>>>()?;
    let duplicate_count = count_duplicates(df)?;

    Ok(SummaryReport {
        info: render_info(df, &columns),
        shape: (df.height(), df.width()),
        columns,
        description,
        missing_values,
        duplicate_count,
        computed_at: chrono::Utc::now(),
    })
}

fn column_infos(df: &DataFrame) -> Vec<ColumnInfo> {
    df.get_columns()
        .iter()
        .map(|col| ColumnInfo {
            name: col.name().to_string(),
            dtype: col.dtype().to_string(),
            semantic_type: SemanticType::of(col.dtype()),
            non_null_count: col.len() - col.null_count(),
        })
        .collect()
}

fn describe_numeric(df: &DataFrame) -> PolarsResult<Vec<NumericDescription>> {
    let mut description = Vec::new();

    for col in df.get_columns() {
        if !SemanticType::of(col.dtype()).is_numeric() {
            continue;
        }

        let mut values = numeric_values(col.as_materialized_series())?;
        sort_values(&mut values);
        let has_values = !values.is_empty();
        let quantile = |q: f64| has_values.then(|| quantile_sorted(&values, q));

        description.push(NumericDescription {
            column: col.name().to_string(),
            count: values.len(),
            mean: mean(&values),
            std: sample_std(&values),
            min: values.first().copied(),
            q25: quantile(0.25),
            median: quantile(0.5),
            q75: quantile(0.75),
            max: values.last().copied(),
        });
    }

    Ok(description)
}

/// Structural listing: entry range, then one line per column with its
/// non-null count and dtype.
fn render_info(df: &DataFrame, columns: &[ColumnInfo]) -> String {
    let name_width = columns
        .iter()
        .map(|col| col.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Column".len());

    let mut out = String::new();
    let _ = writeln!(out, "<DataFrame>");
    let _ = writeln!(
        out,
        "RangeIndex: {} entries, 0 to {}",
        df.height(),
        df.height().saturating_sub(1)
    );
    let _ = writeln!(out, "Data columns (total {} columns):", df.width());
    let _ = writeln!(
        out,
        " {:<4} {:<name_width$}  {:<16} {}",
        "#", "Column", "Non-Null Count", "Dtype"
    );
    let _ = writeln!(
        out,
        " {:<4} {:<name_width$}  {:<16} {}",
        "---",
        "-".repeat(name_width),
        "--------------",
        "-----"
    );
    for (idx, col) in columns.iter().enumerate() {
        let _ = writeln!(
            out,
            " {:<4} {:<name_width$}  {:<16} {}",
            idx,
            col.name,
            format!("{} non-null", col.non_null_count),
            col.dtype
        );
    }

    let mut counts: Vec<(String, usize)> = Vec::new();
    for col in columns {
        match counts.iter_mut().find(|(dtype, _)| *dtype == col.dtype) {
            Some((_, n)) => *n += 1,
            None => counts.push((col.dtype.clone(), 1)),
        }
    }
    let dtypes: Vec<String> = counts
        .iter()
        .map(|(dtype, n)| format!("{dtype}({n})"))
        .collect();
    let _ = writeln!(out, "dtypes: {}", dtypes.join(", "));

    out
}
