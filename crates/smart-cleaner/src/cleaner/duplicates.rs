//! Exact duplicate row detection.

use polars::prelude::*;

/// Keep the first occurrence of every row, preserving row order.
/// Nulls compare equal to nulls.
pub(crate) fn drop_duplicate_rows(df: &DataFrame) -> PolarsResult<DataFrame> {
    df.unique_stable(None, UniqueKeepStrategy::First, None)
}

/// Count rows that repeat an earlier row.
pub(crate) fn count_duplicates(df: &DataFrame) -> PolarsResult<usize> {
    Ok(df.height() - drop_duplicate_rows(df)?.height())
}
