//! Imputation module for handling missing values.
//!
//! This module provides the statistical fill strategies (mean, median,
//! mode) applied column by column.

mod statistical;

pub use statistical::{Imputation, StatisticalImputer, mode_value};
