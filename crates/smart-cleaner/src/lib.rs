//! Smart Data Cleaner
//!
//! Data-quality reporting, cleaning transformations and chart data for a
//! single in-memory table, built on Polars.
//!
//! # Overview
//!
//! - **Quality report**: structure, numeric statistics, missing values and
//!   duplicate rows ([`DataCleaner::get_summary`])
//! - **Cleaning**: duplicate removal, missing-value drop/imputation, IQR
//!   outlier capping and best-fit type conversion
//! - **Charts**: missing-value heatmap, distribution, box and count plots as
//!   serializable data ([`Visualizer`])
//! - **CSV**: import and export through Polars ([`io`])
//!
//! Every cleaning operation returns a new table; the input is never modified,
//! so steps chain by passing each output to the next call.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use smart_cleaner::{DataCleaner, MissingStrategy, Visualizer, io};
//!
//! let df = io::read_csv("data.csv")?;
//! let cleaner = DataCleaner::new();
//!
//! let report = cleaner.get_summary(&df)?;
//! println!("{} duplicate rows", report.duplicate_count);
//!
//! let df = cleaner.remove_duplicates(&df)?;
//! let df = cleaner.handle_missing_values(&df, "median".parse()?, None)?;
//! let df = cleaner.handle_outliers(&df, Some(&["price"]))?;
//!
//! if let Some(chart) = Visualizer::new().distribution_plot(&df, "price") {
//!     println!("{}", smart_cleaner::visualizer::text::render(&chart, 40));
//! }
//!
//! std::fs::write("clean.csv", io::write_csv(&df)?)?;
//! ```
//!
//! # Configuration
//!
//! ```rust,ignore
//! use smart_cleaner::config::{CleanerConfig, VisualizerConfig};
//!
//! let cleaner = DataCleaner::with_config(
//!     CleanerConfig::builder().iqr_multiplier(3.0).build()?,
//! );
//! let visualizer = Visualizer::with_config(
//!     VisualizerConfig::builder().top_n(10).histogram_bins(30).build()?,
//! );
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod io;
pub mod logging;
pub mod types;
pub mod utils;
pub mod visualizer;

// Re-exports for convenient access
pub use cleaner::{DataCleaner, OutlierBounds};
pub use config::{
    CleanerConfig, CleanerConfigBuilder, ConfigValidationError, Theme, VisualizerConfig,
    VisualizerConfigBuilder,
};
pub use error::{CleanerError, Result as CleanerResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use types::{
    ColumnInfo, MissingStrategy, MissingValueCount, NumericDescription, SemanticType,
    SummaryReport,
};
pub use visualizer::{Chart, RenderMode, Visualizer};

static_assertions::assert_impl_all!(DataCleaner: Send, Sync);
static_assertions::assert_impl_all!(Visualizer: Send, Sync);
static_assertions::assert_impl_all!(SummaryReport: Send, Sync);
static_assertions::assert_impl_all!(Chart: Send, Sync);
