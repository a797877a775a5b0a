//! Configuration types for the cleaner and the visualizer.
//!
//! Both configurations follow the builder pattern: start from
//! [`CleanerConfig::builder()`] or [`VisualizerConfig::builder()`], override
//! what you need and call `build()`, which validates the result.

use serde::{Deserialize, Serialize};

/// Default multiplier applied to the interquartile range for outlier fences.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Default number of categories shown by a count plot before bucketing.
pub const DEFAULT_TOP_N: usize = 20;

/// Default number of histogram bins.
pub const DEFAULT_HISTOGRAM_BINS: usize = 24;

/// Default number of points at which the density curve is evaluated.
pub const DEFAULT_KDE_POINTS: usize = 100;

/// Configuration for [`crate::DataCleaner`].
///
/// # Example
///
/// ```rust,ignore
/// use smart_cleaner::config::CleanerConfig;
///
/// let config = CleanerConfig::builder().iqr_multiplier(3.0).build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanerConfig {
    /// Multiplier `k` for the outlier fences `[Q1 - k*IQR, Q3 + k*IQR]`.
    /// Default: 1.5
    pub iqr_multiplier: f64,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
        }
    }
}

impl CleanerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleanerConfigBuilder {
        CleanerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier <= 0.0 {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }
        Ok(())
    }
}

/// Builder for [`CleanerConfig`].
#[derive(Debug, Default)]
pub struct CleanerConfigBuilder {
    iqr_multiplier: Option<f64>,
}

impl CleanerConfigBuilder {
    /// Set the IQR multiplier used for outlier capping.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<CleanerConfig, ConfigValidationError> {
        let config = CleanerConfig {
            iqr_multiplier: self.iqr_multiplier.unwrap_or(DEFAULT_IQR_MULTIPLIER),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Colors used when styling charts.
///
/// Colors are `#rrggbb` hex strings; `"none"` means transparent. They are
/// parsed when a chart is styled, so an invalid color only degrades that
/// chart to its plain rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub primary_color: String,
    pub text_color: String,
    pub background_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_color: "#6c63ff".to_string(),
            text_color: "#fafafa".to_string(),
            background_color: "none".to_string(),
        }
    }
}

/// Configuration for [`crate::Visualizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizerConfig {
    /// Categories shown by a count plot; the rest go to an "Other" bucket.
    /// Default: 20
    pub top_n: usize,

    /// Number of histogram bins for distribution plots.
    /// Default: 24
    pub histogram_bins: usize,

    /// Number of grid points for the density curve.
    /// Default: 100
    pub kde_points: usize,

    /// Chart theme.
    pub theme: Theme,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            kde_points: DEFAULT_KDE_POINTS,
            theme: Theme::default(),
        }
    }
}

impl VisualizerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> VisualizerConfigBuilder {
        VisualizerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.top_n == 0 {
            return Err(ConfigValidationError::InvalidTopN(self.top_n));
        }
        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::InvalidHistogramBins(
                self.histogram_bins,
            ));
        }
        if self.kde_points < 2 {
            return Err(ConfigValidationError::InvalidKdePoints(self.kde_points));
        }
        Ok(())
    }
}

/// Builder for [`VisualizerConfig`].
#[derive(Debug, Default)]
pub struct VisualizerConfigBuilder {
    top_n: Option<usize>,
    histogram_bins: Option<usize>,
    kde_points: Option<usize>,
    theme: Option<Theme>,
}

impl VisualizerConfigBuilder {
    /// Set how many categories a count plot shows before bucketing.
    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    /// Set the histogram bin count.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the number of density curve points.
    pub fn kde_points(mut self, points: usize) -> Self {
        self.kde_points = Some(points);
        self
    }

    /// Set the chart theme.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<VisualizerConfig, ConfigValidationError> {
        let config = VisualizerConfig {
            top_n: self.top_n.unwrap_or(DEFAULT_TOP_N),
            histogram_bins: self.histogram_bins.unwrap_or(DEFAULT_HISTOGRAM_BINS),
            kde_points: self.kde_points.unwrap_or(DEFAULT_KDE_POINTS),
            theme: self.theme.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid IQR multiplier: {0} (must be finite and greater than 0)")]
    InvalidIqrMultiplier(f64),

    #[error("Invalid top_n: {0} (must be at least 1)")]
    InvalidTopN(usize),

    #[error("Invalid histogram bins: {0} (must be at least 1)")]
    InvalidHistogramBins(usize),

    #[error("Invalid KDE points: {0} (must be at least 2)")]
    InvalidKdePoints(usize),
}
