//! Chart data produced by the visualizer.
//!
//! Charts are plain serializable data; drawing them is left to the caller
//! (see [`super::text`] for the terminal renderer).

use crate::config::Theme;
use crate::types::MissingValueCount;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building a chart. They never leave the visualizer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Degenerate data: {0}")]
    DegenerateData(String),

    #[error("Invalid style: {0}")]
    InvalidStyle(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

/// An sRGB color parsed from `#rrggbb` or `#rgb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl FromStr for Rgb {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RenderError::InvalidStyle(format!("not a hex color: '{}'", s));
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Rgb {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
            }),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Rgb {
                    r: short(0)?,
                    g: short(1)?,
                    b: short(2)?,
                })
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Resolved theme colors for an enhanced render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartStyle {
    pub primary: Rgb,
    pub text: Rgb,
    /// `None` means a transparent background.
    pub background: Option<Rgb>,
}

impl ChartStyle {
    /// Resolve a theme, failing on any color that does not parse.
    pub fn from_theme(theme: &Theme) -> Result<Self, RenderError> {
        let background = match theme.background_color.trim() {
            "none" | "transparent" => None,
            other => Some(other.parse()?),
        };
        Ok(Self {
            primary: theme.primary_color.parse()?,
            text: theme.text_color.parse()?,
            background,
        })
    }
}

/// How a chart was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Themed, titled, with a density curve where applicable.
    Enhanced,
    /// Minimal fallback with no styling and no density curve.
    Plain,
}

/// Title, axis labels and colors shared by every chart kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub mode: RenderMode,
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub style: Option<ChartStyle>,
}

impl Decoration {
    pub fn plain() -> Self {
        Self {
            mode: RenderMode::Plain,
            title: None,
            x_label: None,
            y_label: None,
            style: None,
        }
    }

    pub fn enhanced(
        style: ChartStyle,
        title: impl Into<String>,
        x_label: Option<String>,
        y_label: Option<String>,
    ) -> Self {
        Self {
            mode: RenderMode::Enhanced,
            title: Some(title.into()),
            x_label,
            y_label,
            style: Some(style),
        }
    }
}

/// Missing (`true`) / present (`false`) markers for every cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingHeatmap {
    pub columns: Vec<String>,
    /// One entry per row, one flag per column.
    pub cells: Vec<Vec<bool>>,
    /// Columns with at least one missing value, ascending by count.
    pub missing_counts: Vec<MissingValueCount>,
    pub decoration: Decoration,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    pub x: f64,
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionChart {
    pub column: String,
    /// Number of non-missing values plotted.
    pub count: usize,
    pub bins: Vec<HistogramBin>,
    /// Gaussian kernel density estimate, enhanced renders only.
    pub density: Option<Vec<DensityPoint>>,
    pub decoration: Decoration,
}

/// Five-number summary plus whiskers at the most extreme points inside the
/// fences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxChart {
    pub column: String,
    pub summary: BoxSummary,
    /// Values beyond the fences, ascending.
    pub outliers: Vec<f64>,
    pub decoration: Decoration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
    /// Set on the bucket that sums the categories beyond `top_n`; a real
    /// category may carry the same label.
    #[serde(default)]
    pub is_other: bool,
}

impl CategoryCount {
    pub fn new(value: impl Into<String>, count: usize) -> Self {
        Self {
            value: value.into(),
            count,
            is_other: false,
        }
    }

    /// The bucket summing every category beyond `top_n`.
    pub fn other(count: usize) -> Self {
        Self {
            value: super::stats::OTHER_BUCKET.to_string(),
            count,
            is_other: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountChart {
    pub column: String,
    /// Number of distinct non-missing values in the column.
    pub distinct: usize,
    /// Most frequent first; an `Other` bucket, if any, is last.
    pub entries: Vec<CategoryCount>,
    pub decoration: Decoration,
}

/// A renderable chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Heatmap(MissingHeatmap),
    Distribution(DistributionChart),
    Box(BoxChart),
    Count(CountChart),
}

impl Chart {
    pub fn decoration(&self) -> &Decoration {
        match self {
            Chart::Heatmap(chart) => &chart.decoration,
            Chart::Distribution(chart) => &chart.decoration,
            Chart::Box(chart) => &chart.decoration,
            Chart::Count(chart) => &chart.decoration,
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.decoration().mode
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Chart::Heatmap(_) => "heatmap",
            Chart::Distribution(_) => "distribution",
            Chart::Box(_) => "box",
            Chart::Count(_) => "count",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(
            "#6c63ff".parse::<Rgb>().unwrap(),
            Rgb {
                r: 0x6c,
                g: 0x63,
                b: 0xff
            }
        );
        assert_eq!(
            "#fff".parse::<Rgb>().unwrap(),
            Rgb {
                r: 255,
                g: 255,
                b: 255
            }
        );
        assert_eq!("#6C63FF".parse::<Rgb>().unwrap().to_string(), "#6c63ff");
    }

    #[test]
    fn test_reject_bad_colors() {
        for bad in ["6c63ff", "#12345", "#zzzzzz", "purple", "#é12"] {
            assert!(
                matches!(bad.parse::<Rgb>(), Err(RenderError::InvalidStyle(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_style_from_default_theme() {
        let style = ChartStyle::from_theme(&Theme::default()).unwrap();
        assert_eq!(style.background, None);
        assert_eq!(style.text.to_string(), "#fafafa");
    }

    #[test]
    fn test_style_rejects_invalid_theme() {
        let theme = Theme {
            primary_color: "not-a-color".to_string(),
            ..Theme::default()
        };
        assert!(ChartStyle::from_theme(&theme).is_err());
    }

    #[test]
    fn test_chart_serializes_with_kind_tag() {
        let chart = Chart::Count(CountChart {
            column: "c".to_string(),
            distinct: 1,
            entries: vec![CategoryCount::new("a", 2)],
            decoration: Decoration::plain(),
        });
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["kind"], "count");
        assert_eq!(json["decoration"]["mode"], "plain");
        assert_eq!(chart.kind(), "count");
    }
}
