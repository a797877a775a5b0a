use crate::error::CleanerError;
use chrono::{DateTime, Utc};
use polars::prelude::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical kind of a column's values, independent of storage width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Integer,
    Float,
    Boolean,
    Text,
    Datetime,
    /// Column made only of missing markers, with no physical type.
    Null,
    Other,
}

impl SemanticType {
    pub fn of(dtype: &DataType) -> Self {
        match dtype {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => SemanticType::Integer,
            DataType::Float32 | DataType::Float64 => SemanticType::Float,
            DataType::Boolean => SemanticType::Boolean,
            DataType::String | DataType::Categorical(_, _) | DataType::Enum(_, _) => {
                SemanticType::Text
            }
            DataType::Date | DataType::Datetime(_, _) | DataType::Time => SemanticType::Datetime,
            DataType::Null => SemanticType::Null,
            _ => SemanticType::Other,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, SemanticType::Integer | SemanticType::Float)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SemanticType::Integer => "integer",
            SemanticType::Float => "float",
            SemanticType::Boolean => "boolean",
            SemanticType::Text => "text",
            SemanticType::Datetime => "datetime",
            SemanticType::Null => "null",
            SemanticType::Other => "other",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How [`crate::DataCleaner::handle_missing_values`] treats missing markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingStrategy {
    /// Remove rows with a missing marker in any target column.
    Drop,
    /// Fill numeric columns with the mean of their non-missing values.
    Mean,
    /// Fill numeric columns with the median of their non-missing values.
    Median,
    /// Fill any column with its most frequent non-missing value.
    Mode,
}

impl MissingStrategy {
    pub const ALL: [MissingStrategy; 4] = [
        MissingStrategy::Drop,
        MissingStrategy::Mean,
        MissingStrategy::Median,
        MissingStrategy::Mode,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MissingStrategy::Drop => "drop",
            MissingStrategy::Mean => "mean",
            MissingStrategy::Median => "median",
            MissingStrategy::Mode => "mode",
        }
    }
}

impl fmt::Display for MissingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingStrategy {
    type Err = CleanerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == wanted)
            .ok_or_else(|| {
                CleanerError::invalid_input(format!(
                    "strategy must be one of drop, mean, median, mode (got '{}')",
                    s
                ))
            })
    }
}

/// Structural information for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub semantic_type: SemanticType,
    pub non_null_count: usize,
}

/// Descriptive statistics for a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericDescription {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation; absent with fewer than two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingValueCount {
    pub column: String,
    pub count: usize,
}

/// Read-only quality snapshot of a table.
///
/// A report describes the table it was computed from and goes stale as soon
/// as that table is transformed; recompute it rather than patching it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Human-readable structural listing.
    pub info: String,
    pub shape: (usize, usize),
    pub columns: Vec<ColumnInfo>,
    pub description: Vec<NumericDescription>,
    pub missing_values: Vec<MissingValueCount>,
    pub duplicate_count: usize,
    pub computed_at: DateTime<Utc>,
}

impl SummaryReport {
    /// Missing-value count for a column, if the column exists.
    pub fn missing_count(&self, column: &str) -> Option<usize> {
        self.missing_values
            .iter()
            .find(|entry| entry.column == column)
            .map(|entry| entry.count)
    }

    pub fn total_missing(&self) -> usize {
        self.missing_values.iter().map(|entry| entry.count).sum()
    }

    pub fn describe(&self, column: &str) -> Option<&NumericDescription> {
        self.description.iter().find(|desc| desc.column == column)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|col| col.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("drop".parse::<MissingStrategy>().unwrap(), MissingStrategy::Drop);
        assert_eq!(" Mean ".parse::<MissingStrategy>().unwrap(), MissingStrategy::Mean);
        assert_eq!("MEDIAN".parse::<MissingStrategy>().unwrap(), MissingStrategy::Median);
        assert_eq!("mode".parse::<MissingStrategy>().unwrap(), MissingStrategy::Mode);
    }

    #[test]
    fn test_unknown_strategy_is_invalid_input() {
        let err = "bogus".parse::<MissingStrategy>().unwrap_err();
        assert!(matches!(err, CleanerError::InvalidInput(_)));
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_semantic_type_of() {
        assert_eq!(SemanticType::of(&DataType::Int32), SemanticType::Integer);
        assert_eq!(SemanticType::of(&DataType::UInt8), SemanticType::Integer);
        assert_eq!(SemanticType::of(&DataType::Float64), SemanticType::Float);
        assert_eq!(SemanticType::of(&DataType::String), SemanticType::Text);
        assert_eq!(SemanticType::of(&DataType::Boolean), SemanticType::Boolean);
        assert_eq!(SemanticType::of(&DataType::Null), SemanticType::Null);
        assert!(SemanticType::Float.is_numeric());
        assert!(!SemanticType::Boolean.is_numeric());
    }

    #[test]
    fn test_strategy_serialization() {
        let json = serde_json::to_string(&MissingStrategy::Median).unwrap();
        assert_eq!(json, "\"median\"");
    }
}
