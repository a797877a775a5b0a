//! Error types for the cleaning engine.
//!
//! Validation failures are reported through [`CleanerError`] so callers can
//! tell a bad request (absent table, unknown strategy, unknown column) apart
//! from a failure inside the tabular library.
//!
//! Errors are serializable as `{ code, message }` so a front end can display
//! them without matching on the Rust type.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for cleaning and reporting operations.
#[derive(Error, Debug)]
pub enum CleanerError {
    /// The table is absent or empty, or a parameter is not recognized.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A requested column does not exist in the table.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with additional context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleanerError>,
    },
}

impl CleanerError {
    /// Shorthand for [`CleanerError::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CleanerError::InvalidInput(message.into())
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleanerError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for front-end handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the error was caused by the request rather than by the data
    /// library, i.e. the caller can fix it and retry.
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::InvalidInput(_) | Self::ColumnNotFound(_) => true,
            Self::WithContext { source, .. } => source.is_user_error(),
            _ => false,
        }
    }
}

impl Serialize for CleanerError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleanerError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleanerError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleanerError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            CleanerError::invalid_input("no table").error_code(),
            "INVALID_INPUT"
        );
        assert_eq!(
            CleanerError::ColumnNotFound("age".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_is_user_error() {
        assert!(CleanerError::invalid_input("bogus").is_user_error());
        assert!(CleanerError::ColumnNotFound("x".to_string()).is_user_error());
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert!(!CleanerError::Io(io).is_user_error());
    }

    #[test]
    fn test_error_serialization() {
        let error = CleanerError::ColumnNotFound("Age".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("Age"));
    }

    #[test]
    fn test_with_context_preserves_code() {
        let error = CleanerError::ColumnNotFound("price".to_string())
            .with_context("While capping outliers");
        assert!(error.to_string().contains("While capping outliers"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
        assert!(error.is_user_error());
    }
}
