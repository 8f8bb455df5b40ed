//! Error types for preprocessing operations.

use thiserror::Error;

/// Error type shared by the frame, the transformer primitives and the builder.
#[derive(Debug, Error)]
pub enum PreprocessingError {
    /// Invalid hyperparameter or configuration value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A named column is absent from the frame.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A column name appears twice in one frame.
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// A numeric operation was asked of a text column.
    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),

    /// A column was routed to more than one feature group.
    #[error("Column '{column}' is listed in both '{first}' and '{second}' features")]
    OverlappingFeatures {
        column: String,
        first: &'static str,
        second: &'static str,
    },

    /// A categorical value outside the fixed vocabulary.
    #[error("Unknown category '{value}' in column '{column}'")]
    UnknownCategory { column: String, value: String },

    /// Data contains missing values where none are allowed.
    #[error("Missing values: {0}")]
    MissingValues(String),

    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Shape mismatch between expected and actual dimensions.
    #[error("Invalid shape: expected {expected}, got {got}")]
    InvalidShape { expected: String, got: String },

    /// Feature dimension mismatch between fit and transform.
    #[error("Feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
