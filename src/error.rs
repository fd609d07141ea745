//! Unified error hierarchy for tdeers
//!
//! Validation failures are the only domain error; the rest covers selectors
//! typed on the command line, configuration keys and terminal IO.

use std::fmt;
use thiserror::Error;

/// Top-level error type for all tdeers operations
#[derive(Debug, Error)]
pub enum TdeeError {
    /// Required form fields are missing or out of range
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A selector value outside its enumerated keys
    #[error("Invalid {field}: {value}")]
    InvalidSelection { field: String, value: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for tdeers operations
pub type Result<T> = std::result::Result<T, TdeeError>;

/// Names of the form fields, in the order they are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldName {
    Weight,
    Height,
    Age,
    Gender,
    ActivityLevel,
    Goal,
}

impl FieldName {
    pub fn label(&self) -> &'static str {
        match self {
            FieldName::Weight => "Weight",
            FieldName::Height => "Height",
            FieldName::Age => "Age",
            FieldName::Gender => "Gender",
            FieldName::ActivityLevel => "Activity Level",
            FieldName::Goal => "Goal",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Missing or invalid required fields; no estimate was produced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing or invalid fields: {}", self.joined())]
pub struct ValidationError {
    missing: Vec<FieldName>,
}

impl ValidationError {
    pub fn new(mut missing: Vec<FieldName>) -> Self {
        missing.sort();
        missing.dedup();
        ValidationError { missing }
    }

    pub fn missing(&self) -> &[FieldName] {
        &self.missing
    }

    /// Field labels, e.g. `["Weight", "Height"]`
    pub fn labels(&self) -> Vec<&'static str> {
        self.missing.iter().map(FieldName::label).collect()
    }

    /// Message shown under the form
    pub fn prompt(&self) -> String {
        format!("Please enter: {}", self.joined())
    }

    fn joined(&self) -> String {
        self.labels().join(", ")
    }
}

impl TdeeError {
    pub fn invalid_selection(field: &str, value: &str) -> Self {
        TdeeError::InvalidSelection {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TdeeError::Validation(_) => ErrorSeverity::Warning,
            TdeeError::InvalidSelection { .. } => ErrorSeverity::Warning,
            TdeeError::Configuration(_) => ErrorSeverity::Error,
            TdeeError::Io(_) => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            TdeeError::Validation(err) => err.prompt(),
            TdeeError::InvalidSelection { field, value } => {
                format!("'{}' is not a valid {}", value, field)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents the operation
    Error,
    /// Recoverable by correcting input
    Warning,
}
