// Library interface for tdeers modules
// This allows integration tests and the binary to share the core functionality

pub mod config;
pub mod error;
pub mod estimator;
pub mod export;
pub mod form;
pub mod logging;
pub mod models;
pub mod validation;

// Re-export commonly used types for convenience
pub use models::*;
pub use config::{AppConfig, FormDefaults};
pub use error::{ErrorSeverity, FieldName, Result, TdeeError, ValidationError};
pub use estimator::TdeeEstimator;
pub use export::ExportFormat;
pub use form::{FormSession, FormState};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use validation::{FormFields, FormMode, InputValidator, ValidatedInput};
