//! Error types for manifest parsing and validation

use multiadd_plan::ConfigurationError;
use thiserror::Error;

/// Result type for manifest operations
pub type Result<T> = std::result::Result<T, ManifestError>;

/// Errors that can occur during manifest operations
#[derive(Debug, Error)]
pub enum ManifestError {
    /// I/O error reading manifest file
    #[error("I/O error: {0}")]
    Io(String),

    /// TOML parsing error
    #[error("Failed to parse manifest: {0}")]
    Parse(String),

    /// Tree configuration rejected by the planner
    #[error("Invalid tree configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}
