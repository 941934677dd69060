//! Error types for ExpertRank
//!
//! Provides a single error enum for every crate in the workspace with:
//! - Distinct variants for input problems and graph-consistency faults
//! - Machine-readable error codes
//! - Conversions from the validation, configuration and IO layers

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,
    MissingField,
    MissingPrior,
    InvalidPrior,
    UnknownMethod,

    // Graph consistency faults (4xxx)
    EdgeWeightNotFound,
    KeyUniverseMismatch,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::ValidationError => 1001,
            ErrorCode::MissingField => 1002,
            ErrorCode::MissingPrior => 1003,
            ErrorCode::InvalidPrior => 1004,
            ErrorCode::UnknownMethod => 1005,

            ErrorCode::EdgeWeightNotFound => 4001,
            ErrorCode::KeyUniverseMismatch => 4002,

            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Input errors
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Required field missing: {field}")]
    MissingField { field: String },

    #[error("No relevance prior for document {document}")]
    MissingPrior { document: String },

    #[error("Relevance prior for document {document} must be finite and nonnegative, got {value}")]
    InvalidPrior { document: String, value: f64 },

    #[error("Unknown ranking method: {id}")]
    UnknownMethod { id: String },

    // Graph faults
    #[error("Edge weight not found: {relation} edge {origin} -> {target} carries no weight")]
    EdgeWeightNotFound {
        relation: String,
        origin: String,
        target: String,
    },

    #[error("Score vectors disagree on key universe at {key}")]
    KeyUniverseMismatch { key: String },

    // Internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Shorthand for a validation failure on a named field
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::MissingField { .. } => ErrorCode::MissingField,
            AppError::MissingPrior { .. } => ErrorCode::MissingPrior,
            AppError::InvalidPrior { .. } => ErrorCode::InvalidPrior,
            AppError::UnknownMethod { .. } => ErrorCode::UnknownMethod,
            AppError::EdgeWeightNotFound { .. } => ErrorCode::EdgeWeightNotFound,
            AppError::KeyUniverseMismatch { .. } => ErrorCode::KeyUniverseMismatch,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
        }
    }

    /// A fault in the graph handed to the engine, or in the engine itself.
    /// Retrying with the same inputs will fail the same way.
    pub fn is_graph_fault(&self) -> bool {
        matches!(
            self,
            AppError::EdgeWeightNotFound { .. } | AppError::KeyUniverseMismatch { .. }
        )
    }

    /// A problem with caller-supplied parameters or priors
    pub fn is_input_error(&self) -> bool {
        (1000..2000).contains(&self.code().as_code())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors.field_errors().keys().next().map(|k| k.to_string());
        AppError::Validation {
            message: errors.to_string(),
            field,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = AppError::MissingPrior { document: "d1".into() };
        assert_eq!(err.code(), ErrorCode::MissingPrior);
        assert_eq!(err.code().as_code(), 1003);
        assert!(err.is_input_error());
        assert!(!err.is_graph_fault());
    }

    #[test]
    fn test_edge_weight_fault() {
        let err = AppError::EdgeWeightNotFound {
            relation: "cites".into(),
            origin: "d1".into(),
            target: "d2".into(),
        };
        assert_eq!(err.code(), ErrorCode::EdgeWeightNotFound);
        assert!(err.is_graph_fault());
        assert!(!err.is_input_error());
        assert!(err.to_string().contains("d1 -> d2"));
    }

    #[test]
    fn test_invalid_field_shorthand() {
        let err = AppError::invalid_field("lambda", "must lie in (0, 1)");
        match err {
            AppError::Validation { field, message } => {
                assert_eq!(field.as_deref(), Some("lambda"));
                assert_eq!(message, "must lie in (0, 1)");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_io_error_is_internal() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
