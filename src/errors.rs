//! Error types for survey_select
//!
//! This module defines the error types used throughout the library.
//! Configuration failures are fatal: they are raised before any candidate is
//! evaluated, never partway through a run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SelectionError>;

/// Stable, machine-readable error code.
///
/// Serialized in `snake_case` so callers can match on it without parsing the
/// human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    UnknownSurvey,
    DuplicateSurvey,
    InvalidStrategy,
    InvalidConfig,
    Serialization,
}

impl ErrorCode {
    /// Returns the `snake_case` name used in JSON and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownSurvey => "unknown_survey",
            Self::DuplicateSurvey => "duplicate_survey",
            Self::InvalidStrategy => "invalid_strategy",
            Self::InvalidConfig => "invalid_config",
            Self::Serialization => "serialization",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for survey_select
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// The configured survey identifier has no registered strategy
    #[error("Unknown survey '{identifier}'")]
    UnknownSurvey { identifier: String },

    /// A strategy is already registered under this identifier
    #[error("Survey '{identifier}' is already registered")]
    DuplicateSurvey { identifier: String },

    /// A survey definition breaks the selection template
    #[error("Invalid strategy for survey '{survey}': {message}")]
    InvalidStrategy { survey: String, message: String },

    /// Configuration validation failed
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl SelectionError {
    /// Create an unknown survey error carrying the offending identifier
    pub fn unknown_survey(identifier: impl Into<String>) -> Self {
        Self::UnknownSurvey {
            identifier: identifier.into(),
        }
    }

    /// Create a duplicate survey error
    pub fn duplicate_survey(identifier: impl Into<String>) -> Self {
        Self::DuplicateSurvey {
            identifier: identifier.into(),
        }
    }

    /// Create an invalid strategy error
    pub fn invalid_strategy(survey: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidStrategy {
            survey: survey.into(),
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Stable code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownSurvey { .. } => ErrorCode::UnknownSurvey,
            Self::DuplicateSurvey { .. } => ErrorCode::DuplicateSurvey,
            Self::InvalidStrategy { .. } => ErrorCode::InvalidStrategy,
            Self::InvalidConfig { .. } => ErrorCode::InvalidConfig,
            Self::Serialization { .. } => ErrorCode::Serialization,
        }
    }

    /// Check if this error must abort the run before candidate processing.
    ///
    /// Every variant is a setup-time failure; none is raised by the stage
    /// predicates themselves.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownSurvey { .. }
                | Self::DuplicateSurvey { .. }
                | Self::InvalidStrategy { .. }
                | Self::InvalidConfig { .. }
        )
    }
}

impl From<serde_json::Error> for SelectionError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SelectionError::unknown_survey("nonexistent-survey");
        assert!(err.to_string().contains("Unknown survey"));
        assert!(err.to_string().contains("nonexistent-survey"));

        let err = SelectionError::invalid_strategy("gama", "margin must be >= 0");
        assert_eq!(
            err.to_string(),
            "Invalid strategy for survey 'gama': margin must be >= 0"
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SelectionError::unknown_survey("x").code(),
            ErrorCode::UnknownSurvey
        );
        assert_eq!(
            SelectionError::serialization("bad").code(),
            ErrorCode::Serialization
        );
        assert_eq!(ErrorCode::DuplicateSurvey.to_string(), "duplicate_survey");

        let value = serde_json::to_value(ErrorCode::InvalidStrategy).unwrap();
        assert_eq!(value, "invalid_strategy");
    }

    #[test]
    fn test_is_configuration_error() {
        assert!(SelectionError::unknown_survey("x").is_configuration_error());
        assert!(SelectionError::invalid_config("x").is_configuration_error());
        assert!(!SelectionError::serialization("x").is_configuration_error());
    }

    #[test]
    fn test_from_serde_json() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: SelectionError = parse.unwrap_err().into();
        assert_eq!(err.code(), ErrorCode::Serialization);
    }
}
