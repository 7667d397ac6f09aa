//! Unified error hierarchy for fitplan
//!
//! Field validation, failures talking to the recommendation service and
//! defensive numeric guards all end up in [`FitPlanError`], which knows how
//! to phrase itself for the user and how loudly it should be logged.

use std::fmt;
use thiserror::Error;

use crate::export::ExportError;

/// Top-level error type for all fitplan operations
#[derive(Debug, Error)]
pub enum FitPlanError {
    /// One or more profile fields violate their constraints
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// The recommendation service call failed
    #[error("Recommendation service error: {0}")]
    Transport(#[from] TransportError),

    /// A pure calculation received input it cannot handle
    #[error("Invalid input for {calculation}: {reason}")]
    InvalidInput { calculation: String, reason: String },

    /// Operation not permitted in the controller's current phase
    #[error("Cannot {action} while {phase}")]
    Phase { phase: String, action: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Plan export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// All field errors found in one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// First error reported for `field`, if any
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// `Ok(())` when nothing was collected
    pub fn into_result(self) -> std::result::Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

impl std::error::Error for ValidationErrors {}

/// Failures at the recommendation service boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request never produced a response
    #[error("Request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    /// The service answered with a non-2xx status
    #[error("Service returned HTTP {status}")]
    Status { status: u16, detail: Option<String> },

    /// The body could not be decoded into the expected shape
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The body decoded but breaks the plan contract (e.g. zero calories)
    #[error("Plan violates its contract: {0}")]
    ContractViolation(String),
}

/// Result type alias for fitplan operations
pub type Result<T> = std::result::Result<T, FitPlanError>;

impl FitPlanError {
    pub fn invalid_input(calculation: impl Into<String>, reason: impl Into<String>) -> Self {
        FitPlanError::InvalidInput {
            calculation: calculation.into(),
            reason: reason.into(),
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            FitPlanError::Validation(_) => ErrorSeverity::Warning,
            FitPlanError::Phase { .. } => ErrorSeverity::Warning,
            FitPlanError::Transport(TransportError::Status { status, .. }) if *status < 500 => {
                ErrorSeverity::Warning
            }
            FitPlanError::Transport(_) => ErrorSeverity::Error,
            FitPlanError::InvalidInput { .. } => ErrorSeverity::Error,
            FitPlanError::Configuration(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            FitPlanError::Validation(errors) => {
                format!("Please fix the following fields: {}", errors)
            }
            FitPlanError::Transport(TransportError::Status {
                detail: Some(detail),
                ..
            }) => detail.clone(),
            FitPlanError::Transport(TransportError::Network { url, .. }) => {
                format!(
                    "Could not reach the recommendation service at {}. Is it running?",
                    url
                )
            }
            FitPlanError::Transport(TransportError::ContractViolation(_))
            | FitPlanError::InvalidInput { .. } => {
                "The recommendation service returned an invalid plan.".to_string()
            }
            FitPlanError::Transport(_) => "Could not obtain recommendations.".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical error, the program cannot continue
    Critical,
    /// Error that prevents the operation but the session can continue
    Error,
    /// Warning that the user can fix
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = FitPlanError::Validation(FieldError::new("name", "must not be empty").into());
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = FitPlanError::Transport(TransportError::Status {
            status: 500,
            detail: None,
        });
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::ERROR);

        let err = FitPlanError::Configuration("bad url".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_user_messages() {
        let err = FitPlanError::Transport(TransportError::Status {
            status: 500,
            detail: Some("engine exploded".to_string()),
        });
        assert_eq!(err.user_message(), "engine exploded");

        let err = FitPlanError::Transport(TransportError::Malformed("missing field".to_string()));
        assert_eq!(err.user_message(), "Could not obtain recommendations.");

        let err = FitPlanError::invalid_input("macro share", "daily calories must be positive");
        assert!(err.user_message().contains("invalid plan"));
    }

    #[test]
    fn test_validation_errors_collect() {
        let mut errors = ValidationErrors::new();
        assert!(errors.clone().into_result().is_ok());

        errors.push(FieldError::new("weight_kg", "must be greater than zero"));
        errors.push(FieldError::new("weekly_frequency", "must be between 1 and 7"));

        assert_eq!(errors.len(), 2);
        assert!(errors.for_field("weight_kg").is_some());
        assert!(errors.for_field("name").is_none());
        assert_eq!(
            errors.to_string(),
            "weight_kg: must be greater than zero; weekly_frequency: must be between 1 and 7"
        );
        assert!(errors.into_result().is_err());
    }
}
