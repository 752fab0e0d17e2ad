//! Application Error Types
//!
//! Centralized error handling for services and repositories.

use serde::Serialize;

use crate::domain::builder::MissingFields;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    MissingFields(#[from] MissingFields),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable numeric code for the error category.
    pub fn code(&self) -> u16 {
        match self {
            AppError::Internal(_) => 10000,
            AppError::NotFound(_) => 10001,
            AppError::Conflict(_) => 10005,
            AppError::Validation(_) => 10007,
            AppError::MissingFields(_) => 10008,
            AppError::Repository(_) => 10009,
        }
    }

    /// Whether the caller caused the error.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::NotFound(_)
                | AppError::Conflict(_)
                | AppError::Validation(_)
                | AppError::MissingFields(_)
        )
    }

    /// Body suitable for handing to an outer transport layer.
    pub fn to_response(&self) -> ErrorResponse {
        let message = if self.is_client_error() {
            self.to_string()
        } else {
            tracing::error!(error = %self, "Server-side error");
            "Internal server error".into()
        };

        ErrorResponse {
            code: self.code(),
            message,
            errors: None,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Field-level validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::FieldValidator;

    #[test]
    fn test_missing_fields_converts_transparently() {
        let missing = FieldValidator::new("GuestBookEntity")
            .require_text("title", None)
            .validate()
            .unwrap_err();

        let error = AppError::from(missing);

        assert_eq!(error.to_string(), "Missing required field(s): GuestBookEntity.title");
        assert_eq!(error.code(), 10008);
        assert!(error.is_client_error());
    }

    #[test]
    fn test_server_errors_hide_details_in_response() {
        let response = AppError::Repository("table locked".into()).to_response();

        assert_eq!(response.code, 10009);
        assert_eq!(response.message, "Internal server error");
    }

    #[test]
    fn test_client_errors_keep_details_in_response() {
        let response = AppError::Conflict("Username 'jactor' is taken".into()).to_response();

        assert_eq!(response.message, "Conflict: Username 'jactor' is taken");
    }
}
