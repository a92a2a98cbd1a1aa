use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

use super::validation::ValidationErrors;

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Submission rejected by the validation rules, one entry per field
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration errors raised at startup
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage call exceeded its deadline
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        let body = match self {
            AppError::Validation(errors) => serde_json::json!({
                "error": {
                    "message": "Validation failed",
                    "code": status_code.as_u16(),
                    "fields": errors.fields(),
                }
            }),
            AppError::NotFound(resource) => serde_json::json!({
                "error": {
                    "message": resource,
                    "code": status_code.as_u16(),
                }
            }),
            // Storage and internal details stay in the logs
            _ => {
                tracing::error!(error = %self, "Request failed");
                serde_json::json!({
                    "error": {
                        "message": "An unexpected error occurred",
                        "code": status_code.as_u16(),
                    }
                })
            }
        };

        HttpResponse::build(status_code).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Timeout(_)
            | AppError::Configuration(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        AppError::Timeout(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }
}
