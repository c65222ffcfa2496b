// Error handling module for the Identity API
// Provides centralized error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response, Json},
};
use serde::Serialize;
use chrono::Utc;
use tracing::{error, warn, debug};

/// Main error type for the API
/// All resource handlers should return Result<T, ApiError>
///
/// This enum represents the error types that can occur while serving
/// user and role resources. Each variant maps to a specific HTTP status
/// code and error response format. Authentication and authorization
/// failures are represented separately by auth::AuthError.
#[derive(Debug)]
pub enum ApiError {
    /// Validation errors from request validation
    /// Maps to HTTP 400 Bad Request
    ValidationError(validator::ValidationErrors),

    /// Structurally valid but unusable request payloads
    /// (e.g. an update with no fields)
    /// Maps to HTTP 400 Bad Request
    BadRequest {
        message: String,
    },

    /// Database constraint violations (unique, foreign key, check)
    /// Maps to HTTP 400 Bad Request
    ConstraintViolation {
        message: String,
    },

    /// Resource not found by ID
    /// Maps to HTTP 404 Not Found
    NotFound {
        resource: String,
        id: String,
    },

    /// Database operation errors
    /// Maps to HTTP 500 Internal Server Error
    /// Sensitive details are filtered from client responses
    DatabaseError(sqlx::Error),
}

/// Consistent error response structure
///
/// This struct defines the JSON format for all error responses.
/// It ensures consistency across all error types and provides both
/// machine-readable (error_code) and human-readable (message) information.
///
/// Fields follow snake_case naming convention for consistency.
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR", "NOT_FOUND")
    pub error_code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details (e.g., field-level validation errors)
    /// Omitted from JSON when None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// ISO 8601 timestamp of when the error occurred
    pub timestamp: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl ApiError {
    /// Convert ApiError to HTTP status code and ErrorResponse
    ///
    /// Errors are logged at different levels based on severity:
    /// - error!: For database errors (500-level)
    /// - warn!: For constraint violations (data integrity signals)
    /// - debug!: For expected client errors (validation, not found)
    ///
    /// Sensitive data is filtered from client responses to prevent
    /// information leakage.
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::ValidationError(errors) => {
                // Log validation errors at debug level (expected client errors)
                debug!("Validation error: {:?}", errors);

                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error_code: "VALIDATION_ERROR".to_string(),
                        message: "Request validation failed".to_string(),
                        details: Some(serde_json::to_value(errors).unwrap_or(serde_json::json!({}))),
                        timestamp: Utc::now().to_rfc3339(),
                    }
                )
            }
            ApiError::BadRequest { message } => {
                // Log bad requests at debug level (expected client errors)
                debug!("Bad request: {}", message);

                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error_code: "BAD_REQUEST".to_string(),
                        message: message.clone(),
                        details: None,
                        timestamp: Utc::now().to_rfc3339(),
                    }
                )
            }
            ApiError::ConstraintViolation { message } => {
                // Log constraint violations at warn level (might indicate data integrity issues)
                warn!("Constraint violation: {}", message);

                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error_code: "CONSTRAINT_VIOLATION".to_string(),
                        message: message.clone(),
                        details: None,
                        timestamp: Utc::now().to_rfc3339(),
                    }
                )
            }
            ApiError::NotFound { resource, id } => {
                // Log not found errors at debug level (expected client errors)
                debug!("Resource not found: {} with id {}", resource, id);

                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error_code: "NOT_FOUND".to_string(),
                        message: format!("{} with id {} not found", resource, id),
                        details: None,
                        timestamp: Utc::now().to_rfc3339(),
                    }
                )
            }
            ApiError::DatabaseError(db_error) => {
                // Log the full database error internally at error level
                error!("Database error: {:?}", db_error);

                // Return generic message to client (no sensitive data exposure)
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error_code: "DATABASE_ERROR".to_string(),
                        message: "A database error occurred".to_string(),
                        details: None,
                        timestamp: Utc::now().to_rfc3339(),
                    }
                )
            }
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// This method provides a convenient way to get just the status code
    /// without building the full error response.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::ConstraintViolation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert sqlx errors to ApiError
///
/// Constraint violations surface as 400-level errors with a stable
/// message; anything else is reported as a generic database error.
impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        if let Some(db_error) = error.as_database_error() {
            if db_error.is_unique_violation() {
                return ApiError::ConstraintViolation {
                    message: "A value already exists for a unique column".to_string(),
                };
            }
            if db_error.is_foreign_key_violation() {
                return ApiError::ConstraintViolation {
                    message: "A referenced row does not exist".to_string(),
                };
            }
            if db_error.is_check_violation() {
                return ApiError::ConstraintViolation {
                    message: "A column constraint was violated".to_string(),
                };
            }
        }
        ApiError::DatabaseError(error)
    }
}

/// Convert validator errors to ApiError
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}
