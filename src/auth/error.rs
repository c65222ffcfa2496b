// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};
use crate::roles::RoleName;

/// Authentication and authorization error types
#[derive(Debug)]
pub enum AuthError {
    // Authentication errors
    /// Unknown username or wrong password; the two cases are not
    /// distinguished in the response
    InvalidCredentials,
    InvalidToken,
    MissingToken,
    DatabaseError(String),
    TokenGenerationError(String),

    // Authorization errors
    /// Caller lacks the role required for the operation
    /// Contains the required role and the caller's actual role
    InsufficientPermissions {
        required: RoleName,
        actual: RoleName,
    },
    /// Caller is neither an admin nor the owner of the record
    Forbidden(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "Invalid username or password"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::MissingToken => write!(f, "Missing authentication token"),
            AuthError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AuthError::TokenGenerationError(msg) => write!(f, "Token generation error: {}", msg),
            AuthError::InsufficientPermissions { required, actual } => {
                write!(f, "Insufficient permissions: required role '{}', but user has role '{}'", required, actual)
            }
            AuthError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match &self {
            // Failed logins are reported as bad requests, not 401s;
            // the token-challenge semantics of 401 do not apply here
            AuthError::InvalidCredentials => "Invalid username or password".to_string(),
            AuthError::InvalidToken => {
                warn!("Invalid token attempt");
                "Invalid token".to_string()
            }
            AuthError::MissingToken => {
                warn!("Missing token in request");
                "Missing authentication token".to_string()
            }
            AuthError::DatabaseError(msg) => {
                error!("Database error in auth: {}", msg);
                "Internal server error".to_string()
            }
            AuthError::TokenGenerationError(msg) => {
                error!("Token generation error: {}", msg);
                "Internal server error".to_string()
            }
            AuthError::InsufficientPermissions { required, actual } => {
                warn!("Authorization failed: required role '{}', user has role '{}'", required, actual);
                format!("Insufficient permissions: required role '{}'", required)
            }
            AuthError::Forbidden(msg) => {
                warn!("Forbidden: {}", msg);
                msg.clone()
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (self.status_code(), body).into_response()
    }
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::TokenGenerationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::InsufficientPermissions { .. } => StatusCode::FORBIDDEN,
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}
