use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the SyncScholars application
#[derive(Error, Debug)]
pub enum ScholarsError {
    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database connection failed: {0}")]
    DatabaseConnection(String),

    // Realtime errors
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Unknown connection: {id}")]
    UnknownConnection { id: Uuid },

    #[error("Unknown channel: {id}")]
    UnknownChannel { id: String },

    #[error("Duplicate connection: {id}")]
    DuplicateConnection { id: Uuid },

    // Request errors
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for SyncScholars operations
pub type Result<T> = std::result::Result<T, ScholarsError>;

impl ScholarsError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            ScholarsError::InvalidRequest(_)
            | ScholarsError::MalformedEvent(_)
            | ScholarsError::InvalidConfig(_) => StatusCode::BAD_REQUEST,

            // 404 Not Found
            ScholarsError::NotFound(_)
            | ScholarsError::UnknownConnection { .. }
            | ScholarsError::UnknownChannel { .. } => StatusCode::NOT_FOUND,

            // 409 Conflict
            ScholarsError::DuplicateConnection { .. } => StatusCode::CONFLICT,

            // 503 Service Unavailable
            ScholarsError::DatabaseConnection(_) => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            ScholarsError::Database(_) | ScholarsError::Io(_) | ScholarsError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Check if this is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Check if this is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

// Implement IntoResponse for API error responses
impl IntoResponse for ScholarsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({
            "success": false,
            "error": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}
