/// Error types for livestream-service
///
/// Every operation returns its failure as a `ServiceError` value. Callers
/// match on the variant; the HTTP layer maps variants to status codes.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

pub const STREAM_NOT_FOUND: &str = "Stream not found";
pub const USER_NOT_FOUND: &str = "User not found";
pub const NOT_AUTHORISED_TO_END: &str = "Not authorised to end stream";

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Referenced entity is missing, or its key is empty or malformed.
    #[error("{0}")]
    NotFound(String),

    /// Input failed a validation rule. `field` is the offending wire field name.
    #[error("{message}")]
    InvalidField { message: String, field: String },

    #[error("{0}")]
    NotAuthorised(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn stream_not_found() -> Self {
        Self::NotFound(STREAM_NOT_FOUND.to_string())
    }

    pub fn user_not_found() -> Self {
        Self::NotFound(USER_NOT_FOUND.to_string())
    }

    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            message: message.into(),
            field: field.into(),
        }
    }

    /// Stable machine-readable tag for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::InvalidField { .. } => "invalid_field",
            Self::NotAuthorised(_) => "not_authorised",
            Self::Database(_) => "database",
            Self::Internal(_) => "internal",
        }
    }

    /// Offending field for `InvalidField`, `None` for every other kind
    pub fn extra(&self) -> Option<&str> {
        match self {
            Self::InvalidField { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidField { .. } => StatusCode::BAD_REQUEST,
            ServiceError::NotAuthorised(_) => StatusCode::FORBIDDEN,
            ServiceError::Database(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let mut body = serde_json::json!({
            "error": self.kind(),
            "message": self.to_string(),
            "status": status.as_u16(),
        });
        if let Some(extra) = self.extra() {
            body["extra"] = serde_json::Value::from(extra);
        }

        HttpResponse::build(status).json(body)
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
