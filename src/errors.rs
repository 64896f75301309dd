use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Score must be an integer between 1 and 5")]
    InvalidScore,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("This profile has already been rated by you")]
    DuplicateRating,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Invalid role for this action")]
    InvalidRole,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Env error: {0}")]
    EnvError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Internal server error")]
    InternalError,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidScore | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) | AppError::DuplicateRating => StatusCode::CONFLICT,
            AppError::Unauthorized(_) | AppError::JwtError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden | AppError::InvalidRole => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::EnvError(_)
            | AppError::DatabaseError(_)
            | AppError::Upload(_)
            | AppError::PasswordHash(_)
            | AppError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> (StatusCode, String) {
        let body = match self {
            AppError::Validation(messages) => messages.join("\n"),
            AppError::BadRequest(msg)
            | AppError::Conflict(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::JwtError(_) => "Invalid or expired token".into(),
            // Storage and environment details only go to the log.
            AppError::EnvError(_) | AppError::DatabaseError(_) | AppError::PasswordHash(_) => {
                "Unexpected server error".into()
            }
            AppError::Upload(_) => "Failed to store uploaded file".into(),
            other => other.to_string(),
        };
        (self.status(), body)
    }
}
