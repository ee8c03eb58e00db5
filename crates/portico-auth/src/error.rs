//! Error types for authentication.

use thiserror::Error;

/// Authentication-specific errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid credentials.
    #[error("Invalid username or password.")]
    InvalidCredentials,

    /// Session not found or expired.
    #[error("session not found or expired")]
    SessionNotFound,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHashError,

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;
