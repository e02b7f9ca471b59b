//! Error types shared by the run store, the run service and the user client.
//!
//! Every failure kind maps to a distinct HTTP status through
//! [`Error::status_code`], so the HTTP layer never has to guess.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors produced by run and user operations.
///
/// # Examples
///
/// ```
/// use runnerz::Error;
/// use axum::http::StatusCode;
///
/// let err = Error::NotFound { id: 7 };
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// assert_eq!(err.to_string(), "run not found: 7");
/// ```
#[derive(Debug, Error)]
pub enum Error {
    /// No run with the given id exists.
    #[error("run not found: {id}")]
    NotFound { id: i64 },

    /// The request failed shape or field validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A run with the given id is already stored.
    #[error("run already exists: {id}")]
    DuplicateKey { id: i64 },

    /// The remote user directory could not be reached or returned a payload
    /// that does not deserialize.
    #[error("remote request failed: {0}")]
    Remote(#[from] reqwest::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Infrastructure failure that is not a SQLite error (poisoned lock,
    /// panicked blocking task, unreadable seed file).
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Maps this error to the HTTP status the API answers with.
    ///
    /// - `404`: `NotFound`
    /// - `400`: `InvalidInput`
    /// - `409`: `DuplicateKey`
    /// - `502`: `Remote`
    /// - `500`: `Sqlite`, `Storage`
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateKey { .. } => StatusCode::CONFLICT,
            Self::Remote(_) => StatusCode::BAD_GATEWAY,
            Self::Sqlite(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        assert_eq!(Error::NotFound { id: 3 }.to_string(), "run not found: 3");
        assert_eq!(
            Error::DuplicateKey { id: 40 }.to_string(),
            "run already exists: 40"
        );
        assert_eq!(
            Error::InvalidInput("title must not be empty".to_string()).to_string(),
            "invalid input: title must not be empty"
        );
        assert_eq!(
            Error::Storage("lock poisoned".to_string()).to_string(),
            "storage error: lock poisoned"
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(Error::NotFound { id: 1 }.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::InvalidInput(String::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::DuplicateKey { id: 1 }.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::Sqlite(rusqlite::Error::QueryReturnedNoRows).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::Storage("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
