//! Error types for stay-scout

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{route} returned status {status}")]
    Status {
        route: String,
        status: reqwest::StatusCode,
    },

    #[error("You need to be signed in, for this action.")]
    Unauthorized,

    #[error("Sign in required before {0}")]
    AuthRequired(&'static str),

    #[error("Invalid review: {0}")]
    Validation(#[from] ValidationError),

    #[error("Token store error: {0}")]
    TokenStore(#[from] std::io::Error),

    #[error("Failed to encode or decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown city: '{0}'")]
    UnknownCity(String),

    #[error("Unknown sort strategy: '{0}'")]
    UnknownSort(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("comment must be 50 to 300 characters long, got {0}")]
    CommentLength(usize),

    #[error("rating must be between 1 and 5, got {0}")]
    Rating(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_converts() {
        let err: Error = ValidationError::Rating(0).into();
        assert!(matches!(err, Error::Validation(ValidationError::Rating(0))));
        assert_eq!(
            err.to_string(),
            "Invalid review: rating must be between 1 and 5, got 0"
        );
    }

    #[test]
    fn test_unauthorized_message() {
        assert_eq!(
            Error::Unauthorized.to_string(),
            "You need to be signed in, for this action."
        );
    }
}
