//! Error types for the lift services.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result type alias using the lift error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while turning a caller's request into validated values.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input or request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input or configuration failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::Validation(_) => 422,
        }
    }

    /// The offending field, when one is known.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidInput(_) => None,
            Self::Validation(e) => e.field(),
        }
    }
}
