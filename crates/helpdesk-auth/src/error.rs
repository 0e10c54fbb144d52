//! Error types for credential handling.

use thiserror::Error;

/// A result type using `AuthError`.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while hashing credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The hash computation itself failed.
    #[error("credential hashing failed: {0}")]
    Hash(String),
}
