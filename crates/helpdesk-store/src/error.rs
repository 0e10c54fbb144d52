//! Error types for the storage layer.

use helpdesk_core::{EmailAddr, EmployeeId, SupportId};
use thiserror::Error;

/// A result type using `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record was not found.
    #[error("record not found")]
    NotFound,

    /// A uniqueness guard failed: the email is already registered.
    #[error("email already in use: {0}")]
    EmailTaken(EmailAddr),

    /// A uniqueness guard failed: the employee ID is already registered.
    #[error("employee id already in use: {0}")]
    EmployeeIdTaken(EmployeeId),

    /// A uniqueness guard failed: the support ID is already registered.
    #[error("support id already in use: {0}")]
    SupportIdTaken(SupportId),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}
