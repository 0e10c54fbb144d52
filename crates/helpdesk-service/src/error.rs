//! Error types for helpdesk operations.
//!
//! Every variant except `Store`, `Auth` and `Internal` is a
//! recoverable-by-caller condition that the presentation layer renders as a
//! user-facing message. Storage failures stay opaque to the end user.

use helpdesk_core::{EmailAddr, EmployeeId, IssueId, SupportId};
use helpdesk_store::StoreError;
use thiserror::Error;

/// A result type using `HelpdeskError`.
pub type Result<T> = std::result::Result<T, HelpdeskError>;

/// Errors that can occur in helpdesk operations.
#[derive(Debug, Error)]
pub enum HelpdeskError {
    /// The caller's role or ownership does not permit the action.
    #[error("not permitted")]
    Forbidden,

    /// The requested issue was not found.
    #[error("issue not found: {0}")]
    IssueNotFound(IssueId),

    /// No account is registered under the given email.
    #[error("account not found: {0}")]
    AccountNotFound(EmailAddr),

    /// The reporting employee's profile is missing required fields.
    #[error("employee profile {0} is incomplete")]
    IdentityIncomplete(EmployeeId),

    /// An issue cannot be created because no support staff is registered.
    #[error("cannot create issue: no support staff registered")]
    NoSupportStaffAvailable,

    /// The email is already registered to another account.
    #[error("email already in use: {0}")]
    EmailAlreadyInUse(EmailAddr),

    /// The employee business key is already registered.
    #[error("employee id already in use: {0}")]
    EmployeeIdAlreadyInUse(EmployeeId),

    /// The support business key is already registered.
    #[error("support id already in use: {0}")]
    SupportIdAlreadyInUse(SupportId),

    /// Login failed: unknown email or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The request payload is malformed or violates a field constraint.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Storage layer error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Credential hashing error.
    #[error("credential error: {0}")]
    Auth(#[from] helpdesk_auth::AuthError),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HelpdeskError {
    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Forbidden => 403,
            Self::IssueNotFound(_) | Self::AccountNotFound(_) => 404,
            Self::InvalidCredentials => 401,
            Self::InvalidRequest(_) => 400,
            Self::IdentityIncomplete(_) => 422,
            Self::NoSupportStaffAvailable
            | Self::EmailAlreadyInUse(_)
            | Self::EmployeeIdAlreadyInUse(_)
            | Self::SupportIdAlreadyInUse(_) => 409,
            Self::Store(_) | Self::Auth(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns true if this error might be resolved by retrying.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Store(_) | Self::Internal(_))
    }

    /// Map store-level conflicts from a guarded commit to their
    /// caller-facing variants. Everything else stays a storage error.
    #[must_use]
    pub fn from_commit(err: StoreError) -> Self {
        match err {
            StoreError::EmailTaken(email) => Self::EmailAlreadyInUse(email),
            StoreError::EmployeeIdTaken(id) => Self::EmployeeIdAlreadyInUse(id),
            StoreError::SupportIdTaken(id) => Self::SupportIdAlreadyInUse(id),
            other => Self::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_codes() {
        let issue_id = IssueId::generate();
        let email: EmailAddr = "alice@x.com".parse().unwrap();

        assert_eq!(HelpdeskError::Forbidden.http_status_code(), 403);
        assert_eq!(HelpdeskError::IssueNotFound(issue_id).http_status_code(), 404);
        assert_eq!(
            HelpdeskError::AccountNotFound(email.clone()).http_status_code(),
            404
        );
        assert_eq!(
            HelpdeskError::NoSupportStaffAvailable.http_status_code(),
            409
        );
        assert_eq!(
            HelpdeskError::EmailAlreadyInUse(email).http_status_code(),
            409
        );
        assert_eq!(HelpdeskError::InvalidCredentials.http_status_code(), 401);
        assert_eq!(
            HelpdeskError::IdentityIncomplete(EmployeeId::new(7)).http_status_code(),
            422
        );
    }

    #[test]
    fn commit_conflicts_become_user_errors() {
        let email: EmailAddr = "bob@x.com".parse().unwrap();
        assert!(matches!(
            HelpdeskError::from_commit(StoreError::EmailTaken(email)),
            HelpdeskError::EmailAlreadyInUse(_)
        ));
        assert!(matches!(
            HelpdeskError::from_commit(StoreError::EmployeeIdTaken(EmployeeId::new(7))),
            HelpdeskError::EmployeeIdAlreadyInUse(_)
        ));
        assert!(matches!(
            HelpdeskError::from_commit(StoreError::Database("boom".to_string())),
            HelpdeskError::Store(_)
        ));
    }

    #[test]
    fn only_opaque_errors_are_retriable() {
        assert!(HelpdeskError::Internal("x".to_string()).is_retriable());
        assert!(!HelpdeskError::Forbidden.is_retriable());
        assert!(!HelpdeskError::NoSupportStaffAvailable.is_retriable());
    }
}
