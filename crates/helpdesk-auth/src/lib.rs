//! Credential hashing and verification for the helpdesk platform.
//!
//! The rest of the workspace treats a stored credential as an opaque token:
//! it is produced by [`CredentialVerifier::hash`] at registration, persisted
//! alongside the account, and checked with [`CredentialVerifier::verify`] at
//! login. Nothing else inspects it.
//!
//! # Example
//!
//! ```
//! use helpdesk_auth::{Argon2Verifier, CredentialVerifier};
//!
//! let verifier = Argon2Verifier::default();
//! let credential = verifier.hash("hunter2").unwrap();
//!
//! assert!(verifier.verify(&credential, "hunter2"));
//! assert!(!verifier.verify(&credential, "hunter3"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;

pub use error::{AuthError, Result};

use serde::{Deserialize, Serialize};

/// An opaque stored credential.
///
/// For the Argon2 verifier this is a PHC-format hash string, but callers
/// must not depend on the contents. The `Debug` impl redacts the value so
/// credentials never leak into logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Wrap an already-encoded credential, e.g. when loading fixtures.
    #[must_use]
    pub fn from_encoded(encoded: String) -> Self {
        Self(encoded)
    }

    /// Return the encoded form.
    #[must_use]
    pub fn as_encoded(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Hashes passwords into opaque credentials and checks them at login.
///
/// The trait exists so tests can swap in a cheap deterministic verifier;
/// production code uses [`Argon2Verifier`].
pub trait CredentialVerifier: Send + Sync {
    /// Hash a password into a storable credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying hash computation fails.
    fn hash(&self, password: &str) -> Result<Credential>;

    /// Check a password against a stored credential.
    ///
    /// A malformed stored credential counts as a mismatch rather than an
    /// error; the caller cannot do anything useful with the distinction.
    fn verify(&self, credential: &Credential, password: &str) -> bool;
}

/// Argon2id credential verifier with a per-credential random salt.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Verifier;

impl CredentialVerifier for Argon2Verifier {
    fn hash(&self, password: &str) -> Result<Credential> {
        use argon2::password_hash::rand_core::OsRng;
        use argon2::password_hash::SaltString;
        use argon2::{Argon2, PasswordHasher};

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hash(e.to_string()))?;
        Ok(Credential(hash.to_string()))
    }

    fn verify(&self, credential: &Credential, password: &str) -> bool {
        use argon2::{Argon2, PasswordHash, PasswordVerifier};

        let Ok(parsed) = PasswordHash::new(credential.as_encoded()) else {
            tracing::warn!("stored credential is not a valid PHC string");
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

/// A deterministic verifier for tests.
///
/// Stores the password with a fixed prefix instead of hashing it, so tests
/// avoid Argon2's deliberate slowness. Never use outside tests.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticVerifier;

#[cfg(any(test, feature = "test-utils"))]
impl CredentialVerifier for StaticVerifier {
    fn hash(&self, password: &str) -> Result<Credential> {
        Ok(Credential(format!("static:{password}")))
    }

    fn verify(&self, credential: &Credential, password: &str) -> bool {
        credential.as_encoded() == format!("static:{password}")
    }
}
