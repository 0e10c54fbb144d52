//! Core identifier types for the helpdesk platform.
//!
//! This module provides strongly-typed identifiers for issues, employees,
//! support staff and accounts. All IDs are designed for efficient storage
//! and lookup: email addresses and numeric business keys double as store
//! keys, issue IDs are random UUIDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A normalized email address, used as the login identity and as the key
/// for role resolution.
///
/// Addresses are trimmed and lowercased on parse so that lookups are
/// case-insensitive. Validation is intentionally shallow (one `@` with a
/// non-empty local part and domain); anything stricter belongs to the
/// presentation layer.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddr(String);

impl EmailAddr {
    /// Parse and normalize an email address.
    ///
    /// # Errors
    ///
    /// Returns `IdError::InvalidEmail` if the input is empty or is not of
    /// the form `local@domain`.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        let normalized = s.trim().to_ascii_lowercase();
        let mut parts = normalized.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(IdError::InvalidEmail);
        }
        Ok(Self(normalized))
    }

    /// Return the normalized address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the normalized address as bytes, suitable for key encoding.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for EmailAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EmailAddr({})", self.0)
    }
}

impl fmt::Display for EmailAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EmailAddr {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EmailAddr {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmailAddr> for String {
    fn from(email: EmailAddr) -> Self {
        email.0
    }
}

impl AsRef<[u8]> for EmailAddr {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// The numeric business key an employee chooses at registration.
///
/// Employee IDs are immutable for the lifetime of the profile, which makes
/// them safe to embed in index keys even across email changes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(u32);

impl EmployeeId {
    /// Create an `EmployeeId` from its numeric value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Return the numeric value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Return the big-endian key encoding.
    #[must_use]
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Decode an `EmployeeId` from its big-endian key encoding.
    #[must_use]
    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }
}

impl fmt::Debug for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EmployeeId({})", self.0)
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EmployeeId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>().map(Self).map_err(|_| IdError::InvalidNumber)
    }
}

/// The numeric business key of a support staff member.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupportId(u32);

impl SupportId {
    /// Create a `SupportId` from its numeric value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Return the numeric value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Return the big-endian key encoding.
    #[must_use]
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Decode a `SupportId` from its big-endian key encoding.
    #[must_use]
    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }
}

impl fmt::Debug for SupportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SupportId({})", self.0)
    }
}

impl fmt::Display for SupportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SupportId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>().map(Self).map_err(|_| IdError::InvalidNumber)
    }
}

/// A 16-byte issue identifier based on UUID v4.
///
/// Issue IDs are randomly generated when an issue is created.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IssueId(uuid::Uuid);

impl IssueId {
    /// Create an `IssueId` from a UUID.
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random `IssueId`.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Return the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }

    /// Return the bytes of the UUID.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl FromStr for IssueId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = uuid::Uuid::parse_str(s).map_err(|_| IdError::InvalidUuid)?;
        Ok(Self(uuid))
    }
}

impl fmt::Debug for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IssueId({})", self.0)
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for IssueId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IssueId> for String {
    fn from(id: IssueId) -> Self {
        id.0.to_string()
    }
}

impl AsRef<[u8]> for IssueId {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// A 16-byte account identifier based on UUID v4.
///
/// The account's lookup key is its email address; this ID exists so that an
/// account keeps a stable identity across email changes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(uuid::Uuid);

impl AccountId {
    /// Create an `AccountId` from a UUID.
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random `AccountId`.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Return the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl FromStr for AccountId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = uuid::Uuid::parse_str(s).map_err(|_| IdError::InvalidUuid)?;
        Ok(Self(uuid))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for AccountId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0.to_string()
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is not a plausible email address.
    #[error("invalid email address")]
    InvalidEmail,

    /// The input is not a valid UUID.
    #[error("invalid UUID format")]
    InvalidUuid,

    /// The input is not a valid numeric ID.
    #[error("invalid numeric identifier")]
    InvalidNumber,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_normalizes_case_and_whitespace() {
        let email = EmailAddr::parse("  Alice@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn email_rejects_missing_at() {
        assert!(matches!(
            EmailAddr::parse("alice.example.com"),
            Err(IdError::InvalidEmail)
        ));
    }

    #[test]
    fn email_rejects_empty_sides() {
        assert!(EmailAddr::parse("@example.com").is_err());
        assert!(EmailAddr::parse("alice@").is_err());
        assert!(EmailAddr::parse("").is_err());
    }

    #[test]
    fn email_rejects_double_at() {
        assert!(EmailAddr::parse("alice@x@y.com").is_err());
    }

    #[test]
    fn email_serde_json() {
        let email = EmailAddr::parse("bob@x.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        let parsed: EmailAddr = serde_json::from_str(&json).unwrap();
        assert_eq!(email, parsed);
    }

    #[test]
    fn employee_id_key_roundtrip() {
        let id = EmployeeId::new(7);
        let decoded = EmployeeId::from_be_bytes(id.to_be_bytes());
        assert_eq!(id, decoded);
    }

    #[test]
    fn employee_id_key_ordering_is_big_endian() {
        // Prefix scans rely on numeric order matching byte order.
        assert!(EmployeeId::new(1).to_be_bytes() < EmployeeId::new(256).to_be_bytes());
    }

    #[test]
    fn support_id_parse() {
        let id: SupportId = "42".parse().unwrap();
        assert_eq!(id.as_u32(), 42);
        assert!(matches!(
            "forty-two".parse::<SupportId>(),
            Err(IdError::InvalidNumber)
        ));
    }

    #[test]
    fn issue_id_roundtrip() {
        let id = IssueId::generate();
        let str_repr = id.to_string();
        let parsed = IssueId::from_str(&str_repr).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn issue_id_invalid_uuid() {
        assert!(matches!(
            IssueId::from_str("not-a-uuid"),
            Err(IdError::InvalidUuid)
        ));
    }

    #[test]
    fn issue_id_serde_json() {
        let id = IssueId::generate();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: IssueId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn account_id_roundtrip() {
        let id = AccountId::generate();
        let parsed = AccountId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }
}
