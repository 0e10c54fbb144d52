//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions to encode and decode keys for the primary
//! column families and their indexes. Index keys are designed to support
//! efficient prefix scans.

use helpdesk_core::{EmailAddr, EmployeeId, IssueId, SupportId};

/// Encode an account key (the normalized email bytes).
#[must_use]
pub fn account_key(email: &EmailAddr) -> Vec<u8> {
    email.as_bytes().to_vec()
}

/// Encode an employee key (big-endian `employee_id`).
#[must_use]
pub fn employee_key(employee_id: EmployeeId) -> Vec<u8> {
    employee_id.to_be_bytes().to_vec()
}

/// Encode an email-to-employee index key.
#[must_use]
pub fn employee_email_key(email: &EmailAddr) -> Vec<u8> {
    email.as_bytes().to_vec()
}

/// Encode a support staff key (big-endian `support_id`).
#[must_use]
pub fn support_key(support_id: SupportId) -> Vec<u8> {
    support_id.to_be_bytes().to_vec()
}

/// Encode an email-to-support index key.
#[must_use]
pub fn support_email_key(email: &EmailAddr) -> Vec<u8> {
    email.as_bytes().to_vec()
}

/// Encode an issue key (the UUID bytes).
#[must_use]
pub fn issue_key(issue_id: &IssueId) -> Vec<u8> {
    issue_id.as_bytes().to_vec()
}

/// Encode a reporter-issue index key: `employee_id || issue_id`.
///
/// This allows efficient prefix scans for all issues reported by an
/// employee.
#[must_use]
pub fn reporter_issue_key(employee_id: EmployeeId, issue_id: &IssueId) -> Vec<u8> {
    let mut key = Vec::with_capacity(20);
    key.extend_from_slice(&employee_id.to_be_bytes());
    key.extend_from_slice(issue_id.as_bytes());
    key
}

/// Encode a reporter prefix for scanning all issues by reporter.
#[must_use]
pub fn reporter_prefix(employee_id: EmployeeId) -> Vec<u8> {
    employee_id.to_be_bytes().to_vec()
}

/// Extract the issue ID from a reporter-issue key.
///
/// # Panics
///
/// Panics if the key is not at least 20 bytes.
#[must_use]
pub fn extract_issue_id_from_reporter_issue_key(key: &[u8]) -> IssueId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[4..20]);
    IssueId::from_uuid(uuid::Uuid::from_bytes(bytes))
}
