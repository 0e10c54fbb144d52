//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Login accounts, keyed by normalized email.
    pub const ACCOUNTS: &str = "accounts";

    /// Employee profiles, keyed by big-endian `employee_id`.
    pub const EMPLOYEES: &str = "employees";

    /// Index: email to `employee_id`.
    pub const EMPLOYEES_BY_EMAIL: &str = "employees_by_email";

    /// Support profiles, keyed by big-endian `support_id`.
    pub const SUPPORT_STAFF: &str = "support_staff";

    /// Index: email to `support_id`.
    pub const SUPPORT_BY_EMAIL: &str = "support_by_email";

    /// Primary issue records, keyed by `issue_id`.
    pub const ISSUES: &str = "issues";

    /// Index: issues by reporter, keyed by `employee_id || issue_id`.
    ///
    /// Keyed by the immutable employee ID rather than the denormalized
    /// email, so the index survives email renames untouched.
    pub const ISSUES_BY_REPORTER: &str = "issues_by_reporter";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::ACCOUNTS,
        cf::EMPLOYEES,
        cf::EMPLOYEES_BY_EMAIL,
        cf::SUPPORT_STAFF,
        cf::SUPPORT_BY_EMAIL,
        cf::ISSUES,
        cf::ISSUES_BY_REPORTER,
    ]
}
