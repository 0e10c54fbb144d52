//! `RocksDB` storage layer for the helpdesk platform.
//!
//! This crate provides persistent storage for accounts, employee and support
//! profiles, and issues, using `RocksDB` with column families for indexing.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `accounts`: Login accounts, keyed by normalized email
//! - `employees`: Employee profiles, keyed by `employee_id`
//! - `employees_by_email`: Index from email to `employee_id`
//! - `support_staff`: Support profiles, keyed by `support_id`
//! - `support_by_email`: Index from email to `support_id`
//! - `issues`: Primary issue records, keyed by `issue_id`
//! - `issues_by_reporter`: Index for listing issues by reporting employee
//!
//! All reads are point lookups or prefix scans. All writes go through a
//! [`Txn`] committed via [`Store::commit`]: the write-set is applied as a
//! single atomic `WriteBatch`, and uniqueness guards attached to the
//! transaction are re-checked under the store's writer lock immediately
//! before the batch is written. A failed guard aborts the whole commit.
//!
//! # Example
//!
//! ```no_run
//! use helpdesk_store::{RocksStore, Store, Txn};
//! use helpdesk_core::EmployeeId;
//!
//! let store = RocksStore::open("/tmp/helpdesk-db").unwrap();
//! let issues = store.list_issues_by_reporter(EmployeeId::new(7)).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;
pub mod txn;
pub mod types;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;
pub use txn::Txn;
pub use types::{Account, Category, EmployeeProfile, Issue, IssueStatus, SupportProfile};

use helpdesk_core::{EmailAddr, EmployeeId, IssueId, SupportId};

/// The storage trait defining all database operations.
///
/// Reads are individual point lookups and scans; every mutation is expressed
/// as a [`Txn`] and applied atomically by [`Store::commit`]. This keeps the
/// denormalized issue snapshots and the profile tables from ever diverging
/// part-way through a multi-row rewrite.
pub trait Store: Send + Sync {
    // =========================================================================
    // Account Operations
    // =========================================================================

    /// Get an account by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_account(&self, email: &EmailAddr) -> Result<Option<Account>>;

    // =========================================================================
    // Profile Operations
    // =========================================================================

    /// Get an employee profile by its business key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_employee(&self, employee_id: EmployeeId) -> Result<Option<EmployeeProfile>>;

    /// Get an employee profile by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_employee_by_email(&self, email: &EmailAddr) -> Result<Option<EmployeeProfile>>;

    /// Get a support profile by its business key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_support(&self, support_id: SupportId) -> Result<Option<SupportProfile>>;

    /// Get a support profile by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_support_by_email(&self, email: &EmailAddr) -> Result<Option<SupportProfile>>;

    /// List every registered support staff member.
    ///
    /// The assignment pool is expected to stay small; this is a full scan.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_support_staff(&self) -> Result<Vec<SupportProfile>>;

    // =========================================================================
    // Issue Operations
    // =========================================================================

    /// Get an issue by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_issue(&self, issue_id: &IssueId) -> Result<Option<Issue>>;

    /// List all issues reported by the given employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_issues_by_reporter(&self, employee_id: EmployeeId) -> Result<Vec<Issue>>;

    /// List every issue in the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_all_issues(&self) -> Result<Vec<Issue>>;

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Atomically apply a transaction.
    ///
    /// Guards are re-checked under the writer lock before anything is
    /// written; either every operation in the transaction is applied or
    /// none are.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EmailTaken`, `StoreError::EmployeeIdTaken` or
    /// `StoreError::SupportIdTaken` if a guard fails, `StoreError::NotFound`
    /// if a delete references a missing record, or a database error.
    fn commit(&self, txn: Txn) -> Result<()>;
}
