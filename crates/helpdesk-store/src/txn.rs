//! Transactional write-sets.
//!
//! A [`Txn`] collects row operations across entities plus uniqueness guards,
//! and is applied atomically by [`crate::Store::commit`]. The service layer
//! builds one transaction per logical operation (registration, issue update,
//! email rename, account deletion) so that multi-row rewrites never land
//! partially.

use helpdesk_core::{EmailAddr, EmployeeId, IssueId, SupportId};

use crate::types::{Account, EmployeeProfile, Issue, SupportProfile};

/// A single row operation within a transaction.
#[derive(Debug, Clone)]
pub(crate) enum Op {
    PutAccount(Account),
    DeleteAccount(EmailAddr),
    PutEmployee(EmployeeProfile),
    DeleteEmployee(EmployeeId),
    PutSupport(SupportProfile),
    DeleteSupport(SupportId),
    PutIssue(Issue),
    DeleteIssue(IssueId),
}

/// A uniqueness guard, re-checked under the writer lock at commit time.
#[derive(Debug, Clone)]
pub(crate) enum Guard {
    /// The email must not appear in accounts or either email index.
    EmailFree(EmailAddr),
    /// The employee business key must be unregistered.
    EmployeeIdFree(EmployeeId),
    /// The support business key must be unregistered.
    SupportIdFree(SupportId),
}

/// An atomic write-set over the helpdesk store.
#[derive(Debug, Default, Clone)]
pub struct Txn {
    pub(crate) ops: Vec<Op>,
    pub(crate) guards: Vec<Guard>,
}

impl Txn {
    /// Create an empty transaction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the transaction carries no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of row operations in the transaction.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Insert or replace an account record.
    pub fn put_account(&mut self, account: Account) {
        self.ops.push(Op::PutAccount(account));
    }

    /// Delete the account keyed by this email.
    pub fn delete_account(&mut self, email: EmailAddr) {
        self.ops.push(Op::DeleteAccount(email));
    }

    /// Insert or replace an employee profile, maintaining the email index.
    pub fn put_employee(&mut self, profile: EmployeeProfile) {
        self.ops.push(Op::PutEmployee(profile));
    }

    /// Delete an employee profile and its email index entry.
    pub fn delete_employee(&mut self, employee_id: EmployeeId) {
        self.ops.push(Op::DeleteEmployee(employee_id));
    }

    /// Insert or replace a support profile, maintaining the email index.
    pub fn put_support(&mut self, profile: SupportProfile) {
        self.ops.push(Op::PutSupport(profile));
    }

    /// Delete a support profile and its email index entry.
    pub fn delete_support(&mut self, support_id: SupportId) {
        self.ops.push(Op::DeleteSupport(support_id));
    }

    /// Insert or replace an issue record, maintaining the reporter index.
    pub fn put_issue(&mut self, issue: Issue) {
        self.ops.push(Op::PutIssue(issue));
    }

    /// Delete an issue record and its reporter index entry.
    pub fn delete_issue(&mut self, issue_id: IssueId) {
        self.ops.push(Op::DeleteIssue(issue_id));
    }

    /// Require that the email is unregistered when the commit applies.
    pub fn expect_email_free(&mut self, email: EmailAddr) {
        self.guards.push(Guard::EmailFree(email));
    }

    /// Require that the employee business key is unregistered at commit.
    pub fn expect_employee_id_free(&mut self, employee_id: EmployeeId) {
        self.guards.push(Guard::EmployeeIdFree(employee_id));
    }

    /// Require that the support business key is unregistered at commit.
    pub fn expect_support_id_free(&mut self, support_id: SupportId) {
        self.guards.push(Guard::SupportIdFree(support_id));
    }
}
