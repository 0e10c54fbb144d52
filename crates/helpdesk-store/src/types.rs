//! Domain types stored in the database.
//!
//! These types represent the persisted state of accounts, profiles and
//! issues. Issues carry a denormalized snapshot of their reporter's
//! identity; the service layer keeps those snapshots consistent with the
//! profile tables.

use chrono::{DateTime, Utc};
use helpdesk_auth::Credential;
use helpdesk_core::{AccountId, EmailAddr, EmployeeId, IssueId, SupportId};
use serde::{Deserialize, Serialize};

/// A login account. One per human; keyed by normalized email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Stable identity of the account across email changes.
    pub account_id: AccountId,
    /// Unique login email. Mirrored into exactly one profile table.
    pub email: EmailAddr,
    /// Opaque stored credential.
    pub credential: Credential,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// An employee profile: the reporter side of an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeProfile {
    /// Business key chosen at registration; immutable thereafter.
    pub employee_id: EmployeeId,
    /// Full name.
    pub name: String,
    /// Unique email, mirrors the account email.
    pub email: EmailAddr,
    /// Contact phone number.
    pub phone: String,
    /// Office location, snapshotted into issues at creation time.
    pub location: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A support staff profile: the assignee side of an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportProfile {
    /// Business key chosen at registration; immutable thereafter.
    pub support_id: SupportId,
    /// Full name, recorded on issues as a display-only assignee reference.
    pub name: String,
    /// Unique email, mirrors the account email.
    pub email: EmailAddr,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Category of a reported issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Physical equipment faults.
    Hardware,
    /// Application or OS faults.
    Software,
    /// Connectivity faults.
    Network,
    /// Printer and print-queue faults.
    Printing,
    /// Anything that doesn't fit the above.
    Other,
}

impl Category {
    /// Return the lowercase string form of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hardware => "hardware",
            Self::Software => "software",
            Self::Network => "network",
            Self::Printing => "printing",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of an issue.
///
/// Created as `Reported`; only support staff change it afterwards. There is
/// deliberately no ordering constraint between the three values; support
/// may set any status at any time, including reopening a resolved issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum IssueStatus {
    /// Newly filed, waiting for support to pick it up.
    Reported = 1,
    /// Support is actively working on it.
    InProgress = 2,
    /// Support considers it fixed. Not terminal; remains editable.
    Resolved = 3,
}

impl IssueStatus {
    /// Convert the status to its numeric representation.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Try to convert a numeric value to an `IssueStatus`.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Reported),
            2 => Some(Self::InProgress),
            3 => Some(Self::Resolved),
            _ => None,
        }
    }
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Reported => "reported",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        };
        f.write_str(s)
    }
}

/// An issue record stored in the database.
///
/// The `reporter_*` fields are a denormalized snapshot of the reporting
/// employee taken at creation time and rewritten by the consistency
/// propagator when the employee's email changes. `assigned_to` is a
/// display-only name with no referential integrity: deleting or renaming
/// the support user leaves old issues showing the stale name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Unique identifier for the issue.
    pub issue_id: IssueId,
    /// Business key of the reporting employee; immutable, used for indexing.
    pub reporter_id: EmployeeId,
    /// Reporter name snapshot.
    pub reporter_name: String,
    /// Reporter email; kept equal to the current profile email.
    pub reporter_email: EmailAddr,
    /// Reporter location snapshot.
    pub reporter_location: String,
    /// Issue category.
    pub category: Category,
    /// Free-text description of the problem.
    pub description: String,
    /// Current lifecycle status.
    pub status: IssueStatus,
    /// Display name of the support user who last touched the issue.
    pub assigned_to: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}
