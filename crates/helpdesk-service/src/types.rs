//! Request and configuration types for helpdesk operations.

use helpdesk_core::{EmailAddr, EmployeeId, SupportId};
use helpdesk_store::{Category, IssueStatus};
use serde::{Deserialize, Serialize};

/// Request to register a new employee account and profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterEmployeeRequest {
    /// Business key chosen by the employee; must be unused.
    pub employee_id: EmployeeId,
    /// Full name.
    pub name: String,
    /// Login email; must be unused across all accounts and profiles.
    pub email: EmailAddr,
    /// Contact phone number.
    pub phone: String,
    /// Office location.
    pub location: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
}

/// Request to register a new support staff account and profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterSupportRequest {
    /// Business key chosen at registration; must be unused.
    pub support_id: SupportId,
    /// Full name, shown as the assignee on issues.
    pub name: String,
    /// Login email; must be unused across all accounts and profiles.
    pub email: EmailAddr,
    /// Plaintext password, hashed before storage.
    pub password: String,
}

/// Request to create a new issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIssueRequest {
    /// Issue category.
    pub category: Category,
    /// Free-text description of the problem.
    pub description: String,
}

impl CreateIssueRequest {
    /// Create a request with the given category and description.
    #[must_use]
    pub fn new(category: Category, description: impl Into<String>) -> Self {
        Self {
            category,
            description: description.into(),
        }
    }
}

/// A field-level patch to an issue.
///
/// Which fields a caller may set depends on their role: the reporting
/// employee may patch `category` and `description`, support staff may patch
/// `status`. The service rejects any other combination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssuePatch {
    /// New category, if changing.
    #[serde(default)]
    pub category: Option<Category>,
    /// New description, if changing.
    #[serde(default)]
    pub description: Option<String>,
    /// New status, if changing.
    #[serde(default)]
    pub status: Option<IssueStatus>,
}

impl IssuePatch {
    /// A patch changing only the category and/or description.
    #[must_use]
    pub fn details(category: Option<Category>, description: Option<String>) -> Self {
        Self {
            category,
            description,
            status: None,
        }
    }

    /// A patch changing only the status.
    #[must_use]
    pub const fn status(status: IssueStatus) -> Self {
        Self {
            category: None,
            description: None,
            status: Some(status),
        }
    }

    /// Returns true if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.category.is_none() && self.description.is_none() && self.status.is_none()
    }

    /// Returns true if the patch touches reporter-editable fields.
    #[must_use]
    pub const fn touches_details(&self) -> bool {
        self.category.is_some() || self.description.is_some()
    }

    /// Returns true if the patch touches the status field.
    #[must_use]
    pub const fn touches_status(&self) -> bool {
        self.status.is_some()
    }
}

/// Configuration for the helpdesk service.
#[derive(Debug, Clone)]
pub struct HelpdeskConfig {
    /// Maximum accepted length of an issue description, in characters.
    pub max_description_chars: usize,
}

impl Default for HelpdeskConfig {
    fn default() -> Self {
        Self {
            max_description_chars: 4000,
        }
    }
}
