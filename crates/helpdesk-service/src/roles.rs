//! Role resolution.
//!
//! A caller's role is never stored; it is derived from the identity store on
//! every request via two indexed point lookups. Registration guarantees that
//! an email appears in at most one profile table, so the lookup order only
//! matters if that invariant is ever violated, in which case the employee
//! table takes precedence.

use helpdesk_core::{EmailAddr, Role};
use helpdesk_store::{EmployeeProfile, Store, SupportProfile};

use crate::error::Result;

/// The resolved role of a caller, carrying the matched profile.
#[derive(Debug, Clone)]
pub enum RoleProfile {
    /// The email belongs to this employee.
    Employee(EmployeeProfile),
    /// The email belongs to this support staff member.
    Support(SupportProfile),
    /// The email matches no profile.
    Unknown,
}

impl RoleProfile {
    /// The bare role classification.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Employee(_) => Role::Employee,
            Self::Support(_) => Role::Support,
            Self::Unknown => Role::Unknown,
        }
    }
}

/// Resolve the role of an email address. Employee lookup first, support
/// second, first match wins.
///
/// # Errors
///
/// Returns an error if a storage lookup fails.
pub fn resolve<S: Store>(store: &S, email: &EmailAddr) -> Result<RoleProfile> {
    if let Some(profile) = store.get_employee_by_email(email)? {
        return Ok(RoleProfile::Employee(profile));
    }
    if let Some(profile) = store.get_support_by_email(email)? {
        return Ok(RoleProfile::Support(profile));
    }
    Ok(RoleProfile::Unknown)
}
