//! Role classification for authenticated callers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The role derived from a caller's email address.
///
/// A role is never stored; it is recomputed from the identity store on every
/// request. An email belongs to at most one profile table, so exactly one
/// variant applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The email belongs to an employee profile.
    Employee,
    /// The email belongs to a support staff profile.
    Support,
    /// The email is not present in either profile table.
    Unknown,
}

impl Role {
    /// Return the lowercase string form of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Support => "support",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
