//! Assignment selection.
//!
//! New issues are handed to a uniformly random support staff member. The
//! choice is not seeded and carries no reproducibility contract; tests only
//! check that an empty pool is rejected and that the pick lands in the pool.

use helpdesk_store::SupportProfile;
use rand::seq::SliceRandom;

use crate::error::{HelpdeskError, Result};

/// Pick a support staff member to own a new issue.
///
/// # Errors
///
/// Returns `HelpdeskError::NoSupportStaffAvailable` if the candidate set is
/// empty. Creation must surface this to the caller instead of treating it as
/// a server fault.
pub fn pick_assignee(candidates: &[SupportProfile]) -> Result<&SupportProfile> {
    candidates
        .choose(&mut rand::thread_rng())
        .ok_or(HelpdeskError::NoSupportStaffAvailable)
}
