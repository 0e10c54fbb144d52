//! Issue status state machine.
//!
//! The machine is intentionally lax: support staff may set any of the three
//! statuses at any time, including regressing `Resolved` back to `Reported`
//! when a fix didn't hold. There is no terminal state. The checks below are
//! the single place that would enforce an ordering constraint if one were
//! ever introduced; callers must route status writes through them rather
//! than assigning the field directly.

use helpdesk_store::IssueStatus;

/// The status every issue starts in.
pub const INITIAL_STATUS: IssueStatus = IssueStatus::Reported;

/// Check whether support may move an issue from one status to another.
///
/// All nine pairings are allowed, regressions included.
#[must_use]
pub const fn support_may_set(from: IssueStatus, to: IssueStatus) -> bool {
    // Permissive on purpose. Keep the signature transition-shaped so a
    // future ordering rule lands here and nowhere else.
    let _ = (from, to);
    true
}
