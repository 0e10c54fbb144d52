//! Consistency propagation for account identity changes.
//!
//! Issues carry denormalized reporter snapshots instead of joining against
//! the profile tables at read time. That makes every email change and
//! account deletion a multi-row rewrite, and this module is the single choke
//! point where those rewrites happen: each operation builds ONE transaction
//! covering the account, the profile, and every affected issue row, and
//! commits it atomically. A half-applied propagation is a data-corruption
//! bug, never an acceptable degraded state.

use helpdesk_core::{EmailAddr, Role};
use helpdesk_store::{Account, Store, Txn};

use crate::error::{HelpdeskError, Result};
use crate::roles::{self, RoleProfile};

/// Move an account (and everything denormalized from it) to a new email.
///
/// For employees this rewrites the `reporter_email` snapshot on every issue
/// they reported; support identity is only denormalized as a display name,
/// so support accounts need no issue rewrite.
///
/// # Errors
///
/// Returns `AccountNotFound` if `old` is not registered, and
/// `EmailAlreadyInUse` if `new` is held by any account or profile, checked
/// before any mutation and re-checked inside the committed transaction.
pub fn change_email<S: Store>(store: &S, old: &EmailAddr, new: &EmailAddr) -> Result<Role> {
    let account = store
        .get_account(old)?
        .ok_or_else(|| HelpdeskError::AccountNotFound(old.clone()))?;

    if old == new {
        // Nothing to rewrite, and the uniqueness guard would reject the
        // account's own email.
        return Ok(roles::resolve(store, old)?.role());
    }

    if store.get_account(new)?.is_some() {
        return Err(HelpdeskError::EmailAlreadyInUse(new.clone()));
    }

    let mut txn = Txn::new();
    txn.expect_email_free(new.clone());
    txn.delete_account(old.clone());
    txn.put_account(Account {
        email: new.clone(),
        ..account
    });

    let resolved = roles::resolve(store, old)?;
    let role = resolved.role();
    let mut rewritten = 0usize;

    match resolved {
        RoleProfile::Employee(mut profile) => {
            let issues = store.list_issues_by_reporter(profile.employee_id)?;
            profile.email = new.clone();
            txn.put_employee(profile);

            for mut issue in issues {
                issue.reporter_email = new.clone();
                txn.put_issue(issue);
                rewritten += 1;
            }
        }
        RoleProfile::Support(mut profile) => {
            profile.email = new.clone();
            txn.put_support(profile);
        }
        // An account without a profile has nothing denormalized.
        RoleProfile::Unknown => {}
    }

    store.commit(txn).map_err(HelpdeskError::from_commit)?;

    tracing::info!(
        old_email = %old,
        new_email = %new,
        role = %role,
        issues_rewritten = rewritten,
        "Propagated email change"
    );

    Ok(role)
}

/// Delete an account together with its profile and, for employees, every
/// issue they reported. All rows go in one atomic commit.
///
/// Support deletion leaves issues referencing the departed staff member's
/// display name; that dangling text is intentional, the assignee field has
/// no referential integrity.
///
/// # Errors
///
/// Returns `AccountNotFound` if the email is not registered.
pub fn delete_account<S: Store>(store: &S, email: &EmailAddr) -> Result<Role> {
    store
        .get_account(email)?
        .ok_or_else(|| HelpdeskError::AccountNotFound(email.clone()))?;

    let mut txn = Txn::new();
    let resolved = roles::resolve(store, email)?;
    let role = resolved.role();
    let mut cascaded = 0usize;

    match resolved {
        RoleProfile::Employee(profile) => {
            for issue in store.list_issues_by_reporter(profile.employee_id)? {
                txn.delete_issue(issue.issue_id);
                cascaded += 1;
            }
            txn.delete_employee(profile.employee_id);
        }
        RoleProfile::Support(profile) => {
            txn.delete_support(profile.support_id);
        }
        RoleProfile::Unknown => {}
    }
    txn.delete_account(email.clone());

    store.commit(txn)?;

    tracing::info!(
        email = %email,
        role = %role,
        issues_cascaded = cascaded,
        "Deleted account"
    );

    Ok(role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use helpdesk_auth::Credential;
    use helpdesk_core::{AccountId, EmployeeId, IssueId, SupportId};
    use helpdesk_store::{Category, EmployeeProfile, Issue, IssueStatus, RocksStore, SupportProfile};
    use tempfile::TempDir;

    fn email(s: &str) -> EmailAddr {
        s.parse().unwrap()
    }

    fn account(addr: &str) -> Account {
        Account {
            account_id: AccountId::generate(),
            email: email(addr),
            credential: Credential::from_encoded("static:pw".to_string()),
            created_at: Utc::now(),
        }
    }

    fn issue_for(profile: &EmployeeProfile) -> Issue {
        let now = Utc::now();
        Issue {
            issue_id: IssueId::generate(),
            reporter_id: profile.employee_id,
            reporter_name: profile.name.clone(),
            reporter_email: profile.email.clone(),
            reporter_location: profile.location.clone(),
            category: Category::Software,
            description: "vpn flaky".to_string(),
            status: IssueStatus::Reported,
            assigned_to: "Bob".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn setup() -> (RocksStore, TempDir, EmployeeProfile) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();

        let alice = EmployeeProfile {
            employee_id: EmployeeId::new(7),
            name: "Alice".to_string(),
            email: email("alice@x.com"),
            phone: "555-0100".to_string(),
            location: "HQ".to_string(),
            created_at: Utc::now(),
        };

        let mut txn = Txn::new();
        txn.put_account(account("alice@x.com"));
        txn.put_employee(alice.clone());
        txn.put_issue(issue_for(&alice));
        txn.put_issue(issue_for(&alice));
        store.commit(txn).unwrap();

        (store, dir, alice)
    }

    #[test]
    fn employee_rename_rewrites_every_issue() {
        let (store, _dir, alice) = setup();

        let role = change_email(&store, &email("alice@x.com"), &email("alice@y.com")).unwrap();
        assert_eq!(role, Role::Employee);

        let issues = store.list_issues_by_reporter(alice.employee_id).unwrap();
        assert_eq!(issues.len(), 2);
        for issue in &issues {
            assert_eq!(issue.reporter_email, email("alice@y.com"));
        }

        assert!(store.get_account(&email("alice@x.com")).unwrap().is_none());
        assert_eq!(
            store
                .get_employee_by_email(&email("alice@y.com"))
                .unwrap()
                .unwrap()
                .employee_id,
            alice.employee_id
        );
    }

    #[test]
    fn rename_collision_modifies_nothing() {
        let (store, _dir, alice) = setup();

        // Register the target email as a support account.
        let mut txn = Txn::new();
        txn.put_account(account("bob@x.com"));
        txn.put_support(SupportProfile {
            support_id: SupportId::new(1),
            name: "Bob".to_string(),
            email: email("bob@x.com"),
            created_at: Utc::now(),
        });
        store.commit(txn).unwrap();

        let result = change_email(&store, &email("alice@x.com"), &email("bob@x.com"));
        assert!(matches!(result, Err(HelpdeskError::EmailAlreadyInUse(_))));

        // Everything still under the old email.
        assert!(store.get_account(&email("alice@x.com")).unwrap().is_some());
        for issue in store.list_issues_by_reporter(alice.employee_id).unwrap() {
            assert_eq!(issue.reporter_email, email("alice@x.com"));
        }
    }

    #[test]
    fn rename_to_profile_only_email_is_rejected_by_guard() {
        let (store, _dir, _alice) = setup();

        // A profile row holding the target email without an account row;
        // the guard still has to catch it inside the transaction.
        let mut txn = Txn::new();
        txn.put_support(SupportProfile {
            support_id: SupportId::new(2),
            name: "Ghost".to_string(),
            email: email("ghost@x.com"),
            created_at: Utc::now(),
        });
        store.commit(txn).unwrap();

        let result = change_email(&store, &email("alice@x.com"), &email("ghost@x.com"));
        assert!(matches!(result, Err(HelpdeskError::EmailAlreadyInUse(_))));
        assert!(store.get_account(&email("alice@x.com")).unwrap().is_some());
    }

    #[test]
    fn rename_to_same_email_is_a_noop() {
        let (store, _dir, alice) = setup();
        let role = change_email(&store, &email("alice@x.com"), &email("alice@x.com")).unwrap();
        assert_eq!(role, Role::Employee);
        assert_eq!(
            store
                .list_issues_by_reporter(alice.employee_id)
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn rename_unknown_account_is_not_found() {
        let (store, _dir, _alice) = setup();
        let result = change_email(&store, &email("nobody@x.com"), &email("new@x.com"));
        assert!(matches!(result, Err(HelpdeskError::AccountNotFound(_))));
    }

    #[test]
    fn employee_deletion_cascades_issues() {
        let (store, _dir, alice) = setup();

        let role = delete_account(&store, &email("alice@x.com")).unwrap();
        assert_eq!(role, Role::Employee);

        assert!(store.get_account(&email("alice@x.com")).unwrap().is_none());
        assert!(store.get_employee(alice.employee_id).unwrap().is_none());
        assert!(store
            .list_issues_by_reporter(alice.employee_id)
            .unwrap()
            .is_empty());
        assert!(store.list_all_issues().unwrap().is_empty());
    }

    #[test]
    fn support_deletion_leaves_dangling_assignee_names() {
        let (store, _dir, _alice) = setup();

        let mut txn = Txn::new();
        txn.put_account(account("bob@x.com"));
        txn.put_support(SupportProfile {
            support_id: SupportId::new(1),
            name: "Bob".to_string(),
            email: email("bob@x.com"),
            created_at: Utc::now(),
        });
        store.commit(txn).unwrap();

        let role = delete_account(&store, &email("bob@x.com")).unwrap();
        assert_eq!(role, Role::Support);

        // Issues still show the departed assignee's name.
        let issues = store.list_all_issues().unwrap();
        assert_eq!(issues.len(), 2);
        for issue in &issues {
            assert_eq!(issue.assigned_to, "Bob");
        }
    }
}
