//! Helpdesk service implementation.
//!
//! This module provides the [`Helpdesk`] trait and [`HelpdeskService`]
//! implementation that coordinates registration, role-based issue access
//! and the consistency propagation around account changes.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use helpdesk_auth::CredentialVerifier;
use helpdesk_core::{AccountId, EmailAddr, IssueId, Role};
use helpdesk_store::{Account, EmployeeProfile, Issue, Store, SupportProfile, Txn};

use crate::assign;
use crate::error::{HelpdeskError, Result};
use crate::lifecycle;
use crate::propagate;
use crate::roles::{self, RoleProfile};
use crate::types::{
    CreateIssueRequest, HelpdeskConfig, IssuePatch, RegisterEmployeeRequest,
    RegisterSupportRequest,
};

/// Trait defining the helpdesk operations.
///
/// Every operation takes the authenticated caller's email as supplied by the
/// session layer and derives the caller's role internally; nothing here
/// trusts a caller-provided role.
#[async_trait]
pub trait Helpdesk: Send + Sync {
    // =========================================================================
    // Registration and Accounts
    // =========================================================================

    /// Register an employee: one account plus one profile, atomically.
    ///
    /// # Errors
    ///
    /// Returns `EmailAlreadyInUse` or `EmployeeIdAlreadyInUse` on key
    /// collisions, `InvalidRequest` on blank fields.
    async fn register_employee(&self, request: RegisterEmployeeRequest)
        -> Result<EmployeeProfile>;

    /// Register a support staff member: one account plus one profile,
    /// atomically.
    ///
    /// # Errors
    ///
    /// Returns `EmailAlreadyInUse` or `SupportIdAlreadyInUse` on key
    /// collisions, `InvalidRequest` on blank fields.
    async fn register_support(&self, request: RegisterSupportRequest) -> Result<SupportProfile>;

    /// Check a login attempt and return the caller's role on success.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` for an unknown email or a wrong
    /// password; the two cases are deliberately indistinguishable.
    async fn verify_credentials(&self, email: &EmailAddr, password: &str) -> Result<Role>;

    /// Resolve the role classification of an email.
    async fn resolve_role(&self, email: &EmailAddr) -> Result<Role>;

    /// Re-hash and store a new password for an existing account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the email is not registered.
    async fn change_password(&self, email: &EmailAddr, new_password: &str) -> Result<()>;

    /// Move an account to a new email, rewriting every denormalized copy.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or `EmailAlreadyInUse`; on collision no
    /// row is modified.
    async fn change_email(&self, old: &EmailAddr, new: &EmailAddr) -> Result<()>;

    /// Delete an account, its profile and (for employees) every issue they
    /// reported, atomically.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the email is not registered.
    async fn delete_account(&self, email: &EmailAddr) -> Result<()>;

    // =========================================================================
    // Issue Lifecycle
    // =========================================================================

    /// Create a new issue reported by the calling employee.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` unless the caller is an employee,
    /// `IdentityIncomplete` if the profile cannot be snapshotted, and
    /// `NoSupportStaffAvailable` if the assignment pool is empty (nothing
    /// is persisted in that case).
    async fn create_issue(&self, reporter: &EmailAddr, request: CreateIssueRequest)
        -> Result<Issue>;

    /// Fetch an issue. Allowed for its reporter and for any support user.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` for a missing id, `Forbidden` otherwise.
    async fn get_issue(&self, caller: &EmailAddr, issue_id: &IssueId) -> Result<Issue>;

    /// List the calling employee's own issues.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` unless the caller is an employee.
    async fn list_my_issues(&self, caller: &EmailAddr) -> Result<Vec<Issue>>;

    /// List every issue. Support staff only.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` unless the caller is support.
    async fn list_all_issues(&self, caller: &EmailAddr) -> Result<Vec<Issue>>;

    /// Apply a field-level patch to an issue.
    ///
    /// The reporting employee may patch category and description; support
    /// may patch status, which also re-stamps the assignee to the acting
    /// support user. Any other field/role combination is `Forbidden` and
    /// leaves the issue unmodified.
    async fn update_issue(
        &self,
        caller: &EmailAddr,
        issue_id: &IssueId,
        patch: IssuePatch,
    ) -> Result<Issue>;

    /// Delete an issue. Only its reporter may do this; support cannot.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` for a missing id, `Forbidden` for any
    /// caller other than the reporter.
    async fn delete_issue(&self, caller: &EmailAddr, issue_id: &IssueId) -> Result<()>;
}

/// The main helpdesk service implementation.
pub struct HelpdeskService<S: Store> {
    store: Arc<S>,
    verifier: Arc<dyn CredentialVerifier>,
    config: HelpdeskConfig,
}

impl<S: Store> HelpdeskService<S> {
    /// Create a new helpdesk service.
    #[must_use]
    pub fn new(store: Arc<S>, verifier: Arc<dyn CredentialVerifier>, config: HelpdeskConfig) -> Self {
        Self {
            store,
            verifier,
            config,
        }
    }

    /// Create with default configuration.
    #[must_use]
    pub fn with_defaults(store: Arc<S>, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self::new(store, verifier, HelpdeskConfig::default())
    }

    /// Get a reference to the store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &HelpdeskConfig {
        &self.config
    }

    fn require_nonblank(field: &'static str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(HelpdeskError::InvalidRequest(format!(
                "{field} must not be blank"
            )));
        }
        Ok(())
    }

    fn validate_description(&self, description: &str) -> Result<()> {
        Self::require_nonblank("description", description)?;
        if description.chars().count() > self.config.max_description_chars {
            return Err(HelpdeskError::InvalidRequest(format!(
                "description exceeds {} characters",
                self.config.max_description_chars
            )));
        }
        Ok(())
    }

    /// Every field that gets snapshotted into an issue must be present.
    fn check_snapshot_complete(profile: &EmployeeProfile) -> Result<()> {
        if profile.name.trim().is_empty() || profile.location.trim().is_empty() {
            return Err(HelpdeskError::IdentityIncomplete(profile.employee_id));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: Store + 'static> Helpdesk for HelpdeskService<S> {
    // =========================================================================
    // Registration and Accounts
    // =========================================================================

    async fn register_employee(
        &self,
        request: RegisterEmployeeRequest,
    ) -> Result<EmployeeProfile> {
        Self::require_nonblank("name", &request.name)?;
        Self::require_nonblank("phone", &request.phone)?;
        Self::require_nonblank("location", &request.location)?;
        Self::require_nonblank("password", &request.password)?;

        // Early checks give a clear error; the guards below re-check under
        // the writer lock to close the race with concurrent registrations.
        if self.store.get_account(&request.email)?.is_some() {
            return Err(HelpdeskError::EmailAlreadyInUse(request.email));
        }
        if self.store.get_employee(request.employee_id)?.is_some() {
            return Err(HelpdeskError::EmployeeIdAlreadyInUse(request.employee_id));
        }

        let credential = self.verifier.hash(&request.password)?;
        let now = Utc::now();
        let profile = EmployeeProfile {
            employee_id: request.employee_id,
            name: request.name,
            email: request.email.clone(),
            phone: request.phone,
            location: request.location,
            created_at: now,
        };

        let mut txn = Txn::new();
        txn.expect_email_free(request.email.clone());
        txn.expect_employee_id_free(request.employee_id);
        txn.put_account(Account {
            account_id: AccountId::generate(),
            email: request.email,
            credential,
            created_at: now,
        });
        txn.put_employee(profile.clone());

        self.store.commit(txn).map_err(HelpdeskError::from_commit)?;

        tracing::info!(
            employee_id = %profile.employee_id,
            email = %profile.email,
            "Registered employee"
        );

        Ok(profile)
    }

    async fn register_support(&self, request: RegisterSupportRequest) -> Result<SupportProfile> {
        Self::require_nonblank("name", &request.name)?;
        Self::require_nonblank("password", &request.password)?;

        if self.store.get_account(&request.email)?.is_some() {
            return Err(HelpdeskError::EmailAlreadyInUse(request.email));
        }
        if self.store.get_support(request.support_id)?.is_some() {
            return Err(HelpdeskError::SupportIdAlreadyInUse(request.support_id));
        }

        let credential = self.verifier.hash(&request.password)?;
        let now = Utc::now();
        let profile = SupportProfile {
            support_id: request.support_id,
            name: request.name,
            email: request.email.clone(),
            created_at: now,
        };

        let mut txn = Txn::new();
        txn.expect_email_free(request.email.clone());
        txn.expect_support_id_free(request.support_id);
        txn.put_account(Account {
            account_id: AccountId::generate(),
            email: request.email,
            credential,
            created_at: now,
        });
        txn.put_support(profile.clone());

        self.store.commit(txn).map_err(HelpdeskError::from_commit)?;

        tracing::info!(
            support_id = %profile.support_id,
            email = %profile.email,
            "Registered support staff"
        );

        Ok(profile)
    }

    async fn verify_credentials(&self, email: &EmailAddr, password: &str) -> Result<Role> {
        let Some(account) = self.store.get_account(email)? else {
            return Err(HelpdeskError::InvalidCredentials);
        };
        if !self.verifier.verify(&account.credential, password) {
            return Err(HelpdeskError::InvalidCredentials);
        }
        Ok(roles::resolve(&*self.store, email)?.role())
    }

    async fn resolve_role(&self, email: &EmailAddr) -> Result<Role> {
        Ok(roles::resolve(&*self.store, email)?.role())
    }

    async fn change_password(&self, email: &EmailAddr, new_password: &str) -> Result<()> {
        Self::require_nonblank("password", new_password)?;

        let account = self
            .store
            .get_account(email)?
            .ok_or_else(|| HelpdeskError::AccountNotFound(email.clone()))?;

        let credential = self.verifier.hash(new_password)?;
        let mut txn = Txn::new();
        txn.put_account(Account {
            credential,
            ..account
        });
        self.store.commit(txn)?;

        tracing::info!(email = %email, "Changed password");

        Ok(())
    }

    async fn change_email(&self, old: &EmailAddr, new: &EmailAddr) -> Result<()> {
        propagate::change_email(&*self.store, old, new)?;
        Ok(())
    }

    async fn delete_account(&self, email: &EmailAddr) -> Result<()> {
        propagate::delete_account(&*self.store, email)?;
        Ok(())
    }

    // =========================================================================
    // Issue Lifecycle
    // =========================================================================

    async fn create_issue(
        &self,
        reporter: &EmailAddr,
        request: CreateIssueRequest,
    ) -> Result<Issue> {
        let RoleProfile::Employee(profile) = roles::resolve(&*self.store, reporter)? else {
            return Err(HelpdeskError::Forbidden);
        };
        Self::check_snapshot_complete(&profile)?;
        self.validate_description(&request.description)?;

        let staff = self.store.list_support_staff()?;
        let assignee = assign::pick_assignee(&staff)?;

        let now = Utc::now();
        let issue = Issue {
            issue_id: IssueId::generate(),
            reporter_id: profile.employee_id,
            reporter_name: profile.name.clone(),
            reporter_email: profile.email.clone(),
            reporter_location: profile.location.clone(),
            category: request.category,
            description: request.description,
            status: lifecycle::INITIAL_STATUS,
            assigned_to: assignee.name.clone(),
            created_at: now,
            updated_at: now,
        };

        let mut txn = Txn::new();
        txn.put_issue(issue.clone());
        self.store.commit(txn)?;

        tracing::info!(
            issue_id = %issue.issue_id,
            reporter = %issue.reporter_email,
            category = %issue.category,
            assigned_to = %issue.assigned_to,
            "Created issue"
        );

        Ok(issue)
    }

    async fn get_issue(&self, caller: &EmailAddr, issue_id: &IssueId) -> Result<Issue> {
        let issue = self
            .store
            .get_issue(issue_id)?
            .ok_or(HelpdeskError::IssueNotFound(*issue_id))?;

        if issue.reporter_email == *caller {
            return Ok(issue);
        }
        match roles::resolve(&*self.store, caller)?.role() {
            Role::Support => Ok(issue),
            Role::Employee | Role::Unknown => Err(HelpdeskError::Forbidden),
        }
    }

    async fn list_my_issues(&self, caller: &EmailAddr) -> Result<Vec<Issue>> {
        let RoleProfile::Employee(profile) = roles::resolve(&*self.store, caller)? else {
            return Err(HelpdeskError::Forbidden);
        };
        Ok(self.store.list_issues_by_reporter(profile.employee_id)?)
    }

    async fn list_all_issues(&self, caller: &EmailAddr) -> Result<Vec<Issue>> {
        let RoleProfile::Support(_) = roles::resolve(&*self.store, caller)? else {
            return Err(HelpdeskError::Forbidden);
        };
        Ok(self.store.list_all_issues()?)
    }

    async fn update_issue(
        &self,
        caller: &EmailAddr,
        issue_id: &IssueId,
        patch: IssuePatch,
    ) -> Result<Issue> {
        if patch.is_empty() {
            return Err(HelpdeskError::InvalidRequest(
                "patch changes nothing".to_string(),
            ));
        }

        let mut issue = self
            .store
            .get_issue(issue_id)?
            .ok_or(HelpdeskError::IssueNotFound(*issue_id))?;

        match roles::resolve(&*self.store, caller)? {
            RoleProfile::Employee(profile) => {
                if issue.reporter_id != profile.employee_id {
                    return Err(HelpdeskError::Forbidden);
                }
                if patch.touches_status() {
                    return Err(HelpdeskError::Forbidden);
                }
                if let Some(category) = patch.category {
                    issue.category = category;
                }
                if let Some(description) = patch.description {
                    self.validate_description(&description)?;
                    issue.description = description;
                }
            }
            RoleProfile::Support(profile) => {
                if patch.touches_details() {
                    return Err(HelpdeskError::Forbidden);
                }
                let Some(target) = patch.status else {
                    return Err(HelpdeskError::Forbidden);
                };
                if !lifecycle::support_may_set(issue.status, target) {
                    return Err(HelpdeskError::Forbidden);
                }
                issue.status = target;
                // Whoever last touches the status becomes the recorded owner.
                issue.assigned_to = profile.name;
            }
            RoleProfile::Unknown => return Err(HelpdeskError::Forbidden),
        }

        issue.updated_at = Utc::now();

        let mut txn = Txn::new();
        txn.put_issue(issue.clone());
        self.store.commit(txn)?;

        tracing::info!(
            issue_id = %issue.issue_id,
            caller = %caller,
            status = %issue.status,
            "Updated issue"
        );

        Ok(issue)
    }

    async fn delete_issue(&self, caller: &EmailAddr, issue_id: &IssueId) -> Result<()> {
        let issue = self
            .store
            .get_issue(issue_id)?
            .ok_or(HelpdeskError::IssueNotFound(*issue_id))?;

        // Only the reporter may delete; support users cannot.
        if issue.reporter_email != *caller {
            return Err(HelpdeskError::Forbidden);
        }

        let mut txn = Txn::new();
        txn.delete_issue(*issue_id);
        self.store.commit(txn)?;

        tracing::info!(issue_id = %issue_id, caller = %caller, "Deleted issue");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_auth::StaticVerifier;
    use helpdesk_core::{EmployeeId, SupportId};
    use helpdesk_store::{Category, IssueStatus, RocksStore};
    use tempfile::TempDir;

    fn setup() -> (HelpdeskService<RocksStore>, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(RocksStore::open(dir.path()).unwrap());
        let service = HelpdeskService::with_defaults(store, Arc::new(StaticVerifier));
        (service, dir)
    }

    fn email(s: &str) -> EmailAddr {
        s.parse().unwrap()
    }

    fn employee_request(id: u32, addr: &str, name: &str) -> RegisterEmployeeRequest {
        RegisterEmployeeRequest {
            employee_id: EmployeeId::new(id),
            name: name.to_string(),
            email: email(addr),
            phone: "555-0100".to_string(),
            location: "Building A".to_string(),
            password: "pw".to_string(),
        }
    }

    fn support_request(id: u32, addr: &str, name: &str) -> RegisterSupportRequest {
        RegisterSupportRequest {
            support_id: SupportId::new(id),
            name: name.to_string(),
            email: email(addr),
            password: "pw".to_string(),
        }
    }

    async fn seed_alice_and_bob(service: &HelpdeskService<RocksStore>) {
        service
            .register_employee(employee_request(7, "alice@x.com", "Alice"))
            .await
            .unwrap();
        service
            .register_support(support_request(1, "bob@x.com", "Bob"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_issue_snapshots_reporter() {
        let (service, _dir) = setup();
        seed_alice_and_bob(&service).await;

        let issue = service
            .create_issue(
                &email("alice@x.com"),
                CreateIssueRequest::new(Category::Hardware, "laptop broken"),
            )
            .await
            .unwrap();

        assert_eq!(issue.reporter_id, EmployeeId::new(7));
        assert_eq!(issue.reporter_name, "Alice");
        assert_eq!(issue.reporter_email, email("alice@x.com"));
        assert_eq!(issue.reporter_location, "Building A");
        assert_eq!(issue.status, IssueStatus::Reported);
        assert_eq!(issue.assigned_to, "Bob");
    }

    #[tokio::test]
    async fn create_issue_without_support_staff_persists_nothing() {
        let (service, _dir) = setup();
        service
            .register_employee(employee_request(7, "alice@x.com", "Alice"))
            .await
            .unwrap();

        let result = service
            .create_issue(
                &email("alice@x.com"),
                CreateIssueRequest::new(Category::Network, "vpn down"),
            )
            .await;

        assert!(matches!(
            result,
            Err(HelpdeskError::NoSupportStaffAvailable)
        ));
        assert!(service.store().list_all_issues().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_issue_with_incomplete_profile_is_rejected() {
        let (service, _dir) = setup();
        seed_alice_and_bob(&service).await;

        // A profile written before the location field was required; the
        // snapshot cannot be taken from it.
        let mut txn = Txn::new();
        txn.put_employee(EmployeeProfile {
            employee_id: EmployeeId::new(8),
            name: "Carol".to_string(),
            email: email("carol@x.com"),
            phone: "555-0101".to_string(),
            location: String::new(),
            created_at: Utc::now(),
        });
        service.store().commit(txn).unwrap();

        let result = service
            .create_issue(
                &email("carol@x.com"),
                CreateIssueRequest::new(Category::Other, "no location on file"),
            )
            .await;
        assert!(matches!(
            result,
            Err(HelpdeskError::IdentityIncomplete(id)) if id == EmployeeId::new(8)
        ));
        assert!(service.store().list_all_issues().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_issue_requires_employee_role() {
        let (service, _dir) = setup();
        seed_alice_and_bob(&service).await;

        let request = CreateIssueRequest::new(Category::Other, "something");
        let as_support = service.create_issue(&email("bob@x.com"), request.clone()).await;
        assert!(matches!(as_support, Err(HelpdeskError::Forbidden)));

        let as_unknown = service.create_issue(&email("nobody@x.com"), request).await;
        assert!(matches!(as_unknown, Err(HelpdeskError::Forbidden)));
    }

    #[tokio::test]
    async fn get_issue_permissions() {
        let (service, _dir) = setup();
        seed_alice_and_bob(&service).await;
        service
            .register_employee(employee_request(8, "carol@x.com", "Carol"))
            .await
            .unwrap();

        let issue = service
            .create_issue(
                &email("alice@x.com"),
                CreateIssueRequest::new(Category::Software, "excel crashes"),
            )
            .await
            .unwrap();

        // Reporter and support can read it.
        assert!(service
            .get_issue(&email("alice@x.com"), &issue.issue_id)
            .await
            .is_ok());
        assert!(service
            .get_issue(&email("bob@x.com"), &issue.issue_id)
            .await
            .is_ok());

        // Another employee cannot.
        assert!(matches!(
            service
                .get_issue(&email("carol@x.com"), &issue.issue_id)
                .await,
            Err(HelpdeskError::Forbidden)
        ));

        // Missing id.
        assert!(matches!(
            service
                .get_issue(&email("alice@x.com"), &IssueId::generate())
                .await,
            Err(HelpdeskError::IssueNotFound(_))
        ));
    }

    #[tokio::test]
    async fn listings_are_role_gated() {
        let (service, _dir) = setup();
        seed_alice_and_bob(&service).await;
        service
            .register_employee(employee_request(8, "carol@x.com", "Carol"))
            .await
            .unwrap();

        for _ in 0..2 {
            service
                .create_issue(
                    &email("alice@x.com"),
                    CreateIssueRequest::new(Category::Hardware, "screen flicker"),
                )
                .await
                .unwrap();
        }
        service
            .create_issue(
                &email("carol@x.com"),
                CreateIssueRequest::new(Category::Printing, "paper jam"),
            )
            .await
            .unwrap();

        assert_eq!(
            service
                .list_my_issues(&email("alice@x.com"))
                .await
                .unwrap()
                .len(),
            2
        );
        assert_eq!(
            service
                .list_my_issues(&email("carol@x.com"))
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            service
                .list_all_issues(&email("bob@x.com"))
                .await
                .unwrap()
                .len(),
            3
        );

        // Support has no "mine"; employees can't list everything.
        assert!(matches!(
            service.list_my_issues(&email("bob@x.com")).await,
            Err(HelpdeskError::Forbidden)
        ));
        assert!(matches!(
            service.list_all_issues(&email("alice@x.com")).await,
            Err(HelpdeskError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn employee_update_edits_details_not_status() {
        let (service, _dir) = setup();
        seed_alice_and_bob(&service).await;

        let issue = service
            .create_issue(
                &email("alice@x.com"),
                CreateIssueRequest::new(Category::Hardware, "laptop broken"),
            )
            .await
            .unwrap();

        let updated = service
            .update_issue(
                &email("alice@x.com"),
                &issue.issue_id,
                IssuePatch::details(
                    Some(Category::Software),
                    Some("actually a driver problem".to_string()),
                ),
            )
            .await
            .unwrap();
        assert_eq!(updated.category, Category::Software);
        assert_eq!(updated.description, "actually a driver problem");
        assert_eq!(updated.status, IssueStatus::Reported);

        // Status is off-limits for the reporter.
        let result = service
            .update_issue(
                &email("alice@x.com"),
                &issue.issue_id,
                IssuePatch::status(IssueStatus::Resolved),
            )
            .await;
        assert!(matches!(result, Err(HelpdeskError::Forbidden)));

        let stored = service.store().get_issue(&issue.issue_id).unwrap().unwrap();
        assert_eq!(stored.status, IssueStatus::Reported);
    }

    #[tokio::test]
    async fn support_update_sets_status_and_restamps_assignee() {
        let (service, _dir) = setup();
        seed_alice_and_bob(&service).await;
        service
            .register_support(support_request(2, "dave@x.com", "Dave"))
            .await
            .unwrap();

        let issue = service
            .create_issue(
                &email("alice@x.com"),
                CreateIssueRequest::new(Category::Network, "wifi drops"),
            )
            .await
            .unwrap();

        let updated = service
            .update_issue(
                &email("dave@x.com"),
                &issue.issue_id,
                IssuePatch::status(IssueStatus::InProgress),
            )
            .await
            .unwrap();

        assert_eq!(updated.status, IssueStatus::InProgress);
        // Whoever updates the status last owns the issue.
        assert_eq!(updated.assigned_to, "Dave");

        // Support may not touch the reporter's fields.
        let result = service
            .update_issue(
                &email("dave@x.com"),
                &issue.issue_id,
                IssuePatch::details(None, Some("rewritten".to_string())),
            )
            .await;
        assert!(matches!(result, Err(HelpdeskError::Forbidden)));

        let stored = service.store().get_issue(&issue.issue_id).unwrap().unwrap();
        assert_eq!(stored.description, "wifi drops");
    }

    #[tokio::test]
    async fn support_can_reopen_resolved_issue() {
        let (service, _dir) = setup();
        seed_alice_and_bob(&service).await;

        let issue = service
            .create_issue(
                &email("alice@x.com"),
                CreateIssueRequest::new(Category::Software, "login loop"),
            )
            .await
            .unwrap();

        for status in [
            IssueStatus::Resolved,
            IssueStatus::Reported, // Regression is allowed by design.
            IssueStatus::InProgress,
        ] {
            let updated = service
                .update_issue(
                    &email("bob@x.com"),
                    &issue.issue_id,
                    IssuePatch::status(status),
                )
                .await
                .unwrap();
            assert_eq!(updated.status, status);
        }
    }

    #[tokio::test]
    async fn rejected_update_leaves_issue_unmodified() {
        let (service, _dir) = setup();
        seed_alice_and_bob(&service).await;
        service
            .register_employee(employee_request(8, "carol@x.com", "Carol"))
            .await
            .unwrap();

        let issue = service
            .create_issue(
                &email("alice@x.com"),
                CreateIssueRequest::new(Category::Hardware, "keyboard dead"),
            )
            .await
            .unwrap();

        // A non-reporter employee and an unknown caller both bounce off.
        for caller in ["carol@x.com", "stranger@x.com"] {
            let result = service
                .update_issue(
                    &email(caller),
                    &issue.issue_id,
                    IssuePatch::details(Some(Category::Other), None),
                )
                .await;
            assert!(matches!(result, Err(HelpdeskError::Forbidden)));
        }

        let stored = service.store().get_issue(&issue.issue_id).unwrap().unwrap();
        assert_eq!(stored.category, Category::Hardware);
        assert_eq!(stored.description, "keyboard dead");
        assert_eq!(stored.updated_at, issue.updated_at);
    }

    #[tokio::test]
    async fn empty_patch_is_rejected() {
        let (service, _dir) = setup();
        seed_alice_and_bob(&service).await;

        let issue = service
            .create_issue(
                &email("alice@x.com"),
                CreateIssueRequest::new(Category::Other, "misc"),
            )
            .await
            .unwrap();

        let result = service
            .update_issue(&email("alice@x.com"), &issue.issue_id, IssuePatch::default())
            .await;
        assert!(matches!(result, Err(HelpdeskError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn delete_is_reporter_only() {
        let (service, _dir) = setup();
        seed_alice_and_bob(&service).await;

        let issue = service
            .create_issue(
                &email("alice@x.com"),
                CreateIssueRequest::new(Category::Hardware, "mouse missing"),
            )
            .await
            .unwrap();

        // Support cannot delete.
        assert!(matches!(
            service.delete_issue(&email("bob@x.com"), &issue.issue_id).await,
            Err(HelpdeskError::Forbidden)
        ));

        service
            .delete_issue(&email("alice@x.com"), &issue.issue_id)
            .await
            .unwrap();

        assert!(matches!(
            service.get_issue(&email("alice@x.com"), &issue.issue_id).await,
            Err(HelpdeskError::IssueNotFound(_))
        ));
        assert!(matches!(
            service.delete_issue(&email("alice@x.com"), &issue.issue_id).await,
            Err(HelpdeskError::IssueNotFound(_))
        ));
    }

    #[tokio::test]
    async fn registration_collisions_are_rejected() {
        let (service, _dir) = setup();
        seed_alice_and_bob(&service).await;

        // Same email, either table.
        assert!(matches!(
            service
                .register_employee(employee_request(9, "alice@x.com", "Alice Two"))
                .await,
            Err(HelpdeskError::EmailAlreadyInUse(_))
        ));
        assert!(matches!(
            service
                .register_support(support_request(3, "alice@x.com", "Impostor"))
                .await,
            Err(HelpdeskError::EmailAlreadyInUse(_))
        ));

        // Same business keys.
        assert!(matches!(
            service
                .register_employee(employee_request(7, "eve@x.com", "Eve"))
                .await,
            Err(HelpdeskError::EmployeeIdAlreadyInUse(_))
        ));
        assert!(matches!(
            service
                .register_support(support_request(1, "frank@x.com", "Frank"))
                .await,
            Err(HelpdeskError::SupportIdAlreadyInUse(_))
        ));
    }

    #[tokio::test]
    async fn description_limits_are_enforced() {
        let (service, _dir) = setup();
        seed_alice_and_bob(&service).await;

        let blank = service
            .create_issue(
                &email("alice@x.com"),
                CreateIssueRequest::new(Category::Other, "   "),
            )
            .await;
        assert!(matches!(blank, Err(HelpdeskError::InvalidRequest(_))));

        let oversized = "x".repeat(service.config().max_description_chars + 1);
        let too_long = service
            .create_issue(
                &email("alice@x.com"),
                CreateIssueRequest::new(Category::Other, oversized),
            )
            .await;
        assert!(matches!(too_long, Err(HelpdeskError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn registration_rejects_blank_fields() {
        let (service, _dir) = setup();

        let mut request = employee_request(7, "alice@x.com", "Alice");
        request.location = "   ".to_string();

        assert!(matches!(
            service.register_employee(request).await,
            Err(HelpdeskError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn verify_credentials_roundtrip() {
        let (service, _dir) = setup();
        seed_alice_and_bob(&service).await;

        let role = service
            .verify_credentials(&email("alice@x.com"), "pw")
            .await
            .unwrap();
        assert_eq!(role, Role::Employee);

        assert!(matches!(
            service.verify_credentials(&email("alice@x.com"), "wrong").await,
            Err(HelpdeskError::InvalidCredentials)
        ));
        assert!(matches!(
            service.verify_credentials(&email("ghost@x.com"), "pw").await,
            Err(HelpdeskError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn change_password_takes_effect() {
        let (service, _dir) = setup();
        seed_alice_and_bob(&service).await;

        service
            .change_password(&email("alice@x.com"), "better-pw")
            .await
            .unwrap();

        assert!(service
            .verify_credentials(&email("alice@x.com"), "better-pw")
            .await
            .is_ok());
        assert!(matches!(
            service.verify_credentials(&email("alice@x.com"), "pw").await,
            Err(HelpdeskError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn resolve_role_totality() {
        let (service, _dir) = setup();
        seed_alice_and_bob(&service).await;

        assert_eq!(
            service.resolve_role(&email("alice@x.com")).await.unwrap(),
            Role::Employee
        );
        assert_eq!(
            service.resolve_role(&email("bob@x.com")).await.unwrap(),
            Role::Support
        );
        assert_eq!(
            service.resolve_role(&email("nobody@x.com")).await.unwrap(),
            Role::Unknown
        );
    }
}
