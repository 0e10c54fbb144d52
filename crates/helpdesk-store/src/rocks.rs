//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store`
//! trait. Commits serialize behind a writer lock so that uniqueness guards
//! and the batched write apply as one unit; reads take no lock.

use std::path::Path;
use std::sync::Arc;

use helpdesk_core::{EmailAddr, EmployeeId, IssueId, SupportId};
use parking_lot::Mutex;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::txn::{Guard, Op, Txn};
use crate::types::{Account, EmployeeProfile, Issue, SupportProfile};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path.as_ref(), cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::info!(path = %path.as_ref().display(), "Opened helpdesk database");

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Point lookup + deserialize against one column family.
    fn get_record<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        key: &[u8],
    ) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// True if the key exists in the column family.
    fn key_exists(&self, cf_name: &str, key: &[u8]) -> Result<bool> {
        let cf = self.cf(cf_name)?;
        Ok(self
            .db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some())
    }

    /// Evaluate a uniqueness guard against the current database state.
    fn check_guard(&self, guard: &Guard) -> Result<()> {
        match guard {
            Guard::EmailFree(email) => {
                let taken = self.key_exists(cf::ACCOUNTS, &keys::account_key(email))?
                    || self.key_exists(cf::EMPLOYEES_BY_EMAIL, &keys::employee_email_key(email))?
                    || self.key_exists(cf::SUPPORT_BY_EMAIL, &keys::support_email_key(email))?;
                if taken {
                    return Err(StoreError::EmailTaken(email.clone()));
                }
            }
            Guard::EmployeeIdFree(id) => {
                if self.key_exists(cf::EMPLOYEES, &keys::employee_key(*id))? {
                    return Err(StoreError::EmployeeIdTaken(*id));
                }
            }
            Guard::SupportIdFree(id) => {
                if self.key_exists(cf::SUPPORT_STAFF, &keys::support_key(*id))? {
                    return Err(StoreError::SupportIdTaken(*id));
                }
            }
        }
        Ok(())
    }

    /// Translate one row operation into batch writes, including index
    /// maintenance. Reads see the pre-transaction state, which is what the
    /// index bookkeeping needs.
    fn apply_op(&self, batch: &mut WriteBatch, op: Op) -> Result<()> {
        match op {
            Op::PutAccount(account) => {
                let cf = self.cf(cf::ACCOUNTS)?;
                let value = Self::serialize(&account)?;
                batch.put_cf(&cf, keys::account_key(&account.email), value);
            }
            Op::DeleteAccount(email) => {
                let key = keys::account_key(&email);
                if !self.key_exists(cf::ACCOUNTS, &key)? {
                    return Err(StoreError::NotFound);
                }
                let cf = self.cf(cf::ACCOUNTS)?;
                batch.delete_cf(&cf, key);
            }
            Op::PutEmployee(profile) => {
                let cf_employees = self.cf(cf::EMPLOYEES)?;
                let cf_by_email = self.cf(cf::EMPLOYEES_BY_EMAIL)?;

                let key = keys::employee_key(profile.employee_id);
                // Drop the stale email index entry on rename.
                let old: Option<EmployeeProfile> = self.get_record(cf::EMPLOYEES, &key)?;
                if let Some(old) = old {
                    if old.email != profile.email {
                        batch.delete_cf(&cf_by_email, keys::employee_email_key(&old.email));
                    }
                }

                let value = Self::serialize(&profile)?;
                batch.put_cf(&cf_employees, &key, value);
                batch.put_cf(
                    &cf_by_email,
                    keys::employee_email_key(&profile.email),
                    profile.employee_id.to_be_bytes(),
                );
            }
            Op::DeleteEmployee(employee_id) => {
                let key = keys::employee_key(employee_id);
                let profile: EmployeeProfile = self
                    .get_record(cf::EMPLOYEES, &key)?
                    .ok_or(StoreError::NotFound)?;

                let cf_employees = self.cf(cf::EMPLOYEES)?;
                let cf_by_email = self.cf(cf::EMPLOYEES_BY_EMAIL)?;
                batch.delete_cf(&cf_employees, key);
                batch.delete_cf(&cf_by_email, keys::employee_email_key(&profile.email));
            }
            Op::PutSupport(profile) => {
                let cf_support = self.cf(cf::SUPPORT_STAFF)?;
                let cf_by_email = self.cf(cf::SUPPORT_BY_EMAIL)?;

                let key = keys::support_key(profile.support_id);
                let old: Option<SupportProfile> = self.get_record(cf::SUPPORT_STAFF, &key)?;
                if let Some(old) = old {
                    if old.email != profile.email {
                        batch.delete_cf(&cf_by_email, keys::support_email_key(&old.email));
                    }
                }

                let value = Self::serialize(&profile)?;
                batch.put_cf(&cf_support, &key, value);
                batch.put_cf(
                    &cf_by_email,
                    keys::support_email_key(&profile.email),
                    profile.support_id.to_be_bytes(),
                );
            }
            Op::DeleteSupport(support_id) => {
                let key = keys::support_key(support_id);
                let profile: SupportProfile = self
                    .get_record(cf::SUPPORT_STAFF, &key)?
                    .ok_or(StoreError::NotFound)?;

                let cf_support = self.cf(cf::SUPPORT_STAFF)?;
                let cf_by_email = self.cf(cf::SUPPORT_BY_EMAIL)?;
                batch.delete_cf(&cf_support, key);
                batch.delete_cf(&cf_by_email, keys::support_email_key(&profile.email));
            }
            Op::PutIssue(issue) => {
                let cf_issues = self.cf(cf::ISSUES)?;
                let cf_by_reporter = self.cf(cf::ISSUES_BY_REPORTER)?;

                let value = Self::serialize(&issue)?;
                batch.put_cf(&cf_issues, keys::issue_key(&issue.issue_id), value);
                // Reporter IDs are immutable, so this put is idempotent.
                batch.put_cf(
                    &cf_by_reporter,
                    keys::reporter_issue_key(issue.reporter_id, &issue.issue_id),
                    [],
                );
            }
            Op::DeleteIssue(issue_id) => {
                let key = keys::issue_key(&issue_id);
                let issue: Issue = self
                    .get_record(cf::ISSUES, &key)?
                    .ok_or(StoreError::NotFound)?;

                let cf_issues = self.cf(cf::ISSUES)?;
                let cf_by_reporter = self.cf(cf::ISSUES_BY_REPORTER)?;
                batch.delete_cf(&cf_issues, key);
                batch.delete_cf(
                    &cf_by_reporter,
                    keys::reporter_issue_key(issue.reporter_id, &issue_id),
                );
            }
        }
        Ok(())
    }
}

impl Store for RocksStore {
    fn get_account(&self, email: &EmailAddr) -> Result<Option<Account>> {
        self.get_record(cf::ACCOUNTS, &keys::account_key(email))
    }

    fn get_employee(&self, employee_id: EmployeeId) -> Result<Option<EmployeeProfile>> {
        self.get_record(cf::EMPLOYEES, &keys::employee_key(employee_id))
    }

    fn get_employee_by_email(&self, email: &EmailAddr) -> Result<Option<EmployeeProfile>> {
        let cf = self.cf(cf::EMPLOYEES_BY_EMAIL)?;
        let id_bytes = self
            .db
            .get_cf(&cf, keys::employee_email_key(email))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        match id_bytes {
            Some(bytes) if bytes.len() == 4 => {
                let mut arr = [0u8; 4];
                arr.copy_from_slice(&bytes);
                self.get_employee(EmployeeId::from_be_bytes(arr))
            }
            Some(_) => Err(StoreError::Database(
                "malformed employee email index entry".to_string(),
            )),
            None => Ok(None),
        }
    }

    fn get_support(&self, support_id: SupportId) -> Result<Option<SupportProfile>> {
        self.get_record(cf::SUPPORT_STAFF, &keys::support_key(support_id))
    }

    fn get_support_by_email(&self, email: &EmailAddr) -> Result<Option<SupportProfile>> {
        let cf = self.cf(cf::SUPPORT_BY_EMAIL)?;
        let id_bytes = self
            .db
            .get_cf(&cf, keys::support_email_key(email))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        match id_bytes {
            Some(bytes) if bytes.len() == 4 => {
                let mut arr = [0u8; 4];
                arr.copy_from_slice(&bytes);
                self.get_support(SupportId::from_be_bytes(arr))
            }
            Some(_) => Err(StoreError::Database(
                "malformed support email index entry".to_string(),
            )),
            None => Ok(None),
        }
    }

    fn list_support_staff(&self) -> Result<Vec<SupportProfile>> {
        let cf = self.cf(cf::SUPPORT_STAFF)?;

        let mut staff = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            staff.push(Self::deserialize(&value)?);
        }

        Ok(staff)
    }

    fn get_issue(&self, issue_id: &IssueId) -> Result<Option<Issue>> {
        self.get_record(cf::ISSUES, &keys::issue_key(issue_id))
    }

    fn list_issues_by_reporter(&self, employee_id: EmployeeId) -> Result<Vec<Issue>> {
        let cf_by_reporter = self.cf(cf::ISSUES_BY_REPORTER)?;
        let prefix = keys::reporter_prefix(employee_id);

        let mut issues = Vec::new();
        let iter = self.db.iterator_cf(
            &cf_by_reporter,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            // Stop once we're past the prefix.
            if !key.starts_with(&prefix) {
                break;
            }

            let issue_id = keys::extract_issue_id_from_reporter_issue_key(&key);
            if let Some(issue) = self.get_issue(&issue_id)? {
                issues.push(issue);
            }
        }

        Ok(issues)
    }

    fn list_all_issues(&self) -> Result<Vec<Issue>> {
        let cf = self.cf(cf::ISSUES)?;

        let mut issues = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            issues.push(Self::deserialize(&value)?);
        }

        Ok(issues)
    }

    fn commit(&self, txn: Txn) -> Result<()> {
        if txn.is_empty() {
            return Ok(());
        }

        // Guards and the batched write must observe the same state.
        let _write = self.write_lock.lock();

        for guard in &txn.guards {
            self.check_guard(guard)?;
        }

        let op_count = txn.len();
        let mut batch = WriteBatch::default();
        for op in txn.ops {
            self.apply_op(&mut batch, op)?;
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(ops = op_count, "Committed transaction");

        Ok(())
    }
}
