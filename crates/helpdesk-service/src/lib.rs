//! Helpdesk service layer.
//!
//! This crate holds the business rules of the ticketing platform: who may
//! see, change and delete an issue, how new issues get assigned, and how
//! account identity changes propagate into the denormalized issue rows.
//! It speaks to persistence only through the [`helpdesk_store::Store`]
//! trait and to password handling only through
//! [`helpdesk_auth::CredentialVerifier`], both injected at construction.
//!
//! # Architecture
//!
//! ```text
//!                 ┌─────────────────────────────┐
//!   session layer │        HelpdeskService       │
//!  ──────────────►│  roles ─ assign ─ lifecycle  │
//!                 │          propagate           │
//!                 └──────┬───────────────┬──────┘
//!                        │               │
//!                  Store (RocksDB)  CredentialVerifier
//! ```
//!
//! Roles are derived per request from the identity tables, never stored or
//! trusted from the caller. Every multi-row mutation goes through a single
//! atomic store transaction.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod assign;
pub mod error;
pub mod lifecycle;
pub mod propagate;
pub mod roles;
pub mod service;
pub mod types;

pub use error::{HelpdeskError, Result};
pub use roles::RoleProfile;
pub use service::{Helpdesk, HelpdeskService};
pub use types::{
    CreateIssueRequest, HelpdeskConfig, IssuePatch, RegisterEmployeeRequest,
    RegisterSupportRequest,
};
