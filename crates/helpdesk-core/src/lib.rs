//! Core types and utilities for the helpdesk platform.
//!
//! This crate provides the foundational types used throughout the helpdesk
//! workspace:
//!
//! - **Identifiers**: Strongly-typed IDs for issues, employees, support staff
//!   and accounts, plus a normalized email address type
//! - **Roles**: The role classification derived from a caller's email
//!
//! # Example
//!
//! ```
//! use helpdesk_core::{EmailAddr, EmployeeId, IssueId};
//!
//! // Parse and normalize an email address
//! let email: EmailAddr = "Alice@Example.COM".parse().unwrap();
//! assert_eq!(email.as_str(), "alice@example.com");
//!
//! // Business key chosen at registration
//! let employee_id = EmployeeId::new(7);
//!
//! // Generate an issue ID
//! let issue_id = IssueId::generate();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ids;
pub mod role;

pub use ids::{AccountId, EmailAddr, EmployeeId, IdError, IssueId, SupportId};
pub use role::Role;
