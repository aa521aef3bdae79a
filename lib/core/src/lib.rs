//! Core domain types and utilities for compliance-console.
//!
//! This crate provides the identifier newtypes and the error handling
//! foundation shared by the session core, the identity client and the server.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{CompanyId, ParseIdError, UserId};
