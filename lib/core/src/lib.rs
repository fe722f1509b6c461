//! Core identifier types and utilities for gatehouse.
//!
//! This crate provides the strongly-typed identifiers and the shared error
//! handling alias used by the identity, authorization, and signature crates.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{GroupId, IdentityId, ParseIdError, PrivilegeId, UserId};
