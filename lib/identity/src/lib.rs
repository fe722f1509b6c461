//! Principals and identity lookups for gatehouse.
//!
//! This crate provides:
//! - The per-request `Authorization` context
//! - Verified `Identity` records and the privileges they hold
//! - Local `User` accounts and their group memberships
//! - Store contracts (`IdentityStore`, `UserStore`) and in-memory implementations
//!
//! # Example
//!
//! ```
//! use gatehouse_core::{GroupId, UserId};
//! use gatehouse_identity::Authorization;
//!
//! let group = GroupId::new();
//! let auth = Authorization::for_user(UserId::new(), vec![group]);
//!
//! assert!(auth.is_authenticated());
//! assert!(!auth.is_identity());
//! assert!(auth.is_group_member(&[group]));
//! ```

pub mod authorization;
pub mod error;
pub mod identity;
pub mod memory;
pub mod store;
pub mod user;

pub use authorization::Authorization;
pub use error::StoreError;
pub use identity::Identity;
pub use memory::{MemoryIdentityStore, MemoryUserStore};
pub use store::{IdentityStore, UserStore};
pub use user::User;
