//! Access decisions for gatehouse.
//!
//! This crate answers two questions about a principal:
//! - May it perform a named action on a protected object? (`AccessEvaluator`)
//! - Which records may it see at all? (`permissions`)
//!
//! Protected objects take part by implementing [`AccessLister`]; the
//! evaluator never knows their concrete types. Policies map action IDs to one
//! [`AccessList`] per object state.

mod error;
mod evaluator;
mod lister;
mod permissions;
mod policy;
mod privilege;
mod role;

pub use error::{AccessError, PolicyError};
pub use evaluator::AccessEvaluator;
pub use lister::{AccessLister, AccessRecord, RoleGrants};
pub use permissions::{Grant, Permissions, permissions};
pub use policy::{AccessList, Action, Policy, PolicySource};
pub use role::Role;

#[cfg(test)]
mod test_support;
