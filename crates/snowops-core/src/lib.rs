//! Core types and access-control logic for SnowOps organization roles.
//!
//! Nothing here knows about HTTP or SQL. The crate owns the role taxonomy,
//! the hierarchy resolver, the visibility-scoped query gate
//! ([`directory::Directory`]) and the transactional provisioner
//! ([`provision::Provisioner`]). Storage is reached only through
//! [`store::Store`].

pub mod actor;
pub mod credential;
pub mod directory;
pub mod error;
pub mod fleet;
pub mod organization;
pub mod provision;
pub mod role;
pub mod scope;
pub mod store;
pub mod user;

#[cfg(test)]
mod testing;

pub use error::{Error, ErrorKind, Result};
