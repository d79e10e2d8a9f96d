//! The `Store` trait and the unit-of-work abstraction.
//!
//! The trait is implemented by storage backends (e.g. `snowops-store-sqlite`).
//! [`Directory`](crate::directory::Directory) and
//! [`Provisioner`](crate::provision::Provisioner) depend on this abstraction,
//! never on a concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  Result,
  fleet::{Driver, DriverFilter},
  organization::{Organization, OrganizationFilter},
  user::{User, UserQuery},
};

// ─── Unit of work ────────────────────────────────────────────────────────────

/// The writes available inside an atomic unit of work.
///
/// Implementations report failures as [`Error::Write`](crate::Error::Write)
/// naming the entity. Writes become visible only once the surrounding
/// [`Store::transact`] commits.
pub trait UnitOfWork {
  fn insert_organization(&mut self, org: &Organization) -> Result<()>;

  fn insert_user(&mut self, user: &User) -> Result<()>;

  fn insert_driver(&mut self, driver: &Driver) -> Result<()>;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a SnowOps storage backend.
///
/// Reads are not transactional; each may observe a different snapshot. All
/// multi-record writes go through [`Store::transact`].
pub trait Store: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Retrieve an organization by id regardless of activity. Returns `None`
  /// if not found.
  fn get_organization(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Organization>, Self::Error>> + Send + '_;

  fn list_organizations<'a>(
    &'a self,
    filter: &'a OrganizationFilter,
  ) -> impl Future<Output = Result<Vec<Organization>, Self::Error>> + Send + 'a;

  /// Users matching every set predicate of `query`, oldest first.
  fn find_users<'a>(
    &'a self,
    query: &'a UserQuery,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + 'a;

  /// Drivers matching `filter`, oldest first. No route lists drivers; this
  /// read exists so provisioning results can be inspected.
  fn list_drivers<'a>(
    &'a self,
    filter: &'a DriverFilter,
  ) -> impl Future<Output = Result<Vec<Driver>, Self::Error>> + Send + 'a;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Run `work` inside one atomic unit of work.
  ///
  /// If `work` returns `Ok`, the unit is committed and the value returned.
  /// On any error (including a panic inside `work`) every write made through
  /// the [`UnitOfWork`] is discarded. Failure to open the unit is reported as
  /// [`Error::Begin`](crate::Error::Begin); failure to commit as
  /// [`Error::Commit`](crate::Error::Commit). Losing the backend itself is
  /// [`Error::Store`](crate::Error::Store).
  fn transact<T, F>(&self, work: F) -> impl Future<Output = Result<T>> + Send + '_
  where
    T: Send + 'static,
    F: FnOnce(&mut dyn UnitOfWork) -> Result<T> + Send + 'static;
}
