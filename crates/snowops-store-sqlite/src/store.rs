//! The SQLite implementation of [`Store`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use snowops_core::{
  fleet::{Driver, DriverFilter},
  organization::{Organization, OrganizationFilter},
  store::{Store, UnitOfWork},
  user::{User, UserQuery},
};
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    DRIVER_COLUMNS, ORGANIZATION_COLUMNS, RawDriver, RawOrganization, RawUser, USER_COLUMNS,
    encode_dt, encode_opt_uuid, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A SnowOps store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Close the underlying connection. Every later call on this store or any
  /// clone of it fails.
  pub async fn close(&self) -> Result<()> {
    self.conn.clone().close().await?;
    tracing::debug!("store closed");
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("schema initialised");
    Ok(())
  }
}

// ─── Unit of work ────────────────────────────────────────────────────────────

/// Writes against an open transaction. Lives only inside
/// [`SqliteStore::transact`].
struct SqliteUnitOfWork<'a> {
  conn: &'a rusqlite::Connection,
}

fn write_failed(entity: &'static str) -> impl FnOnce(rusqlite::Error) -> snowops_core::Error {
  move |e| snowops_core::Error::Write { entity, source: Box::new(e) }
}

impl UnitOfWork for SqliteUnitOfWork<'_> {
  fn insert_organization(&mut self, org: &Organization) -> snowops_core::Result<()> {
    self
      .conn
      .execute(
        "INSERT INTO organizations (
           id, name, type, bin, head_full_name, address, phone,
           parent_org_id, is_active, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        rusqlite::params![
          encode_uuid(org.id),
          org.name,
          org.org_type.to_string(),
          org.bin,
          org.head_full_name,
          org.address,
          org.phone,
          encode_opt_uuid(org.parent_org_id),
          org.is_active,
          encode_dt(org.created_at),
          encode_dt(org.updated_at),
        ],
      )
      .map_err(write_failed("organization"))?;
    Ok(())
  }

  fn insert_user(&mut self, user: &User) -> snowops_core::Result<()> {
    self
      .conn
      .execute(
        "INSERT INTO users (
           id, phone, role, login, password_hash, organization_id,
           driver_id, is_active, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        rusqlite::params![
          encode_uuid(user.id),
          user.phone,
          user.role.to_string(),
          user.login,
          user.password_hash,
          encode_opt_uuid(user.organization_id),
          encode_opt_uuid(user.driver_id),
          user.is_active,
          encode_dt(user.created_at),
          encode_dt(user.updated_at),
        ],
      )
      .map_err(write_failed("user"))?;
    Ok(())
  }

  fn insert_driver(&mut self, driver: &Driver) -> snowops_core::Result<()> {
    self
      .conn
      .execute(
        "INSERT INTO drivers (
           id, contractor_id, full_name, iin, birth_year, phone,
           is_active, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
          encode_uuid(driver.id),
          encode_uuid(driver.contractor_id),
          driver.full_name,
          driver.iin,
          driver.birth_year,
          driver.phone,
          driver.is_active,
          encode_dt(driver.created_at),
          encode_dt(driver.updated_at),
        ],
      )
      .map_err(write_failed("driver"))?;
    Ok(())
  }
}

// ─── Store impl ──────────────────────────────────────────────────────────────

impl Store for SqliteStore {
  type Error = crate::Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_organization(&self, id: Uuid) -> Result<Option<Organization>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawOrganization> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE id = ?1"),
            rusqlite::params![id_str],
            RawOrganization::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawOrganization::into_organization).transpose()
  }

  async fn list_organizations(&self, filter: &OrganizationFilter) -> Result<Vec<Organization>> {
    let parent_str  = encode_opt_uuid(filter.parent_org_id);
    let type_str    = filter.org_type.map(|t| t.to_string());
    let active_only = filter.active_only;

    let raws: Vec<RawOrganization> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ORGANIZATION_COLUMNS} FROM organizations
           WHERE (?1 IS NULL OR parent_org_id = ?1)
             AND (?2 IS NULL OR type = ?2)
             AND (?3 = 0 OR is_active = 1)
           ORDER BY created_at, id"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![parent_str, type_str, active_only],
            RawOrganization::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawOrganization::into_organization).collect()
  }

  async fn find_users(&self, query: &UserQuery) -> Result<Vec<User>> {
    let phone       = query.phone.clone();
    let login       = query.login.clone();
    let active_only = query.active_only;

    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users
           WHERE (?1 IS NULL OR phone = ?1)
             AND (?2 IS NULL OR login = ?2)
             AND (?3 = 0 OR is_active = 1)
           ORDER BY created_at, id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![phone, login, active_only], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn list_drivers(&self, filter: &DriverFilter) -> Result<Vec<Driver>> {
    let contractor_str = encode_opt_uuid(filter.contractor_id);
    let active_only    = filter.active_only;

    let raws: Vec<RawDriver> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {DRIVER_COLUMNS} FROM drivers
           WHERE (?1 IS NULL OR contractor_id = ?1)
             AND (?2 = 0 OR is_active = 1)
           ORDER BY created_at, id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![contractor_str, active_only], RawDriver::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDriver::into_driver).collect()
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn transact<T, F>(&self, work: F) -> snowops_core::Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&mut dyn UnitOfWork) -> snowops_core::Result<T> + Send + 'static,
  {
    use snowops_core::Error as CoreError;

    // The transaction guard rolls back on drop, so every early return and
    // any panic inside `work` discards the writes.
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = match conn.transaction() {
          Ok(tx) => tx,
          Err(e) => return Ok(Err(CoreError::Begin(Box::new(e)))),
        };

        let value = {
          let mut uow = SqliteUnitOfWork { conn: &*tx };
          match work(&mut uow) {
            Ok(v) => v,
            Err(e) => return Ok(Err(e)),
          }
        };

        Ok(tx.commit().map(|()| value).map_err(|e| CoreError::Commit(Box::new(e))))
      })
      .await;

    // The closure never returns `Err`, so a failed call means the connection
    // thread is gone, either before `work` ran or while it was running.
    match outcome {
      Ok(result) => result,
      Err(e) => {
        tracing::error!(error = %e, "sqlite connection unavailable");
        Err(CoreError::store(e))
      }
    }
  }
}
