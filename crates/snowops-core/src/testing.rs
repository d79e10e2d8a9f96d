//! In-memory [`Store`] for unit tests, with fault injection.
//!
//! Writes inside [`Store::transact`] go to a staged copy of the state that
//! replaces the live state only on commit.

use std::sync::{
  Mutex,
  atomic::{AtomicUsize, Ordering},
};

use chrono::Utc;
use uuid::Uuid;

use crate::{
  Error, Result,
  fleet::{Driver, DriverFilter},
  organization::{Organization, OrganizationFilter},
  role::{OrgType, Role},
  store::{Store, UnitOfWork},
  user::{User, UserQuery},
};

#[derive(Debug, thiserror::Error)]
#[error("injected fault: {0}")]
pub struct Fault(&'static str);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
  Begin,
  InsertUser,
  Commit,
}

#[derive(Debug, Clone, Default)]
struct State {
  organizations: Vec<Organization>,
  users:         Vec<User>,
  drivers:       Vec<Driver>,
}

#[derive(Default)]
pub struct MemoryStore {
  state:    Mutex<State>,
  fail_at:  Mutex<Option<FailPoint>>,
  tx_count: AtomicUsize,
}

impl MemoryStore {
  pub fn seed_organization(&self, org: Organization) {
    self.state.lock().unwrap().organizations.push(org);
  }

  pub fn seed_user(&self, user: User) { self.state.lock().unwrap().users.push(user); }

  /// Make the next unit of work fail at `point`.
  pub fn fail_at(&self, point: FailPoint) { *self.fail_at.lock().unwrap() = Some(point); }

  pub fn transactions_opened(&self) -> usize { self.tx_count.load(Ordering::SeqCst) }

  pub fn organizations(&self, filter: &OrganizationFilter) -> Vec<Organization> {
    self
      .state
      .lock()
      .unwrap()
      .organizations
      .iter()
      .filter(|o| filter.parent_org_id.is_none_or(|p| o.parent_org_id == Some(p)))
      .filter(|o| filter.org_type.is_none_or(|t| o.org_type == t))
      .filter(|o| !filter.active_only || o.is_active)
      .cloned()
      .collect()
  }

  pub fn users(&self, query: &UserQuery) -> Vec<User> {
    self
      .state
      .lock()
      .unwrap()
      .users
      .iter()
      .filter(|u| query.phone.as_ref().is_none_or(|p| &u.phone == p))
      .filter(|u| query.login.as_ref().is_none_or(|l| u.login.as_ref() == Some(l)))
      .filter(|u| !query.active_only || u.is_active)
      .cloned()
      .collect()
  }

  pub fn drivers(&self, filter: &DriverFilter) -> Vec<Driver> {
    self
      .state
      .lock()
      .unwrap()
      .drivers
      .iter()
      .filter(|d| filter.contractor_id.is_none_or(|c| d.contractor_id == c))
      .filter(|d| !filter.active_only || d.is_active)
      .cloned()
      .collect()
  }
}

struct Staged<'a> {
  state:   &'a mut State,
  fail_at: Option<FailPoint>,
}

impl UnitOfWork for Staged<'_> {
  fn insert_organization(&mut self, org: &Organization) -> Result<()> {
    self.state.organizations.push(org.clone());
    Ok(())
  }

  fn insert_user(&mut self, user: &User) -> Result<()> {
    let duplicate = self.state.users.iter().any(|u| u.phone == user.phone);
    if self.fail_at == Some(FailPoint::InsertUser) || duplicate {
      return Err(Error::Write { entity: "user", source: Box::new(Fault("insert user")) });
    }
    self.state.users.push(user.clone());
    Ok(())
  }

  fn insert_driver(&mut self, driver: &Driver) -> Result<()> {
    self.state.drivers.push(driver.clone());
    Ok(())
  }
}

impl Store for MemoryStore {
  type Error = Fault;

  async fn get_organization(&self, id: Uuid) -> Result<Option<Organization>, Fault> {
    Ok(self.state.lock().unwrap().organizations.iter().find(|o| o.id == id).cloned())
  }

  async fn list_organizations(&self, filter: &OrganizationFilter) -> Result<Vec<Organization>, Fault> {
    Ok(self.organizations(filter))
  }

  async fn find_users(&self, query: &UserQuery) -> Result<Vec<User>, Fault> { Ok(self.users(query)) }

  async fn list_drivers(&self, filter: &DriverFilter) -> Result<Vec<Driver>, Fault> {
    Ok(self.drivers(filter))
  }

  async fn transact<T, F>(&self, work: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&mut dyn UnitOfWork) -> Result<T> + Send + 'static,
  {
    let fail_at = self.fail_at.lock().unwrap().take();
    if fail_at == Some(FailPoint::Begin) {
      return Err(Error::Begin(Box::new(Fault("begin"))));
    }
    self.tx_count.fetch_add(1, Ordering::SeqCst);

    let mut staged_state = self.state.lock().unwrap().clone();
    let value = work(&mut Staged { state: &mut staged_state, fail_at })?;

    if fail_at == Some(FailPoint::Commit) {
      return Err(Error::Commit(Box::new(Fault("commit"))));
    }
    *self.state.lock().unwrap() = staged_state;
    Ok(value)
  }
}

pub fn org(org_type: OrgType, parent: Option<Uuid>) -> Organization {
  let now = Utc::now();
  Organization {
    id: Uuid::new_v4(),
    name: format!("{org_type} organization"),
    org_type,
    bin: String::new(),
    head_full_name: String::new(),
    address: String::new(),
    phone: String::new(),
    parent_org_id: parent,
    is_active: true,
    created_at: now,
    updated_at: now,
  }
}

pub fn user(phone: &str, role: Role, organization_id: Option<Uuid>) -> User {
  let now = Utc::now();
  User {
    id: Uuid::new_v4(),
    phone: phone.to_owned(),
    role,
    login: None,
    password_hash: None,
    organization_id,
    driver_id: None,
    is_active: true,
    created_at: now,
    updated_at: now,
  }
}
