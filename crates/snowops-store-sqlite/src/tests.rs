//! Integration tests for `SqliteStore` against an in-memory database.

use std::sync::Arc;

use chrono::Utc;
use snowops_core::{
  Error as CoreError,
  actor::Actor,
  credential::Argon2Hasher,
  directory::Directory,
  fleet::DriverFilter,
  organization::{Organization, OrganizationFilter},
  provision::{NewDriver, NewOrganization, Provisioner},
  role::{OrgType, Role},
  store::Store,
  user::{User, UserLookup, UserQuery},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn organization(org_type: OrgType, parent: Option<Uuid>, name: &str) -> Organization {
  let now = Utc::now();
  Organization {
    id:             Uuid::new_v4(),
    name:           name.into(),
    org_type,
    bin:            "123456789012".into(),
    head_full_name: "Head".into(),
    address:        "Astana".into(),
    phone:          "+77170000000".into(),
    parent_org_id:  parent,
    is_active:      true,
    created_at:     now,
    updated_at:     now,
  }
}

fn account(phone: &str, role: Role, organization_id: Option<Uuid>) -> User {
  let now = Utc::now();
  User {
    id: Uuid::new_v4(),
    phone: phone.into(),
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

async fn seed(s: &SqliteStore, org: &Organization) {
  let org = org.clone();
  s.transact(move |uow| uow.insert_organization(&org)).await.unwrap();
}

async fn seed_user(s: &SqliteStore, user: &User) {
  let user = user.clone();
  s.transact(move |uow| uow.insert_user(&user)).await.unwrap();
}

async fn org_count(s: &SqliteStore) -> usize {
  s.list_organizations(&OrganizationFilter::default()).await.unwrap().len()
}

// ─── Organizations ───────────────────────────────────────────────────────────

#[tokio::test]
async fn organization_roundtrip() {
  let s = store().await;
  let akimat = organization(OrgType::Akimat, None, "Astana Akimat");
  seed(&s, &akimat).await;

  let fetched = s.get_organization(akimat.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, akimat.id);
  assert_eq!(fetched.org_type, OrgType::Akimat);
  assert_eq!(fetched.name, "Astana Akimat");
  assert_eq!(fetched.parent_org_id, None);
  assert!(fetched.is_active);
}

#[tokio::test]
async fn get_organization_missing_returns_none() {
  let s = store().await;
  assert!(s.get_organization(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn tombstoned_organization_is_still_readable_by_id() {
  let s = store().await;
  let mut dead = organization(OrgType::Akimat, None, "Old");
  dead.is_active = false;
  seed(&s, &dead).await;

  let fetched = s.get_organization(dead.id).await.unwrap().unwrap();
  assert!(!fetched.is_active);
}

#[tokio::test]
async fn list_organizations_filters() {
  let s = store().await;
  let akimat = organization(OrgType::Akimat, None, "A");
  let too = organization(OrgType::Too, Some(akimat.id), "T");
  let c1 = organization(OrgType::Contractor, Some(too.id), "C1");
  let mut c2 = organization(OrgType::Contractor, Some(too.id), "C2");
  c2.is_active = false;
  for o in [&akimat, &too, &c1, &c2] {
    seed(&s, o).await;
  }

  assert_eq!(org_count(&s).await, 4);
  assert_eq!(s.list_organizations(&OrganizationFilter::active()).await.unwrap().len(), 3);

  let contractors = s
    .list_organizations(&OrganizationFilter::active_contractors_of(too.id))
    .await
    .unwrap();
  assert_eq!(contractors.len(), 1);
  assert_eq!(contractors[0].id, c1.id);

  let children_of_akimat = s
    .list_organizations(&OrganizationFilter {
      parent_org_id: Some(akimat.id),
      ..OrganizationFilter::default()
    })
    .await
    .unwrap();
  assert_eq!(children_of_akimat.len(), 1);
  assert_eq!(children_of_akimat[0].id, too.id);
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn find_users_by_phone_and_login() {
  let s = store().await;
  let akimat = organization(OrgType::Akimat, None, "A");
  seed(&s, &akimat).await;

  let mut admin = account("+77010000001", Role::AkimatAdmin, Some(akimat.id));
  admin.login = Some("akimat".into());
  seed_user(&s, &admin).await;

  let by_phone = s
    .find_users(&UserQuery { phone: Some(admin.phone.clone()), ..UserQuery::default() })
    .await
    .unwrap();
  assert_eq!(by_phone.len(), 1);
  assert_eq!(by_phone[0].role, Role::AkimatAdmin);
  assert_eq!(by_phone[0].organization_id, Some(akimat.id));

  let both = s
    .find_users(&UserQuery {
      phone:       Some(admin.phone.clone()),
      login:       Some("nobody".into()),
      active_only: true,
    })
    .await
    .unwrap();
  assert!(both.is_empty());
}

#[tokio::test]
async fn find_users_active_only() {
  let s = store().await;
  let mut gone = account("+77010000002", Role::TooAdmin, None);
  gone.is_active = false;
  seed_user(&s, &gone).await;

  let query = UserQuery { phone: Some(gone.phone.clone()), login: None, active_only: true };
  assert!(s.find_users(&query).await.unwrap().is_empty());

  let query = UserQuery { active_only: false, ..query };
  assert_eq!(s.find_users(&query).await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_phone_is_a_write_failure() {
  let s = store().await;
  seed_user(&s, &account("+77010000003", Role::TooAdmin, None)).await;

  let dup = account("+77010000003", Role::ContractorAdmin, None);
  let err = s.transact(move |uow| uow.insert_user(&dup)).await.unwrap_err();
  assert!(matches!(err, CoreError::Write { entity: "user", .. }));
}

// ─── Units of work ───────────────────────────────────────────────────────────

#[tokio::test]
async fn error_inside_unit_of_work_rolls_back_earlier_writes() {
  let s = store().await;
  let akimat = organization(OrgType::Akimat, None, "A");

  let err = s
    .transact(move |uow| {
      uow.insert_organization(&akimat)?;
      Err::<(), _>(CoreError::Forbidden)
    })
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Forbidden));
  assert_eq!(org_count(&s).await, 0);
}

#[tokio::test]
async fn committed_unit_of_work_is_visible() {
  let s = store().await;
  let akimat = organization(OrgType::Akimat, None, "A");
  let admin = account("+77010000004", Role::AkimatAdmin, Some(akimat.id));
  let (org_id, user_id) = (akimat.id, admin.id);

  let out = s
    .transact(move |uow| {
      uow.insert_organization(&akimat)?;
      uow.insert_user(&admin)?;
      Ok((akimat.id, admin.id))
    })
    .await
    .unwrap();
  assert_eq!(out, (org_id, user_id));
  assert_eq!(org_count(&s).await, 1);
  assert_eq!(s.find_users(&UserQuery::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn closed_connection_is_a_store_failure() {
  let s = store().await;
  s.close().await.unwrap();

  let akimat = organization(OrgType::Akimat, None, "A");
  let err = s
    .transact(move |uow| uow.insert_organization(&akimat))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Store(_)), "{err:?}");
  assert!(s.get_organization(Uuid::new_v4()).await.is_err());
}

// ─── Provisioning against SQLite ─────────────────────────────────────────────

fn provisioner(s: &SqliteStore) -> Provisioner<SqliteStore> {
  Provisioner::new(Arc::new(s.clone()), Arc::new(Argon2Hasher))
}

fn new_org(org_type: &str, name: &str, admin_phone: &str) -> NewOrganization {
  NewOrganization {
    name: name.into(),
    org_type: org_type.into(),
    admin_phone: admin_phone.into(),
    ..NewOrganization::default()
  }
}

#[tokio::test]
async fn provisioning_rollback_is_total_when_admin_insert_fails() {
  let s = store().await;
  let akimat = organization(OrgType::Akimat, None, "A");
  seed(&s, &akimat).await;
  seed_user(&s, &account("+1", Role::AkimatAdmin, Some(akimat.id))).await;
  let before = org_count(&s).await;

  let actor = Actor::new("a", Role::AkimatAdmin, akimat.id);
  let err = provisioner(&s)
    .provision_organization(&actor, new_org("TOO", "Doomed", "+1"))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Write { entity: "user", .. }));

  assert_eq!(org_count(&s).await, before);
  let orgs = s.list_organizations(&OrganizationFilter::default()).await.unwrap();
  assert!(orgs.iter().all(|o| o.name != "Doomed"));
}

#[tokio::test]
async fn provision_organization_persists_both_records() {
  let s = store().await;
  let akimat = organization(OrgType::Akimat, None, "A");
  seed(&s, &akimat).await;

  let actor = Actor::new("a", Role::AkimatAdmin, akimat.id);
  let mut input = new_org("TOO", "X", "+77020000000");
  input.admin_password = "pa55".into();
  let out = provisioner(&s).provision_organization(&actor, input).await.unwrap();

  let stored = s.get_organization(out.organization.id).await.unwrap().unwrap();
  assert_eq!(stored.parent_org_id, Some(akimat.id));
  assert_eq!(stored.org_type, OrgType::Too);

  let admins = s
    .find_users(&UserQuery { phone: Some("+77020000000".into()), ..UserQuery::default() })
    .await
    .unwrap();
  assert_eq!(admins.len(), 1);
  assert_eq!(admins[0].role, Role::TooAdmin);
  assert_eq!(admins[0].organization_id, Some(out.organization.id));
  let hash = admins[0].password_hash.as_deref().unwrap();
  assert!(hash.starts_with("$argon2"));
  assert_ne!(hash, "pa55");

  let dir = Directory::new(Arc::new(s.clone()));
  let too = Actor::new("t", Role::TooAdmin, out.organization.id);
  let visible = dir.list_organizations(&too).await.unwrap();
  assert_eq!(visible.len(), 1);
  assert_eq!(visible[0].id, out.organization.id);
}

#[tokio::test]
async fn provision_driver_links_user_to_driver_and_contractor() {
  let s = store().await;
  let too = organization(OrgType::Too, None, "T");
  let contractor = organization(OrgType::Contractor, Some(too.id), "C");
  seed(&s, &too).await;
  seed(&s, &contractor).await;

  let actor = Actor::new("c", Role::ContractorAdmin, contractor.id);
  let out = provisioner(&s)
    .provision_driver(&actor, NewDriver {
      full_name:  "Driver One".into(),
      iin:        "880202300456".into(),
      birth_year: Some(1988),
      phone:      "+77030000000".into(),
    })
    .await
    .unwrap();

  let drivers = s
    .list_drivers(&DriverFilter { contractor_id: Some(contractor.id), active_only: true })
    .await
    .unwrap();
  assert_eq!(drivers.len(), 1);
  assert_eq!(drivers[0].id, out.driver.id);
  assert_eq!(drivers[0].birth_year, 1988);

  let dir = Directory::new(Arc::new(s.clone()));
  let user = dir
    .find_user(UserLookup { phone: Some("+77030000000".into()), login: None })
    .await
    .unwrap();
  assert_eq!(user.role, Role::Driver);
  assert_eq!(user.driver_id, Some(out.driver.id));
  assert_eq!(user.organization_id, Some(contractor.id));
  assert!(user.password_hash.is_none());
}

#[tokio::test]
async fn provision_driver_rolls_back_on_phone_collision() {
  let s = store().await;
  let contractor = organization(OrgType::Contractor, None, "C");
  seed(&s, &contractor).await;
  seed_user(&s, &account("+77040000000", Role::ContractorAdmin, Some(contractor.id))).await;

  let actor = Actor::new("c", Role::ContractorAdmin, contractor.id);
  let err = provisioner(&s)
    .provision_driver(&actor, NewDriver {
      full_name:  "Driver Two".into(),
      iin:        "770303300789".into(),
      birth_year: Some(1977),
      phone:      "+77040000000".into(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Write { entity: "user", .. }));
  assert!(s.list_drivers(&DriverFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn too_admin_cannot_provision_driver() {
  let s = store().await;
  let too = organization(OrgType::Too, None, "T");
  seed(&s, &too).await;

  let actor = Actor::new("t", Role::TooAdmin, too.id);
  let err = provisioner(&s)
    .provision_driver(&actor, NewDriver {
      full_name:  "Nobody".into(),
      iin:        "000000000000".into(),
      birth_year: Some(2000),
      phone:      "+77050000000".into(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Forbidden));
  assert!(s.list_drivers(&DriverFilter::default()).await.unwrap().is_empty());
  assert!(s.find_users(&UserQuery::default()).await.unwrap().is_empty());
}
