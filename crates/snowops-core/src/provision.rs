//! Transactional entity provisioning.
//!
//! Each operation creates a parent record and its dependent login account
//! inside one unit of work: both become visible, or neither does. All
//! validation and authorization happens before the unit of work opens.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  actor::Actor,
  credential::CredentialHasher,
  fleet::Driver,
  organization::Organization,
  role::{OrgType, Role, can_create_organization},
  store::Store,
  user::User,
};

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Request to create an organization together with its administrator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewOrganization {
  #[serde(default)]
  pub name:            String,
  /// Raw type name; parsed against [`OrgType`].
  #[serde(rename = "type", default)]
  pub org_type:        String,
  #[serde(default)]
  pub bin:             String,
  #[serde(default)]
  pub head_full_name:  String,
  #[serde(default)]
  pub address:         String,
  #[serde(default)]
  pub phone:           String,
  /// Accepted for compatibility; accounts do not store a display name.
  #[serde(default)]
  pub admin_full_name: String,
  /// Phone of the administrator account; its unique identity.
  #[serde(default)]
  pub admin_phone:     String,
  /// Optional initial password. Hashed before it reaches storage.
  #[serde(default)]
  pub admin_password:  String,
}

/// Request to create a driver together with the driver's login account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewDriver {
  #[serde(default)]
  pub full_name:  String,
  #[serde(default)]
  pub iin:        String,
  pub birth_year: Option<i32>,
  #[serde(default)]
  pub phone:      String,
}

// ─── Outputs ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedOrganization {
  pub organization: Organization,
  pub admin:        User,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedDriver {
  pub driver: Driver,
  pub user:   User,
}

// ─── Provisioner ─────────────────────────────────────────────────────────────

pub struct Provisioner<S> {
  store:  Arc<S>,
  hasher: Arc<dyn CredentialHasher>,
}

impl<S: Store> Provisioner<S> {
  pub fn new(store: Arc<S>, hasher: Arc<dyn CredentialHasher>) -> Self {
    Self { store, hasher }
  }

  /// Create an organization beneath the actor's own organization, plus its
  /// administrator account.
  pub async fn provision_organization(
    &self,
    actor: &Actor,
    input: NewOrganization,
  ) -> Result<ProvisionedOrganization> {
    if input.name.trim().is_empty() {
      return Err(Error::Malformed("name is required".to_owned()));
    }
    if input.org_type.is_empty() {
      return Err(Error::Malformed("type is required".to_owned()));
    }
    let org_type: OrgType = input
      .org_type
      .parse()
      .map_err(|_| Error::UnsupportedOrgType(input.org_type.clone()))?;

    if !can_create_organization(actor.role, org_type) {
      tracing::warn!(
        role = %actor.role,
        requested = %org_type,
        "organization creation refused"
      );
      return Err(Error::Forbidden);
    }
    if input.admin_phone.is_empty() {
      return Err(Error::Malformed("admin_phone is required".to_owned()));
    }

    let now = Utc::now();
    let organization = Organization {
      id: Uuid::new_v4(),
      name: input.name,
      org_type,
      bin: input.bin,
      head_full_name: input.head_full_name,
      address: input.address,
      phone: input.phone,
      parent_org_id: Some(actor.acting_org_id),
      is_active: true,
      created_at: now,
      updated_at: now,
    };
    let admin_phone = input.admin_phone;
    let password = Some(input.admin_password).filter(|p| !p.is_empty());
    let hasher = Arc::clone(&self.hasher);

    let provisioned = self
      .store
      .transact(move |uow| {
        uow.insert_organization(&organization)?;

        let role = organization
          .org_type
          .admin_role()
          .ok_or_else(|| Error::UnsupportedOrgType(organization.org_type.to_string()))?;

        let password_hash = password.as_deref().map(|p| hasher.hash(p)).transpose()?;

        let admin = User {
          id: Uuid::new_v4(),
          phone: admin_phone,
          role,
          login: None,
          password_hash,
          organization_id: Some(organization.id),
          driver_id: None,
          is_active: true,
          created_at: now,
          updated_at: now,
        };
        uow.insert_user(&admin)?;

        Ok(ProvisionedOrganization { organization, admin })
      })
      .await
      .inspect_err(|e| tracing::error!(error = %e, "organization provisioning rolled back"))?;

    tracing::info!(
      org_id = %provisioned.organization.id,
      org_type = %provisioned.organization.org_type,
      parent = %actor.acting_org_id,
      "organization provisioned"
    );
    Ok(provisioned)
  }

  /// Create a driver owned by the actor's contractor, plus the driver's
  /// password-less login account.
  pub async fn provision_driver(&self, actor: &Actor, input: NewDriver) -> Result<ProvisionedDriver> {
    self.authorize_driver(actor)?;

    let birth_year = validate_driver(&input)?;
    let contractor_id = actor.acting_org_id;
    let now = Utc::now();

    let driver = Driver {
      id: Uuid::new_v4(),
      contractor_id,
      full_name: input.full_name,
      iin: input.iin,
      birth_year,
      phone: input.phone,
      is_active: true,
      created_at: now,
      updated_at: now,
    };

    let provisioned = self
      .store
      .transact(move |uow| {
        uow.insert_driver(&driver)?;

        let user = User {
          id: Uuid::new_v4(),
          phone: driver.phone.clone(),
          role: Role::Driver,
          login: None,
          password_hash: None,
          organization_id: Some(contractor_id),
          driver_id: Some(driver.id),
          is_active: true,
          created_at: now,
          updated_at: now,
        };
        uow.insert_user(&user)?;

        Ok(ProvisionedDriver { driver, user })
      })
      .await
      .inspect_err(|e| tracing::error!(error = %e, "driver provisioning rolled back"))?;

    tracing::info!(
      driver_id = %provisioned.driver.id,
      contractor = %contractor_id,
      "driver provisioned"
    );
    Ok(provisioned)
  }

  /// Only a contractor administrator may create drivers. Handlers call this
  /// before decoding the request body.
  pub fn authorize_driver(&self, actor: &Actor) -> Result<()> {
    match actor.role {
      Role::ContractorAdmin => Ok(()),
      Role::AkimatAdmin | Role::TooAdmin | Role::Driver => {
        tracing::warn!(role = %actor.role, "driver creation refused");
        Err(Error::Forbidden)
      }
    }
  }
}

fn validate_driver(input: &NewDriver) -> Result<i32> {
  let required = [
    ("full_name", &input.full_name),
    ("iin", &input.iin),
    ("phone", &input.phone),
  ];
  for (field, value) in required {
    if value.trim().is_empty() {
      return Err(Error::Malformed(format!("{field} is required")));
    }
  }
  match input.birth_year {
    Some(year) if year > 0 => Ok(year),
    _ => Err(Error::Malformed("birth_year is required".to_owned())),
  }
}
