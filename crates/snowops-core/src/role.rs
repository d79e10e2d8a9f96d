//! Role and organization-type taxonomy.
//!
//! The hierarchy has three levels: an akimat (city administration) at the
//! root, TOO companies beneath it, and contractors beneath each TOO. Every
//! role administers exactly one level, except [`Role::Driver`], which
//! administers nothing.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// The role an authenticated user acts under.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
  AkimatAdmin,
  TooAdmin,
  ContractorAdmin,
  Driver,
}

impl Role {
  pub fn is_admin(self) -> bool {
    match self {
      Self::AkimatAdmin | Self::TooAdmin | Self::ContractorAdmin => true,
      Self::Driver => false,
    }
  }
}

/// The level an organization occupies in the hierarchy.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrgType {
  Akimat,
  Too,
  Contractor,
}

impl OrgType {
  /// The role given to the administrator account provisioned alongside an
  /// organization of this type. Akimats are never provisioned.
  pub fn admin_role(self) -> Option<Role> {
    match self {
      Self::Too => Some(Role::TooAdmin),
      Self::Contractor => Some(Role::ContractorAdmin),
      Self::Akimat => None,
    }
  }
}

/// Whether `role` may create an organization of type `target`.
pub fn can_create_organization(role: Role, target: OrgType) -> bool {
  match role {
    Role::AkimatAdmin => target == OrgType::Too,
    Role::TooAdmin => target == OrgType::Contractor,
    Role::ContractorAdmin | Role::Driver => false,
  }
}
