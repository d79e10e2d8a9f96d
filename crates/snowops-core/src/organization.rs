//! Organizations, the nodes of the hierarchy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::OrgType;

/// A node in the akimat → TOO → contractor tree.
///
/// Organizations are never physically deleted. A tombstoned organization has
/// `is_active == false` and is invisible to every lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
  pub id:             Uuid,
  pub name:           String,
  #[serde(rename = "type")]
  pub org_type:       OrgType,
  /// Business identification number.
  pub bin:            String,
  pub head_full_name: String,
  pub address:        String,
  pub phone:          String,
  /// The creator's organization. `None` only for akimats.
  pub parent_org_id:  Option<Uuid>,
  pub is_active:      bool,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

impl Organization {
  /// Whether this organization is a contractor directly beneath `parent`.
  pub fn is_contractor_of(&self, parent: Uuid) -> bool {
    self.org_type == OrgType::Contractor && self.parent_org_id == Some(parent)
  }
}

/// Equality predicates for [`crate::store::Store::list_organizations`].
/// Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct OrganizationFilter {
  pub parent_org_id: Option<Uuid>,
  pub org_type:      Option<OrgType>,
  /// Exclude tombstoned organizations.
  pub active_only:   bool,
}

impl OrganizationFilter {
  pub fn active() -> Self {
    Self { active_only: true, ..Self::default() }
  }

  pub fn active_contractors_of(parent: Uuid) -> Self {
    Self {
      parent_org_id: Some(parent),
      org_type:      Some(OrgType::Contractor),
      active_only:   true,
    }
  }
}
