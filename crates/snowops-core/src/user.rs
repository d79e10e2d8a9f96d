//! User accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

/// A login account. Admin accounts link to an organization; driver accounts
/// link to both the contractor and the driver record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub id:              Uuid,
  /// Globally unique.
  pub phone:           String,
  pub role:            Role,
  pub login:           Option<String>,
  /// PHC string. Never part of a serialized projection.
  #[serde(skip_serializing, default)]
  pub password_hash:   Option<String>,
  pub organization_id: Option<Uuid>,
  pub driver_id:       Option<Uuid>,
  pub is_active:       bool,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

/// Equality predicates for [`crate::store::Store::find_users`].
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
  pub phone:       Option<String>,
  pub login:       Option<String>,
  pub active_only: bool,
}

/// Identity keys accepted by [`crate::directory::Directory::find_user`].
/// Empty strings count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserLookup {
  pub phone: Option<String>,
  pub login: Option<String>,
}

impl UserLookup {
  /// Normalise into a store query, or `None` when no key was supplied.
  pub fn into_query(self) -> Option<UserQuery> {
    let phone = self.phone.filter(|p| !p.is_empty());
    let login = self.login.filter(|l| !l.is_empty());
    if phone.is_none() && login.is_none() {
      return None;
    }
    Some(UserQuery { phone, login, active_only: true })
  }
}
