//! The authenticated identity attached to one operation.

use serde::Serialize;
use uuid::Uuid;

use crate::{Error, Result, role::Role};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
  /// Opaque id of the authenticated user, as asserted by the authenticator.
  pub user_id:       String,
  pub role:          Role,
  pub acting_org_id: Uuid,
}

impl Actor {
  pub fn new(user_id: impl Into<String>, role: Role, acting_org_id: Uuid) -> Self {
    Self { user_id: user_id.into(), role, acting_org_id }
  }

  /// Normalise the `(user id, role, organization id)` triple produced by an
  /// authentication strategy.
  ///
  /// - any empty component → [`Error::Unauthenticated`]
  /// - a role outside the taxonomy → [`Error::Forbidden`]
  /// - an organization id that is not a UUID → [`Error::Malformed`]
  pub fn from_identity(user_id: &str, role: &str, org_id: &str) -> Result<Self> {
    if user_id.is_empty() || role.is_empty() || org_id.is_empty() {
      return Err(Error::Unauthenticated);
    }
    let role: Role = role.parse().map_err(|_| Error::Forbidden)?;
    let acting_org_id = Uuid::parse_str(org_id).map_err(|_| {
      Error::Malformed("invalid current organization id".to_owned())
    })?;
    Ok(Self::new(user_id, role, acting_org_id))
  }
}
