//! The hierarchy resolver: which organizations an actor may see.

use uuid::Uuid;

use crate::{actor::Actor, organization::Organization, role::Role};

/// The portion of the hierarchy visible to an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
  /// Every active organization.
  Everything,
  /// A TOO and its direct contractors.
  TooSubtree(Uuid),
  /// A single organization.
  Own(Uuid),
  /// No organization-level capability at all.
  Nothing,
}

impl Scope {
  pub fn of(actor: &Actor) -> Self {
    match actor.role {
      Role::AkimatAdmin => Self::Everything,
      Role::TooAdmin => Self::TooSubtree(actor.acting_org_id),
      Role::ContractorAdmin => Self::Own(actor.acting_org_id),
      Role::Driver => Self::Nothing,
    }
  }

  /// Whether `org` falls inside this scope. Does not consider activity.
  pub fn admits(&self, org: &Organization) -> bool {
    match *self {
      Self::Everything => true,
      Self::TooSubtree(too) => org.id == too || org.is_contractor_of(too),
      Self::Own(id) => org.id == id,
      Self::Nothing => false,
    }
  }
}

/// Whether `actor` may view `org`. Tombstoned organizations are visible to
/// nobody.
pub fn can_view(actor: &Actor, org: &Organization) -> bool {
  org.is_active && Scope::of(actor).admits(org)
}
