//! The visibility-scoped query gate.
//!
//! Every read goes through [`Directory`], which applies the actor's
//! [`Scope`] and collapses failures into two observable outcomes:
//!
//! - [`Error::NotFound`]: missing or tombstoned. The two are
//!   indistinguishable to the caller.
//! - [`Error::Forbidden`]: the role has no capability for the operation, or
//!   the target is active but out of scope.
//!
//! Single-resource lookups check, in order: role capability, existence and
//! activity, scope. A single-organization actor asking for any other id is
//! refused even when that id does not exist; only a tombstone reads as
//! missing.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  actor::Actor,
  organization::{Organization, OrganizationFilter},
  scope::{Scope, can_view},
  store::Store,
  user::{User, UserLookup},
};

pub struct Directory<S> {
  store: Arc<S>,
}

impl<S: Store> Directory<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// The organizations visible to `actor`, evaluated fresh on every call.
  ///
  /// For scoped roles, a missing or tombstoned acting organization fails the
  /// whole call with [`Error::ActingOrgUnavailable`].
  pub async fn list_organizations(&self, actor: &Actor) -> Result<Vec<Organization>> {
    match Scope::of(actor) {
      Scope::Everything => self
        .store
        .list_organizations(&OrganizationFilter::active())
        .await
        .map_err(Error::store),
      Scope::TooSubtree(too) => {
        let own = self.acting_organization(too).await?;
        let contractors = self
          .store
          .list_organizations(&OrganizationFilter::active_contractors_of(too))
          .await
          .map_err(Error::store)?;
        let mut orgs = Vec::with_capacity(contractors.len() + 1);
        orgs.push(own);
        orgs.extend(contractors);
        Ok(orgs)
      }
      Scope::Own(id) => Ok(vec![self.acting_organization(id).await?]),
      Scope::Nothing => {
        tracing::debug!(role = %actor.role, "organization listing refused");
        Err(Error::Forbidden)
      }
    }
  }

  /// Fetch one organization by id on behalf of `actor`.
  pub async fn get_organization(&self, actor: &Actor, id: Uuid) -> Result<Organization> {
    if !actor.role.is_admin() {
      return Err(Error::Forbidden);
    }

    let org = match self.store.get_organization(id).await.map_err(Error::store)? {
      Some(org) if org.is_active => org,
      Some(_) => return Err(Error::NotFound("organization")),
      None => {
        return Err(match Scope::of(actor) {
          Scope::Own(own) if own != id => Error::Forbidden,
          _ => Error::NotFound("organization"),
        });
      }
    };

    if !can_view(actor, &org) {
      tracing::debug!(
        actor_org = %actor.acting_org_id,
        target = %id,
        "organization outside actor scope"
      );
      return Err(Error::Forbidden);
    }
    Ok(org)
  }

  /// Find an active user by phone and/or login. Both keys, when present, must
  /// match the same record.
  pub async fn find_user(&self, lookup: UserLookup) -> Result<User> {
    let query = lookup
      .into_query()
      .ok_or_else(|| Error::Malformed("phone or login required".to_owned()))?;

    self
      .store
      .find_users(&query)
      .await
      .map_err(Error::store)?
      .into_iter()
      .next()
      .ok_or(Error::NotFound("user"))
  }

  async fn acting_organization(&self, id: Uuid) -> Result<Organization> {
    self
      .store
      .get_organization(id)
      .await
      .map_err(Error::store)?
      .filter(|o| o.is_active)
      .ok_or(Error::ActingOrgUnavailable(id))
  }
}
