//! Handler for `GET /users?phone=&login=`.

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use serde_json::{Value, json};
use snowops_core::{store::Store, user::UserLookup};

use crate::{AppState, auth::CurrentActor, error::ApiError};

/// Look up one active user. Any authenticated actor may call this; the
/// password hash is never part of the response.
pub async fn find<S>(
  State(state): State<AppState<S>>,
  CurrentActor(_actor): CurrentActor,
  lookup: Result<Query<UserLookup>, QueryRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: Store + Clone + 'static,
{
  let Query(lookup) = lookup?;
  let user = state.directory.find_user(lookup).await?;
  Ok(Json(json!({ "user": user })))
}
