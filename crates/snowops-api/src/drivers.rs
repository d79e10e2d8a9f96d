//! Handler for `POST /drivers`.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use snowops_core::{provision::NewDriver, store::Store};

use crate::{AppState, auth::CurrentActor, error::ApiError};

/// `POST /drivers`: CONTRACTOR_ADMIN only. Creates the driver and the
/// driver's login account under the actor's contractor.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  body: Result<Json<NewDriver>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + 'static,
{
  state.provisioner.authorize_driver(&actor)?;
  let Json(input) = body?;
  let provisioned = state.provisioner.provision_driver(&actor, input).await?;
  Ok((StatusCode::CREATED, Json(provisioned)))
}
