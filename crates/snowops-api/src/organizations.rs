//! Handlers for `/organizations` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/organizations` | Scoped to the actor; DRIVER → 403 |
//! | `POST` | `/organizations` | Creates the organization and its admin; 201 |
//! | `GET`  | `/organizations/{id}` | 404 if missing or inactive, 403 if out of scope |

use axum::{
  Json,
  extract::{Path, State, rejection::{JsonRejection, PathRejection}},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::{Value, json};
use snowops_core::{provision::NewOrganization, store::Store};
use uuid::Uuid;

use crate::{AppState, auth::CurrentActor, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /organizations`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
) -> Result<Json<Value>, ApiError>
where
  S: Store + Clone + 'static,
{
  let organizations = state.directory.list_organizations(&actor).await?;
  Ok(Json(json!({ "organizations": organizations })))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /organizations`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  body: Result<Json<NewOrganization>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + 'static,
{
  let Json(input) = body?;
  let provisioned = state.provisioner.provision_organization(&actor, input).await?;
  Ok((StatusCode::CREATED, Json(provisioned)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /organizations/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: Store + Clone + 'static,
{
  let Path(id) = id?;
  let organization = state.directory.get_organization(&actor, id).await?;
  Ok(Json(json!({ "organization": organization })))
}
