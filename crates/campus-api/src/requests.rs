//! Handlers for `/requests` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/requests` | Optional `?status`, `student_id`, `forwarded_to` |
//! | `POST` | `/requests` | Body: [`NewMedicalRequest`]; returns 201 |
//! | `GET`  | `/requests/:id` | 404 if not found |
//! | `POST` | `/requests/:id/officer-decision` | Body: [`DecisionBody`] |
//! | `GET`  | `/requests/:id/suggested-target` | Advisory department scope |
//! | `POST` | `/requests/:id/forward` | Body: `{"lecturer_id":"..."}` |
//! | `POST` | `/requests/:id/department-decision` | Body: [`DecisionBody`] |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use campus_core::{
  directory::Directory,
  request::{Decision, MedicalRequest, NewMedicalRequest, RequestFilter},
  routing::Suggestion,
  store::LeaveStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── Reads ───────────────────────────────────────────────────────────────────

/// `GET /requests[?status=...][&student_id=...][&forwarded_to=...]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(filter): Query<RequestFilter>,
) -> Result<Json<Vec<MedicalRequest>>, ApiError>
where
  S: LeaveStore + Directory,
{
  Ok(Json(state.workflow.list_requests(&filter).await?))
}

/// `GET /requests/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<MedicalRequest>, ApiError>
where
  S: LeaveStore + Directory,
{
  Ok(Json(state.workflow.get_request(id).await?))
}

// ─── Submit ──────────────────────────────────────────────────────────────────

/// `POST /requests`
pub async fn submit<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewMedicalRequest>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeaveStore + Directory,
{
  let request = state.workflow.submit(body).await?;
  Ok((StatusCode::CREATED, Json(request)))
}

// ─── Transitions ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DecisionBody {
  pub decision: Decision,
  #[serde(default)]
  pub comments: Option<String>,
}

/// `POST /requests/:id/officer-decision`
pub async fn officer_decision<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<DecisionBody>,
) -> Result<Json<MedicalRequest>, ApiError>
where
  S: LeaveStore + Directory,
{
  let request = state
    .workflow
    .officer_decide(id, body.decision, body.comments)
    .await?;
  Ok(Json(request))
}

/// `POST /requests/:id/department-decision`
pub async fn department_decision<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<DecisionBody>,
) -> Result<Json<MedicalRequest>, ApiError>
where
  S: LeaveStore + Directory,
{
  let request = state
    .workflow
    .department_decide(id, body.decision, body.comments)
    .await?;
  Ok(Json(request))
}

// ─── Routing ─────────────────────────────────────────────────────────────────

/// `GET /requests/:id/suggested-target`
pub async fn suggested_target<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Suggestion>, ApiError>
where
  S: LeaveStore + Directory,
{
  Ok(Json(state.routing.suggest_target(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct ForwardBody {
  pub lecturer_id: Uuid,
}

/// `POST /requests/:id/forward`
pub async fn forward<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ForwardBody>,
) -> Result<Json<MedicalRequest>, ApiError>
where
  S: LeaveStore + Directory,
{
  Ok(Json(state.routing.forward(id, body.lecturer_id).await?))
}
