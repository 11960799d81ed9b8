//! Handlers for enrollment endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/enrollments` | Body: [`EnrollmentPair`]; returns the [`RowReport`] |
//! | `POST` | `/enrollments/bulk` | Body: `{"pairs":[...]}`; returns a [`BulkOutcome`] |
//! | `POST` | `/enrollments/by-degree` | Body: `{"student_id":"...","degree_id":"..."}` |
//! | `GET`  | `/students/:id/enrollments` | |
//!
//! Bulk calls answer `200` even when rows were skipped or failed; callers
//! read the counts.

use axum::{
  Json,
  extract::{Path, State},
};
use campus_core::{
  directory::Directory,
  enrollment::{BulkOutcome, Enrollment, EnrollmentPair, RowReport},
  store::LeaveStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// `POST /enrollments`
pub async fn enroll_one<S>(
  State(state): State<ApiState<S>>,
  Json(pair): Json<EnrollmentPair>,
) -> Json<RowReport>
where
  S: LeaveStore + Directory,
{
  let outcome = state.ledger.enroll(pair).await;
  Json(RowReport { pair, outcome })
}

#[derive(Debug, Deserialize)]
pub struct BulkBody {
  pub pairs: Vec<EnrollmentPair>,
}

/// `POST /enrollments/bulk`
pub async fn bulk<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<BulkBody>,
) -> Result<Json<BulkOutcome>, ApiError>
where
  S: LeaveStore + Directory,
{
  if body.pairs.is_empty() {
    return Err(ApiError::BadRequest("pairs must not be empty".into()));
  }
  Ok(Json(state.ledger.bulk_create(body.pairs).await))
}

#[derive(Debug, Deserialize)]
pub struct ByDegreeBody {
  pub student_id: Uuid,
  pub degree_id:  Uuid,
}

/// `POST /enrollments/by-degree`
pub async fn by_degree<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<ByDegreeBody>,
) -> Result<Json<BulkOutcome>, ApiError>
where
  S: LeaveStore + Directory,
{
  let outcome = state
    .ledger
    .auto_enroll_by_degree(body.student_id, body.degree_id)
    .await?;
  Ok(Json(outcome))
}

/// `GET /students/:id/enrollments`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Path(student_id): Path<Uuid>,
) -> Result<Json<Vec<Enrollment>>, ApiError>
where
  S: LeaveStore + Directory,
{
  Ok(Json(state.ledger.list(student_id).await?))
}
