//! `GET /lecturers`: forwarding candidates.
//!
//! Query parameters (all optional):
//! - `department_id`: lecturers of one department
//! - `faculty_id`: lecturers of any department in a faculty
//! - `search`: fuzzy match over name and email

use axum::{
  Json,
  extract::{Query, State},
};
use campus_core::{
  directory::{Directory, Lecturer, LecturerFilter},
  store::LeaveStore,
};

use crate::{ApiState, error::ApiError};

/// `GET /lecturers[?department_id=...][&faculty_id=...][&search=...]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(filter): Query<LecturerFilter>,
) -> Result<Json<Vec<Lecturer>>, ApiError>
where
  S: LeaveStore + Directory,
{
  Ok(Json(state.routing.list_candidates(&filter).await?))
}
