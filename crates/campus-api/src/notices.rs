//! Handlers for `/modules/:id/notices`.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use campus_core::{
  directory::Directory,
  notice::Notice,
  store::LeaveStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct PostBody {
  pub author_id: Uuid,
  pub title:     String,
  pub content:   String,
}

/// `POST /modules/:id/notices`: 201 with the stored notice
pub async fn post<S>(
  State(state): State<ApiState<S>>,
  Path(module_id): Path<Uuid>,
  Json(body): Json<PostBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeaveStore + Directory,
{
  let notice = state
    .notices
    .post(body.author_id, module_id, body.title, body.content)
    .await?;
  Ok((StatusCode::CREATED, Json(notice)))
}

/// `GET /modules/:id/notices`, newest first
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Path(module_id): Path<Uuid>,
) -> Result<Json<Vec<Notice>>, ApiError>
where
  S: LeaveStore + Directory,
{
  Ok(Json(state.notices.list(module_id).await?))
}
