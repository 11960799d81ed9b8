//! Handlers for `/users/:id/notifications` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users/:id/notifications` | Feed with `ETag`; `304` on `If-None-Match` |
//! | `GET`  | `/users/:id/notifications/unread-count` | `{"unread": n}` |
//! | `POST` | `/users/:id/notifications/read-all` | `{"marked": n}` |
//! | `POST` | `/users/:id/notifications/:source_id/read` | 204 |
//! | `POST` | `/users/:id/notifications/:source_id/dismiss` | 204, idempotent |
//!
//! The feed is recomputed on every request; the ETag only saves the client
//! a transfer.

use axum::{
  Json,
  extract::{Path, State},
  http::{HeaderMap, HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use campus_core::{directory::Directory, store::LeaveStore};
use serde_json::json;
use uuid::Uuid;

use crate::{
  ApiState,
  error::ApiError,
  etag::{feed_etag, if_none_match},
};

/// `GET /users/:id/notifications`
pub async fn feed<S>(
  State(state): State<ApiState<S>>,
  Path(user_id): Path<Uuid>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: LeaveStore + Directory,
{
  let feed = state.feed.get_feed(user_id).await?;
  let etag = feed_etag(&feed);

  let mut response = if if_none_match(&headers, &etag) {
    StatusCode::NOT_MODIFIED.into_response()
  } else {
    Json(feed).into_response()
  };
  if let Ok(value) = HeaderValue::from_str(&etag) {
    response.headers_mut().insert(header::ETAG, value);
  }
  Ok(response)
}

/// `GET /users/:id/notifications/unread-count`
pub async fn unread_count<S>(
  State(state): State<ApiState<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeaveStore + Directory,
{
  let unread = state.feed.unread_count(user_id).await?;
  Ok(Json(json!({ "unread": unread })))
}

/// `POST /users/:id/notifications/read-all`
pub async fn read_all<S>(
  State(state): State<ApiState<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeaveStore + Directory,
{
  let marked = state.feed.mark_all_read(user_id).await?;
  Ok(Json(json!({ "marked": marked })))
}

/// `POST /users/:id/notifications/:source_id/read`
pub async fn read<S>(
  State(state): State<ApiState<S>>,
  Path((user_id, source_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError>
where
  S: LeaveStore + Directory,
{
  state.feed.mark_read(user_id, source_id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /users/:id/notifications/:source_id/dismiss`
pub async fn dismiss<S>(
  State(state): State<ApiState<S>>,
  Path((user_id, source_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError>
where
  S: LeaveStore + Directory,
{
  state.feed.dismiss(user_id, source_id).await?;
  Ok(StatusCode::NO_CONTENT)
}
