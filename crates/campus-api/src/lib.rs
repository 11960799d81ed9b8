//! JSON REST API for the campus leave workflow.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`LeaveStore`] and [`Directory`]. Auth, TLS, and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", campus_api::api_router(store.clone(), FeedConfig::default()))
//! ```

pub mod enrollments;
pub mod error;
pub mod etag;
pub mod lecturers;
pub mod notices;
pub mod notifications;
pub mod requests;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use campus_core::{
  directory::Directory,
  ledger::EnrollmentLedger,
  notice::NoticeBoard,
  notification::FeedConfig,
  routing::RoutingResolver,
  store::LeaveStore,
  synthesizer::NotificationSynthesizer,
  workflow::LeaveWorkflow,
};

pub use error::ApiError;

// ─── State ───────────────────────────────────────────────────────────────────

/// The core services, each sharing the same backend.
pub struct ApiState<S> {
  pub workflow: LeaveWorkflow<S, S>,
  pub routing:  RoutingResolver<S, S>,
  pub notices:  NoticeBoard<S, S>,
  pub ledger:   EnrollmentLedger<S, S>,
  pub feed:     NotificationSynthesizer<S>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      workflow: self.workflow.clone(),
      routing:  self.routing.clone(),
      notices:  self.notices.clone(),
      ledger:   self.ledger.clone(),
      feed:     self.feed.clone(),
    }
  }
}

impl<S: LeaveStore + Directory> ApiState<S> {
  pub fn new(store: Arc<S>, feed: FeedConfig) -> Self {
    Self {
      workflow: LeaveWorkflow::new(store.clone(), store.clone()),
      routing:  RoutingResolver::new(store.clone(), store.clone()),
      notices:  NoticeBoard::new(store.clone(), store.clone()),
      ledger:   EnrollmentLedger::new(store.clone(), store.clone()),
      feed:     NotificationSynthesizer::new(store, feed),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, feed: FeedConfig) -> Router<()>
where
  S: LeaveStore + Directory + 'static,
{
  Router::new()
    // Medical requests
    .route("/requests", get(requests::list::<S>).post(requests::submit::<S>))
    .route("/requests/{id}", get(requests::get_one::<S>))
    .route("/requests/{id}/officer-decision", post(requests::officer_decision::<S>))
    .route("/requests/{id}/suggested-target", get(requests::suggested_target::<S>))
    .route("/requests/{id}/forward", post(requests::forward::<S>))
    .route("/requests/{id}/department-decision", post(requests::department_decision::<S>))
    // Routing candidates
    .route("/lecturers", get(lecturers::list::<S>))
    // Notices
    .route("/modules/{id}/notices", get(notices::list::<S>).post(notices::post::<S>))
    // Enrollments
    .route("/enrollments", post(enrollments::enroll_one::<S>))
    .route("/enrollments/bulk", post(enrollments::bulk::<S>))
    .route("/enrollments/by-degree", post(enrollments::by_degree::<S>))
    .route("/students/{id}/enrollments", get(enrollments::list::<S>))
    // Notifications
    .route("/users/{id}/notifications", get(notifications::feed::<S>))
    .route("/users/{id}/notifications/unread-count", get(notifications::unread_count::<S>))
    .route("/users/{id}/notifications/read-all", post(notifications::read_all::<S>))
    .route("/users/{id}/notifications/{source_id}/read", post(notifications::read::<S>))
    .route("/users/{id}/notifications/{source_id}/dismiss", post(notifications::dismiss::<S>))
    .with_state(ApiState::new(store, feed))
}
