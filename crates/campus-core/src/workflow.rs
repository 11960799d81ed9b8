//! The medical request state machine.
//!
//! Every transition reads the record, checks the transition table, and then
//! writes through [`LeaveStore::transition`], a compare-and-set on the status
//! column. Two callers racing from the same state resolve to one winner; the
//! other gets [`Error::Conflict`] and the record is never left half-written.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  directory::{Directory, Role},
  request::{
    Action, Decision, MedicalRequest, NewMedicalRequest, RequestFilter,
    StatusChange,
  },
  store::LeaveStore,
};

/// Side effects attached to a transition.
#[derive(Debug, Default)]
struct Effects {
  officer_comments: Option<String>,
  admin_comments:   Option<String>,
  forwarded_to:     Option<Uuid>,
}

fn normalize(comments: Option<String>) -> Option<String> {
  comments
    .map(|c| c.trim().to_owned())
    .filter(|c| !c.is_empty())
}

/// Owns the lifecycle of medical requests.
pub struct LeaveWorkflow<S, D> {
  store:     Arc<S>,
  directory: Arc<D>,
}

impl<S, D> Clone for LeaveWorkflow<S, D> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), directory: self.directory.clone() }
  }
}

impl<S: LeaveStore, D: Directory> LeaveWorkflow<S, D> {
  pub fn new(store: Arc<S>, directory: Arc<D>) -> Self {
    Self { store, directory }
  }

  // ── Submission and reads ──────────────────────────────────────────────

  /// Create a request in `pending` on behalf of a student.
  pub async fn submit(&self, input: NewMedicalRequest) -> Result<MedicalRequest> {
    input.validate()?;

    let student = self
      .directory
      .resolve_user(input.student_id)
      .await
      .map_err(Error::directory)?
      .ok_or_else(|| {
        Error::Validation(format!("unknown student {}", input.student_id))
      })?;
    if student.role != Role::Student {
      return Err(Error::Validation(format!(
        "user {} is a {}, not a student",
        student.user_id, student.role
      )));
    }

    let input = NewMedicalRequest {
      reason: input.reason.trim().to_owned(),
      certificate_url: normalize(input.certificate_url),
      ..input
    };
    let request = self.store.create_request(input).await.map_err(Error::store)?;

    info!(
      request_id = %request.request_id,
      student_id = %request.student_id,
      "medical request submitted"
    );
    Ok(request)
  }

  pub async fn get_request(&self, id: Uuid) -> Result<MedicalRequest> {
    self
      .store
      .get_request(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found("medical request", id))
  }

  /// Requests matching `filter`, newest first.
  pub async fn list_requests(
    &self,
    filter: &RequestFilter,
  ) -> Result<Vec<MedicalRequest>> {
    self.store.list_requests(filter).await.map_err(Error::store)
  }

  // ── Transitions ───────────────────────────────────────────────────────

  /// First-level review. Rejection requires a non-empty comment.
  pub async fn officer_decide(
    &self,
    request_id: Uuid,
    decision: Decision,
    comments: Option<String>,
  ) -> Result<MedicalRequest> {
    let comments = normalize(comments);
    if decision == Decision::Reject && comments.is_none() {
      return Err(Error::Validation(
        "a rejection must include the officer's comments".into(),
      ));
    }
    let effects = Effects { officer_comments: comments, ..Default::default() };
    self.apply(request_id, decision.officer_action(), effects).await
  }

  /// Second-level review by the lecturer the request was forwarded to.
  pub async fn department_decide(
    &self,
    request_id: Uuid,
    decision: Decision,
    comments: Option<String>,
  ) -> Result<MedicalRequest> {
    let effects =
      Effects { admin_comments: normalize(comments), ..Default::default() };
    self.apply(request_id, decision.department_action(), effects).await
  }

  /// The raw forward transition. Target validation is the routing
  /// resolver's job, so this stays crate-private.
  pub(crate) async fn forward_unchecked(
    &self,
    request_id: Uuid,
    lecturer_id: Uuid,
  ) -> Result<MedicalRequest> {
    let effects = Effects { forwarded_to: Some(lecturer_id), ..Default::default() };
    self.apply(request_id, Action::Forward, effects).await
  }

  async fn apply(
    &self,
    request_id: Uuid,
    action: Action,
    effects: Effects,
  ) -> Result<MedicalRequest> {
    let current = self.get_request(request_id).await?;
    let Some(to) = current.status.apply(action) else {
      return Err(Error::InvalidTransition {
        request_id,
        from: current.status,
        action,
      });
    };

    let change = StatusChange {
      request_id,
      from: current.status,
      to,
      officer_comments: effects.officer_comments,
      admin_comments: effects.admin_comments,
      forwarded_to: effects.forwarded_to,
      at: Utc::now(),
    };

    match self.store.transition(change).await.map_err(Error::store)? {
      Some(updated) => {
        info!(
          request_id = %request_id,
          %action,
          from = %current.status,
          to = %updated.status,
          "medical request transitioned"
        );
        Ok(updated)
      }
      None => {
        warn!(request_id = %request_id, %action, "lost status race");
        Err(Error::Conflict(request_id))
      }
    }
  }
}
