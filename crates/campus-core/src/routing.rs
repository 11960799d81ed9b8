//! Routing of officer-approved requests to a lecturer.
//!
//! Routing is advisory: [`RoutingResolver::suggest_target`] proposes the
//! student's declared department as a search scope but never picks a
//! lecturer. The caller chooses from [`RoutingResolver::list_candidates`]
//! (scoped or free-text) and confirms with [`RoutingResolver::forward`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  directory::{Directory, Lecturer, LecturerFilter},
  request::MedicalRequest,
  store::LeaveStore,
  workflow::LeaveWorkflow,
};

/// Advisory routing scope for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
  pub request_id:    Uuid,
  /// `None` when the student has no department on record.
  pub department_id: Option<Uuid>,
}

pub struct RoutingResolver<S, D> {
  workflow:  LeaveWorkflow<S, D>,
  directory: Arc<D>,
}

impl<S, D> Clone for RoutingResolver<S, D> {
  fn clone(&self) -> Self {
    Self { workflow: self.workflow.clone(), directory: self.directory.clone() }
  }
}

impl<S: LeaveStore, D: Directory> RoutingResolver<S, D> {
  pub fn new(store: Arc<S>, directory: Arc<D>) -> Self {
    Self { workflow: LeaveWorkflow::new(store, directory.clone()), directory }
  }

  pub async fn suggest_target(&self, request_id: Uuid) -> Result<Suggestion> {
    let request = self.workflow.get_request(request_id).await?;
    let department_id = self
      .directory
      .department_of(request.student_id)
      .await
      .map_err(Error::directory)?;
    Ok(Suggestion { request_id, department_id })
  }

  /// Lecturers in a department or faculty, or matching a free-text search.
  /// No hierarchy filter is required.
  pub async fn list_candidates(
    &self,
    filter: &LecturerFilter,
  ) -> Result<Vec<Lecturer>> {
    self
      .directory
      .list_lecturers(filter)
      .await
      .map_err(Error::directory)
  }

  /// Forward an officer-approved request to `lecturer_id`.
  pub async fn forward(
    &self,
    request_id: Uuid,
    lecturer_id: Uuid,
  ) -> Result<MedicalRequest> {
    let lecturer = self
      .directory
      .get_lecturer(lecturer_id)
      .await
      .map_err(Error::directory)?;
    let Some(lecturer) = lecturer else {
      warn!(%request_id, %lecturer_id, "forward target does not resolve");
      return Err(Error::InvalidTarget(lecturer_id));
    };

    let request = self.workflow.forward_unchecked(request_id, lecturer_id).await?;
    info!(%request_id, lecturer = %lecturer.name, "medical request forwarded");
    Ok(request)
  }
}
