//! Medical leave requests and the transition table that governs them.
//!
//! A request is created `pending` and only ever moves along the edges encoded
//! in [`Action::from_status`] / [`Action::target`]. Requests are never
//! deleted; terminal requests stay around for history and for the derived
//! notification feed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Lifecycle state of a [`MedicalRequest`].
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MedicalStatus {
  Pending,
  ApprovedByOfficer,
  Rejected,
  ForwardedToDept,
  ApprovedByDept,
}

impl MedicalStatus {
  pub const ALL: [MedicalStatus; 5] = [
    Self::Pending,
    Self::ApprovedByOfficer,
    Self::Rejected,
    Self::ForwardedToDept,
    Self::ApprovedByDept,
  ];

  /// The status reached by applying `action`, or `None` if `action` is not
  /// legal from `self`.
  pub fn apply(self, action: Action) -> Option<MedicalStatus> {
    (self == action.from_status()).then(|| action.target())
  }

  pub fn is_terminal(self) -> bool {
    matches!(self, Self::Rejected | Self::ApprovedByDept)
  }

  /// The wire/database name, e.g. `"approved_by_officer"`.
  pub fn as_str(self) -> &'static str { self.into() }

  /// Human-readable phrase used in notification text.
  pub fn describe(self) -> &'static str {
    match self {
      Self::Pending => "awaiting review",
      Self::ApprovedByOfficer => "approved by the medical officer",
      Self::Rejected => "rejected",
      Self::ForwardedToDept => "forwarded to your department",
      Self::ApprovedByDept => "approved by your department",
    }
  }
}

// ─── Actions ─────────────────────────────────────────────────────────────────

/// Every mutation a request can undergo after submission.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
  OfficerApprove,
  OfficerReject,
  Forward,
  DepartmentApprove,
  DepartmentReject,
}

impl Action {
  /// The single status this action may be applied from.
  pub fn from_status(self) -> MedicalStatus {
    match self {
      Self::OfficerApprove | Self::OfficerReject => MedicalStatus::Pending,
      Self::Forward => MedicalStatus::ApprovedByOfficer,
      Self::DepartmentApprove | Self::DepartmentReject => {
        MedicalStatus::ForwardedToDept
      }
    }
  }

  pub fn target(self) -> MedicalStatus {
    match self {
      Self::OfficerApprove => MedicalStatus::ApprovedByOfficer,
      Self::Forward => MedicalStatus::ForwardedToDept,
      Self::DepartmentApprove => MedicalStatus::ApprovedByDept,
      Self::OfficerReject | Self::DepartmentReject => MedicalStatus::Rejected,
    }
  }
}

/// A reviewer's verdict, shared by officer and department decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Decision {
  Approve,
  Reject,
}

impl Decision {
  pub fn officer_action(self) -> Action {
    match self {
      Self::Approve => Action::OfficerApprove,
      Self::Reject => Action::OfficerReject,
    }
  }

  pub fn department_action(self) -> Action {
    match self {
      Self::Approve => Action::DepartmentApprove,
      Self::Reject => Action::DepartmentReject,
    }
  }
}

// ─── MedicalRequest ──────────────────────────────────────────────────────────

/// A student's request for medical leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalRequest {
  pub request_id:       Uuid,
  /// Reference to a student owned by the identity collaborator.
  pub student_id:       Uuid,
  pub status:           MedicalStatus,
  pub reason:           String,
  pub start_date:       NaiveDate,
  pub end_date:         NaiveDate,
  /// Only written by officer transitions.
  pub officer_comments: Option<String>,
  /// Only written by department transitions.
  pub admin_comments:   Option<String>,
  /// Set exactly when the request enters `forwarded_to_dept`.
  pub forwarded_to:     Option<Uuid>,
  /// Opaque reference into file storage; never dereferenced here.
  pub certificate_url:  Option<String>,
  pub created_at:       DateTime<Utc>,
  /// Bumped on every status or comment mutation.
  pub updated_at:       DateTime<Utc>,
}

// ─── NewMedicalRequest ───────────────────────────────────────────────────────

/// Input to [`crate::store::LeaveStore::create_request`]. The store assigns
/// the id and timestamps; the status is always `pending`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMedicalRequest {
  pub student_id:      Uuid,
  pub reason:          String,
  pub start_date:      NaiveDate,
  pub end_date:        NaiveDate,
  #[serde(default)]
  pub certificate_url: Option<String>,
}

impl NewMedicalRequest {
  /// Check the shape of the submission. Does not consult the directory.
  pub fn validate(&self) -> Result<()> {
    if self.reason.trim().is_empty() {
      return Err(Error::Validation("reason is required".into()));
    }
    if self.start_date > self.end_date {
      return Err(Error::Validation(format!(
        "start date {} is after end date {}",
        self.start_date, self.end_date
      )));
    }
    Ok(())
  }
}

// ─── StatusChange ────────────────────────────────────────────────────────────

/// A conditional update: apply only if the stored status still equals
/// `from`. `None` fields leave the stored column untouched.
#[derive(Debug, Clone)]
pub struct StatusChange {
  pub request_id:       Uuid,
  pub from:             MedicalStatus,
  pub to:               MedicalStatus,
  pub officer_comments: Option<String>,
  pub admin_comments:   Option<String>,
  pub forwarded_to:     Option<Uuid>,
  pub at:               DateTime<Utc>,
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// Parameters for [`crate::store::LeaveStore::list_requests`]. Results are
/// ordered by `created_at` descending.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestFilter {
  pub status:       Option<MedicalStatus>,
  pub student_id:   Option<Uuid>,
  /// The lecturer a request was forwarded to.
  pub forwarded_to: Option<Uuid>,
}

#[cfg(test)]
mod tests {
  use super::*;

  const ACTIONS: [Action; 5] = [
    Action::OfficerApprove,
    Action::OfficerReject,
    Action::Forward,
    Action::DepartmentApprove,
    Action::DepartmentReject,
  ];

  #[test]
  fn happy_path_walks_the_table() {
    let s = MedicalStatus::Pending;
    let s = s.apply(Action::OfficerApprove).unwrap();
    assert_eq!(s, MedicalStatus::ApprovedByOfficer);
    let s = s.apply(Action::Forward).unwrap();
    assert_eq!(s, MedicalStatus::ForwardedToDept);
    let s = s.apply(Action::DepartmentApprove).unwrap();
    assert_eq!(s, MedicalStatus::ApprovedByDept);
  }

  #[test]
  fn terminal_states_accept_nothing() {
    for status in MedicalStatus::ALL.into_iter().filter(|s| s.is_terminal()) {
      for action in ACTIONS {
        assert_eq!(status.apply(action), None, "{status} + {action}");
      }
    }
  }

  #[test]
  fn each_action_has_exactly_one_source_state() {
    for action in ACTIONS {
      let legal: Vec<_> = MedicalStatus::ALL
        .into_iter()
        .filter(|s| s.apply(action).is_some())
        .collect();
      assert_eq!(legal, vec![action.from_status()]);
    }
  }

  #[test]
  fn pending_cannot_jump_to_department_approval() {
    assert_eq!(MedicalStatus::Pending.apply(Action::DepartmentApprove), None);
    assert_eq!(MedicalStatus::Pending.apply(Action::Forward), None);
  }

  #[test]
  fn status_names_round_trip_through_strum_and_serde() {
    for status in MedicalStatus::ALL {
      let parsed: MedicalStatus = status.as_str().parse().unwrap();
      assert_eq!(parsed, status);
      let json = serde_json::to_string(&status).unwrap();
      assert_eq!(json, format!("\"{}\"", status.as_str()));
    }
  }

  fn submission(start: &str, end: &str, reason: &str) -> NewMedicalRequest {
    NewMedicalRequest {
      student_id:      Uuid::new_v4(),
      reason:          reason.into(),
      start_date:      start.parse().unwrap(),
      end_date:        end.parse().unwrap(),
      certificate_url: None,
    }
  }

  #[test]
  fn validate_rejects_inverted_dates_and_blank_reason() {
    assert!(submission("2025-01-10", "2025-01-12", "Flu").validate().is_ok());
    assert!(submission("2025-01-10", "2025-01-10", "Flu").validate().is_ok());
    assert!(matches!(
      submission("2025-01-12", "2025-01-10", "Flu").validate(),
      Err(Error::Validation(_))
    ));
    assert!(matches!(
      submission("2025-01-10", "2025-01-12", "   ").validate(),
      Err(Error::Validation(_))
    ));
  }
}
