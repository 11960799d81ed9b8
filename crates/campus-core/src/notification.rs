//! Derived notifications.
//!
//! A notification is never stored. The feed is projected at read time from
//! the source records ([`MedicalRequest`]s and [`Notice`]s) plus a per-user
//! [`NotificationState`] overlay that only records which source ids have been
//! read or dismissed.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  notice::Notice,
  request::{MedicalRequest, MedicalStatus},
};

pub const DEFAULT_NOTICE_WINDOW_DAYS: i64 = 30;

// ─── Overlay ─────────────────────────────────────────────────────────────────

/// Per-user read/dismissed sets. Both only ever grow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationState {
  pub user_id:       Uuid,
  pub dismissed_ids: BTreeSet<Uuid>,
  pub read_ids:      BTreeSet<Uuid>,
}

impl NotificationState {
  pub fn empty(user_id: Uuid) -> Self {
    Self { user_id, ..Default::default() }
  }
}

// ─── View ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
  Success,
  Error,
  Info,
  Notice,
}

/// Extra context about the source record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum NotificationMeta {
  MedicalRequest {
    status:           MedicalStatus,
    start_date:       NaiveDate,
    end_date:         NaiveDate,
    officer_comments: Option<String>,
    admin_comments:   Option<String>,
    forwarded_to:     Option<Uuid>,
  },
  Notice {
    module_id:   Uuid,
    module_code: String,
    author_name: String,
  },
}

/// One entry of a user's feed. `id` is the source record's id, so a request
/// keeps the same notification id across every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationView {
  pub id:         Uuid,
  pub title:      String,
  pub message:    String,
  #[serde(rename = "type")]
  pub kind:       NotificationKind,
  pub read:       bool,
  pub created_at: DateTime<Utc>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub meta:       Option<NotificationMeta>,
}

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct FeedConfig {
  /// How far back module notices are surfaced.
  pub notice_window: Duration,
}

impl FeedConfig {
  pub fn with_window_days(days: i64) -> Self {
    Self { notice_window: Duration::days(days) }
  }
}

impl Default for FeedConfig {
  fn default() -> Self { Self::with_window_days(DEFAULT_NOTICE_WINDOW_DAYS) }
}

// ─── Projection ──────────────────────────────────────────────────────────────

/// The raw records a feed is projected from.
#[derive(Debug, Clone, Default)]
pub struct FeedSources {
  /// The user's own requests, any status.
  pub requests: Vec<MedicalRequest>,
  /// Notices for the user's active modules inside the window.
  pub notices:  Vec<Notice>,
}

impl FeedSources {
  /// Project the feed: drop pending requests and dismissed ids, mark read
  /// ids, newest first. Pure and deterministic.
  pub fn project(&self, state: &NotificationState) -> Vec<NotificationView> {
    let requests = self
      .requests
      .iter()
      .filter(|r| r.status != MedicalStatus::Pending)
      .map(request_view);
    let notices = self.notices.iter().map(notice_view);

    let mut feed: Vec<NotificationView> = requests
      .chain(notices)
      .filter(|view| !state.dismissed_ids.contains(&view.id))
      .map(|mut view| {
        view.read = state.read_ids.contains(&view.id);
        view
      })
      .collect();

    feed.sort_by(|a, b| {
      b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id))
    });
    feed
  }
}

fn request_kind(status: MedicalStatus) -> NotificationKind {
  if status.as_str().contains("approved") {
    NotificationKind::Success
  } else if status == MedicalStatus::Rejected {
    NotificationKind::Error
  } else {
    NotificationKind::Info
  }
}

fn request_title(status: MedicalStatus) -> &'static str {
  match status {
    MedicalStatus::Pending => "Medical request submitted",
    MedicalStatus::ApprovedByOfficer => "Medical request approved by officer",
    MedicalStatus::Rejected => "Medical request rejected",
    MedicalStatus::ForwardedToDept => "Medical request forwarded to department",
    MedicalStatus::ApprovedByDept => "Medical request approved by department",
  }
}

fn request_view(r: &MedicalRequest) -> NotificationView {
  let mut message = format!(
    "Your medical leave request for {} to {} is {}.",
    r.start_date,
    r.end_date,
    r.status.describe()
  );
  // Department comments supersede the officer's once they exist.
  if let Some(comments) = r.admin_comments.as_ref().or(r.officer_comments.as_ref()) {
    message.push_str(" Comments: ");
    message.push_str(comments);
  }

  NotificationView {
    id: r.request_id,
    title: request_title(r.status).to_owned(),
    message,
    kind: request_kind(r.status),
    read: false,
    created_at: r.updated_at,
    meta: Some(NotificationMeta::MedicalRequest {
      status:           r.status,
      start_date:       r.start_date,
      end_date:         r.end_date,
      officer_comments: r.officer_comments.clone(),
      admin_comments:   r.admin_comments.clone(),
      forwarded_to:     r.forwarded_to,
    }),
  }
}

fn notice_view(n: &Notice) -> NotificationView {
  NotificationView {
    id:         n.notice_id,
    title:      n.title.clone(),
    message:    n.content.clone(),
    kind:       NotificationKind::Notice,
    read:       false,
    created_at: n.created_at,
    meta:       Some(NotificationMeta::Notice {
      module_id:   n.module_id,
      module_code: n.module_code.clone(),
      author_name: n.author_name.clone(),
    }),
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn at(secs: i64) -> DateTime<Utc> { Utc.timestamp_opt(secs, 0).unwrap() }

  fn request(status: MedicalStatus, updated: i64) -> MedicalRequest {
    MedicalRequest {
      request_id:       Uuid::new_v4(),
      student_id:       Uuid::nil(),
      status,
      reason:           "Flu".into(),
      start_date:       "2025-01-10".parse().unwrap(),
      end_date:         "2025-01-12".parse().unwrap(),
      officer_comments: Some("Verified".into()),
      admin_comments:   None,
      forwarded_to:     None,
      certificate_url:  None,
      created_at:       at(0),
      updated_at:       at(updated),
    }
  }

  fn notice(created: i64) -> Notice {
    Notice {
      notice_id:   Uuid::new_v4(),
      module_id:   Uuid::new_v4(),
      module_code: "CS101".into(),
      author_id:   Uuid::new_v4(),
      author_name: "Dr. Ada".into(),
      title:       "Lab moved".into(),
      content:     "Lab 3 is now in room 204.".into(),
      created_at:  at(created),
    }
  }

  #[test]
  fn pending_requests_are_not_notifications() {
    let sources = FeedSources {
      requests: vec![request(MedicalStatus::Pending, 10)],
      notices:  vec![],
    };
    assert!(sources.project(&NotificationState::default()).is_empty());
  }

  #[test]
  fn kinds_follow_status() {
    let sources = FeedSources {
      requests: vec![
        request(MedicalStatus::ApprovedByOfficer, 1),
        request(MedicalStatus::Rejected, 2),
        request(MedicalStatus::ForwardedToDept, 3),
        request(MedicalStatus::ApprovedByDept, 4),
      ],
      notices:  vec![notice(5)],
    };
    let kinds: Vec<_> = sources
      .project(&NotificationState::default())
      .into_iter()
      .map(|v| v.kind)
      .collect();
    assert_eq!(kinds, vec![
      NotificationKind::Notice,
      NotificationKind::Success,
      NotificationKind::Info,
      NotificationKind::Error,
      NotificationKind::Success,
    ]);
  }

  #[test]
  fn dismissed_ids_are_hidden_and_read_ids_flagged() {
    let a = request(MedicalStatus::Rejected, 1);
    let b = notice(2);
    let c = notice(3);
    let mut state = NotificationState::empty(Uuid::nil());
    state.dismissed_ids.insert(b.notice_id);
    state.read_ids.insert(a.request_id);

    let sources = FeedSources { requests: vec![a.clone()], notices: vec![b, c.clone()] };
    let feed = sources.project(&state);

    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].id, c.notice_id);
    assert!(!feed[0].read);
    assert_eq!(feed[1].id, a.request_id);
    assert!(feed[1].read);
  }

  #[test]
  fn request_message_carries_latest_comments() {
    let mut r = request(MedicalStatus::ApprovedByDept, 1);
    r.admin_comments = Some("OK".into());
    let sources = FeedSources { requests: vec![r], notices: vec![] };
    let view = &sources.project(&NotificationState::default())[0];
    assert!(view.message.contains("approved by your department"));
    assert!(view.message.ends_with("Comments: OK"));
  }

  #[test]
  fn view_serialises_kind_as_type() {
    let sources = FeedSources { requests: vec![], notices: vec![notice(1)] };
    let view = &sources.project(&NotificationState::default())[0];
    let json = serde_json::to_value(view).unwrap();
    assert_eq!(json["type"], "notice");
    assert_eq!(json["meta"]["source"], "notice");
    assert_eq!(json["meta"]["module_code"], "CS101");
  }
}
