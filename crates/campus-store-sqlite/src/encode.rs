//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`
//! suffix) so that lexicographic order in SQL equals chronological order.
//! Calendar dates are `YYYY-MM-DD`. UUIDs are hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use campus_core::{
  directory::{Lecturer, ModuleRef, Role, UserProfile},
  enrollment::{Enrollment, EnrollmentStatus},
  notice::Notice,
  request::{MedicalRequest, MedicalStatus},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enums ────────────────────────────────────────────────────────────────────

pub fn encode_status(s: MedicalStatus) -> &'static str { s.as_str() }

pub fn decode_status(s: &str) -> Result<MedicalStatus> {
  s.parse().map_err(|_| Error::UnknownValue {
    column: "status",
    value:  s.to_owned(),
  })
}

pub fn encode_role(r: Role) -> String { r.to_string() }

pub fn decode_role(s: &str) -> Result<Role> {
  s.parse().map_err(|_| Error::UnknownValue { column: "role", value: s.to_owned() })
}

pub fn decode_enrollment_status(s: &str) -> Result<EnrollmentStatus> {
  match s {
    "active" => Ok(EnrollmentStatus::Active),
    other => Err(Error::UnknownValue {
      column: "enrollment status",
      value:  other.to_owned(),
    }),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawRequest::from_row`].
pub const REQUEST_COLUMNS: &str = "request_id, student_id, status, reason, \
  start_date, end_date, officer_comments, admin_comments, forwarded_to, \
  certificate_url, created_at, updated_at";

/// Raw strings read directly from a `medical_requests` row.
pub struct RawRequest {
  pub request_id:       String,
  pub student_id:       String,
  pub status:           String,
  pub reason:           String,
  pub start_date:       String,
  pub end_date:         String,
  pub officer_comments: Option<String>,
  pub admin_comments:   Option<String>,
  pub forwarded_to:     Option<String>,
  pub certificate_url:  Option<String>,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawRequest {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      request_id:       row.get(0)?,
      student_id:       row.get(1)?,
      status:           row.get(2)?,
      reason:           row.get(3)?,
      start_date:       row.get(4)?,
      end_date:         row.get(5)?,
      officer_comments: row.get(6)?,
      admin_comments:   row.get(7)?,
      forwarded_to:     row.get(8)?,
      certificate_url:  row.get(9)?,
      created_at:       row.get(10)?,
      updated_at:       row.get(11)?,
    })
  }

  pub fn into_request(self) -> Result<MedicalRequest> {
    Ok(MedicalRequest {
      request_id:       decode_uuid(&self.request_id)?,
      student_id:       decode_uuid(&self.student_id)?,
      status:           decode_status(&self.status)?,
      reason:           self.reason,
      start_date:       decode_date(&self.start_date)?,
      end_date:         decode_date(&self.end_date)?,
      officer_comments: self.officer_comments,
      admin_comments:   self.admin_comments,
      forwarded_to:     decode_opt_uuid(self.forwarded_to)?,
      certificate_url:  self.certificate_url,
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
    })
  }
}

pub const NOTICE_COLUMNS: &str = "notice_id, module_id, module_code, \
  author_id, author_name, title, content, created_at";

pub struct RawNotice {
  pub notice_id:   String,
  pub module_id:   String,
  pub module_code: String,
  pub author_id:   String,
  pub author_name: String,
  pub title:       String,
  pub content:     String,
  pub created_at:  String,
}

impl RawNotice {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      notice_id:   row.get(0)?,
      module_id:   row.get(1)?,
      module_code: row.get(2)?,
      author_id:   row.get(3)?,
      author_name: row.get(4)?,
      title:       row.get(5)?,
      content:     row.get(6)?,
      created_at:  row.get(7)?,
    })
  }

  pub fn into_notice(self) -> Result<Notice> {
    Ok(Notice {
      notice_id:   decode_uuid(&self.notice_id)?,
      module_id:   decode_uuid(&self.module_id)?,
      module_code: self.module_code,
      author_id:   decode_uuid(&self.author_id)?,
      author_name: self.author_name,
      title:       self.title,
      content:     self.content,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawEnrollment {
  pub student_id:  String,
  pub module_id:   String,
  pub status:      String,
  pub enrolled_at: String,
}

impl RawEnrollment {
  pub fn into_enrollment(self) -> Result<Enrollment> {
    Ok(Enrollment {
      student_id:  decode_uuid(&self.student_id)?,
      module_id:   decode_uuid(&self.module_id)?,
      status:      decode_enrollment_status(&self.status)?,
      enrolled_at: decode_dt(&self.enrolled_at)?,
    })
  }
}

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub name:          String,
  pub email:         String,
  pub role:          String,
  pub department_id: Option<String>,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      name:          row.get(1)?,
      email:         row.get(2)?,
      role:          row.get(3)?,
      department_id: row.get(4)?,
    })
  }

  pub fn into_profile(self) -> Result<UserProfile> {
    Ok(UserProfile {
      user_id: decode_uuid(&self.user_id)?,
      name:    self.name,
      email:   self.email,
      role:    decode_role(&self.role)?,
    })
  }

  pub fn into_lecturer(self) -> Result<Lecturer> {
    Ok(Lecturer {
      lecturer_id:   decode_uuid(&self.user_id)?,
      name:          self.name,
      email:         self.email,
      department_id: decode_opt_uuid(self.department_id)?,
    })
  }
}

pub struct RawModule {
  pub module_id: String,
  pub code:      String,
  pub name:      String,
  pub leader_id: Option<String>,
}

impl RawModule {
  pub fn into_module(self) -> Result<ModuleRef> {
    Ok(ModuleRef {
      module_id: decode_uuid(&self.module_id)?,
      code:      self.code,
      name:      self.name,
      leader_id: decode_opt_uuid(self.leader_id)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_sort_lexicographically() {
    let early = Utc.timestamp_opt(1_700_000_000, 5_000).unwrap();
    let late = Utc.timestamp_opt(1_700_000_000, 120_000_000).unwrap();
    assert!(encode_dt(early) < encode_dt(late));
    assert_eq!(encode_dt(early).len(), encode_dt(late).len());
  }

  #[test]
  fn timestamp_roundtrip_keeps_micros() {
    let ts = Utc.timestamp_opt(1_700_000_000, 123_456_000).unwrap();
    assert_eq!(decode_dt(&encode_dt(ts)).unwrap(), ts);
  }

  #[test]
  fn unknown_status_is_reported() {
    let err = decode_status("archived").unwrap_err();
    assert!(matches!(err, Error::UnknownValue { column: "status", .. }));
  }
}
