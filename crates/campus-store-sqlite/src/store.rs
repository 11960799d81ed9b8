//! [`SqliteStore`], the SQLite implementation of [`LeaveStore`].

use std::path::Path;

use chrono::{DateTime, SubsecRound as _, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use campus_core::{
  enrollment::Enrollment,
  notice::{NewNotice, Notice, NoticeQuery},
  notification::NotificationState,
  request::{MedicalRequest, MedicalStatus, NewMedicalRequest, RequestFilter, StatusChange},
  store::LeaveStore,
};

use crate::{
  encode::{
    NOTICE_COLUMNS, REQUEST_COLUMNS, RawEnrollment, RawNotice, RawRequest,
    decode_uuid, encode_date, encode_dt, encode_status, encode_uuid,
  },
  schema::SCHEMA,
  Result,
};

/// Current time at the precision the store persists.
pub(crate) fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

// ─── Store ───────────────────────────────────────────────────────────────────

/// A campus store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All calls
/// are serialised on the connection's thread, which is what makes the
/// conditional status update a true compare-and-set.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn id_set(&self, sql: &'static str, user_id: Uuid) -> Result<Vec<Uuid>> {
    let user_str = encode_uuid(user_id);
    let raws: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;
    raws.iter().map(|s| decode_uuid(s)).collect()
  }
}

fn select_request(
  conn: &rusqlite::Connection,
  id: &str,
) -> rusqlite::Result<Option<RawRequest>> {
  conn
    .query_row(
      &format!("SELECT {REQUEST_COLUMNS} FROM medical_requests WHERE request_id = ?1"),
      rusqlite::params![id],
      RawRequest::from_row,
    )
    .optional()
}

// ─── LeaveStore impl ─────────────────────────────────────────────────────────

impl LeaveStore for SqliteStore {
  type Error = crate::Error;

  // ── Medical requests ──────────────────────────────────────────────────────

  async fn create_request(&self, input: NewMedicalRequest) -> Result<MedicalRequest> {
    let at = now();
    let request = MedicalRequest {
      request_id:       Uuid::new_v4(),
      student_id:       input.student_id,
      status:           MedicalStatus::Pending,
      reason:           input.reason,
      start_date:       input.start_date,
      end_date:         input.end_date,
      officer_comments: None,
      admin_comments:   None,
      forwarded_to:     None,
      certificate_url:  input.certificate_url,
      created_at:       at,
      updated_at:       at,
    };

    let id_str      = encode_uuid(request.request_id);
    let student_str = encode_uuid(request.student_id);
    let status_str  = encode_status(request.status);
    let reason      = request.reason.clone();
    let start_str   = encode_date(request.start_date);
    let end_str     = encode_date(request.end_date);
    let cert        = request.certificate_url.clone();
    let at_str      = encode_dt(at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO medical_requests (
             request_id, student_id, status, reason, start_date, end_date,
             certificate_url, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
          rusqlite::params![
            id_str, student_str, status_str, reason, start_str, end_str, cert, at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(request)
  }

  async fn get_request(&self, id: Uuid) -> Result<Option<MedicalRequest>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(select_request(conn, &id_str)?))
      .await?;
    raw.map(RawRequest::into_request).transpose()
  }

  async fn list_requests(&self, filter: &RequestFilter) -> Result<Vec<MedicalRequest>> {
    let status_str    = filter.status.map(encode_status);
    let student_str   = filter.student_id.map(encode_uuid);
    let forwarded_str = filter.forwarded_to.map(encode_uuid);

    let raws: Vec<RawRequest> = self
      .conn
      .call(move |conn| {
        // NULL parameters disable their condition.
        let sql = format!(
          "SELECT {REQUEST_COLUMNS} FROM medical_requests
           WHERE (?1 IS NULL OR status       = ?1)
             AND (?2 IS NULL OR student_id   = ?2)
             AND (?3 IS NULL OR forwarded_to = ?3)
           ORDER BY created_at DESC, request_id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![status_str, student_str, forwarded_str],
            RawRequest::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRequest::into_request).collect()
  }

  async fn transition(&self, change: StatusChange) -> Result<Option<MedicalRequest>> {
    let id_str        = encode_uuid(change.request_id);
    let from_str      = encode_status(change.from);
    let to_str        = encode_status(change.to);
    let officer       = change.officer_comments;
    let admin         = change.admin_comments;
    let forwarded_str = change.forwarded_to.map(encode_uuid);
    let at_str        = encode_dt(change.at.trunc_subsecs(6));

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE medical_requests
              SET status           = ?1,
                  officer_comments = COALESCE(?2, officer_comments),
                  admin_comments   = COALESCE(?3, admin_comments),
                  forwarded_to     = COALESCE(?4, forwarded_to),
                  updated_at       = ?5
            WHERE request_id = ?6 AND status = ?7",
          rusqlite::params![to_str, officer, admin, forwarded_str, at_str, id_str, from_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_request(conn, &id_str)?)
      })
      .await?;

    raw.map(RawRequest::into_request).transpose()
  }

  // ── Notices ───────────────────────────────────────────────────────────────

  async fn create_notice(&self, input: NewNotice) -> Result<Notice> {
    let notice = Notice {
      notice_id:   Uuid::new_v4(),
      module_id:   input.module_id,
      module_code: input.module_code,
      author_id:   input.author_id,
      author_name: input.author_name,
      title:       input.title,
      content:     input.content,
      created_at:  now(),
    };

    let id_str     = encode_uuid(notice.notice_id);
    let module_str = encode_uuid(notice.module_id);
    let code       = notice.module_code.clone();
    let author_str = encode_uuid(notice.author_id);
    let author     = notice.author_name.clone();
    let title      = notice.title.clone();
    let content    = notice.content.clone();
    let at_str     = encode_dt(notice.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO notices (
             notice_id, module_id, module_code, author_id, author_name,
             title, content, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str, module_str, code, author_str, author, title, content, at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(notice)
  }

  async fn list_notices(&self, query: &NoticeQuery) -> Result<Vec<Notice>> {
    if query.module_ids.is_empty() {
      return Ok(Vec::new());
    }

    let mut params: Vec<String> =
      query.module_ids.iter().copied().map(encode_uuid).collect();
    let placeholders = (1..=params.len())
      .map(|i| format!("?{i}"))
      .collect::<Vec<_>>()
      .join(", ");
    let mut sql = format!(
      "SELECT {NOTICE_COLUMNS} FROM notices WHERE module_id IN ({placeholders})"
    );
    if let Some(after) = query.created_after {
      params.push(encode_dt(after));
      sql.push_str(&format!(" AND created_at >= ?{}", params.len()));
    }
    sql.push_str(" ORDER BY created_at DESC, notice_id");

    let raws: Vec<RawNotice> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), RawNotice::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawNotice::into_notice).collect()
  }

  // ── Enrollments ───────────────────────────────────────────────────────────

  async fn enroll(&self, student_id: Uuid, module_id: Uuid) -> Result<bool> {
    let student_str = encode_uuid(student_id);
    let module_str  = encode_uuid(module_id);
    let at_str      = encode_dt(now());

    // The primary key turns a duplicate into a no-op; foreign-key failures
    // still surface as errors.
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT OR IGNORE INTO enrollments (student_id, module_id, status, enrolled_at)
           VALUES (?1, ?2, 'active', ?3)",
          rusqlite::params![student_str, module_str, at_str],
        )?)
      })
      .await?;

    Ok(changed == 1)
  }

  async fn list_enrollments(&self, student_id: Uuid) -> Result<Vec<Enrollment>> {
    let student_str = encode_uuid(student_id);
    let raws: Vec<RawEnrollment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT student_id, module_id, status, enrolled_at
             FROM enrollments WHERE student_id = ?1
            ORDER BY enrolled_at, module_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![student_str], |row| {
            Ok(RawEnrollment {
              student_id:  row.get(0)?,
              module_id:   row.get(1)?,
              status:      row.get(2)?,
              enrolled_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEnrollment::into_enrollment).collect()
  }

  async fn enrolled_modules(&self, student_id: Uuid) -> Result<Vec<Uuid>> {
    self
      .id_set(
        "SELECT module_id FROM enrollments WHERE student_id = ?1 AND status = 'active'",
        student_id,
      )
      .await
  }

  // ── Notification overlay ──────────────────────────────────────────────────

  async fn notification_state(&self, user_id: Uuid) -> Result<NotificationState> {
    let dismissed = self
      .id_set("SELECT source_id FROM notification_dismissals WHERE user_id = ?1", user_id)
      .await?;
    let read = self
      .id_set("SELECT source_id FROM notification_reads WHERE user_id = ?1", user_id)
      .await?;

    Ok(NotificationState {
      user_id,
      dismissed_ids: dismissed.into_iter().collect(),
      read_ids:      read.into_iter().collect(),
    })
  }

  async fn add_dismissed(&self, user_id: Uuid, source_id: Uuid) -> Result<()> {
    let user_str   = encode_uuid(user_id);
    let source_str = encode_uuid(source_id);
    let at_str     = encode_dt(now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO notification_dismissals (user_id, source_id, recorded_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![user_str, source_str, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn add_read(&self, user_id: Uuid, source_ids: Vec<Uuid>) -> Result<usize> {
    let user_str = encode_uuid(user_id);
    let sources: Vec<String> = source_ids.into_iter().map(encode_uuid).collect();
    let at_str   = encode_dt(now());

    let added = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut added = 0usize;
        {
          let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO notification_reads (user_id, source_id, recorded_at)
             VALUES (?1, ?2, ?3)",
          )?;
          for source in &sources {
            added += stmt.execute(rusqlite::params![user_str, source, at_str])?;
          }
        }
        tx.commit()?;
        Ok(added)
      })
      .await?;

    Ok(added)
  }
}
