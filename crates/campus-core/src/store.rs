//! The `LeaveStore` trait.
//!
//! Implemented by storage backends (e.g. `campus-store-sqlite`). The services
//! in this crate depend on the abstraction, never on a concrete backend.
//!
//! Contention outcomes are returned as values rather than errors: a lost
//! compare-and-set is `Ok(None)` and a duplicate enrollment is `Ok(false)`.
//! The services decide what those mean.

use std::future::Future;

use uuid::Uuid;

use crate::{
  enrollment::Enrollment,
  notice::{NewNotice, Notice, NoticeQuery},
  notification::NotificationState,
  request::{MedicalRequest, NewMedicalRequest, RequestFilter, StatusChange},
};

/// Abstraction over a leave-workflow store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait LeaveStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Medical requests ──────────────────────────────────────────────────

  /// Persist a new request in `pending`. The store assigns the id and both
  /// timestamps.
  fn create_request(
    &self,
    input: NewMedicalRequest,
  ) -> impl Future<Output = Result<MedicalRequest, Self::Error>> + Send + '_;

  fn get_request(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<MedicalRequest>, Self::Error>> + Send + '_;

  /// Requests matching `filter`, newest first.
  fn list_requests<'a>(
    &'a self,
    filter: &'a RequestFilter,
  ) -> impl Future<Output = Result<Vec<MedicalRequest>, Self::Error>> + Send + 'a;

  /// Atomically apply `change` if and only if the stored status still equals
  /// `change.from`. Returns the updated record, or `None` when no row
  /// matched.
  fn transition(
    &self,
    change: StatusChange,
  ) -> impl Future<Output = Result<Option<MedicalRequest>, Self::Error>> + Send + '_;

  // ── Notices ───────────────────────────────────────────────────────────

  fn create_notice(
    &self,
    input: NewNotice,
  ) -> impl Future<Output = Result<Notice, Self::Error>> + Send + '_;

  fn list_notices<'a>(
    &'a self,
    query: &'a NoticeQuery,
  ) -> impl Future<Output = Result<Vec<Notice>, Self::Error>> + Send + 'a;

  // ── Enrollments ───────────────────────────────────────────────────────

  /// Insert one enrollment. Returns `false` if the pair already existed.
  fn enroll(
    &self,
    student_id: Uuid,
    module_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn list_enrollments(
    &self,
    student_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Enrollment>, Self::Error>> + Send + '_;

  /// Ids of the modules a student is actively enrolled in.
  fn enrolled_modules(
    &self,
    student_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;

  // ── Notification overlay ──────────────────────────────────────────────

  /// The user's read/dismissed sets; empty if the user has none yet.
  fn notification_state(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<NotificationState, Self::Error>> + Send + '_;

  /// Add `source_id` to the user's dismissed set. Idempotent.
  fn add_dismissed(
    &self,
    user_id: Uuid,
    source_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Add every id to the user's read set in one write. Returns how many
  /// were newly added.
  fn add_read(
    &self,
    user_id: Uuid,
    source_ids: Vec<Uuid>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
