//! Module notices posted by lecturers, and the service that posts them.
//!
//! Notices are immutable once written. They feed the notification synthesizer
//! for every student enrolled in the notice's module.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{Error, Result, directory::Directory, store::LeaveStore};

/// A notice about a module, written by the lecturer who leads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
  pub notice_id:   Uuid,
  pub module_id:   Uuid,
  pub module_code: String,
  pub author_id:   Uuid,
  pub author_name: String,
  pub title:       String,
  pub content:     String,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`LeaveStore::create_notice`]; denormalised fields are resolved
/// from the directory before the store sees them.
#[derive(Debug, Clone)]
pub struct NewNotice {
  pub module_id:   Uuid,
  pub module_code: String,
  pub author_id:   Uuid,
  pub author_name: String,
  pub title:       String,
  pub content:     String,
}

/// Parameters for [`LeaveStore::list_notices`]. Results are ordered by
/// `created_at` descending.
#[derive(Debug, Clone, Default)]
pub struct NoticeQuery {
  /// Restrict to these modules. An empty list matches nothing.
  pub module_ids:    Vec<Uuid>,
  /// Only notices created at or after this instant.
  pub created_after: Option<DateTime<Utc>>,
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// Posts and lists notices.
pub struct NoticeBoard<S, D> {
  store:     Arc<S>,
  directory: Arc<D>,
}

impl<S, D> Clone for NoticeBoard<S, D> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), directory: self.directory.clone() }
  }
}

impl<S: LeaveStore, D: Directory> NoticeBoard<S, D> {
  pub fn new(store: Arc<S>, directory: Arc<D>) -> Self {
    Self { store, directory }
  }

  /// Post a notice for `module_id`. Only the module's leading lecturer may
  /// author one.
  pub async fn post(
    &self,
    author_id: Uuid,
    module_id: Uuid,
    title: String,
    content: String,
  ) -> Result<Notice> {
    if title.trim().is_empty() {
      return Err(Error::Validation("notice title is required".into()));
    }
    if content.trim().is_empty() {
      return Err(Error::Validation("notice content is required".into()));
    }

    let module = self
      .directory
      .get_module(module_id)
      .await
      .map_err(Error::directory)?
      .ok_or_else(|| Error::not_found("module", module_id))?;

    if module.leader_id != Some(author_id) {
      return Err(Error::Validation(format!(
        "lecturer {author_id} does not lead module {}",
        module.code
      )));
    }

    let author = self
      .directory
      .get_lecturer(author_id)
      .await
      .map_err(Error::directory)?
      .ok_or_else(|| Error::not_found("lecturer", author_id))?;

    let notice = self
      .store
      .create_notice(NewNotice {
        module_id,
        module_code: module.code,
        author_id,
        author_name: author.name,
        title: title.trim().to_owned(),
        content,
      })
      .await
      .map_err(Error::store)?;

    info!(notice_id = %notice.notice_id, module = %notice.module_code, "notice posted");
    Ok(notice)
  }

  /// All notices for one module, newest first.
  pub async fn list(&self, module_id: Uuid) -> Result<Vec<Notice>> {
    let query = NoticeQuery { module_ids: vec![module_id], created_after: None };
    self.store.list_notices(&query).await.map_err(Error::store)
  }
}
