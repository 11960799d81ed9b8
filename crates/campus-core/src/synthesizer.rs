//! The notification synthesizer: a per-user feed computed on every read.
//!
//! Nothing here caches. [`NotificationSynthesizer::get_feed`] and
//! [`NotificationSynthesizer::mark_all_read`] share [`NotificationSynthesizer::sources`]
//! so "mark all read" covers exactly what the feed currently shows.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  Error, Result,
  notice::NoticeQuery,
  notification::{FeedConfig, FeedSources, NotificationView},
  request::RequestFilter,
  store::LeaveStore,
};

pub struct NotificationSynthesizer<S> {
  store:  Arc<S>,
  config: FeedConfig,
}

impl<S> Clone for NotificationSynthesizer<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), config: self.config }
  }
}

impl<S: LeaveStore> NotificationSynthesizer<S> {
  pub fn new(store: Arc<S>, config: FeedConfig) -> Self { Self { store, config } }

  /// Load the source records for `user_id` as of `now`.
  pub async fn sources(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<FeedSources> {
    let filter = RequestFilter { student_id: Some(user_id), ..Default::default() };
    let requests = self.store.list_requests(&filter).await.map_err(Error::store)?;

    let module_ids = self
      .store
      .enrolled_modules(user_id)
      .await
      .map_err(Error::store)?;
    let notices = if module_ids.is_empty() {
      Vec::new()
    } else {
      let query = NoticeQuery {
        module_ids,
        created_after: now.checked_sub_signed(self.config.notice_window),
      };
      self.store.list_notices(&query).await.map_err(Error::store)?
    };

    Ok(FeedSources { requests, notices })
  }

  /// The user's current feed, newest first.
  pub async fn get_feed(&self, user_id: Uuid) -> Result<Vec<NotificationView>> {
    let state = self
      .store
      .notification_state(user_id)
      .await
      .map_err(Error::store)?;
    let sources = self.sources(user_id, Utc::now()).await?;
    let feed = sources.project(&state);
    debug!(%user_id, items = feed.len(), "projected notification feed");
    Ok(feed)
  }

  pub async fn unread_count(&self, user_id: Uuid) -> Result<usize> {
    Ok(self.get_feed(user_id).await?.iter().filter(|v| !v.read).count())
  }

  /// Permanently hide `source_id` from the user's feed. Idempotent.
  pub async fn dismiss(&self, user_id: Uuid, source_id: Uuid) -> Result<()> {
    self
      .store
      .add_dismissed(user_id, source_id)
      .await
      .map_err(Error::store)?;
    info!(%user_id, %source_id, "notification dismissed");
    Ok(())
  }

  pub async fn mark_read(&self, user_id: Uuid, source_id: Uuid) -> Result<()> {
    self
      .store
      .add_read(user_id, vec![source_id])
      .await
      .map_err(Error::store)?;
    info!(%user_id, %source_id, "notification read");
    Ok(())
  }

  /// Mark every currently visible, unread item as read in one write.
  /// Returns the number of ids marked.
  pub async fn mark_all_read(&self, user_id: Uuid) -> Result<usize> {
    let unread: Vec<Uuid> = self
      .get_feed(user_id)
      .await?
      .into_iter()
      .filter(|v| !v.read)
      .map(|v| v.id)
      .collect();
    if unread.is_empty() {
      return Ok(0);
    }

    let added = self
      .store
      .add_read(user_id, unread)
      .await
      .map_err(Error::store)?;
    info!(%user_id, added, "marked all notifications read");
    Ok(added)
  }
}
