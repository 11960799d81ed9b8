//! ETag computation for notification feeds.
//!
//! The tag is a SHA-256 over every field a client renders, in feed order.
//! Any transition, new notice, read or dismissal changes it.

use axum::http::{HeaderMap, header};
use campus_core::notification::NotificationView;
use sha2::{Digest, Sha256};

/// Compute a strong, quoted ETag for a projected feed.
pub fn feed_etag(feed: &[NotificationView]) -> String {
  let mut hasher = Sha256::new();
  for view in feed {
    hasher.update(view.id.as_bytes());
    hasher.update(view.created_at.timestamp_micros().to_le_bytes());
    hasher.update([u8::from(view.read)]);
    hasher.update(view.title.as_bytes());
    hasher.update([0]);
    hasher.update(view.message.as_bytes());
    hasher.update([0]);
  }
  format!("\"{}\"", hex::encode(hasher.finalize()))
}

/// `true` if `If-None-Match` lists `etag` (quoted or bare) or `*`.
pub fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
  let Some(value) = headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
  else {
    return false;
  };
  let bare = etag.trim_matches('"');
  value.split(',').map(str::trim).any(|candidate| {
    let candidate = candidate.strip_prefix("W/").unwrap_or(candidate);
    candidate == "*" || candidate == etag || candidate == bare
  })
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;
  use campus_core::notification::NotificationKind;
  use chrono::{TimeZone, Utc};
  use uuid::Uuid;

  use super::*;

  fn view(read: bool) -> NotificationView {
    NotificationView {
      id:         Uuid::nil(),
      title:      "Lab moved".into(),
      message:    "Room 204".into(),
      kind:       NotificationKind::Notice,
      read,
      created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
      meta:       None,
    }
  }

  #[test]
  fn reading_changes_the_tag() {
    assert_eq!(feed_etag(&[view(false)]), feed_etag(&[view(false)]));
    assert_ne!(feed_etag(&[view(false)]), feed_etag(&[view(true)]));
    assert_ne!(feed_etag(&[]), feed_etag(&[view(false)]));
  }

  #[test]
  fn if_none_match_accepts_quoted_and_bare() {
    let etag = feed_etag(&[view(false)]);
    let mut headers = HeaderMap::new();
    headers.insert(header::IF_NONE_MATCH, HeaderValue::from_str(&etag).unwrap());
    assert!(if_none_match(&headers, &etag));

    let bare = etag.trim_matches('"').to_owned();
    headers.insert(header::IF_NONE_MATCH, HeaderValue::from_str(&bare).unwrap());
    assert!(if_none_match(&headers, &etag));

    headers.insert(header::IF_NONE_MATCH, HeaderValue::from_static("\"other\""));
    assert!(!if_none_match(&headers, &etag));

    assert!(!if_none_match(&HeaderMap::new(), &etag));
  }
}
