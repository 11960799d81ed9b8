//! Notices and the derived notification feed.

use std::{
  io::Write,
  sync::{Arc, Mutex},
};

use chrono::{Duration, Utc};
use campus_core::{
  Error,
  enrollment::EnrollmentPair,
  notice::NewNotice,
  notification::{FeedConfig, NotificationKind, NotificationMeta},
  request::{Decision, MedicalStatus},
  store::LeaveStore,
  synthesizer::NotificationSynthesizer,
};
use uuid::Uuid;

use super::{Campus, campus};

async fn enrolled(c: &Campus) {
  c.ledger()
    .enroll(EnrollmentPair { student_id: c.student, module_id: c.cs101 })
    .await;
}

// ─── Notices ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn only_the_module_leader_may_post() {
  let c = campus().await;
  let board = c.notices();

  let err = board
    .post(c.visitor, c.cs101, "Lab moved".into(), "Room 204".into())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Validation(_)));

  let err = board
    .post(c.lecturer, Uuid::new_v4(), "Lab moved".into(), "Room 204".into())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: "module", .. }));

  let notice = board
    .post(c.lecturer, c.cs101, " Lab moved ".into(), "Room 204".into())
    .await
    .unwrap();
  assert_eq!(notice.title, "Lab moved");
  assert_eq!(notice.module_code, "CS101");
  assert_eq!(notice.author_name, "Ada Lovelace");

  let listed = board.list(c.cs101).await.unwrap();
  assert_eq!(listed, vec![notice]);
  assert!(board.list(c.cs102).await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_notice_is_rejected() {
  let c = campus().await;
  let err = c
    .notices()
    .post(c.lecturer, c.cs101, "Title".into(), "   ".into())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
}

// ─── Feed ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn pending_request_is_not_in_feed() {
  let c = campus().await;
  c.workflow().submit(c.flu()).await.unwrap();
  assert!(c.synthesizer().get_feed(c.student).await.unwrap().is_empty());
}

#[tokio::test]
async fn feed_follows_request_through_its_life() {
  let c = campus().await;
  let wf = c.workflow();
  let feed = c.synthesizer();
  let r = wf.submit(c.flu()).await.unwrap();

  wf.officer_decide(r.request_id, Decision::Approve, Some("Verified".into()))
    .await
    .unwrap();
  let items = feed.get_feed(c.student).await.unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].id, r.request_id);
  assert_eq!(items[0].kind, NotificationKind::Success);
  assert!(!items[0].read);

  c.routing().forward(r.request_id, c.lecturer).await.unwrap();
  let items = feed.get_feed(c.student).await.unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].kind, NotificationKind::Info);

  let done = wf
    .department_decide(r.request_id, Decision::Approve, Some("OK".into()))
    .await
    .unwrap();
  let items = feed.get_feed(c.student).await.unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].kind, NotificationKind::Success);
  assert_eq!(items[0].created_at, done.updated_at);
  assert!(items[0].message.contains("Comments: OK"));
  assert!(matches!(
    items[0].meta,
    Some(NotificationMeta::MedicalRequest { status: MedicalStatus::ApprovedByDept, .. })
  ));

  // Other users never see it.
  assert!(feed.get_feed(c.drifter).await.unwrap().is_empty());
}

#[tokio::test]
async fn notices_reach_enrolled_students_only() {
  let c = campus().await;
  enrolled(&c).await;
  c.notices()
    .post(c.lecturer, c.cs101, "Lab moved".into(), "Room 204".into())
    .await
    .unwrap();
  c.notices()
    .post(c.lecturer, c.cs102, "Quiz".into(), "Friday".into())
    .await
    .unwrap();

  let items = c.synthesizer().get_feed(c.student).await.unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].kind, NotificationKind::Notice);
  assert_eq!(items[0].title, "Lab moved");

  assert!(c.synthesizer().get_feed(c.drifter).await.unwrap().is_empty());
}

#[tokio::test]
async fn notices_outside_the_window_are_dropped() {
  let c = campus().await;
  enrolled(&c).await;
  let notice = c
    .store
    .create_notice(NewNotice {
      module_id:   c.cs101,
      module_code: "CS101".into(),
      author_id:   c.lecturer,
      author_name: "Ada Lovelace".into(),
      title:       "Welcome".into(),
      content:     "Hello".into(),
    })
    .await
    .unwrap();

  let synth = c.synthesizer();
  let now = Utc::now();
  assert_eq!(synth.sources(c.student, now).await.unwrap().notices.len(), 1);

  let later = notice.created_at + Duration::days(31);
  assert!(synth.sources(c.student, later).await.unwrap().notices.is_empty());
}

#[tokio::test]
async fn window_reaching_past_the_calendar_keeps_every_notice() {
  let c = campus().await;
  enrolled(&c).await;
  c.notices()
    .post(c.lecturer, c.cs101, "Welcome".into(), "Hello".into())
    .await
    .unwrap();

  let feed = FeedConfig { notice_window: Duration::days(100_000_000_000) };
  let synth = NotificationSynthesizer::new(c.store.clone(), feed);
  assert_eq!(synth.sources(c.student, Utc::now()).await.unwrap().notices.len(), 1);
}

#[tokio::test]
async fn dismiss_is_idempotent_and_permanent() {
  let c = campus().await;
  let wf = c.workflow();
  let feed = c.synthesizer();
  let r = wf.submit(c.flu()).await.unwrap();
  wf.officer_decide(r.request_id, Decision::Approve, None).await.unwrap();

  feed.dismiss(c.student, r.request_id).await.unwrap();
  feed.dismiss(c.student, r.request_id).await.unwrap();
  assert!(feed.get_feed(c.student).await.unwrap().is_empty());

  // A later transition does not resurrect it.
  c.routing().forward(r.request_id, c.lecturer).await.unwrap();
  assert!(feed.get_feed(c.student).await.unwrap().is_empty());

  let state = c.store.notification_state(c.student).await.unwrap();
  assert_eq!(state.dismissed_ids.len(), 1);
}

#[tokio::test]
async fn mark_all_read_then_feed_is_all_read() {
  let c = campus().await;
  enrolled(&c).await;
  let wf = c.workflow();
  let feed = c.synthesizer();

  let r = wf.submit(c.flu()).await.unwrap();
  wf.officer_decide(r.request_id, Decision::Approve, None).await.unwrap();
  c.notices()
    .post(c.lecturer, c.cs101, "Lab moved".into(), "Room 204".into())
    .await
    .unwrap();

  assert_eq!(feed.unread_count(c.student).await.unwrap(), 2);
  assert_eq!(feed.mark_all_read(c.student).await.unwrap(), 2);
  assert_eq!(feed.mark_all_read(c.student).await.unwrap(), 0);

  let items = feed.get_feed(c.student).await.unwrap();
  assert_eq!(items.len(), 2);
  assert!(items.iter().all(|v| v.read));
  assert_eq!(feed.unread_count(c.student).await.unwrap(), 0);
}

#[tokio::test]
async fn mark_read_flags_one_item() {
  let c = campus().await;
  let wf = c.workflow();
  let feed = c.synthesizer();
  let r = wf.submit(c.flu()).await.unwrap();
  wf.officer_decide(r.request_id, Decision::Reject, Some("Illegible".into()))
    .await
    .unwrap();

  feed.mark_read(c.student, r.request_id).await.unwrap();
  feed.mark_read(c.student, r.request_id).await.unwrap();
  let items = feed.get_feed(c.student).await.unwrap();
  assert_eq!(items[0].kind, NotificationKind::Error);
  assert!(items[0].read);
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    self.0.lock().unwrap().extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
}

impl Captured {
  fn text(&self) -> String { String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned() }
}

#[tokio::test]
async fn mark_read_is_logged() {
  let c = campus().await;
  let source = Uuid::new_v4();

  let logs = Captured::default();
  let writer = logs.clone();
  let subscriber = tracing_subscriber::fmt()
    .with_max_level(tracing::Level::INFO)
    .with_ansi(false)
    .without_time()
    .with_writer(move || writer.clone())
    .finish();
  let _guard = tracing::subscriber::set_default(subscriber);

  c.synthesizer().mark_read(c.student, source).await.unwrap();

  let text = logs.text();
  assert!(text.contains("notification read"), "{text}");
  assert!(text.contains(&source.to_string()), "{text}");
}
