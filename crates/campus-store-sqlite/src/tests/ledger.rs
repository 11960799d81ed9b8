//! Enrollment ledger against the real store.

use std::collections::BTreeSet;

use campus_core::{
  Error,
  enrollment::{EnrollmentPair, EnrollmentStatus, RowOutcome},
  store::LeaveStore,
};
use uuid::Uuid;

use super::campus;

#[tokio::test]
async fn bulk_counts_duplicates_as_skipped() {
  let c = campus().await;
  let ledger = c.ledger();
  let a = EnrollmentPair { student_id: c.student, module_id: c.cs101 };
  let b = EnrollmentPair { student_id: c.student, module_id: c.cs102 };
  let d = EnrollmentPair { student_id: c.drifter, module_id: c.cs101 };

  let outcome = ledger.bulk_create(vec![a, b, a, d, b]).await;
  assert_eq!(outcome.inserted, 3);
  assert_eq!(outcome.skipped, 2);
  assert_eq!(outcome.failed, 0);
  assert!(outcome.is_partial());
  assert_eq!(outcome.rows.len(), 5);
  assert_eq!(outcome.rows[2].outcome, RowOutcome::Skipped);

  // The ledger holds exactly the distinct pairs.
  let modules_of = |student: Uuid| {
    let store = c.store.clone();
    async move {
      store
        .list_enrollments(student)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.module_id)
        .collect::<BTreeSet<_>>()
    }
  };
  assert_eq!(modules_of(c.student).await, BTreeSet::from([c.cs101, c.cs102]));
  assert_eq!(modules_of(c.drifter).await, BTreeSet::from([c.cs101]));

  let again = ledger.bulk_create(vec![a, b]).await;
  assert_eq!(again.inserted, 0);
  assert_eq!(again.skipped, 2);
}

#[tokio::test]
async fn unknown_module_fails_only_its_row() {
  let c = campus().await;
  let ok = EnrollmentPair { student_id: c.student, module_id: c.cs101 };
  let bad = EnrollmentPair { student_id: c.student, module_id: Uuid::new_v4() };

  let outcome = c.ledger().bulk_create(vec![bad, ok]).await;
  assert_eq!(outcome.inserted, 1);
  assert_eq!(outcome.failed, 1);
  assert!(matches!(outcome.rows[0].outcome, RowOutcome::Failed { .. }));
  assert_eq!(outcome.rows[1].outcome, RowOutcome::Inserted);
}

#[tokio::test]
async fn auto_enroll_by_degree_is_repeatable() {
  let c = campus().await;
  let ledger = c.ledger();

  let first = ledger.auto_enroll_by_degree(c.student, c.degree).await.unwrap();
  assert_eq!(first.inserted, 2);
  assert!(!first.is_partial());

  let second = ledger.auto_enroll_by_degree(c.student, c.degree).await.unwrap();
  assert_eq!(second.inserted, 0);
  assert_eq!(second.skipped, 2);

  let enrollments = ledger.list(c.student).await.unwrap();
  assert_eq!(enrollments.len(), 2);
  assert!(enrollments.iter().all(|e| e.status == EnrollmentStatus::Active));

  let mut modules = c.store.enrolled_modules(c.student).await.unwrap();
  modules.sort();
  let mut expected = vec![c.cs101, c.cs102];
  expected.sort();
  assert_eq!(modules, expected);
}

#[tokio::test]
async fn auto_enroll_unknown_degree_is_not_found() {
  let c = campus().await;
  let err = c
    .ledger()
    .auto_enroll_by_degree(c.student, Uuid::new_v4())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: "degree", .. }));
}

#[tokio::test]
async fn concurrent_duplicate_enrollments_insert_once() {
  let c = campus().await;
  let pair = EnrollmentPair { student_id: c.student, module_id: c.cs101 };
  let ledger = c.ledger();

  let (a, b) = tokio::join!(ledger.enroll(pair), ledger.enroll(pair));
  let inserted = [a, b].iter().filter(|o| **o == RowOutcome::Inserted).count();
  assert_eq!(inserted, 1);
  assert_eq!(c.store.list_enrollments(c.student).await.unwrap().len(), 1);
}
