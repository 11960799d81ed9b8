//! The enrollment ledger.
//!
//! Pairs are inserted one at a time with no transaction spanning the batch.
//! A duplicate is a skip, a store refusal is a failed row, and neither stops
//! the rest of the batch.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  directory::Directory,
  enrollment::{BulkOutcome, Enrollment, EnrollmentPair, RowOutcome},
  store::LeaveStore,
};

pub struct EnrollmentLedger<S, D> {
  store:     Arc<S>,
  directory: Arc<D>,
}

impl<S, D> Clone for EnrollmentLedger<S, D> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), directory: self.directory.clone() }
  }
}

impl<S: LeaveStore, D: Directory> EnrollmentLedger<S, D> {
  pub fn new(store: Arc<S>, directory: Arc<D>) -> Self {
    Self { store, directory }
  }

  /// Enroll a single pair with the same skip-on-duplicate semantics.
  pub async fn enroll(&self, pair: EnrollmentPair) -> RowOutcome {
    match self.store.enroll(pair.student_id, pair.module_id).await {
      Ok(true) => RowOutcome::Inserted,
      Ok(false) => RowOutcome::Skipped,
      Err(e) => {
        warn!(
          student_id = %pair.student_id,
          module_id = %pair.module_id,
          error = %e,
          "enrollment row failed"
        );
        RowOutcome::Failed { reason: e.to_string() }
      }
    }
  }

  pub async fn bulk_create(&self, pairs: Vec<EnrollmentPair>) -> BulkOutcome {
    let mut outcome = BulkOutcome::default();
    for pair in pairs {
      let row = self.enroll(pair).await;
      outcome.record(pair, row);
    }
    info!(
      inserted = outcome.inserted,
      skipped = outcome.skipped,
      failed = outcome.failed,
      "bulk enrollment finished"
    );
    outcome
  }

  /// Enroll a student in every module currently attached to a degree.
  pub async fn auto_enroll_by_degree(
    &self,
    student_id: Uuid,
    degree_id: Uuid,
  ) -> Result<BulkOutcome> {
    let modules = self
      .directory
      .modules_of_degree(degree_id)
      .await
      .map_err(Error::directory)?
      .ok_or_else(|| Error::not_found("degree", degree_id))?;

    let pairs = modules
      .into_iter()
      .map(|module_id| EnrollmentPair { student_id, module_id })
      .collect();
    Ok(self.bulk_create(pairs).await)
  }

  pub async fn list(&self, student_id: Uuid) -> Result<Vec<Enrollment>> {
    self
      .store
      .list_enrollments(student_id)
      .await
      .map_err(Error::store)
  }
}
