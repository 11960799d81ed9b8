//! Student ↔ module enrollments and the outcome types of bulk insertion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
  #[default]
  Active,
}

/// A student's link to a module. `(student_id, module_id)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
  pub student_id:  Uuid,
  pub module_id:   Uuid,
  pub status:      EnrollmentStatus,
  pub enrolled_at: DateTime<Utc>,
}

/// One row of a bulk enrollment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnrollmentPair {
  pub student_id: Uuid,
  pub module_id:  Uuid,
}

/// What happened to a single pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RowOutcome {
  Inserted,
  /// The pair already existed; not an error.
  Skipped,
  /// The store refused the row (e.g. an unknown module).
  Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowReport {
  #[serde(flatten)]
  pub pair:    EnrollmentPair,
  #[serde(flatten)]
  pub outcome: RowOutcome,
}

/// Result of a bulk enrollment. A batch with skipped or failed rows is still
/// a successful call; inspect the counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOutcome {
  pub inserted: usize,
  pub skipped:  usize,
  pub failed:   usize,
  pub rows:     Vec<RowReport>,
}

impl BulkOutcome {
  pub fn record(&mut self, pair: EnrollmentPair, outcome: RowOutcome) {
    match outcome {
      RowOutcome::Inserted => self.inserted += 1,
      RowOutcome::Skipped => self.skipped += 1,
      RowOutcome::Failed { .. } => self.failed += 1,
    }
    self.rows.push(RowReport { pair, outcome });
  }

  /// `true` when any row was skipped or failed.
  pub fn is_partial(&self) -> bool { self.skipped > 0 || self.failed > 0 }
}
