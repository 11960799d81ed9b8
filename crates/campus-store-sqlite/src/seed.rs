//! Loading the academic hierarchy from a JSON document.
//!
//! Hierarchy administration is out of scope for the campus service, but a
//! fresh database still needs faculties, departments, users, modules and
//! degrees before any request can be submitted. A seed is applied in one
//! transaction with `INSERT OR IGNORE`, so re-running it is harmless.

use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_core::directory::Role;

use crate::{
  encode::{encode_role, encode_uuid},
  store::SqliteStore,
  Result,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedFaculty {
  pub faculty_id: Uuid,
  pub name:       String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedDepartment {
  pub department_id: Uuid,
  pub faculty_id:    Uuid,
  pub name:          String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
  pub user_id:       Uuid,
  pub name:          String,
  pub email:         String,
  pub role:          Role,
  #[serde(default)]
  pub department_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedModule {
  pub module_id: Uuid,
  pub code:      String,
  pub name:      String,
  #[serde(default)]
  pub leader_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedDegree {
  pub degree_id:     Uuid,
  pub department_id: Uuid,
  pub name:          String,
  #[serde(default)]
  pub modules:       Vec<Uuid>,
}

/// A snapshot of the hierarchy. Every list may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchySeed {
  pub faculties:   Vec<SeedFaculty>,
  pub departments: Vec<SeedDepartment>,
  pub users:       Vec<SeedUser>,
  pub modules:     Vec<SeedModule>,
  pub degrees:     Vec<SeedDegree>,
}

/// Rows actually inserted by [`SqliteStore::load_seed`]. Rows that already
/// existed are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
  pub faculties:   usize,
  pub departments: usize,
  pub users:       usize,
  pub modules:     usize,
  pub degrees:     usize,
}

impl HierarchySeed {
  pub fn from_json(json: &str) -> Result<Self> { Ok(serde_json::from_str(json)?) }

  pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let json = tokio::fs::read_to_string(path.as_ref()).await?;
    Self::from_json(&json)
  }
}

impl SqliteStore {
  /// Apply `seed` atomically. Parents are inserted before children so the
  /// foreign keys hold at every step.
  pub async fn load_seed(&self, seed: HierarchySeed) -> Result<SeedSummary> {
    let summary = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut summary = SeedSummary::default();

        for f in &seed.faculties {
          summary.faculties += tx.execute(
            "INSERT OR IGNORE INTO faculties (faculty_id, name) VALUES (?1, ?2)",
            rusqlite::params![encode_uuid(f.faculty_id), f.name],
          )?;
        }
        for d in &seed.departments {
          summary.departments += tx.execute(
            "INSERT OR IGNORE INTO departments (department_id, faculty_id, name)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![encode_uuid(d.department_id), encode_uuid(d.faculty_id), d.name],
          )?;
        }
        for u in &seed.users {
          summary.users += tx.execute(
            "INSERT OR IGNORE INTO users (user_id, name, email, role, department_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
              encode_uuid(u.user_id),
              u.name,
              u.email,
              encode_role(u.role),
              u.department_id.map(encode_uuid),
            ],
          )?;
        }
        for m in &seed.modules {
          summary.modules += tx.execute(
            "INSERT OR IGNORE INTO modules (module_id, code, name, leader_id)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
              encode_uuid(m.module_id),
              m.code,
              m.name,
              m.leader_id.map(encode_uuid),
            ],
          )?;
        }
        for g in &seed.degrees {
          let degree_str = encode_uuid(g.degree_id);
          summary.degrees += tx.execute(
            "INSERT OR IGNORE INTO degrees (degree_id, department_id, name)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![degree_str, encode_uuid(g.department_id), g.name],
          )?;
          for module_id in &g.modules {
            tx.execute(
              "INSERT OR IGNORE INTO degree_modules (degree_id, module_id) VALUES (?1, ?2)",
              rusqlite::params![degree_str, encode_uuid(*module_id)],
            )?;
          }
        }

        tx.commit()?;
        Ok(summary)
      })
      .await?;

    Ok(summary)
  }
}
