//! [`Directory`] over the hierarchy tables of the same SQLite file.

use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use campus_core::directory::{Directory, Lecturer, LecturerFilter, ModuleRef, UserProfile};

use crate::{
  encode::{RawModule, RawUser, decode_opt_uuid, decode_uuid, encode_uuid},
  store::SqliteStore,
  Result,
};

const USER_COLUMNS: &str = "u.user_id, u.name, u.email, u.role, u.department_id";

/// Rank lecturers by fuzzy score over "name email", best first. Ties fall
/// back to name order; non-matches are dropped.
fn rank(lecturers: Vec<Lecturer>, query: &str) -> Vec<Lecturer> {
  let matcher = SkimMatcherV2::default();
  let mut scored: Vec<(i64, Lecturer)> = lecturers
    .into_iter()
    .filter_map(|l| {
      let haystack = format!("{} {}", l.name, l.email);
      matcher.fuzzy_match(&haystack, query).map(|score| (score, l))
    })
    .collect();
  scored.sort_by(|(sa, a), (sb, b)| sb.cmp(sa).then_with(|| a.name.cmp(&b.name)));
  scored.into_iter().map(|(_, l)| l).collect()
}

impl SqliteStore {
  async fn select_user(&self, id: Uuid, lecturers_only: bool) -> Result<Option<RawUser>> {
    let id_str = encode_uuid(id);
    let sql = if lecturers_only {
      format!("SELECT {USER_COLUMNS} FROM users u WHERE u.user_id = ?1 AND u.role = 'lecturer'")
    } else {
      format!("SELECT {USER_COLUMNS} FROM users u WHERE u.user_id = ?1")
    };
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawUser::from_row)
            .optional()?,
        )
      })
      .await?;
    Ok(raw)
  }
}

impl Directory for SqliteStore {
  type Error = crate::Error;

  async fn resolve_user(&self, id: Uuid) -> Result<Option<UserProfile>> {
    self
      .select_user(id, false)
      .await?
      .map(RawUser::into_profile)
      .transpose()
  }

  async fn department_of(&self, student_id: Uuid) -> Result<Option<Uuid>> {
    let raw = self.select_user(student_id, false).await?;
    decode_opt_uuid(raw.and_then(|u| u.department_id))
  }

  async fn list_lecturers(&self, filter: &LecturerFilter) -> Result<Vec<Lecturer>> {
    let department_str = filter.department_id.map(encode_uuid);
    let faculty_str    = filter.faculty_id.map(encode_uuid);

    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {USER_COLUMNS} FROM users u
             LEFT JOIN departments d ON d.department_id = u.department_id
            WHERE u.role = 'lecturer'
              AND (?1 IS NULL OR u.department_id = ?1)
              AND (?2 IS NULL OR d.faculty_id    = ?2)
            ORDER BY u.name, u.user_id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![department_str, faculty_str], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let lecturers = raws
      .into_iter()
      .map(RawUser::into_lecturer)
      .collect::<Result<Vec<_>>>()?;

    match filter.search.as_deref().map(str::trim) {
      Some(query) if !query.is_empty() => Ok(rank(lecturers, query)),
      _ => Ok(lecturers),
    }
  }

  async fn get_lecturer(&self, id: Uuid) -> Result<Option<Lecturer>> {
    self
      .select_user(id, true)
      .await?
      .map(RawUser::into_lecturer)
      .transpose()
  }

  async fn get_module(&self, id: Uuid) -> Result<Option<ModuleRef>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT module_id, code, name, leader_id FROM modules WHERE module_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawModule {
                  module_id: row.get(0)?,
                  code:      row.get(1)?,
                  name:      row.get(2)?,
                  leader_id: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawModule::into_module).transpose()
  }

  async fn modules_of_degree(&self, degree_id: Uuid) -> Result<Option<Vec<Uuid>>> {
    let id_str = encode_uuid(degree_id);
    let raws: Option<Vec<String>> = self
      .conn
      .call(move |conn| {
        let exists: Option<i64> = conn
          .query_row(
            "SELECT 1 FROM degrees WHERE degree_id = ?1",
            rusqlite::params![id_str],
            |row| row.get(0),
          )
          .optional()?;
        if exists.is_none() {
          return Ok(None);
        }
        let mut stmt = conn.prepare(
          "SELECT module_id FROM degree_modules WHERE degree_id = ?1 ORDER BY module_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(Some(rows))
      })
      .await?;

    raws
      .map(|ids| ids.iter().map(|s| decode_uuid(s)).collect())
      .transpose()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn lecturer(name: &str, email: &str) -> Lecturer {
    Lecturer {
      lecturer_id:   Uuid::new_v4(),
      name:          name.into(),
      email:         email.into(),
      department_id: None,
    }
  }

  #[test]
  fn rank_drops_non_matches() {
    let ranked = rank(
      vec![lecturer("Ada Lovelace", "ada@uni.test"), lecturer("Alan Turing", "alan@uni.test")],
      "lovel",
    );
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].name, "Ada Lovelace");
  }

  #[test]
  fn rank_matches_email() {
    let ranked = rank(vec![lecturer("Grace Hopper", "ghopper@uni.test")], "ghop");
    assert_eq!(ranked.len(), 1);
  }
}
