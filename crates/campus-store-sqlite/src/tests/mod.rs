//! Integration tests for `SqliteStore` and the core services running on it,
//! against an in-memory database.

mod directory;
mod feed;
mod ledger;

use std::sync::Arc;

use campus_core::{
  directory::Role,
  ledger::EnrollmentLedger,
  notice::NoticeBoard,
  notification::FeedConfig,
  request::NewMedicalRequest,
  routing::RoutingResolver,
  synthesizer::NotificationSynthesizer,
  workflow::LeaveWorkflow,
};
use uuid::Uuid;

use crate::{
  SqliteStore,
  seed::{HierarchySeed, SeedDegree, SeedDepartment, SeedFaculty, SeedModule, SeedUser},
};

/// Ids of everything [`campus`] seeds.
pub struct Campus {
  pub store:      Arc<SqliteStore>,
  pub faculty:    Uuid,
  pub department: Uuid,
  pub student:    Uuid,
  /// A second student with no department on record.
  pub drifter:    Uuid,
  pub officer:    Uuid,
  /// Leads both modules; belongs to `department`.
  pub lecturer:   Uuid,
  /// No department.
  pub visitor:    Uuid,
  pub cs101:      Uuid,
  pub cs102:      Uuid,
  pub degree:     Uuid,
}

fn user(user_id: Uuid, name: &str, role: Role, department_id: Option<Uuid>) -> SeedUser {
  SeedUser {
    user_id,
    name: name.into(),
    email: format!("{}@uni.test", name.to_lowercase().replace([' ', '.'], "")),
    role,
    department_id,
  }
}

pub async fn campus() -> Campus {
  let store = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store");

  let c = Campus {
    store:      Arc::new(store),
    faculty:    Uuid::new_v4(),
    department: Uuid::new_v4(),
    student:    Uuid::new_v4(),
    drifter:    Uuid::new_v4(),
    officer:    Uuid::new_v4(),
    lecturer:   Uuid::new_v4(),
    visitor:    Uuid::new_v4(),
    cs101:      Uuid::new_v4(),
    cs102:      Uuid::new_v4(),
    degree:     Uuid::new_v4(),
  };

  let seed = HierarchySeed {
    faculties:   vec![SeedFaculty { faculty_id: c.faculty, name: "Science".into() }],
    departments: vec![SeedDepartment {
      department_id: c.department,
      faculty_id:    c.faculty,
      name:          "Computer Science".into(),
    }],
    users:       vec![
      user(c.student, "Kofi Boateng", Role::Student, Some(c.department)),
      user(c.drifter, "Ama Owusu", Role::Student, None),
      user(c.officer, "Dr. Mensah", Role::MedicalOfficer, None),
      user(c.lecturer, "Ada Lovelace", Role::Lecturer, Some(c.department)),
      user(c.visitor, "Alan Turing", Role::Lecturer, None),
    ],
    modules:     vec![
      SeedModule {
        module_id: c.cs101,
        code:      "CS101".into(),
        name:      "Programming I".into(),
        leader_id: Some(c.lecturer),
      },
      SeedModule {
        module_id: c.cs102,
        code:      "CS102".into(),
        name:      "Programming II".into(),
        leader_id: Some(c.lecturer),
      },
    ],
    degrees:     vec![SeedDegree {
      degree_id:     c.degree,
      department_id: c.department,
      name:          "BSc Computer Science".into(),
      modules:       vec![c.cs101, c.cs102],
    }],
  };
  c.store.load_seed(seed).await.expect("seed");
  c
}

impl Campus {
  pub fn workflow(&self) -> LeaveWorkflow<SqliteStore, SqliteStore> {
    LeaveWorkflow::new(self.store.clone(), self.store.clone())
  }

  pub fn routing(&self) -> RoutingResolver<SqliteStore, SqliteStore> {
    RoutingResolver::new(self.store.clone(), self.store.clone())
  }

  pub fn synthesizer(&self) -> NotificationSynthesizer<SqliteStore> {
    NotificationSynthesizer::new(self.store.clone(), FeedConfig::default())
  }

  pub fn ledger(&self) -> EnrollmentLedger<SqliteStore, SqliteStore> {
    EnrollmentLedger::new(self.store.clone(), self.store.clone())
  }

  pub fn notices(&self) -> NoticeBoard<SqliteStore, SqliteStore> {
    NoticeBoard::new(self.store.clone(), self.store.clone())
  }

  pub fn flu(&self) -> NewMedicalRequest {
    NewMedicalRequest {
      student_id:      self.student,
      reason:          "Flu".into(),
      start_date:      "2025-01-10".parse().unwrap(),
      end_date:        "2025-01-12".parse().unwrap(),
      certificate_url: None,
    }
  }
}
