//! The `Directory` impl and seeding.

use campus_core::directory::{Directory, LecturerFilter, Role};
use uuid::Uuid;

use super::campus;
use crate::seed::{HierarchySeed, SeedUser};

#[tokio::test]
async fn resolve_user_reports_role() {
  let c = campus().await;
  let officer = c.store.resolve_user(c.officer).await.unwrap().unwrap();
  assert_eq!(officer.role, Role::MedicalOfficer);
  assert!(c.store.resolve_user(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn department_of_student() {
  let c = campus().await;
  assert_eq!(c.store.department_of(c.student).await.unwrap(), Some(c.department));
  assert_eq!(c.store.department_of(c.drifter).await.unwrap(), None);
}

#[tokio::test]
async fn list_lecturers_by_scope() {
  let c = campus().await;

  let all = c.store.list_lecturers(&LecturerFilter::default()).await.unwrap();
  let names: Vec<_> = all.iter().map(|l| l.name.as_str()).collect();
  assert_eq!(names, vec!["Ada Lovelace", "Alan Turing"]);

  let in_dept = c
    .store
    .list_lecturers(&LecturerFilter { department_id: Some(c.department), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(in_dept.len(), 1);
  assert_eq!(in_dept[0].lecturer_id, c.lecturer);

  let in_faculty = c
    .store
    .list_lecturers(&LecturerFilter { faculty_id: Some(c.faculty), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(in_faculty.len(), 1);
}

#[tokio::test]
async fn lecturer_search_matches_email() {
  let c = campus().await;
  let found = c
    .store
    .list_lecturers(&LecturerFilter { search: Some("adalove".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].lecturer_id, c.lecturer);
}

#[tokio::test]
async fn get_lecturer_only_returns_lecturers() {
  let c = campus().await;
  assert!(c.store.get_lecturer(c.lecturer).await.unwrap().is_some());
  assert!(c.store.get_lecturer(c.officer).await.unwrap().is_none());
}

#[tokio::test]
async fn modules_of_degree() {
  let c = campus().await;
  let mut modules = c.store.modules_of_degree(c.degree).await.unwrap().unwrap();
  modules.sort();
  let mut expected = vec![c.cs101, c.cs102];
  expected.sort();
  assert_eq!(modules, expected);

  assert!(c.store.modules_of_degree(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn reseeding_is_idempotent() {
  let c = campus().await;
  let seed = HierarchySeed {
    users: vec![
      SeedUser {
        user_id:       c.student,
        name:          "Renamed".into(),
        email:         "x@uni.test".into(),
        role:          Role::Student,
        department_id: None,
      },
      SeedUser {
        user_id:       Uuid::new_v4(),
        name:          "New Student".into(),
        email:         "new@uni.test".into(),
        role:          Role::Student,
        department_id: None,
      },
    ],
    ..Default::default()
  };
  let summary = c.store.load_seed(seed).await.unwrap();
  assert_eq!(summary.users, 1);

  let student = c.store.resolve_user(c.student).await.unwrap().unwrap();
  assert_eq!(student.name, "Kofi Boateng");
}
