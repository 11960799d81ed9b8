//! The read-only view of the academic hierarchy and user identities.
//!
//! Faculty/department/degree/module CRUD lives elsewhere; the leave workflow
//! only reads through this trait. Backends may implement it next to
//! [`crate::store::LeaveStore`] or against a separate service.

use std::future::Future;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// A caller's role as reported by the identity collaborator. Role gating
/// happens before the core is invoked; the core only reads it.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
  Student,
  Lecturer,
  MedicalOfficer,
  Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
  pub user_id: Uuid,
  pub name:    String,
  pub email:   String,
  pub role:    Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecturer {
  pub lecturer_id:   Uuid,
  pub name:          String,
  pub email:         String,
  /// Frequently missing in practice.
  pub department_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRef {
  pub module_id: Uuid,
  pub code:      String,
  pub name:      String,
  /// The lecturer who leads the module, if assigned.
  pub leader_id: Option<Uuid>,
}

/// Parameters for [`Directory::list_lecturers`]. All fields are optional; an
/// empty filter lists every lecturer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LecturerFilter {
  pub department_id: Option<Uuid>,
  pub faculty_id:    Option<Uuid>,
  /// Fuzzy match over name and email.
  pub search:        Option<String>,
}

pub trait Directory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Look up any user by id.
  fn resolve_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<UserProfile>, Self::Error>> + Send + '_;

  /// The department a student declared, if any.
  fn department_of(
    &self,
    student_id: Uuid,
  ) -> impl Future<Output = Result<Option<Uuid>, Self::Error>> + Send + '_;

  fn list_lecturers<'a>(
    &'a self,
    filter: &'a LecturerFilter,
  ) -> impl Future<Output = Result<Vec<Lecturer>, Self::Error>> + Send + 'a;

  /// Returns `None` unless `id` denotes a lecturer.
  fn get_lecturer(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Lecturer>, Self::Error>> + Send + '_;

  fn get_module(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ModuleRef>, Self::Error>> + Send + '_;

  /// Modules currently attached to a degree programme, or `None` if the
  /// degree does not exist.
  fn modules_of_degree(
    &self,
    degree_id: Uuid,
  ) -> impl Future<Output = Result<Option<Vec<Uuid>>, Self::Error>> + Send + '_;
}
