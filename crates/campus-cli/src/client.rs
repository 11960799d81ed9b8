//! Async HTTP client wrapping the campus JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use campus_core::{
  directory::{Lecturer, LecturerFilter},
  enrollment::{BulkOutcome, Enrollment, EnrollmentPair},
  notice::Notice,
  notification::NotificationView,
  request::{Decision, MedicalRequest, NewMedicalRequest, RequestFilter},
  routing::Suggestion,
};
use reqwest::{Client, Method, Response};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;

/// Connection settings for the campus API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Async HTTP client for the campus JSON REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// Send a request and turn non-2xx answers into errors carrying the
  /// server's message.
  async fn send<B: Serialize + ?Sized>(
    &self,
    method: Method,
    path: &str,
    query: &[(&str, String)],
    body: Option<&B>,
  ) -> Result<Response> {
    let mut req = self
      .auth(self.client.request(method.clone(), self.url(path)))
      .query(query);
    if let Some(body) = body {
      req = req.json(body);
    }
    debug!(%method, path, "sending request");
    let resp = req
      .send()
      .await
      .with_context(|| format!("{method} {path} failed"))?;

    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = resp
      .json::<Value>()
      .await
      .ok()
      .and_then(|v| v["error"].as_str().map(str::to_owned))
      .unwrap_or_default();
    Err(anyhow!("{method} {path} → {status} {message}"))
  }

  async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
    self
      .send::<()>(Method::GET, path, query, None)
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising GET {path}"))
  }

  async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
    self
      .send(Method::POST, path, &[], Some(body))
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising POST {path}"))
  }

  async fn post_no_content(&self, path: &str) -> Result<()> {
    self.send::<()>(Method::POST, path, &[], None).await?;
    Ok(())
  }

  // ── Requests ──────────────────────────────────────────────────────────────

  /// `GET /api/requests`
  pub async fn list_requests(&self, filter: &RequestFilter) -> Result<Vec<MedicalRequest>> {
    let mut query = Vec::new();
    if let Some(status) = filter.status {
      query.push(("status", status.to_string()));
    }
    if let Some(student) = filter.student_id {
      query.push(("student_id", student.to_string()));
    }
    if let Some(lecturer) = filter.forwarded_to {
      query.push(("forwarded_to", lecturer.to_string()));
    }
    self.get("/requests", &query).await
  }

  /// `GET /api/requests/:id`
  pub async fn get_request(&self, id: Uuid) -> Result<MedicalRequest> {
    self.get(&format!("/requests/{id}"), &[]).await
  }

  /// `POST /api/requests`
  pub async fn submit(&self, input: &NewMedicalRequest) -> Result<MedicalRequest> {
    self.post("/requests", input).await
  }

  /// `POST /api/requests/:id/officer-decision`
  pub async fn officer_decide(
    &self,
    id: Uuid,
    decision: Decision,
    comments: Option<String>,
  ) -> Result<MedicalRequest> {
    let body = json!({ "decision": decision, "comments": comments });
    self.post(&format!("/requests/{id}/officer-decision"), &body).await
  }

  /// `POST /api/requests/:id/department-decision`
  pub async fn department_decide(
    &self,
    id: Uuid,
    decision: Decision,
    comments: Option<String>,
  ) -> Result<MedicalRequest> {
    let body = json!({ "decision": decision, "comments": comments });
    self.post(&format!("/requests/{id}/department-decision"), &body).await
  }

  /// `GET /api/requests/:id/suggested-target`
  pub async fn suggest_target(&self, id: Uuid) -> Result<Suggestion> {
    self.get(&format!("/requests/{id}/suggested-target"), &[]).await
  }

  /// `POST /api/requests/:id/forward`
  pub async fn forward(&self, id: Uuid, lecturer_id: Uuid) -> Result<MedicalRequest> {
    let body = json!({ "lecturer_id": lecturer_id });
    self.post(&format!("/requests/{id}/forward"), &body).await
  }

  // ── Lecturers ─────────────────────────────────────────────────────────────

  /// `GET /api/lecturers`
  pub async fn list_lecturers(&self, filter: &LecturerFilter) -> Result<Vec<Lecturer>> {
    let mut query = Vec::new();
    if let Some(department) = filter.department_id {
      query.push(("department_id", department.to_string()));
    }
    if let Some(faculty) = filter.faculty_id {
      query.push(("faculty_id", faculty.to_string()));
    }
    if let Some(search) = &filter.search {
      query.push(("search", search.clone()));
    }
    self.get("/lecturers", &query).await
  }

  // ── Notices ───────────────────────────────────────────────────────────────

  /// `POST /api/modules/:id/notices`
  pub async fn post_notice(
    &self,
    module_id: Uuid,
    author_id: Uuid,
    title: String,
    content: String,
  ) -> Result<Notice> {
    let body = json!({ "author_id": author_id, "title": title, "content": content });
    self.post(&format!("/modules/{module_id}/notices"), &body).await
  }

  /// `GET /api/modules/:id/notices`
  pub async fn list_notices(&self, module_id: Uuid) -> Result<Vec<Notice>> {
    self.get(&format!("/modules/{module_id}/notices"), &[]).await
  }

  // ── Enrollments ───────────────────────────────────────────────────────────

  /// `POST /api/enrollments/bulk`
  pub async fn bulk_enroll(&self, pairs: Vec<EnrollmentPair>) -> Result<BulkOutcome> {
    self.post("/enrollments/bulk", &json!({ "pairs": pairs })).await
  }

  /// `POST /api/enrollments/by-degree`
  pub async fn enroll_by_degree(&self, student_id: Uuid, degree_id: Uuid) -> Result<BulkOutcome> {
    let body = json!({ "student_id": student_id, "degree_id": degree_id });
    self.post("/enrollments/by-degree", &body).await
  }

  /// `GET /api/students/:id/enrollments`
  pub async fn list_enrollments(&self, student_id: Uuid) -> Result<Vec<Enrollment>> {
    self.get(&format!("/students/{student_id}/enrollments"), &[]).await
  }

  // ── Notifications ─────────────────────────────────────────────────────────

  /// `GET /api/users/:id/notifications`
  pub async fn feed(&self, user_id: Uuid) -> Result<Vec<NotificationView>> {
    self.get(&format!("/users/{user_id}/notifications"), &[]).await
  }

  /// `GET /api/users/:id/notifications/unread-count`
  pub async fn unread_count(&self, user_id: Uuid) -> Result<u64> {
    let body: Value = self
      .get(&format!("/users/{user_id}/notifications/unread-count"), &[])
      .await?;
    body["unread"].as_u64().context("missing unread count")
  }

  /// `POST /api/users/:id/notifications/read-all`
  pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
    let body: Value = self
      .post(&format!("/users/{user_id}/notifications/read-all"), &json!({}))
      .await?;
    body["marked"].as_u64().context("missing marked count")
  }

  /// `POST /api/users/:id/notifications/:source_id/read`
  pub async fn mark_read(&self, user_id: Uuid, source_id: Uuid) -> Result<()> {
    self
      .post_no_content(&format!("/users/{user_id}/notifications/{source_id}/read"))
      .await
  }

  /// `POST /api/users/:id/notifications/:source_id/dismiss`
  pub async fn dismiss(&self, user_id: Uuid, source_id: Uuid) -> Result<()> {
    self
      .post_no_content(&format!("/users/{user_id}/notifications/{source_id}/dismiss"))
      .await
  }
}
