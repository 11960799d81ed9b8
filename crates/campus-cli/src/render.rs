//! Plain-text rendering of API responses.

use campus_core::{
  directory::Lecturer,
  enrollment::{BulkOutcome, RowOutcome},
  notice::Notice,
  notification::NotificationView,
  request::MedicalRequest,
};

pub fn requests(requests: &[MedicalRequest]) {
  if requests.is_empty() {
    println!("no requests");
    return;
  }
  for r in requests {
    println!(
      "{}  {:<20} {} → {}  {}",
      r.request_id, r.status, r.start_date, r.end_date, r.reason
    );
  }
}

pub fn request_detail(r: &MedicalRequest) {
  println!("id:         {}", r.request_id);
  println!("student:    {}", r.student_id);
  println!("status:     {}", r.status);
  println!("dates:      {} → {}", r.start_date, r.end_date);
  println!("reason:     {}", r.reason);
  if let Some(c) = &r.officer_comments {
    println!("officer:    {c}");
  }
  if let Some(c) = &r.admin_comments {
    println!("department: {c}");
  }
  // Optional relations render as "Unassigned" rather than disappearing.
  match r.forwarded_to {
    Some(lecturer) => println!("forwarded:  {lecturer}"),
    None => println!("forwarded:  Unassigned"),
  }
  if let Some(url) = &r.certificate_url {
    println!("certificate: {url}");
  }
  println!("updated:    {}", r.updated_at.format("%Y-%m-%d %H:%M"));
}

pub fn lecturers(lecturers: &[Lecturer]) {
  for l in lecturers {
    let department = l
      .department_id
      .map(|d| d.to_string())
      .unwrap_or_else(|| "Unassigned".into());
    println!("{}  {:<24} {:<28} {department}", l.lecturer_id, l.name, l.email);
  }
}

pub fn notices(notices: &[Notice]) {
  for n in notices {
    println!(
      "{}  [{}] {} ({}, {})",
      n.notice_id,
      n.module_code,
      n.title,
      n.author_name,
      n.created_at.format("%Y-%m-%d")
    );
    println!("    {}", n.content);
  }
}

pub fn feed(feed: &[NotificationView]) {
  if feed.is_empty() {
    println!("no notifications");
    return;
  }
  for v in feed {
    let marker = if v.read { ' ' } else { '•' };
    println!(
      "{marker} {}  {}  {}",
      v.created_at.format("%Y-%m-%d %H:%M"),
      v.id,
      v.title
    );
    println!("    {}", v.message);
  }
}

pub fn bulk(outcome: &BulkOutcome) {
  println!(
    "inserted {}, skipped {}, failed {}",
    outcome.inserted, outcome.skipped, outcome.failed
  );
  for row in &outcome.rows {
    if let RowOutcome::Failed { reason } = &row.outcome {
      println!("  {} → {}: {reason}", row.pair.student_id, row.pair.module_id);
    }
  }
}
