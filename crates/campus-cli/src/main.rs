//! `campus`: command-line client for the campus leave workflow server.
//!
//! # Usage
//!
//! ```
//! campus --url http://localhost:8080 --user registrar --password secret requests list
//! campus --config ~/.config/campus/config.toml feed <user-id>
//! ```

mod client;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use campus_core::{
  directory::LecturerFilter,
  enrollment::EnrollmentPair,
  request::{Decision, MedicalStatus, NewMedicalRequest, RequestFilter},
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use client::{ApiClient, ApiConfig};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "campus", about = "Client for the campus leave workflow server")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the campus server (default: http://localhost:8080).
  #[arg(long, env = "CAMPUS_URL")]
  url: Option<String>,

  /// API username.
  #[arg(long, env = "CAMPUS_USER")]
  user: Option<String>,

  /// API password (plaintext).
  #[arg(long, env = "CAMPUS_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Medical leave requests.
  #[command(subcommand)]
  Requests(RequestsCmd),

  /// Lecturers a request may be forwarded to.
  Lecturers {
    #[arg(long)]
    department: Option<Uuid>,
    #[arg(long)]
    faculty:    Option<Uuid>,
    /// Fuzzy match over name and email.
    #[arg(long)]
    search:     Option<String>,
  },

  /// Module notices.
  #[command(subcommand)]
  Notices(NoticesCmd),

  /// Student enrollments.
  #[command(subcommand)]
  Enroll(EnrollCmd),

  /// Show a user's notification feed.
  Feed { user: Uuid },
  /// Count a user's unread notifications.
  Unread { user: Uuid },
  /// Mark one notification read.
  Read { user: Uuid, source: Uuid },
  /// Mark every visible notification read.
  ReadAll { user: Uuid },
  /// Hide a notification permanently.
  Dismiss { user: Uuid, source: Uuid },
}

#[derive(Subcommand, Debug)]
enum RequestsCmd {
  List {
    #[arg(long)]
    status:       Option<MedicalStatus>,
    #[arg(long)]
    student:      Option<Uuid>,
    /// Lecturer inbox: requests forwarded to this lecturer.
    #[arg(long)]
    forwarded_to: Option<Uuid>,
  },
  Show { id: Uuid },
  Submit {
    #[arg(long)]
    student:     Uuid,
    #[arg(long)]
    reason:      String,
    /// First day of leave, YYYY-MM-DD.
    #[arg(long)]
    start:       NaiveDate,
    /// Last day of leave, YYYY-MM-DD.
    #[arg(long)]
    end:         NaiveDate,
    #[arg(long)]
    certificate: Option<String>,
  },
  /// First-level review by the medical officer.
  Officer {
    id:       Uuid,
    decision: DecisionArg,
    #[arg(long)]
    comments: Option<String>,
  },
  /// Show the advisory department scope for forwarding.
  Suggest { id: Uuid },
  Forward { id: Uuid, lecturer: Uuid },
  /// Second-level review by the lecturer the request was forwarded to.
  Department {
    id:       Uuid,
    decision: DecisionArg,
    #[arg(long)]
    comments: Option<String>,
  },
}

#[derive(Subcommand, Debug)]
enum NoticesCmd {
  Post {
    module:  Uuid,
    #[arg(long)]
    author:  Uuid,
    #[arg(long)]
    title:   String,
    #[arg(long)]
    content: String,
  },
  List { module: Uuid },
}

#[derive(Subcommand, Debug)]
enum EnrollCmd {
  /// Enroll pairs read from a CSV file with a `student_id,module_id` header.
  Bulk { file: PathBuf },
  /// Enroll a student in every module of a degree.
  Degree { student: Uuid, degree: Uuid },
  List { student: Uuid },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DecisionArg {
  Approve,
  Reject,
}

impl From<DecisionArg> for Decision {
  fn from(arg: DecisionArg) -> Self {
    match arg {
      DecisionArg::Approve => Decision::Approve,
      DecisionArg::Reject => Decision::Reject,
    }
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

/// CLI flags override the config file, which overrides defaults.
fn resolve_config(args: &Args, file: ConfigFile) -> ApiConfig {
  let pick = |flag: &Option<String>, file: String| {
    flag.clone().or_else(|| (!file.is_empty()).then_some(file))
  };
  ApiConfig {
    base_url: pick(&args.url, file.url)
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    username: pick(&args.user, file.username).unwrap_or_default(),
    password: pick(&args.password, file.password).unwrap_or_default(),
  }
}

/// One row of a bulk enrollment file.
#[derive(Debug, Deserialize)]
struct PairRow {
  student_id: Uuid,
  module_id:  Uuid,
}

/// Parse a CSV file with a `student_id,module_id` header. Blank lines and
/// lines starting with `#` are skipped; fields may be quoted.
fn parse_pairs(raw: &str) -> Result<Vec<EnrollmentPair>> {
  let mut reader = csv::ReaderBuilder::new()
    .has_headers(true)
    .trim(csv::Trim::All)
    .comment(Some(b'#'))
    .from_reader(raw.as_bytes());

  reader
    .deserialize::<PairRow>()
    .map(|row| match row {
      Ok(row) => Ok(EnrollmentPair { student_id: row.student_id, module_id: row.module_id }),
      Err(e) => {
        let line = e.position().map(|p| p.line()).unwrap_or_default();
        bail!("line {line}: {e}")
      }
    })
    .collect()
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let client = ApiClient::new(resolve_config(&args, file_cfg))?;
  run(&client, args.command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::Requests(cmd) => run_requests(client, cmd).await,
    Command::Lecturers { department, faculty, search } => {
      let filter = LecturerFilter { department_id: department, faculty_id: faculty, search };
      render::lecturers(&client.list_lecturers(&filter).await?);
      Ok(())
    }
    Command::Notices(NoticesCmd::Post { module, author, title, content }) => {
      let notice = client.post_notice(module, author, title, content).await?;
      println!("posted {}", notice.notice_id);
      Ok(())
    }
    Command::Notices(NoticesCmd::List { module }) => {
      render::notices(&client.list_notices(module).await?);
      Ok(())
    }
    Command::Enroll(EnrollCmd::Bulk { file }) => {
      let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("reading {}", file.display()))?;
      let pairs = parse_pairs(&raw)?;
      render::bulk(&client.bulk_enroll(pairs).await?);
      Ok(())
    }
    Command::Enroll(EnrollCmd::Degree { student, degree }) => {
      render::bulk(&client.enroll_by_degree(student, degree).await?);
      Ok(())
    }
    Command::Enroll(EnrollCmd::List { student }) => {
      for e in client.list_enrollments(student).await? {
        println!("{}  {:?}  {}", e.module_id, e.status, e.enrolled_at.format("%Y-%m-%d"));
      }
      Ok(())
    }
    Command::Feed { user } => {
      render::feed(&client.feed(user).await?);
      Ok(())
    }
    Command::Unread { user } => {
      println!("{}", client.unread_count(user).await?);
      Ok(())
    }
    Command::Read { user, source } => client.mark_read(user, source).await,
    Command::ReadAll { user } => {
      println!("marked {} read", client.mark_all_read(user).await?);
      Ok(())
    }
    Command::Dismiss { user, source } => client.dismiss(user, source).await,
  }
}

async fn run_requests(client: &ApiClient, cmd: RequestsCmd) -> Result<()> {
  let request = match cmd {
    RequestsCmd::List { status, student, forwarded_to } => {
      let filter = RequestFilter { status, student_id: student, forwarded_to };
      render::requests(&client.list_requests(&filter).await?);
      return Ok(());
    }
    RequestsCmd::Suggest { id } => {
      let suggestion = client.suggest_target(id).await?;
      match suggestion.department_id {
        Some(department) => println!("suggested department: {department}"),
        None => println!("no department on record; search all lecturers"),
      }
      return Ok(());
    }
    RequestsCmd::Show { id } => client.get_request(id).await?,
    RequestsCmd::Submit { student, reason, start, end, certificate } => {
      let input = NewMedicalRequest {
        student_id: student,
        reason,
        start_date: start,
        end_date: end,
        certificate_url: certificate,
      };
      client.submit(&input).await?
    }
    RequestsCmd::Officer { id, decision, comments } => {
      client.officer_decide(id, decision.into(), comments).await?
    }
    RequestsCmd::Forward { id, lecturer } => client.forward(id, lecturer).await?,
    RequestsCmd::Department { id, decision, comments } => {
      client.department_decide(id, decision.into(), comments).await?
    }
  };
  render::request_detail(&request);
  Ok(())
}
