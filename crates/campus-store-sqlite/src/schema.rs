//! SQL schema for the campus SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- ── Directory ──────────────────────────────────────────────────────────────
-- Owned by hierarchy administration; the leave workflow only reads these.

CREATE TABLE IF NOT EXISTS faculties (
    faculty_id TEXT PRIMARY KEY,
    name       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS departments (
    department_id TEXT PRIMARY KEY,
    faculty_id    TEXT NOT NULL REFERENCES faculties(faculty_id),
    name          TEXT NOT NULL
);

-- Students, lecturers, officers and admins. department_id is optional.
CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL,
    role          TEXT NOT NULL,  -- 'student' | 'lecturer' | 'medical_officer' | 'admin'
    department_id TEXT REFERENCES departments(department_id)
);

CREATE TABLE IF NOT EXISTS modules (
    module_id TEXT PRIMARY KEY,
    code      TEXT NOT NULL UNIQUE,
    name      TEXT NOT NULL,
    leader_id TEXT REFERENCES users(user_id)
);

CREATE TABLE IF NOT EXISTS degrees (
    degree_id     TEXT PRIMARY KEY,
    department_id TEXT NOT NULL REFERENCES departments(department_id),
    name          TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS degree_modules (
    degree_id TEXT NOT NULL REFERENCES degrees(degree_id),
    module_id TEXT NOT NULL REFERENCES modules(module_id),
    PRIMARY KEY (degree_id, module_id)
);

-- ── Leave workflow ─────────────────────────────────────────────────────────

-- Rows are never deleted. status only changes through a conditional UPDATE
-- keyed on the current status.
CREATE TABLE IF NOT EXISTS medical_requests (
    request_id       TEXT PRIMARY KEY,
    student_id       TEXT NOT NULL,
    status           TEXT NOT NULL CHECK (status IN (
                       'pending', 'approved_by_officer', 'rejected',
                       'forwarded_to_dept', 'approved_by_dept')),
    reason           TEXT NOT NULL,
    start_date       TEXT NOT NULL,  -- YYYY-MM-DD
    end_date         TEXT NOT NULL,
    officer_comments TEXT,
    admin_comments   TEXT,
    forwarded_to     TEXT,
    certificate_url  TEXT,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL,
    CHECK (start_date <= end_date)
);

-- Immutable after insert.
CREATE TABLE IF NOT EXISTS notices (
    notice_id   TEXT PRIMARY KEY,
    module_id   TEXT NOT NULL REFERENCES modules(module_id),
    module_code TEXT NOT NULL,
    author_id   TEXT NOT NULL,
    author_name TEXT NOT NULL,
    title       TEXT NOT NULL,
    content     TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS enrollments (
    student_id  TEXT NOT NULL REFERENCES users(user_id),
    module_id   TEXT NOT NULL REFERENCES modules(module_id),
    status      TEXT NOT NULL DEFAULT 'active',
    enrolled_at TEXT NOT NULL,
    PRIMARY KEY (student_id, module_id)
);

-- ── Notification overlay ───────────────────────────────────────────────────
-- Append-only per-user sets of source ids. Nothing is ever removed.

CREATE TABLE IF NOT EXISTS notification_dismissals (
    user_id     TEXT NOT NULL,
    source_id   TEXT NOT NULL,
    recorded_at TEXT NOT NULL,
    PRIMARY KEY (user_id, source_id)
);

CREATE TABLE IF NOT EXISTS notification_reads (
    user_id     TEXT NOT NULL,
    source_id   TEXT NOT NULL,
    recorded_at TEXT NOT NULL,
    PRIMARY KEY (user_id, source_id)
);

CREATE INDEX IF NOT EXISTS requests_student_idx   ON medical_requests(student_id);
CREATE INDEX IF NOT EXISTS requests_status_idx    ON medical_requests(status);
CREATE INDEX IF NOT EXISTS requests_created_idx   ON medical_requests(created_at);
CREATE INDEX IF NOT EXISTS notices_module_idx     ON notices(module_id, created_at);
CREATE INDEX IF NOT EXISTS users_department_idx   ON users(department_id);

PRAGMA user_version = 1;
";
