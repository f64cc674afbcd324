//! Database schema migrations for Aula.
//!
//! Each entry is applied once, in order, inside its own transaction.
//! The current version is tracked in the `schema_version` table.

/// Ordered list of schema migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: core tables
    "CREATE TABLE users (
        id            TEXT PRIMARY KEY,
        name          TEXT NOT NULL,
        email         TEXT NOT NULL UNIQUE COLLATE NOCASE,
        password_hash TEXT NOT NULL,
        role          TEXT NOT NULL DEFAULT 'STUDENT',
        created_at    TEXT NOT NULL,
        updated_at    TEXT NOT NULL
    );

    CREATE TABLE courses (
        id          TEXT PRIMARY KEY,
        code        TEXT NOT NULL UNIQUE,
        name        TEXT NOT NULL,
        description TEXT,
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    );

    CREATE TABLE enrollments (
        id         TEXT PRIMARY KEY,
        user_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        course_id  TEXT NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        UNIQUE (user_id, course_id)
    );

    CREATE TABLE assignments (
        id          TEXT PRIMARY KEY,
        course_id   TEXT NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
        title       TEXT NOT NULL,
        description TEXT,
        due_date    TEXT,
        file_url    TEXT,
        file_name   TEXT,
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    );

    CREATE TABLE submissions (
        id            TEXT PRIMARY KEY,
        assignment_id TEXT NOT NULL REFERENCES assignments(id) ON DELETE CASCADE,
        student_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        content       TEXT,
        file_url      TEXT,
        file_name     TEXT,
        status        TEXT NOT NULL DEFAULT 'PENDING',
        grade         INTEGER,
        feedback      TEXT,
        created_at    TEXT NOT NULL,
        updated_at    TEXT NOT NULL,
        UNIQUE (assignment_id, student_id)
    );",
    // v2: lookup indexes
    "CREATE INDEX idx_users_role ON users(role);
    CREATE INDEX idx_enrollments_user ON enrollments(user_id);
    CREATE INDEX idx_enrollments_course ON enrollments(course_id);
    CREATE INDEX idx_assignments_course ON assignments(course_id);
    CREATE INDEX idx_submissions_assignment ON submissions(assignment_id);
    CREATE INDEX idx_submissions_student ON submissions(student_id);
    CREATE INDEX idx_submissions_status ON submissions(status);",
];
