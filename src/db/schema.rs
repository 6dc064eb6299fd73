//! Database schema and migrations for Agora.
//!
//! Migrations are applied in order when the database is opened; the
//! `schema_version` table records which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: users and refresh tokens
    r#"
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL,
    password    TEXT NOT NULL,
    email       TEXT NOT NULL DEFAULT '',
    first_name  TEXT NOT NULL DEFAULT '',
    last_name   TEXT NOT NULL DEFAULT '',
    is_active   INTEGER NOT NULL DEFAULT 1,
    date_joined TEXT NOT NULL,
    last_login  TEXT
);

CREATE UNIQUE INDEX idx_users_username_nocase ON users(username COLLATE NOCASE);

CREATE TABLE refresh_tokens (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    token       TEXT NOT NULL UNIQUE,
    expires_at  TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    revoked_at  TEXT
);

CREATE INDEX idx_refresh_tokens_user ON refresh_tokens(user_id);
"#,
    // v2: boards, topics and posts
    r#"
CREATE TABLE boards (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT ''
);

CREATE TABLE topics (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    board_id     INTEGER NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
    starter_id   INTEGER NOT NULL REFERENCES users(id),
    subject      TEXT NOT NULL,
    message      TEXT NOT NULL DEFAULT '',
    views        INTEGER NOT NULL DEFAULT 0,
    created_at   TEXT NOT NULL,
    last_updated TEXT NOT NULL
);

CREATE INDEX idx_topics_board_updated ON topics(board_id, last_updated DESC);

CREATE TABLE posts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    topic_id    INTEGER NOT NULL REFERENCES topics(id) ON DELETE CASCADE,
    message     TEXT NOT NULL,
    created_by  INTEGER NOT NULL REFERENCES users(id),
    created_at  TEXT NOT NULL,
    updated_by  INTEGER REFERENCES users(id),
    updated_at  TEXT
);

CREATE INDEX idx_posts_topic_created ON posts(topic_id, created_at);
"#,
];
