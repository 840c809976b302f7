use crate::error::Result;
use crate::paths;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Transaction};
use std::path::Path;

/// Current schema version, tracked in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    uid          TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    description  TEXT NOT NULL DEFAULT '',
    app_type     TEXT NOT NULL DEFAULT '',
    progress     INTEGER NOT NULL DEFAULT 0,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS documents (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    project_uid  TEXT NOT NULL REFERENCES projects(uid),
    doc_type     TEXT NOT NULL,
    title        TEXT NOT NULL,
    content      TEXT NOT NULL,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_documents_project ON documents(project_uid);

CREATE TABLE IF NOT EXISTS todos (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    project_uid    TEXT NOT NULL REFERENCES projects(uid),
    title          TEXT NOT NULL,
    description    TEXT,
    status         TEXT NOT NULL DEFAULT 'backlog',
    priority       TEXT NOT NULL DEFAULT 'medium',
    category       TEXT NOT NULL DEFAULT '',
    sort_order     INTEGER NOT NULL,
    estimated_days REAL,
    completed_at   TEXT,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_todos_project_status ON todos(project_uid, status, sort_order);

CREATE TABLE IF NOT EXISTS features (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    project_uid  TEXT NOT NULL REFERENCES projects(uid),
    name         TEXT NOT NULL,
    description  TEXT NOT NULL DEFAULT '',
    created_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_features_project ON features(project_uid);

CREATE TABLE IF NOT EXISTS feature_documents (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    feature_id   INTEGER NOT NULL REFERENCES features(id),
    doc_type     TEXT NOT NULL,
    content      TEXT NOT NULL,
    created_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_feature_documents_feature ON feature_documents(feature_id);

CREATE TABLE IF NOT EXISTS theme_captures (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT NOT NULL,
    source       TEXT NOT NULL,
    source_url   TEXT,
    tokens       TEXT NOT NULL,
    created_at   TEXT NOT NULL
);
"#;

/// SQLite-backed store for projects and everything they own.
///
/// Entity operations live next to their types (`project.rs`, `todo.rs`,
/// ...) as further `impl Store` blocks.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    /// Open the database inside a data directory.
    pub fn open_in(data_dir: &Path) -> Result<Self> {
        Self::open(&paths::db_path(data_dir))
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrate(&conn)?;
        Ok(Self { conn })
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside one transaction. Any error rolls everything back.
    pub(crate) fn mutate<F, R>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction<'_>) -> Result<R>,
    {
        let tx = self.conn.transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }

    pub fn schema_version(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }
}

fn migrate(conn: &Connection) -> Result<()> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version < 1 {
        conn.execute_batch(SCHEMA_V1)?;
        tracing::debug!(from = version, to = SCHEMA_VERSION, "migrated database schema");
    }
    if version < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }
    Ok(())
}

/// Fresh client-side identifier for a project.
pub fn new_uid() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Map "no rows" to a domain not-found error.
pub(crate) fn or_not_found<T>(
    res: rusqlite::Result<T>,
    not_found: impl FnOnce() -> crate::VibeError,
) -> Result<T> {
    match res {
        Ok(v) => Ok(v),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(not_found()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fresh_database_is_at_current_version() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn reopen_keeps_schema() {
        let dir = TempDir::new().unwrap();
        Store::open_in(dir.path()).unwrap();
        let store = Store::open_in(dir.path()).unwrap();
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
        assert!(dir.path().join(paths::DB_FILE).exists());
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let store = Store::open_in_memory().unwrap();
        let err = store.conn().execute(
            "INSERT INTO todos (project_uid, title, sort_order, created_at, updated_at)
             VALUES ('missing', 't', 1, '', '')",
            [],
        );
        assert!(err.is_err());
    }

    #[test]
    fn uids_are_unique() {
        assert_ne!(new_uid(), new_uid());
        assert_eq!(new_uid().len(), 36);
    }
}
