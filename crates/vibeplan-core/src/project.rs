use crate::error::{Result, VibeError};
use crate::progress::{self, Progress};
use crate::store::{new_uid, now, or_not_found, Store};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub uid: String,
    pub name: String,
    pub description: String,
    pub app_type: String,
    /// Cached `round(100 * done / total)` over the project's todos.
    pub progress: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub app_type: String,
}

/// Partial update; `None` fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub app_type: Option<String>,
}

/// Row counts removed by [`Store::delete_project`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDeletion {
    pub documents: usize,
    pub todos: usize,
    pub features: usize,
    pub feature_documents: usize,
}

const COLUMNS: &str = "uid, name, description, app_type, progress, created_at, updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        uid: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        app_type: row.get(3)?,
        progress: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

pub(crate) fn load(conn: &Connection, uid: &str) -> Result<Project> {
    or_not_found(
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM projects WHERE uid = ?1"),
            params![uid],
            from_row,
        ),
        || VibeError::ProjectNotFound(uid.to_string()),
    )
}

/// Fail with `ProjectNotFound` unless `uid` exists.
pub(crate) fn ensure_exists(conn: &Connection, uid: &str) -> Result<()> {
    let found: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM projects WHERE uid = ?1)",
        params![uid],
        |row| row.get(0),
    )?;
    if found {
        Ok(())
    } else {
        Err(VibeError::ProjectNotFound(uid.to_string()))
    }
}

pub(crate) fn touch(conn: &Connection, uid: &str, at: DateTime<Utc>) -> Result<()> {
    conn.execute(
        "UPDATE projects SET updated_at = ?2 WHERE uid = ?1",
        params![uid, at],
    )?;
    Ok(())
}

impl Store {
    pub fn create_project(&mut self, new: &NewProject) -> Result<Project> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(VibeError::MissingInput("name"));
        }
        let ts = now();
        let project = Project {
            uid: new_uid(),
            name: name.to_string(),
            description: new.description.trim().to_string(),
            app_type: new.app_type.trim().to_string(),
            progress: 0,
            created_at: ts,
            updated_at: ts,
        };
        self.conn().execute(
            &format!("INSERT INTO projects ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            params![
                project.uid,
                project.name,
                project.description,
                project.app_type,
                project.progress,
                project.created_at,
                project.updated_at,
            ],
        )?;
        tracing::debug!(uid = %project.uid, "created project");
        Ok(project)
    }

    /// Newest first.
    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {COLUMNS} FROM projects ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map([], from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_project(&self, uid: &str) -> Result<Project> {
        load(self.conn(), uid)
    }

    pub fn update_project(&mut self, uid: &str, update: &ProjectUpdate) -> Result<Project> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(VibeError::MissingInput("name"));
            }
        }
        self.mutate(|tx| {
            let mut project = load(tx, uid)?;
            if let Some(name) = &update.name {
                project.name = name.trim().to_string();
            }
            if let Some(description) = &update.description {
                project.description = description.trim().to_string();
            }
            if let Some(app_type) = &update.app_type {
                project.app_type = app_type.trim().to_string();
            }
            project.updated_at = now();
            tx.execute(
                "UPDATE projects SET name = ?2, description = ?3, app_type = ?4, updated_at = ?5
                 WHERE uid = ?1",
                params![
                    uid,
                    project.name,
                    project.description,
                    project.app_type,
                    project.updated_at,
                ],
            )?;
            Ok(project)
        })
    }

    /// Remove a project together with its documents, todos, features and
    /// feature documents in one transaction.
    pub fn delete_project(&mut self, uid: &str) -> Result<ProjectDeletion> {
        let deletion = self.mutate(|tx| {
            ensure_exists(tx, uid)?;
            let feature_documents = tx.execute(
                "DELETE FROM feature_documents
                 WHERE feature_id IN (SELECT id FROM features WHERE project_uid = ?1)",
                params![uid],
            )?;
            let features = tx.execute("DELETE FROM features WHERE project_uid = ?1", params![uid])?;
            let todos = tx.execute("DELETE FROM todos WHERE project_uid = ?1", params![uid])?;
            let documents =
                tx.execute("DELETE FROM documents WHERE project_uid = ?1", params![uid])?;
            tx.execute("DELETE FROM projects WHERE uid = ?1", params![uid])?;
            Ok(ProjectDeletion {
                documents,
                todos,
                features,
                feature_documents,
            })
        })?;
        tracing::info!(uid, todos = deletion.todos, documents = deletion.documents, "deleted project");
        Ok(deletion)
    }

    /// `(completed, total, percentage)` computed from the current todos.
    pub fn progress(&self, uid: &str) -> Result<Progress> {
        ensure_exists(self.conn(), uid)?;
        progress::count(self.conn(), uid)
    }
}
