use crate::error::{Result, VibeError};
use crate::progress::{self, Progress};
use crate::project;
use crate::store::{now, or_not_found, Store};
use crate::types::{Priority, TodoStatus};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Default confidence an analysis result needs before a todo is marked done.
pub const DEFAULT_COMPLETION_THRESHOLD: f64 = 0.7;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub project_uid: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
    pub priority: Priority,
    pub category: String,
    /// Position among todos sharing `(project_uid, status)`.
    pub order: i64,
    pub estimated_days: Option<f64>,
    /// Set when the todo last entered `done`; cleared when it leaves.
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub category: String,
    pub estimated_days: Option<f64>,
}

impl NewTodo {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Partial edit of a todo's descriptive fields. Status changes go through
/// [`Store::move_todo`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TodoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub estimated_days: Option<f64>,
}

/// One verdict from a progress analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoAnalysis {
    #[serde(deserialize_with = "id_string")]
    pub todo_id: String,
    #[serde(default)]
    pub todo_title: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reason: String,
}

/// Models return ids as either strings or numbers.
pub(crate) fn id_string<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<String, D::Error> {
    match serde_json::Value::deserialize(de)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "id must be a string or number, got {other}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

const COLUMNS: &str = "id, project_uid, title, description, status, priority, category, \
                       sort_order, estimated_days, completed_at, created_at, updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        project_uid: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        status: row.get(4)?,
        priority: row.get(5)?,
        category: row.get(6)?,
        order: row.get(7)?,
        estimated_days: row.get(8)?,
        completed_at: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn load(conn: &Connection, id: i64) -> Result<Todo> {
    or_not_found(
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM todos WHERE id = ?1"),
            params![id],
            from_row,
        ),
        || VibeError::TodoNotFound(id),
    )
}

fn max_order(conn: &Connection, project_uid: &str) -> Result<i64> {
    Ok(conn.query_row(
        "SELECT COALESCE(MAX(sort_order), 0) FROM todos WHERE project_uid = ?1",
        params![project_uid],
        |row| row.get(0),
    )?)
}

fn column_max(conn: &Connection, project_uid: &str, status: TodoStatus) -> Result<i64> {
    Ok(conn.query_row(
        "SELECT COALESCE(MAX(sort_order), 0) FROM todos WHERE project_uid = ?1 AND status = ?2",
        params![project_uid, status],
        |row| row.get(0),
    )?)
}

/// Pick `todo`'s order within the `status` column before it moves there.
///
/// An explicit order pushes the siblings at or after it down by one. Without
/// one, a todo changing column goes to the end of the target column and a
/// todo staying put keeps its order.
fn place(conn: &Connection, todo: &mut Todo, status: TodoStatus, order: Option<i64>) -> Result<()> {
    match order {
        Some(order) => {
            conn.execute(
                "UPDATE todos SET sort_order = sort_order + 1
                 WHERE project_uid = ?1 AND status = ?2 AND id != ?3 AND sort_order >= ?4",
                params![todo.project_uid, status, todo.id, order],
            )?;
            todo.order = order;
        }
        None if todo.status != status => {
            todo.order = column_max(conn, &todo.project_uid, status)? + 1;
        }
        None => {}
    }
    Ok(())
}

fn non_blank(s: &Option<String>) -> Option<String> {
    s.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Apply a status transition to `todo` in place.
///
/// Entering `done` stamps `completed_at`; staying in `done` keeps the
/// original stamp; any other target clears it.
fn transition(todo: &mut Todo, status: TodoStatus, at: DateTime<Utc>) {
    todo.completed_at = match (todo.status, status) {
        (TodoStatus::Done, TodoStatus::Done) => todo.completed_at.or(Some(at)),
        (_, TodoStatus::Done) => Some(at),
        _ => None,
    };
    todo.status = status;
    todo.updated_at = at;
}

fn write_status(conn: &Connection, todo: &Todo) -> Result<()> {
    conn.execute(
        "UPDATE todos SET status = ?2, sort_order = ?3, completed_at = ?4, updated_at = ?5
         WHERE id = ?1",
        params![
            todo.id,
            todo.status,
            todo.order,
            todo.completed_at,
            todo.updated_at
        ],
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Store operations
// ---------------------------------------------------------------------------

impl Store {
    pub fn add_todo(&mut self, project_uid: &str, new: &NewTodo) -> Result<Todo> {
        let mut added = self.add_todos(project_uid, std::slice::from_ref(new))?;
        added.pop().ok_or(VibeError::MissingInput("title"))
    }

    /// Insert todos into `backlog` after the project's current highest order,
    /// then recompute the project's progress, all in one transaction.
    pub fn add_todos(&mut self, project_uid: &str, new: &[NewTodo]) -> Result<Vec<Todo>> {
        if new.iter().any(|t| t.title.trim().is_empty()) {
            return Err(VibeError::MissingInput("title"));
        }
        self.mutate(|tx| {
            project::ensure_exists(tx, project_uid)?;
            let start = max_order(tx, project_uid)?;
            let ts = now();
            let mut added = Vec::with_capacity(new.len());
            for (i, item) in new.iter().enumerate() {
                let order = start + i as i64 + 1;
                tx.execute(
                    "INSERT INTO todos (project_uid, title, description, status, priority, category,
                                        sort_order, estimated_days, completed_at, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, NULL, ?9, ?9)",
                    params![
                        project_uid,
                        item.title.trim(),
                        non_blank(&item.description),
                        TodoStatus::Backlog,
                        item.priority,
                        item.category.trim(),
                        order,
                        item.estimated_days,
                        ts,
                    ],
                )?;
                added.push(load(tx, tx.last_insert_rowid())?);
            }
            progress::recompute(tx, project_uid, ts)?;
            Ok(added)
        })
    }

    /// A project's todos by order, optionally restricted to one status.
    pub fn list_todos(&self, project_uid: &str, status: Option<TodoStatus>) -> Result<Vec<Todo>> {
        project::ensure_exists(self.conn(), project_uid)?;
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {COLUMNS} FROM todos
             WHERE project_uid = ?1 AND (?2 IS NULL OR status = ?2)
             ORDER BY sort_order ASC, id ASC"
        ))?;
        let rows = stmt.query_map(params![project_uid, status], from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_todo(&self, id: i64) -> Result<Todo> {
        load(self.conn(), id)
    }

    pub fn update_todo(&mut self, id: i64, update: &TodoUpdate) -> Result<Todo> {
        if let Some(title) = &update.title {
            if title.trim().is_empty() {
                return Err(VibeError::MissingInput("title"));
            }
        }
        self.mutate(|tx| {
            let mut todo = load(tx, id)?;
            if let Some(title) = &update.title {
                todo.title = title.trim().to_string();
            }
            if update.description.is_some() {
                todo.description = non_blank(&update.description);
            }
            if let Some(priority) = update.priority {
                todo.priority = priority;
            }
            if let Some(category) = &update.category {
                todo.category = category.trim().to_string();
            }
            if update.estimated_days.is_some() {
                todo.estimated_days = update.estimated_days;
            }
            todo.updated_at = now();
            tx.execute(
                "UPDATE todos SET title = ?2, description = ?3, priority = ?4, category = ?5,
                                  estimated_days = ?6, updated_at = ?7
                 WHERE id = ?1",
                params![
                    id,
                    todo.title,
                    todo.description,
                    todo.priority,
                    todo.category,
                    todo.estimated_days,
                    todo.updated_at,
                ],
            )?;
            progress::recompute(tx, &todo.project_uid, todo.updated_at)?;
            Ok(todo)
        })
    }

    /// Change a todo's status, optionally placing it at `order` within the
    /// target status. Orders stay unique per column. Progress is recomputed
    /// in the same transaction.
    pub fn move_todo(&mut self, id: i64, status: TodoStatus, order: Option<i64>) -> Result<Todo> {
        self.mutate(|tx| {
            let mut todo = load(tx, id)?;
            let ts = now();
            place(tx, &mut todo, status, order)?;
            transition(&mut todo, status, ts);
            write_status(tx, &todo)?;
            progress::recompute(tx, &todo.project_uid, ts)?;
            Ok(todo)
        })
    }

    /// Assign orders `1..=n` to the todos of one `(project, status)` column in
    /// the sequence given. `ids` must name exactly the todos in that column.
    pub fn reorder_todos(
        &mut self,
        project_uid: &str,
        status: TodoStatus,
        ids: &[i64],
    ) -> Result<Vec<Todo>> {
        let requested: HashSet<i64> = ids.iter().copied().collect();
        if requested.len() != ids.len() {
            return Err(VibeError::InvalidTodoOrder("duplicate todo id".into()));
        }
        self.mutate(|tx| {
            project::ensure_exists(tx, project_uid)?;
            let mut stmt =
                tx.prepare("SELECT id FROM todos WHERE project_uid = ?1 AND status = ?2")?;
            let current: HashSet<i64> = stmt
                .query_map(params![project_uid, status], |row| row.get(0))?
                .collect::<rusqlite::Result<_>>()?;
            if current != requested {
                return Err(VibeError::InvalidTodoOrder(format!(
                    "ids must match the {} todos currently in {status}",
                    current.len()
                )));
            }
            let ts = now();
            for (i, id) in ids.iter().enumerate() {
                tx.execute(
                    "UPDATE todos SET sort_order = ?2, updated_at = ?3 WHERE id = ?1",
                    params![id, i as i64 + 1, ts],
                )?;
            }
            project::touch(tx, project_uid, ts)?;
            Ok(())
        })?;
        self.list_todos(project_uid, Some(status))
    }

    pub fn delete_todo(&mut self, id: i64) -> Result<Progress> {
        self.mutate(|tx| {
            let todo = load(tx, id)?;
            tx.execute("DELETE FROM todos WHERE id = ?1", params![id])?;
            progress::recompute(tx, &todo.project_uid, now())
        })
    }

    /// Mark done every todo the analysis reports as completed with at least
    /// `threshold` confidence. Unknown ids and todos from other projects are
    /// skipped. Returns the todos that changed.
    pub fn apply_analysis(
        &mut self,
        project_uid: &str,
        results: &[TodoAnalysis],
        threshold: f64,
    ) -> Result<Vec<Todo>> {
        self.mutate(|tx| {
            project::ensure_exists(tx, project_uid)?;
            let ts = now();
            let mut changed = Vec::new();
            for result in results {
                if !result.is_completed || result.confidence < threshold {
                    continue;
                }
                let Ok(id) = result.todo_id.trim().parse::<i64>() else {
                    continue;
                };
                let mut todo = match load(tx, id) {
                    Ok(t) => t,
                    Err(VibeError::TodoNotFound(_)) => continue,
                    Err(e) => return Err(e),
                };
                if todo.project_uid != project_uid || todo.status == TodoStatus::Done {
                    continue;
                }
                place(tx, &mut todo, TodoStatus::Done, None)?;
                transition(&mut todo, TodoStatus::Done, ts);
                write_status(tx, &todo)?;
                changed.push(todo);
            }
            progress::recompute(tx, project_uid, ts)?;
            Ok(changed)
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
