use crate::error::{Result, VibeError};
use crate::project;
use crate::store::{now, or_not_found, Store};
use crate::types::DocumentType;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: i64,
    pub project_uid: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    /// Defaults to the type's display title.
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
}

impl NewDocument {
    pub fn new(doc_type: DocumentType, content: impl Into<String>) -> Self {
        Self {
            doc_type,
            title: None,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

const COLUMNS: &str = "id, project_uid, doc_type, title, content, created_at, updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get(0)?,
        project_uid: row.get(1)?,
        doc_type: row.get(2)?,
        title: row.get(3)?,
        content: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn load(conn: &Connection, id: i64) -> Result<Document> {
    or_not_found(
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM documents WHERE id = ?1"),
            params![id],
            from_row,
        ),
        || VibeError::DocumentNotFound(id),
    )
}

impl Store {
    pub fn add_document(&mut self, project_uid: &str, new: &NewDocument) -> Result<Document> {
        let title = new
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(new.doc_type.title())
            .to_string();
        self.mutate(|tx| {
            project::ensure_exists(tx, project_uid)?;
            let ts = now();
            tx.execute(
                "INSERT INTO documents (project_uid, doc_type, title, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![project_uid, new.doc_type, title, new.content, ts],
            )?;
            project::touch(tx, project_uid, ts)?;
            load(tx, tx.last_insert_rowid())
        })
    }

    /// A project's documents in creation order.
    pub fn list_documents(&self, project_uid: &str) -> Result<Vec<Document>> {
        project::ensure_exists(self.conn(), project_uid)?;
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {COLUMNS} FROM documents WHERE project_uid = ?1 ORDER BY created_at ASC, id ASC"
        ))?;
        let rows = stmt.query_map(params![project_uid], from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_document(&self, id: i64) -> Result<Document> {
        load(self.conn(), id)
    }

    pub fn update_document(&mut self, id: i64, update: &DocumentUpdate) -> Result<Document> {
        self.mutate(|tx| {
            let mut doc = load(tx, id)?;
            if let Some(title) = update.title.as_deref().map(str::trim) {
                if title.is_empty() {
                    return Err(VibeError::MissingInput("title"));
                }
                doc.title = title.to_string();
            }
            if let Some(content) = &update.content {
                doc.content = content.clone();
            }
            doc.updated_at = now();
            tx.execute(
                "UPDATE documents SET title = ?2, content = ?3, updated_at = ?4 WHERE id = ?1",
                params![id, doc.title, doc.content, doc.updated_at],
            )?;
            project::touch(tx, &doc.project_uid, doc.updated_at)?;
            Ok(doc)
        })
    }

    pub fn delete_document(&mut self, id: i64) -> Result<()> {
        self.mutate(|tx| {
            let doc = load(tx, id)?;
            tx.execute("DELETE FROM documents WHERE id = ?1", params![id])?;
            project::touch(tx, &doc.project_uid, now())
        })
    }
}
