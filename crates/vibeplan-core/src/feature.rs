//! Features proposed for an existing project, each with its own generated
//! documents.

use crate::error::{Result, VibeError};
use crate::project;
use crate::store::{now, or_not_found, Store};
use crate::types::DocumentType;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: i64,
    pub project_uid: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub documents: Vec<FeatureDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDocument {
    pub id: i64,
    pub feature_id: i64,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

fn feature_from_row(row: &Row<'_>) -> rusqlite::Result<Feature> {
    Ok(Feature {
        id: row.get(0)?,
        project_uid: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        created_at: row.get(4)?,
        documents: Vec::new(),
    })
}

fn document_from_row(row: &Row<'_>) -> rusqlite::Result<FeatureDocument> {
    Ok(FeatureDocument {
        id: row.get(0)?,
        feature_id: row.get(1)?,
        doc_type: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn documents_of(conn: &Connection, feature_id: i64) -> Result<Vec<FeatureDocument>> {
    let mut stmt = conn.prepare(
        "SELECT id, feature_id, doc_type, content, created_at
         FROM feature_documents WHERE feature_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![feature_id], document_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn load(conn: &Connection, id: i64) -> Result<Feature> {
    let mut feature = or_not_found(
        conn.query_row(
            "SELECT id, project_uid, name, description, created_at FROM features WHERE id = ?1",
            params![id],
            feature_from_row,
        ),
        || VibeError::FeatureNotFound(id),
    )?;
    feature.documents = documents_of(conn, id)?;
    Ok(feature)
}

impl Store {
    pub fn add_feature(
        &mut self,
        project_uid: &str,
        name: &str,
        description: &str,
    ) -> Result<Feature> {
        let name = name.trim();
        if name.is_empty() {
            return Err(VibeError::MissingInput("featureName"));
        }
        self.mutate(|tx| {
            project::ensure_exists(tx, project_uid)?;
            let ts = now();
            tx.execute(
                "INSERT INTO features (project_uid, name, description, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![project_uid, name, description.trim(), ts],
            )?;
            project::touch(tx, project_uid, ts)?;
            load(tx, tx.last_insert_rowid())
        })
    }

    pub fn add_feature_document(
        &mut self,
        feature_id: i64,
        doc_type: DocumentType,
        content: &str,
    ) -> Result<FeatureDocument> {
        self.mutate(|tx| {
            load(tx, feature_id)?;
            tx.execute(
                "INSERT INTO feature_documents (feature_id, doc_type, content, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![feature_id, doc_type, content, now()],
            )?;
            let id = tx.last_insert_rowid();
            Ok(tx.query_row(
                "SELECT id, feature_id, doc_type, content, created_at
                 FROM feature_documents WHERE id = ?1",
                params![id],
                document_from_row,
            )?)
        })
    }

    /// Features newest first, each with its documents.
    pub fn list_features(&self, project_uid: &str) -> Result<Vec<Feature>> {
        project::ensure_exists(self.conn(), project_uid)?;
        let mut stmt = self.conn().prepare(
            "SELECT id, project_uid, name, description, created_at
             FROM features WHERE project_uid = ?1 ORDER BY created_at DESC, id DESC",
        )?;
        let mut features = stmt
            .query_map(params![project_uid], feature_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        for f in &mut features {
            f.documents = documents_of(self.conn(), f.id)?;
        }
        Ok(features)
    }

    pub fn get_feature(&self, id: i64) -> Result<Feature> {
        load(self.conn(), id)
    }

    pub fn delete_feature(&mut self, id: i64) -> Result<()> {
        self.mutate(|tx| {
            let feature = load(tx, id)?;
            tx.execute(
                "DELETE FROM feature_documents WHERE feature_id = ?1",
                params![id],
            )?;
            tx.execute("DELETE FROM features WHERE id = ?1", params![id])?;
            project::touch(tx, &feature.project_uid, now())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::NewProject;

    fn setup() -> (Store, String) {
        let mut s = Store::open_in_memory().unwrap();
        let uid = s
            .create_project(&NewProject {
                name: "Budget app".into(),
                ..Default::default()
            })
            .unwrap()
            .uid;
        (s, uid)
    }

    #[test]
    fn documents_attach_to_feature() {
        let (mut s, uid) = setup();
        let f = s.add_feature(&uid, "Export CSV", "download records").unwrap();
        s.add_feature_document(f.id, DocumentType::Prd, "# PRD").unwrap();
        s.add_feature_document(f.id, DocumentType::Todo, "- [ ] csv").unwrap();

        let listed = s.list_features(&uid).unwrap();
        assert_eq!(listed.len(), 1);
        let types: Vec<_> = listed[0].documents.iter().map(|d| d.doc_type).collect();
        assert_eq!(types, vec![DocumentType::Prd, DocumentType::Todo]);
    }

    #[test]
    fn delete_removes_feature_documents() {
        let (mut s, uid) = setup();
        let f = s.add_feature(&uid, "Sync", "").unwrap();
        s.add_feature_document(f.id, DocumentType::Trd, "# TRD").unwrap();
        s.delete_feature(f.id).unwrap();

        let left: i64 = s
            .conn()
            .query_row("SELECT COUNT(*) FROM feature_documents", [], |r| r.get(0))
            .unwrap();
        assert_eq!(left, 0);
        assert!(matches!(
            s.get_feature(f.id).unwrap_err(),
            VibeError::FeatureNotFound(_)
        ));
    }

    #[test]
    fn document_for_missing_feature_fails() {
        let (mut s, _) = setup();
        let err = s
            .add_feature_document(42, DocumentType::Prd, "x")
            .unwrap_err();
        assert!(matches!(err, VibeError::FeatureNotFound(42)));
    }

    #[test]
    fn blank_name_is_rejected() {
        let (mut s, uid) = setup();
        assert!(matches!(
            s.add_feature(&uid, "", "x").unwrap_err(),
            VibeError::MissingInput(_)
        ));
    }
}
