use crate::error::{Result, VibeError};
use crate::store::{now, or_not_found, Store};
use crate::types::ThemeSource;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

/// A theme capture the user chose to keep.
///
/// `tokens` is stored as JSON text: URL captures hold a
/// [`ThemeTokens`](crate::theme::ThemeTokens), screenshot captures hold
/// whatever object the vision model returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTheme {
    pub id: i64,
    pub name: String,
    pub source: ThemeSource,
    pub source_url: Option<String>,
    pub tokens: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavedTheme {
    pub name: String,
    pub source: ThemeSource,
    #[serde(default)]
    pub source_url: Option<String>,
    pub tokens: serde_json::Value,
}

const COLUMNS: &str = "id, name, source, source_url, tokens, created_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<(SavedTheme, String)> {
    Ok((
        SavedTheme {
            id: row.get(0)?,
            name: row.get(1)?,
            source: row.get(2)?,
            source_url: row.get(3)?,
            tokens: serde_json::Value::Null,
            created_at: row.get(5)?,
        },
        row.get(4)?,
    ))
}

fn with_tokens((mut theme, raw): (SavedTheme, String)) -> Result<SavedTheme> {
    theme.tokens = serde_json::from_str(&raw)?;
    Ok(theme)
}

impl Store {
    pub fn save_theme(&mut self, new: &NewSavedTheme) -> Result<SavedTheme> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(VibeError::MissingInput("name"));
        }
        let tokens = serde_json::to_string(&new.tokens)?;
        self.conn().execute(
            &format!("INSERT INTO theme_captures ({COLUMNS}) VALUES (NULL, ?1, ?2, ?3, ?4, ?5)"),
            params![name, new.source, new.source_url, tokens, now()],
        )?;
        self.get_theme(self.conn().last_insert_rowid())
    }

    /// Newest first.
    pub fn list_themes(&self) -> Result<Vec<SavedTheme>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {COLUMNS} FROM theme_captures ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt
            .query_map([], from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(with_tokens).collect()
    }

    pub fn get_theme(&self, id: i64) -> Result<SavedTheme> {
        let row = or_not_found(
            self.conn().query_row(
                &format!("SELECT {COLUMNS} FROM theme_captures WHERE id = ?1"),
                params![id],
                from_row,
            ),
            || VibeError::ThemeNotFound(id),
        )?;
        with_tokens(row)
    }

    pub fn delete_theme(&mut self, id: i64) -> Result<()> {
        let n = self
            .conn()
            .execute("DELETE FROM theme_captures WHERE id = ?1", params![id])?;
        if n == 0 {
            return Err(VibeError::ThemeNotFound(id));
        }
        Ok(())
    }
}
