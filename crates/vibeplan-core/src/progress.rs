use crate::error::Result;
use crate::types::TodoStatus;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

/// Completion summary for one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: u32,
    pub total: u32,
    pub percentage: u32,
}

impl Progress {
    pub fn new(completed: u32, total: u32) -> Self {
        Self {
            completed,
            total,
            percentage: percentage(completed, total),
        }
    }
}

/// `round(100 * done / total)`, or 0 when there is nothing to do.
pub fn percentage(done: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(done) * 100.0 / f64::from(total)).round() as u32
}

pub(crate) fn count(conn: &Connection, project_uid: &str) -> Result<Progress> {
    let (total, done): (u32, u32) = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(status = ?2), 0) FROM todos WHERE project_uid = ?1",
        params![project_uid, TodoStatus::Done],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok(Progress::new(done, total))
}

/// Recount a project's todos and persist the percentage. Meant to run inside
/// the same transaction as the todo mutation that triggered it.
pub(crate) fn recompute(
    conn: &Connection,
    project_uid: &str,
    now: DateTime<Utc>,
) -> Result<Progress> {
    let progress = count(conn, project_uid)?;
    conn.execute(
        "UPDATE projects SET progress = ?2, updated_at = ?3 WHERE uid = ?1",
        params![project_uid, progress.percentage, now],
    )?;
    Ok(progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_project_is_zero() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(Progress::new(0, 0).percentage, 0);
    }

    #[test]
    fn rounds_to_nearest() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(5, 5), 100);
    }
}
