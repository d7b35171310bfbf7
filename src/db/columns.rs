//! Column CRUD and the guarded delete.

use super::{Database, now_ms};
use crate::error::ApiError;
use crate::types::{Column, ColumnKind, parse_column_kind};
use anyhow::Result;
use rusqlite::{Row, params};

pub(crate) fn parse_column_row(row: &Row) -> rusqlite::Result<Column> {
    let kind: String = row.get("kind")?;
    Ok(Column {
        id: row.get("id")?,
        board_id: row.get("board_id")?,
        title: row.get("title")?,
        rank: row.get("rank")?,
        kind: parse_column_kind(&kind),
    })
}

impl Database {
    /// List a board's columns, rank ascending. Ranks may contain gaps or
    /// duplicates; creation time breaks ties.
    pub fn list_columns(&self, board_id: &str) -> Result<Vec<Column>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM columns WHERE board_id = ?1 ORDER BY rank ASC, created_at ASC",
            )?;
            let columns = stmt
                .query_map(params![board_id], parse_column_row)?
                .filter_map(|r| r.ok())
                .collect();
            Ok(columns)
        })
    }

    /// Create a column at the end of the board. The rank is the current
    /// column count; deleted columns leave gaps that are never reclaimed.
    pub fn create_column(
        &self,
        id: Option<String>,
        board_id: &str,
        title: &str,
        kind: Option<ColumnKind>,
    ) -> Result<Column> {
        let now = now_ms();

        self.with_conn(|conn| {
            let board_exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM boards WHERE id = ?1)",
                params![board_id],
                |row| row.get(0),
            )?;
            if !board_exists {
                return Err(ApiError::board_not_found(board_id).into());
            }

            let rank: i64 = conn.query_row(
                "SELECT COUNT(*) FROM columns WHERE board_id = ?1",
                params![board_id],
                |row| row.get(0),
            )?;

            let column_id = id.unwrap_or_else(|| format!("col-{}", now));
            let kind = kind.unwrap_or_else(|| ColumnKind::suggest(title));

            conn.execute(
                "INSERT INTO columns (id, board_id, title, rank, kind, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![column_id, board_id, title, rank, kind.as_str(), now],
            )?;

            Ok(Column {
                id: column_id,
                board_id: board_id.to_string(),
                title: title.to_string(),
                rank,
                kind,
            })
        })
    }

    /// Rename a column. The stored kind is not re-derived from the new title.
    pub fn rename_column(&self, column_id: &str, title: &str) -> Result<()> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE columns SET title = ?1 WHERE id = ?2",
                params![title, column_id],
            )?;
            if updated == 0 {
                return Err(ApiError::column_not_found(column_id).into());
            }
            Ok(())
        })
    }

    /// Delete a column. Rejected while any task still references it;
    /// neither collection is mutated on rejection.
    pub fn delete_column(&self, column_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let task_count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM tasks WHERE column_id = ?1",
                params![column_id],
                |row| row.get(0),
            )?;
            if task_count > 0 {
                return Err(ApiError::column_not_empty(column_id).into());
            }

            let deleted = conn.execute("DELETE FROM columns WHERE id = ?1", params![column_id])?;
            if deleted == 0 {
                return Err(ApiError::column_not_found(column_id).into());
            }
            Ok(())
        })
    }
}
