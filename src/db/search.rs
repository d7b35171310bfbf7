//! Cross-board task search.

use super::Database;
use super::tasks::parse_task_row;
use crate::types::Task;
use anyhow::Result;
use rusqlite::params;
use serde::{Deserialize, Serialize};

/// Results are capped to keep the dropdown small.
const SEARCH_LIMIT: i64 = 20;

/// A task matched by search, annotated with its owning board so the
/// client can navigate across boards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(flatten)]
    pub task: Task,
    pub board_id: String,
    pub board_title: String,
}

impl Database {
    /// Substring search over task title and description (case-insensitive
    /// for ASCII, per SQLite LIKE semantics). An empty query returns an
    /// empty list without touching the store.
    pub fn search_tasks(&self, query: &str) -> Result<Vec<SearchHit>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = format!("%{}%", query);

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT t.*, c.board_id AS board_id, b.title AS board_title
                 FROM tasks t
                 JOIN columns c ON t.column_id = c.id
                 JOIN boards b ON c.board_id = b.id
                 WHERE t.title LIKE ?1 OR t.description LIKE ?1
                 ORDER BY t.created_at DESC
                 LIMIT ?2",
            )?;

            let hits = stmt
                .query_map(params![pattern, SEARCH_LIMIT], |row| {
                    let task = parse_task_row(row)?;
                    Ok(SearchHit {
                        task,
                        board_id: row.get("board_id")?,
                        board_title: row.get("board_title")?,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(hits)
        })
    }
}
