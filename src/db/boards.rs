//! Board CRUD, membership and sharing.

use super::{Database, now_ms};
use crate::error::ApiError;
use crate::types::{Board, Column, ColumnKind};
use anyhow::Result;
use rusqlite::{Row, params};
use uuid::Uuid;

/// Titles of the columns every new board starts with, at ranks 0, 1, 2.
pub const DEFAULT_COLUMNS: [&str; 3] = ["TO DO", "IN PROGRESS", "COMPLETE"];

fn parse_board_row(row: &Row) -> rusqlite::Result<Board> {
    Ok(Board {
        id: row.get("id")?,
        title: row.get("title")?,
        background: row.get("background")?,
        owner_id: row.get("owner_id")?,
    })
}

impl Database {
    /// List boards visible to a user: owned, shared via membership, or
    /// containing a task assigned to them.
    pub fn boards_for_user(&self, user_id: &str) -> Result<Vec<Board>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT b.*
                 FROM boards b
                 LEFT JOIN board_members bm ON b.id = bm.board_id
                 LEFT JOIN columns c ON b.id = c.board_id
                 LEFT JOIN tasks t ON c.id = t.column_id
                 WHERE b.owner_id = ?1
                    OR bm.user_id = ?1
                    OR EXISTS (SELECT 1 FROM json_each(t.assignee_ids) WHERE value = ?1)
                 ORDER BY b.created_at",
            )?;

            let boards = stmt
                .query_map(params![user_id], parse_board_row)?
                .filter_map(|r| r.ok())
                .collect();

            Ok(boards)
        })
    }

    /// Get a board by ID.
    pub fn get_board(&self, board_id: &str) -> Result<Option<Board>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM boards WHERE id = ?1")?;
            match stmt.query_row(params![board_id], parse_board_row) {
                Ok(board) => Ok(Some(board)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Create a board together with its three default columns.
    ///
    /// The client may supply the board id (the contract lets optimistic
    /// creates keep their temporary id); a UUIDv7-based id is generated
    /// otherwise.
    pub fn create_board(
        &self,
        id: Option<String>,
        title: String,
        background: String,
        owner_id: Option<String>,
    ) -> Result<(Board, Vec<Column>)> {
        let board_id = id.unwrap_or_else(|| format!("board-{}", Uuid::now_v7()));
        let now = now_ms();

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO boards (id, title, background, owner_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![board_id, title, background, owner_id, now],
            )?;

            let mut columns = Vec::with_capacity(DEFAULT_COLUMNS.len());
            for (rank, col_title) in DEFAULT_COLUMNS.iter().enumerate() {
                let col_id = format!("col-{}-{}", now, rank);
                let kind = ColumnKind::suggest(col_title);
                tx.execute(
                    "INSERT INTO columns (id, board_id, title, rank, kind, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![col_id, board_id, col_title, rank as i64, kind.as_str(), now],
                )?;
                columns.push(Column {
                    id: col_id,
                    board_id: board_id.clone(),
                    title: (*col_title).to_string(),
                    rank: rank as i64,
                    kind,
                });
            }

            tx.commit()?;

            Ok((
                Board {
                    id: board_id,
                    title,
                    background,
                    owner_id,
                },
                columns,
            ))
        })
    }

    /// Rename a board.
    pub fn rename_board(&self, board_id: &str, title: &str) -> Result<()> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE boards SET title = ?1 WHERE id = ?2",
                params![title, board_id],
            )?;
            if updated == 0 {
                return Err(ApiError::board_not_found(board_id).into());
            }
            Ok(())
        })
    }

    /// Delete a board and everything under it: tasks, columns, membership.
    pub fn delete_board(&self, board_id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "DELETE FROM tasks WHERE column_id IN
                   (SELECT id FROM columns WHERE board_id = ?1)",
                params![board_id],
            )?;
            tx.execute("DELETE FROM columns WHERE board_id = ?1", params![board_id])?;
            tx.execute(
                "DELETE FROM board_members WHERE board_id = ?1",
                params![board_id],
            )?;
            let deleted = tx.execute("DELETE FROM boards WHERE id = ?1", params![board_id])?;

            tx.commit()?;

            if deleted == 0 {
                return Err(ApiError::board_not_found(board_id).into());
            }
            Ok(())
        })
    }

    /// Share a board with the user registered under the given email.
    /// Sharing twice is a no-op.
    pub fn share_board(&self, board_id: &str, email: &str) -> Result<()> {
        self.with_conn(|conn| {
            let user_id: Option<String> = conn
                .query_row(
                    "SELECT id FROM users WHERE email = ?1",
                    params![email],
                    |row| row.get(0),
                )
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    e => Err(e),
                })?;

            let Some(user_id) = user_id else {
                return Err(ApiError::user_not_found().into());
            };

            conn.execute(
                "INSERT OR IGNORE INTO board_members (board_id, user_id) VALUES (?1, ?2)",
                params![board_id, user_id],
            )?;
            Ok(())
        })
    }

    /// List member user ids of a board (excluding the owner).
    pub fn board_members(&self, board_id: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT user_id FROM board_members WHERE board_id = ?1")?;
            let members = stmt
                .query_map(params![board_id], |row| row.get(0))?
                .filter_map(|r| r.ok())
                .collect();
            Ok(members)
        })
    }
}
