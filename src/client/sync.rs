//! Optimistic sync controller.
//!
//! Every mutation follows one pattern: snapshot the affected state,
//! apply the change locally so the UI updates at once, send the request,
//! and on failure put the snapshot back and raise a toast. There is no
//! retry, no timeout and no request queue; in-flight requests may
//! interleave and the last row write wins.

use anyhow::Result;

use crate::types::{Board, Column, ColumnKind, Priority, Task};

use super::ordering;
use super::state::{AppState, Severity};

/// Transport used by the controller. A UI shell implements this over
/// its HTTP client; tests implement it over canned responses.
pub trait BoardApi {
    fn create_board(
        &self,
        board: &Board,
    ) -> impl Future<Output = Result<(Board, Vec<Column>)>> + Send;
    fn rename_board(&self, board_id: &str, title: &str) -> impl Future<Output = Result<()>> + Send;
    fn delete_board(&self, board_id: &str) -> impl Future<Output = Result<()>> + Send;
    fn share_board(&self, board_id: &str, email: &str) -> impl Future<Output = Result<()>> + Send;
    fn create_column(&self, column: &Column) -> impl Future<Output = Result<Column>> + Send;
    fn rename_column(
        &self,
        column_id: &str,
        title: &str,
    ) -> impl Future<Output = Result<()>> + Send;
    fn delete_column(&self, column_id: &str) -> impl Future<Output = Result<()>> + Send;
    fn create_task(&self, task: &Task) -> impl Future<Output = Result<Task>> + Send;
    fn update_task(&self, task: &Task) -> impl Future<Output = Result<()>> + Send;
    fn delete_task(&self, task_id: &str) -> impl Future<Output = Result<()>> + Send;
    fn reorder_task(
        &self,
        task_id: &str,
        target_column_id: &str,
        position: f64,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Temporary client-side id, unique enough within one session.
pub fn temp_id(entity: &str) -> String {
    format!("{}-{}", entity, chrono::Utc::now().timestamp_millis())
}

pub struct SyncController<A: BoardApi> {
    api: A,
    pub state: AppState,
}

impl<A: BoardApi> SyncController<A> {
    pub fn new(api: A, state: AppState) -> Self {
        Self { api, state }
    }

    /// Create a board. The temporary id is kept on success since the
    /// server accepts client-generated ids.
    pub async fn add_board(&mut self, title: &str, background: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(());
        }

        let snapshot = self.state.boards.clone();
        let board = Board {
            id: temp_id("board"),
            title: title.to_string(),
            background: background.to_string(),
            owner_id: self.state.session.as_ref().map(|u| u.id.clone()),
        };
        self.state.boards.push(board.clone());

        if let Err(err) = self.api.create_board(&board).await {
            self.state.boards = snapshot;
            self.state
                .push_toast(format!("Could not create board: {}", err), Severity::Error);
        }
        Ok(())
    }

    pub async fn rename_board(&mut self, board_id: &str, title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(());
        }

        let snapshot = self.state.boards.clone();
        if let Some(board) = self.state.boards.iter_mut().find(|b| b.id == board_id) {
            board.title = title.to_string();
        } else {
            return Ok(());
        }

        if let Err(err) = self.api.rename_board(board_id, title).await {
            self.state.boards = snapshot;
            self.state
                .push_toast(format!("Could not rename board: {}", err), Severity::Error);
        }
        Ok(())
    }

    pub async fn delete_board(&mut self, board_id: &str) -> Result<()> {
        let boards = self.state.boards.clone();
        let columns = self.state.columns.clone();
        let tasks = self.state.tasks.clone();
        let current = self.state.current_board.clone();

        self.state.boards.retain(|b| b.id != board_id);
        if self.state.current_board.as_deref() == Some(board_id) {
            self.state.switch_board(None);
        }

        if let Err(err) = self.api.delete_board(board_id).await {
            self.state.boards = boards;
            self.state.columns = columns;
            self.state.tasks = tasks;
            self.state.current_board = current;
            self.state
                .push_toast(format!("Could not delete board: {}", err), Severity::Error);
        }
        Ok(())
    }

    /// Share a board by email. Nothing local changes on success; an
    /// unknown email comes back as a not-found failure and is toasted.
    pub async fn share_board(&mut self, board_id: &str, email: &str) -> Result<()> {
        if let Err(err) = self.api.share_board(board_id, email).await {
            self.state
                .push_toast(format!("Could not share board: {}", err), Severity::Error);
        } else {
            self.state
                .push_toast(format!("Shared with {}", email), Severity::Info);
        }
        Ok(())
    }

    /// Create a column on the current board. The server may assign its
    /// own id, so the temporary id is reconciled from the response.
    pub async fn add_column(&mut self, title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(());
        }
        let Some(board_id) = self.state.current_board.clone() else {
            return Ok(());
        };

        let snapshot = self.state.columns.clone();
        let column = Column {
            id: temp_id("col"),
            board_id,
            title: title.to_string(),
            rank: self.state.columns.len() as i64,
            kind: ColumnKind::suggest(title),
        };
        self.state.columns.push(column.clone());

        match self.api.create_column(&column).await {
            Ok(created) => {
                if let Some(local) = self.state.columns.iter_mut().find(|c| c.id == column.id) {
                    *local = created;
                }
            }
            Err(err) => {
                self.state.columns = snapshot;
                self.state
                    .push_toast(format!("Could not add column: {}", err), Severity::Error);
            }
        }
        Ok(())
    }

    pub async fn rename_column(&mut self, column_id: &str, title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(());
        }

        let snapshot = self.state.columns.clone();
        if let Some(column) = self.state.columns.iter_mut().find(|c| c.id == column_id) {
            column.title = title.to_string();
        } else {
            return Ok(());
        }

        if let Err(err) = self.api.rename_column(column_id, title).await {
            self.state.columns = snapshot;
            self.state
                .push_toast(format!("Could not rename column: {}", err), Severity::Error);
        }
        Ok(())
    }

    /// Delete a column. Checked locally first: a column with tasks is
    /// refused without a request, matching the server's guard.
    pub async fn delete_column(&mut self, column_id: &str) -> Result<()> {
        if self.state.tasks.iter().any(|t| t.column_id == column_id) {
            self.state
                .push_toast("Column is not empty", Severity::Warning);
            return Ok(());
        }

        let snapshot = self.state.columns.clone();
        self.state.columns.retain(|c| c.id != column_id);

        if let Err(err) = self.api.delete_column(column_id).await {
            self.state.columns = snapshot;
            self.state
                .push_toast(format!("Could not delete column: {}", err), Severity::Error);
        }
        Ok(())
    }

    pub async fn add_task(&mut self, column_id: &str, title: &str, priority: Priority) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(());
        }

        let snapshot = self.state.tasks.clone();
        let position = self
            .state
            .tasks
            .iter()
            .filter(|t| t.column_id == column_id)
            .map(|t| t.position)
            .fold(0.0_f64, f64::max)
            + 1.0;
        let task = Task {
            id: temp_id("task"),
            column_id: column_id.to_string(),
            title: title.to_string(),
            description: String::new(),
            priority,
            position,
            subtasks: vec![],
            comments: vec![],
            assignee_ids: vec![],
            attachments: vec![],
            start_date: None,
            due_date: None,
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        self.state.tasks.push(task.clone());

        if let Err(err) = self.api.create_task(&task).await {
            self.state.tasks = snapshot;
            self.state
                .push_toast(format!("Could not add task: {}", err), Severity::Error);
        }
        Ok(())
    }

    /// Replace a task's editable fields with `updated`.
    pub async fn update_task(&mut self, updated: Task) -> Result<()> {
        let snapshot = self.state.tasks.clone();
        let Some(local) = self.state.tasks.iter_mut().find(|t| t.id == updated.id) else {
            return Ok(());
        };
        *local = updated.clone();

        if let Err(err) = self.api.update_task(&updated).await {
            self.state.tasks = snapshot;
            self.state
                .push_toast(format!("Could not save task: {}", err), Severity::Error);
        }
        Ok(())
    }

    pub async fn delete_task(&mut self, task_id: &str) -> Result<()> {
        let snapshot = self.state.tasks.clone();
        self.state.tasks.retain(|t| t.id != task_id);

        if let Err(err) = self.api.delete_task(task_id).await {
            self.state.tasks = snapshot;
            self.state
                .push_toast(format!("Could not delete task: {}", err), Severity::Error);
        }
        Ok(())
    }

    /// Drop a task at `new_index` in `target_column_id`. The local list
    /// is rearranged immediately; the computed fractional position is
    /// persisted so a reload reproduces the arrangement.
    pub async fn move_task(
        &mut self,
        task_id: &str,
        target_column_id: &str,
        new_index: usize,
    ) -> Result<()> {
        let Some(placement) =
            ordering::placement(&self.state.tasks, task_id, target_column_id, new_index)
        else {
            return Ok(());
        };

        let snapshot = self.state.tasks.clone();
        let mut rearranged = ordering::reorder(
            std::mem::take(&mut self.state.tasks),
            task_id,
            target_column_id,
            new_index,
        );
        if let Some(moved) = rearranged.iter_mut().find(|t| t.id == task_id) {
            moved.position = placement.position;
        }
        self.state.tasks = rearranged;

        if let Err(err) = self
            .api
            .reorder_task(task_id, &placement.column_id, placement.position)
            .await
        {
            self.state.tasks = snapshot;
            self.state
                .push_toast(format!("Could not move task: {}", err), Severity::Error);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Mock transport: succeeds by default, fails everything when the
    /// flag is set.
    #[derive(Default)]
    struct MockApi {
        fail: AtomicBool,
    }

    impl MockApi {
        fn failing() -> Self {
            Self {
                fail: AtomicBool::new(true),
            }
        }

        fn check(&self) -> Result<()> {
            if self.fail.load(Ordering::Relaxed) {
                anyhow::bail!("connection refused")
            }
            Ok(())
        }
    }

    impl BoardApi for MockApi {
        async fn create_board(&self, board: &Board) -> Result<(Board, Vec<Column>)> {
            self.check()?;
            Ok((board.clone(), vec![]))
        }
        async fn rename_board(&self, _: &str, _: &str) -> Result<()> {
            self.check()
        }
        async fn delete_board(&self, _: &str) -> Result<()> {
            self.check()
        }
        async fn share_board(&self, _: &str, _: &str) -> Result<()> {
            self.check()
        }
        async fn create_column(&self, column: &Column) -> Result<Column> {
            self.check()?;
            let mut created = column.clone();
            created.id = "col-server-1".to_string();
            Ok(created)
        }
        async fn rename_column(&self, _: &str, _: &str) -> Result<()> {
            self.check()
        }
        async fn delete_column(&self, _: &str) -> Result<()> {
            self.check()
        }
        async fn create_task(&self, task: &Task) -> Result<Task> {
            self.check()?;
            Ok(task.clone())
        }
        async fn update_task(&self, _: &Task) -> Result<()> {
            self.check()
        }
        async fn delete_task(&self, _: &str) -> Result<()> {
            self.check()
        }
        async fn reorder_task(&self, _: &str, _: &str, _: f64) -> Result<()> {
            self.check()
        }
    }

    fn seeded_controller(api: MockApi) -> SyncController<MockApi> {
        let mut state = AppState::new();
        state.current_board = Some("b1".into());
        state.columns = vec![
            Column {
                id: "col1".into(),
                board_id: "b1".into(),
                title: "TO DO".into(),
                rank: 0,
                kind: ColumnKind::Todo,
            },
            Column {
                id: "col2".into(),
                board_id: "b1".into(),
                title: "COMPLETE".into(),
                rank: 1,
                kind: ColumnKind::Done,
            },
        ];
        state.tasks = vec![
            mk_task("a", "col1", 1.0),
            mk_task("b", "col1", 2.0),
            mk_task("c", "col2", 1.0),
        ];
        SyncController::new(api, state)
    }

    fn mk_task(id: &str, column_id: &str, position: f64) -> Task {
        Task {
            id: id.into(),
            column_id: column_id.into(),
            title: id.to_uppercase(),
            description: String::new(),
            priority: Priority::Medium,
            position,
            subtasks: vec![],
            comments: vec![],
            assignee_ids: vec![],
            attachments: vec![],
            start_date: None,
            due_date: None,
            created_at: 0,
        }
    }

    #[tokio::test]
    async fn move_task_applies_optimistically() {
        let mut ctl = seeded_controller(MockApi::default());
        ctl.move_task("a", "col2", 0).await.unwrap();

        let ids: Vec<(&str, &str)> = ctl
            .state
            .tasks
            .iter()
            .map(|t| (t.id.as_str(), t.column_id.as_str()))
            .collect();
        assert_eq!(ids, vec![("b", "col1"), ("a", "col2"), ("c", "col2")]);
        assert!(ctl.state.toasts.is_empty());
    }

    #[tokio::test]
    async fn failed_move_rolls_back_and_toasts() {
        let mut ctl = seeded_controller(MockApi::failing());
        let before: Vec<String> = ctl.state.tasks.iter().map(|t| t.id.clone()).collect();
        ctl.move_task("a", "col2", 0).await.unwrap();

        let after: Vec<String> = ctl.state.tasks.iter().map(|t| t.id.clone()).collect();
        assert_eq!(before, after);
        assert_eq!(ctl.state.tasks[0].column_id, "col1");
        assert!(!ctl.state.toasts.is_empty());
    }

    #[tokio::test]
    async fn failed_task_create_rolls_back() {
        let mut ctl = seeded_controller(MockApi::failing());
        ctl.add_task("col1", "New thing", Priority::High).await.unwrap();
        assert_eq!(ctl.state.tasks.len(), 3);
        assert!(!ctl.state.toasts.is_empty());
    }

    #[tokio::test]
    async fn empty_title_aborts_without_request() {
        let mut ctl = seeded_controller(MockApi::failing());
        ctl.add_task("col1", "   ", Priority::Low).await.unwrap();
        assert_eq!(ctl.state.tasks.len(), 3);
        // No request was made, so the failing transport raised nothing.
        assert!(ctl.state.toasts.is_empty());
    }

    #[tokio::test]
    async fn add_column_reconciles_server_id() {
        let mut ctl = seeded_controller(MockApi::default());
        ctl.add_column("Review").await.unwrap();
        assert_eq!(ctl.state.columns.len(), 3);
        assert_eq!(ctl.state.columns[2].id, "col-server-1");
        assert_eq!(ctl.state.columns[2].rank, 2);
    }

    #[tokio::test]
    async fn delete_nonempty_column_is_refused_locally() {
        let mut ctl = seeded_controller(MockApi::default());
        ctl.delete_column("col1").await.unwrap();
        assert_eq!(ctl.state.columns.len(), 2);
        assert_eq!(ctl.state.tasks.len(), 3);
        assert!(!ctl.state.toasts.is_empty());
    }

    #[tokio::test]
    async fn delete_board_clears_current_selection() {
        let mut ctl = seeded_controller(MockApi::default());
        ctl.state.boards = vec![Board {
            id: "b1".into(),
            title: "Main".into(),
            background: String::new(),
            owner_id: None,
        }];
        ctl.delete_board("b1").await.unwrap();
        assert!(ctl.state.boards.is_empty());
        assert!(ctl.state.current_board.is_none());
    }
}
