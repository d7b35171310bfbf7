//! Client data cache: everything a rendered board view reads from.

use std::time::{Duration, Instant};

use crate::db::search::SearchHit;
use crate::types::{Board, Column, Task, UserProfile};

/// How long a toast stays visible before it is swept.
pub const TOAST_TTL: Duration = Duration::from_secs(4);

/// Minimum time the board loading indicator stays up after a switch,
/// so fast loads do not flash.
pub const MIN_BOARD_LOAD: Duration = Duration::from_millis(300);

/// Debounce window for search-as-you-type.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    pub raised_at: Instant,
}

/// Transient notification queue with time-based auto-dismiss.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn push(&mut self, message: impl Into<String>, severity: Severity) {
        self.toasts.push(Toast {
            message: message.into(),
            severity,
            raised_at: Instant::now(),
        });
    }

    /// Drop toasts older than [`TOAST_TTL`].
    pub fn sweep(&mut self, now: Instant) {
        self.toasts
            .retain(|t| now.duration_since(t.raised_at) < TOAST_TTL);
    }

    pub fn visible(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

/// Debounced search input. The pending query is cancelled every time
/// the user types; only a query that survives the full window fires.
/// Queries of length 0 or 1 clear results instead of searching.
#[derive(Debug, Clone, Default)]
pub struct SearchDebouncer {
    pending: Option<(String, Instant)>,
}

impl SearchDebouncer {
    /// Record a keystroke. Returns `true` when the input is too short
    /// to search and results should be cleared now.
    pub fn input(&mut self, query: &str, now: Instant) -> bool {
        if query.len() <= 1 {
            self.pending = None;
            return true;
        }
        self.pending = Some((query.to_string(), now));
        false
    }

    /// Poll for a query whose debounce window has elapsed.
    pub fn fire(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, at)) if now.duration_since(*at) >= SEARCH_DEBOUNCE => {
                self.pending.take().map(|(q, _)| q)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// All client-side state for one signed-in session.
///
/// A plain value with explicit init and teardown. The UI owns exactly
/// one and mutates it through [`super::sync::SyncController`] or the
/// methods here.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub session: Option<UserProfile>,
    pub boards: Vec<Board>,
    pub current_board: Option<String>,
    pub columns: Vec<Column>,
    pub tasks: Vec<Task>,
    pub users: Vec<UserProfile>,
    pub search_results: Vec<SearchHit>,
    board_loading: bool,
    switched_at: Option<Instant>,
    pub toasts: ToastQueue,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a board. Columns and tasks are cleared synchronously so
    /// the previous board's cards never render against the new one.
    pub fn switch_board(&mut self, board_id: Option<String>) {
        self.current_board = board_id;
        self.columns.clear();
        self.tasks.clear();
        self.board_loading = self.current_board.is_some();
        self.switched_at = Some(Instant::now());
    }

    /// Install fetched board data.
    pub fn finish_load(&mut self, columns: Vec<Column>, tasks: Vec<Task>) {
        self.columns = columns;
        self.tasks = tasks;
        self.board_loading = false;
    }

    /// Whether the loading indicator should show. Holds for at least
    /// [`MIN_BOARD_LOAD`] after a switch even if data arrived sooner.
    pub fn is_loading(&self, now: Instant) -> bool {
        if self.board_loading {
            return true;
        }
        match self.switched_at {
            Some(at) if self.current_board.is_some() => now.duration_since(at) < MIN_BOARD_LOAD,
            _ => false,
        }
    }

    /// Tear down everything tied to the signed-in user.
    pub fn logout(&mut self) {
        *self = Self {
            toasts: std::mem::take(&mut self.toasts),
            ..Self::default()
        };
    }

    pub fn push_toast(&mut self, message: impl Into<String>, severity: Severity) {
        self.toasts.push(message, severity);
    }

    /// Tasks of one column, in list order.
    pub fn column_tasks(&self, column_id: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.column_id == column_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnKind;

    fn board(id: &str) -> Board {
        Board {
            id: id.into(),
            title: id.into(),
            background: String::new(),
            owner_id: None,
        }
    }

    fn column(id: &str, board_id: &str) -> Column {
        Column {
            id: id.into(),
            board_id: board_id.into(),
            title: id.into(),
            rank: 0,
            kind: ColumnKind::Other,
        }
    }

    #[test]
    fn switching_boards_clears_synchronously() {
        let mut state = AppState::new();
        state.boards = vec![board("b1"), board("b2")];
        state.switch_board(Some("b1".into()));
        state.finish_load(vec![column("c1", "b1")], vec![]);
        assert_eq!(state.columns.len(), 1);

        state.switch_board(Some("b2".into()));
        assert!(state.columns.is_empty());
        assert!(state.tasks.is_empty());
        assert!(state.is_loading(Instant::now()));
    }

    #[test]
    fn loading_holds_for_minimum_window() {
        let mut state = AppState::new();
        state.switch_board(Some("b1".into()));
        state.finish_load(vec![], vec![]);
        // Data arrived immediately but the indicator still shows.
        assert!(state.is_loading(Instant::now()));
        assert!(!state.is_loading(Instant::now() + MIN_BOARD_LOAD));
    }

    #[test]
    fn logout_tears_down_session_state() {
        let mut state = AppState::new();
        state.session = Some(UserProfile {
            id: "u1".into(),
            email: "a@b.c".into(),
            name: "A".into(),
            initials: "A".into(),
            avatar_url: None,
        });
        state.boards = vec![board("b1")];
        state.switch_board(Some("b1".into()));
        state.logout();
        assert!(state.session.is_none());
        assert!(state.boards.is_empty());
        assert!(state.current_board.is_none());
    }

    #[test]
    fn debouncer_fires_once_after_window() {
        let mut d = SearchDebouncer::default();
        let t0 = Instant::now();
        assert!(!d.input("design", t0));
        assert!(d.fire(t0).is_none());
        let fired = d.fire(t0 + SEARCH_DEBOUNCE);
        assert_eq!(fired.as_deref(), Some("design"));
        assert!(d.fire(t0 + SEARCH_DEBOUNCE).is_none());
    }

    #[test]
    fn debouncer_retype_cancels_pending() {
        let mut d = SearchDebouncer::default();
        let t0 = Instant::now();
        d.input("des", t0);
        d.input("desi", t0 + Duration::from_millis(200));
        // The first query's window has passed but it was superseded.
        assert!(d.fire(t0 + Duration::from_millis(350)).is_none());
        assert_eq!(
            d.fire(t0 + Duration::from_millis(500)).as_deref(),
            Some("desi")
        );
    }

    #[test]
    fn short_queries_clear_instead_of_searching() {
        let mut d = SearchDebouncer::default();
        let t0 = Instant::now();
        d.input("design", t0);
        assert!(d.input("d", t0));
        assert!(d.fire(t0 + SEARCH_DEBOUNCE).is_none());
    }

    #[test]
    fn toast_sweep_drops_expired() {
        let mut q = ToastQueue::default();
        q.push("saved", Severity::Info);
        let now = Instant::now();
        q.sweep(now);
        assert_eq!(q.visible().len(), 1);
        q.sweep(now + TOAST_TTL);
        assert!(q.is_empty());
    }
}
