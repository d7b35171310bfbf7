//! Typed confirmation gate for board deletion.

const CONFIRM_PHRASE: &str = "delete";

/// Tracks the confirmation input for a pending board delete. The
/// destructive action stays disabled until the typed phrase matches.
#[derive(Debug, Default)]
pub struct DeleteBoardConfirm {
    input: String,
}

impl DeleteBoardConfirm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, input: &str) {
        self.input = input.to_string();
    }

    /// Whether the delete action may proceed. Case-insensitive,
    /// surrounding whitespace ignored.
    pub fn is_armed(&self) -> bool {
        self.input.trim().eq_ignore_ascii_case(CONFIRM_PHRASE)
    }

    pub fn reset(&mut self) {
        self.input.clear();
    }
}
