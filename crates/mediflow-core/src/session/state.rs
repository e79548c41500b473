use serde::{Deserialize, Serialize};

/// Lifecycle of a chat session's single outstanding request.
///
/// `Idle -> Sending -> (Succeeded | Failed) -> Idle`. The settled states are
/// transient: a session reports them only between the call settling and the
/// reply being appended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Sending,
    Succeeded,
    Failed,
}

impl SessionState {
    /// Whether the UI should show the typing indicator and block input.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Sending)
    }
}
