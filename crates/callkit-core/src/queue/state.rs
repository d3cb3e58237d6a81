//! Run phase of a deferred queue.

use serde::{Deserialize, Serialize};

/// Queue phase.
///
/// State transitions:
/// - Idle -> Running -> Idle
///
/// `Idle` is both the initial state and the state between runs. A run that
/// ends with an error or a panic also returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QueuePhase {
    /// No run in progress.
    #[default]
    Idle,

    /// `run()` is draining the queue.
    Running,
}

impl QueuePhase {
    pub fn is_running(self) -> bool {
        matches!(self, QueuePhase::Running)
    }
}
