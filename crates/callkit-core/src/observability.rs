use serde::{Deserialize, Serialize};

/// Counters for one deferred queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub submitted: u64,
    pub executed: u64,
    pub failed: u64,
    pub runs: u64,
    pub pending: usize,
}
