//! Snapshots of a stack's completed-plan sequence.

use std::collections::HashMap;

use crate::plan::PlanHandle;

/// Token naming one saved snapshot. Tokens are never reused within a stack.
pub type CheckpointToken = usize;

/// Saved copies of the completed sequence, keyed by monotonic token.
#[derive(Debug, Default)]
pub(crate) struct CheckpointStore {
    last_token: CheckpointToken,
    saved: HashMap<CheckpointToken, Vec<PlanHandle>>,
}

impl CheckpointStore {
    /// Saves `completed` and returns its token. The first token is 1.
    pub(crate) fn save(&mut self, completed: &[PlanHandle]) -> CheckpointToken {
        self.last_token += 1;
        self.saved.insert(self.last_token, completed.to_vec());
        self.last_token
    }

    /// Removes and returns the snapshot for `token`.
    pub(crate) fn take(&mut self, token: CheckpointToken) -> Option<Vec<PlanHandle>> {
        self.saved.remove(&token)
    }

    pub(crate) fn len(&self) -> usize {
        self.saved.len()
    }
}
